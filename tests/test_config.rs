// Integration tests for JSON configuration loading: training settings and
// layer stacks built from files.

use rust_neural_blocks::architecture::{build_model, load_architecture};
use rust_neural_blocks::config::load_config;
use rust_neural_blocks::loss::LossFunction;
use rust_neural_blocks::Tensor;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_json(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes()).expect("failed to write temp file");
    file
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn test_training_config_roundtrip_through_file() {
    let file = write_json(
        r#"{
  "learning_rate": 0.01,
  "loss_function": "categorical_cross_entropy",
  "seed": 1234
}"#,
    );
    let config = load_config(path(&file)).unwrap();

    assert_eq!(config.learning_rate, 0.01);
    assert_eq!(config.seed, Some(1234));
    assert_eq!(config.loss().unwrap(), LossFunction::CategoricalCrossEntropy);
}

#[test]
fn test_training_config_invalid_json() {
    let file = write_json(r#"{ "learning_rate": 0.1, "loss_function": "#);
    assert!(load_config(path(&file)).is_err());
}

#[test]
fn test_training_config_missing_field() {
    let file = write_json(r#"{ "learning_rate": 0.1 }"#);
    let err = load_config(path(&file)).unwrap_err();
    assert!(err.to_string().contains("loss_function"));
}

#[test]
fn test_training_config_negative_learning_rate() {
    let file = write_json(r#"{ "learning_rate": -0.5, "loss_function": "bce" }"#);
    assert!(load_config(path(&file)).is_err());
}

#[test]
fn test_architecture_file_builds_working_model() {
    let file = write_json(
        r#"{
  "seed": 7,
  "layers": [
    { "layer_type": "flatten" },
    { "layer_type": "dense", "input_size": 8, "output_size": 4 },
    { "layer_type": "activation", "activation": "relu" },
    { "layer_type": "dense", "input_size": 4, "output_size": 3 },
    { "layer_type": "activation", "activation": "softmax" }
  ]
}"#,
    );
    let config = load_architecture(path(&file)).unwrap();
    let mut layers = build_model(&config).unwrap();

    let names: Vec<&str> = layers.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["flatten", "dense", "activation", "dense", "activation"]);

    let total: usize = layers.iter().map(|l| l.parameter_count()).sum();
    assert_eq!(total, (8 * 4 + 4) + (4 * 3 + 3));

    let mut activations = Tensor::new(vec![0.25; 16], vec![2, 2, 4]).unwrap();
    for layer in layers.iter_mut() {
        activations = layer.forward(&activations).unwrap();
    }
    assert_eq!(activations.shape(), &[2, 3]);
}

#[test]
fn test_architecture_file_connection_mismatch() {
    let file = write_json(
        r#"{
  "layers": [
    { "layer_type": "dense", "input_size": 8, "output_size": 4 },
    { "layer_type": "dense", "input_size": 5, "output_size": 1 }
  ]
}"#,
    );
    let err = load_architecture(path(&file)).unwrap_err();
    assert!(err.to_string().contains("Layer connection mismatch"));
}

#[test]
fn test_architecture_file_unknown_activation() {
    let file = write_json(
        r#"{
  "layers": [
    { "layer_type": "dense", "input_size": 2, "output_size": 2 },
    { "layer_type": "activation", "activation": "tanh" }
  ]
}"#,
    );
    let err = load_architecture(path(&file)).unwrap_err();
    assert_eq!(err.to_string(), "unknown activation function 'tanh'");
}
