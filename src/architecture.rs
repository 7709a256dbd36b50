//! Architecture configuration structures
//!
//! This module describes a stack of layers in JSON and builds it into boxed
//! [`Layer`] trait objects, so a caller can compose dense, activation and
//! flatten layers without code changes.

use crate::error::NetworkError;
use crate::layers::{ActivationKind, ActivationLayer, DenseLayer, FlattenLayer, Layer};
use crate::utils::rng::rng_from_seed;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use tracing::debug;

/// Configuration for a single layer in the stack.
///
/// Different layer types require different fields:
///
/// - **dense**: Requires `input_size` and `output_size`
/// - **activation**: Requires `activation` ("linear", "relu", "sigmoid", "softmax")
/// - **flatten**: No parameters
///
/// # Examples
///
/// ```json
/// { "layer_type": "dense", "input_size": 784, "output_size": 128 }
/// ```
///
/// ```json
/// { "layer_type": "activation", "activation": "relu" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerConfig {
    /// Type of layer: "dense", "activation" or "flatten"
    pub layer_type: String,

    /// Input size for Dense layer
    pub input_size: Option<usize>,
    /// Output size for Dense layer
    pub output_size: Option<usize>,

    /// Nonlinearity for Activation layer
    pub activation: Option<String>,
}

/// Configuration for the entire layer stack.
///
/// # Example
///
/// ```json
/// {
///   "seed": 1,
///   "layers": [
///     { "layer_type": "flatten" },
///     { "layer_type": "dense", "input_size": 784, "output_size": 64 },
///     { "layer_type": "activation", "activation": "relu" },
///     { "layer_type": "dense", "input_size": 64, "output_size": 10 },
///     { "layer_type": "activation", "activation": "softmax" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    /// Seed for dense weight initialization; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Layers in application order
    pub layers: Vec<LayerConfig>,
}

/// Loads and validates an architecture configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use rust_neural_blocks::architecture::load_architecture;
///
/// let arch = load_architecture("config/mlp.json").unwrap();
/// assert!(!arch.layers.is_empty());
/// ```
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

fn invalid(message: String) -> NetworkError {
    NetworkError::InvalidConfig(message)
}

/// Validates an architecture configuration.
///
/// Checks that:
/// - Architecture has at least one layer
/// - Each layer has the required fields for its type
/// - Activation names are known
/// - Consecutive dense layers chain (activation layers keep the size,
///   flatten resets it)
pub fn validate_architecture(config: &ArchitectureConfig) -> Result<(), NetworkError> {
    if config.layers.is_empty() {
        return Err(invalid("Architecture must have at least one layer".to_string()));
    }

    let mut current_size: Option<(usize, usize)> = None;
    for (i, layer) in config.layers.iter().enumerate() {
        match layer.layer_type.to_lowercase().as_str() {
            "dense" => {
                let (input_size, output_size) = dense_sizes(layer, i)?;
                if let Some((prev_index, prev_size)) = current_size {
                    if prev_size != input_size {
                        return Err(invalid(format!(
                            "Layer connection mismatch: Layer {} output size ({}) does not match Layer {} input size ({})",
                            prev_index, prev_size, i, input_size
                        )));
                    }
                }
                current_size = Some((i, output_size));
            }
            "activation" => {
                activation_kind(layer, i)?;
            }
            "flatten" => current_size = None,
            _ => {
                return Err(invalid(format!(
                    "Layer {}: Invalid layer type '{}'. Must be one of: dense, activation, flatten",
                    i, layer.layer_type
                )))
            }
        }
    }

    Ok(())
}

fn dense_sizes(layer: &LayerConfig, index: usize) -> Result<(usize, usize), NetworkError> {
    let input_size = layer
        .input_size
        .ok_or_else(|| invalid(format!("Layer {}: Dense layer requires 'input_size'", index)))?;
    let output_size = layer
        .output_size
        .ok_or_else(|| invalid(format!("Layer {}: Dense layer requires 'output_size'", index)))?;

    if input_size == 0 {
        return Err(invalid(format!("Layer {}: input_size must be greater than 0", index)));
    }
    if output_size == 0 {
        return Err(invalid(format!("Layer {}: output_size must be greater than 0", index)));
    }
    Ok((input_size, output_size))
}

fn activation_kind(layer: &LayerConfig, index: usize) -> Result<ActivationKind, NetworkError> {
    layer
        .activation
        .as_deref()
        .ok_or_else(|| invalid(format!("Layer {}: Activation layer requires 'activation'", index)))?
        .parse()
}

/// Builds the layer stack described by `config`.
///
/// All dense layers draw their weights, in order, from one RNG seeded with
/// `config.seed`, so a seeded config always rebuilds identical parameters.
///
/// # Examples
///
/// ```
/// use rust_neural_blocks::architecture::{build_model, ArchitectureConfig, LayerConfig};
///
/// let config = ArchitectureConfig {
///     seed: Some(42),
///     layers: vec![
///         LayerConfig {
///             layer_type: "dense".to_string(),
///             input_size: Some(4),
///             output_size: Some(2),
///             ..Default::default()
///         },
///         LayerConfig {
///             layer_type: "activation".to_string(),
///             activation: Some("sigmoid".to_string()),
///             ..Default::default()
///         },
///     ],
/// };
/// let layers = build_model(&config).unwrap();
/// assert_eq!(layers.len(), 2);
/// assert_eq!(layers[0].parameter_count(), 10);
/// ```
pub fn build_model(config: &ArchitectureConfig) -> Result<Vec<Box<dyn Layer>>, NetworkError> {
    validate_architecture(config)?;

    let mut rng = rng_from_seed(config.seed);
    let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(config.layers.len());

    for (i, layer_config) in config.layers.iter().enumerate() {
        let layer: Box<dyn Layer> = match layer_config.layer_type.to_lowercase().as_str() {
            "dense" => {
                let (input_size, output_size) = dense_sizes(layer_config, i)?;
                Box::new(DenseLayer::new(input_size, output_size, &mut rng))
            }
            "activation" => Box::new(ActivationLayer::new(activation_kind(layer_config, i)?)),
            "flatten" => Box::new(FlattenLayer::new()),
            other => {
                return Err(invalid(format!("Layer {}: Invalid layer type '{}'", i, other)));
            }
        };
        debug!(
            index = i,
            layer = layer.name(),
            parameters = layer.parameter_count(),
            "built layer"
        );
        layers.push(layer);
    }

    Ok(layers)
}
