//! Turning network outputs into class predictions
//!
//! Outputs are class-major (classes × examples), matching [`crate::loss`].
//! A single output row is a binary probability: entries strictly above
//! [`DECISION_THRESHOLD`] are class 1, so exactly 0.5 is class 0. With several
//! rows the predicted class is the arg-max row, ties going to the lower index.

use tracing::info;

use crate::error::{NetworkError, Result};
use crate::layers::Layer;
use crate::utils::Tensor;

pub const DECISION_THRESHOLD: f32 = 0.5;

/// Predicted classes and, when labels were supplied, the accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub classes: Vec<usize>,
    pub accuracy: Option<f32>,
}

/// One predicted class per column of `outputs`.
///
/// ```
/// use rust_neural_blocks::predict::predict_classes;
/// use rust_neural_blocks::Tensor;
///
/// let binary = Tensor::new(vec![0.2, 0.5, 0.51], vec![1, 3]).unwrap();
/// assert_eq!(predict_classes(&binary).unwrap(), vec![0, 0, 1]);
///
/// // 3 classes, 2 examples
/// let multi = Tensor::new(vec![0.1, 0.7, 0.6, 0.2, 0.3, 0.1], vec![3, 2]).unwrap();
/// assert_eq!(predict_classes(&multi).unwrap(), vec![1, 0]);
/// ```
pub fn predict_classes(outputs: &Tensor) -> Result<Vec<usize>> {
    let (classes, examples) = outputs.dims2("predict")?;

    if classes == 1 {
        return Ok(outputs
            .data()
            .iter()
            .map(|&a| usize::from(a > DECISION_THRESHOLD))
            .collect());
    }

    Ok((0..examples)
        .map(|col| {
            let mut best = 0;
            for row in 1..classes {
                if outputs.get(row, col) > outputs.get(best, col) {
                    best = row;
                }
            }
            best
        })
        .collect())
}

/// Fraction of positions where `predicted` equals `labels`.
pub fn accuracy(predicted: &[usize], labels: &[usize]) -> Result<f32> {
    if predicted.len() != labels.len() {
        return Err(NetworkError::ShapeMismatch {
            op: "accuracy",
            expected: vec![predicted.len()],
            found: vec![labels.len()],
        });
    }
    if predicted.is_empty() {
        return Ok(0.0);
    }

    let matches = predicted.iter().zip(labels).filter(|(p, l)| p == l).count();
    Ok(matches as f32 / predicted.len() as f32)
}

/// Predict classes from class-major `outputs`, scoring them against `labels`
/// when given.
pub fn predict(outputs: &Tensor, labels: Option<&[usize]>) -> Result<Prediction> {
    let classes = predict_classes(outputs)?;
    let accuracy = match labels {
        Some(labels) => {
            let acc = accuracy(&classes, labels)?;
            info!(accuracy = acc, examples = classes.len(), "prediction accuracy");
            Some(acc)
        }
        None => None,
    };

    Ok(Prediction { classes, accuracy })
}

/// Run a batch-major `input` through `layers` in order and predict from the
/// final output.
pub fn predict_with_layers(
    layers: &mut [Box<dyn Layer>],
    input: &Tensor,
    labels: Option<&[usize]>,
) -> Result<Prediction> {
    let mut activations = input.clone();
    for layer in layers.iter_mut() {
        activations = layer.forward(&activations)?;
    }
    predict(&activations.transpose()?, labels)
}
