//! Scalar loss functions
//!
//! Each function takes `(targets, predictions)` as equally shaped 2-D tensors
//! laid out class-major: one column per example, so `m = shape[1]`. Layer
//! outputs are batch-major; transpose them before computing a loss.
//!
//! Both cross-entropies add [`EPSILON`] inside every logarithm. Results are
//! returned as computed: a non-finite cost is logged, never masked.
//!
//! There are no gradient functions here. The gradient entering the network
//! comes from the caller, or from
//! [`ActivationLayer::backward_with_targets`](crate::layers::ActivationLayer::backward_with_targets)
//! for softmax with categorical cross-entropy.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::{NetworkError, Result};
use crate::utils::Tensor;

/// Added inside logarithms to keep `ln(0)` finite.
pub const EPSILON: f32 = 1e-8;

/// Checks shapes and returns the number of examples.
fn examples(targets: &Tensor, predictions: &Tensor, op: &'static str) -> Result<usize> {
    let (_, m) = targets.dims2(op)?;
    predictions.ensure_shape(targets.shape(), op)?;
    if m == 0 {
        return Err(NetworkError::EmptyBatch { op });
    }
    Ok(m)
}

fn checked(cost: f32, op: &'static str) -> f32 {
    if !cost.is_finite() {
        warn!(cost, op, "loss is not finite");
    }
    cost
}

/// Binary cross-entropy:
/// `-(1/m) Σ [y ln(a + ε) + (1 - y) ln(1 - a + ε)]`.
///
/// ```
/// use rust_neural_blocks::loss::binary_cross_entropy;
/// use rust_neural_blocks::Tensor;
///
/// let y = Tensor::new(vec![1.0, 0.0], vec![1, 2]).unwrap();
/// let a = Tensor::new(vec![0.9, 0.1], vec![1, 2]).unwrap();
/// let cost = binary_cross_entropy(&y, &a).unwrap();
/// assert!((cost - 0.10536).abs() < 1e-4);
/// ```
pub fn binary_cross_entropy(targets: &Tensor, predictions: &Tensor) -> Result<f32> {
    let m = examples(targets, predictions, "binary cross-entropy")?;
    let total: f32 = targets
        .data()
        .iter()
        .zip(predictions.data())
        .map(|(&y, &a)| y * (a + EPSILON).ln() + (1.0 - y) * (1.0 - a + EPSILON).ln())
        .sum();
    Ok(checked(-total / m as f32, "binary cross-entropy"))
}

/// Categorical cross-entropy over one-hot columns: `-(1/m) Σ y ln(a + ε)`.
pub fn categorical_cross_entropy(targets: &Tensor, predictions: &Tensor) -> Result<f32> {
    let m = examples(targets, predictions, "categorical cross-entropy")?;
    let total: f32 = targets
        .data()
        .iter()
        .zip(predictions.data())
        .map(|(&y, &a)| y * (a + EPSILON).ln())
        .sum();
    Ok(checked(-total / m as f32, "categorical cross-entropy"))
}

/// Mean squared error: `(1/m) Σ (a - y)²`.
pub fn mean_squared_error(targets: &Tensor, predictions: &Tensor) -> Result<f32> {
    let m = examples(targets, predictions, "mean squared error")?;
    let total: f32 = targets
        .data()
        .iter()
        .zip(predictions.data())
        .map(|(&y, &a)| (a - y) * (a - y))
        .sum();
    Ok(checked(total / m as f32, "mean squared error"))
}

/// Loss selector, parsed from configuration names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossFunction {
    BinaryCrossEntropy,
    CategoricalCrossEntropy,
    MeanSquaredError,
}

impl LossFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossFunction::BinaryCrossEntropy => "binary_cross_entropy",
            LossFunction::CategoricalCrossEntropy => "categorical_cross_entropy",
            LossFunction::MeanSquaredError => "mean_squared_error",
        }
    }

    pub fn compute(&self, targets: &Tensor, predictions: &Tensor) -> Result<f32> {
        match self {
            LossFunction::BinaryCrossEntropy => binary_cross_entropy(targets, predictions),
            LossFunction::CategoricalCrossEntropy => {
                categorical_cross_entropy(targets, predictions)
            }
            LossFunction::MeanSquaredError => mean_squared_error(targets, predictions),
        }
    }
}

impl FromStr for LossFunction {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bce" | "binary_cross_entropy" => Ok(LossFunction::BinaryCrossEntropy),
            "cce" | "categorical_cross_entropy" => Ok(LossFunction::CategoricalCrossEntropy),
            "mse" | "mean_squared_error" => Ok(LossFunction::MeanSquaredError),
            _ => Err(NetworkError::UnknownLoss(s.to_string())),
        }
    }
}

impl fmt::Display for LossFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
