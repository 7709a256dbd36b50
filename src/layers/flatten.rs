//! Flatten layer: collapses every axis after the batch axis into one.

use tracing::trace;

use crate::error::{NetworkError, Result};
use crate::layers::Layer;
use crate::optimizers::Optimizer;
use crate::utils::Tensor;

/// Reshapes `[batch, d1, d2, ...]` to `[batch, d1 * d2 * ...]` and back.
///
/// ```
/// use rust_neural_blocks::layers::{FlattenLayer, Layer};
/// use rust_neural_blocks::Tensor;
///
/// let mut flatten = FlattenLayer::new();
/// let images = Tensor::zeros(&[8, 2, 4, 4]);
/// assert_eq!(flatten.forward(&images).unwrap().shape(), &[8, 32]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlattenLayer {
    input_shape: Option<Vec<usize>>,
}

impl FlattenLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for FlattenLayer {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor> {
        self.input_shape = None;

        let batch_size = input.rows();
        let features = if batch_size == 0 {
            input.shape().iter().skip(1).product()
        } else {
            input.len() / batch_size
        };
        trace!(shape = ?input.shape(), features, "flatten forward");

        let output = input.reshape(&[batch_size, features])?;
        self.input_shape = Some(input.shape().to_vec());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let shape = self.input_shape.as_ref().ok_or(NetworkError::NotInitialized {
            layer: "flatten",
            op: "backward",
        })?;
        grad_output.reshape(shape)
    }

    fn update_with_optimizer(&mut self, _optimizer: &mut dyn Optimizer) -> Result<()> {
        Ok(())
    }

    fn parameter_count(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "flatten"
    }
}
