//! Layer trait definition for neural network layers
//!
//! Every layer owns the cache its backward pass needs. `forward` fills the
//! cache, `backward` reads it and fails with `NotInitialized` when it is
//! empty, and `update_parameters` consumes whatever gradients `backward`
//! produced.

use crate::error::Result;
use crate::optimizers::{Optimizer, SGD};
use crate::utils::Tensor;

/// Core trait for neural network layers.
///
/// Inputs are batch-major: a 2-D tensor has one example per row.
///
/// Gradients passed between layers are per-example (not divided by the batch
/// size); layers with parameters average their parameter gradients over the
/// batch themselves.
///
/// # Example
///
/// ```
/// use rust_neural_blocks::layers::{DenseLayer, Layer};
/// use rust_neural_blocks::Tensor;
///
/// let mut layer = DenseLayer::with_seed(3, 2, 42);
/// let input = Tensor::zeros(&[4, 3]);
/// let output = layer.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[4, 2]);
///
/// let grad_input = layer.backward(&Tensor::zeros(&[4, 2])).unwrap();
/// assert_eq!(grad_input.shape(), &[4, 3]);
/// layer.update_parameters(0.1).unwrap();
/// ```
pub trait Layer: Send {
    /// Forward propagation through the layer.
    ///
    /// Computes the layer output and caches what the backward pass needs.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the input does not fit the layer.
    fn forward(&mut self, input: &Tensor) -> Result<Tensor>;

    /// Backward propagation through the layer.
    ///
    /// Takes the gradient of the loss w.r.t. this layer's output and returns
    /// the gradient w.r.t. its input. Layers with parameters also store
    /// their parameter gradients for the next update.
    ///
    /// # Errors
    ///
    /// `NotInitialized` if no forward pass has run, `ShapeMismatch` if the
    /// gradient does not match the cached forward pass.
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor>;

    /// Plain gradient descent step: `param -= learning_rate * grad`.
    fn update_parameters(&mut self, learning_rate: f32) -> Result<()> {
        let mut optimizer = SGD::new(learning_rate);
        self.update_with_optimizer(&mut optimizer)
    }

    /// Apply stored gradients through `optimizer` and clear them.
    ///
    /// A layer without stored gradients leaves its parameters untouched.
    fn update_with_optimizer(&mut self, optimizer: &mut dyn Optimizer) -> Result<()>;

    /// Total count of trainable weights and biases.
    fn parameter_count(&self) -> usize;

    /// Short layer name used in errors and logs.
    fn name(&self) -> &'static str;
}
