//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer (also known as Linear or Fully Connected layer)
//! that performs the transformation: output = input × weightsᵗ + biasesᵗ

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{NetworkError, Result};
use crate::layers::Layer;
use crate::optimizers::Optimizer;
use crate::utils::rng::{fill_scaled_normal, rng_from_seed};
use crate::utils::Tensor;

/// Standard deviation of the initial weights.
pub const WEIGHT_INIT_SCALE: f32 = 0.01;

/// Dense (fully connected) layer with weights and biases.
///
/// Performs the affine transformation `Z = A_prev · Wᵗ + bᵗ`
/// where A_prev is the input (batch_size × input_size),
/// W is the weight matrix (output_size × input_size),
/// and b is the bias column (output_size × 1), broadcast across the batch.
///
/// # Fields
///
/// * `weights` - Weight matrix (output_size × input_size)
/// * `biases` - Bias column (output_size × 1)
/// * `input_cache` - Input of the last forward pass, needed by backward
/// * `grad_weights` / `grad_biases` - Gradients from the last backward pass,
///   consumed by the next update
///
/// # Example
///
/// ```
/// use rust_neural_blocks::layers::DenseLayer;
///
/// let layer = DenseLayer::with_seed(784, 128, 42);
/// assert_eq!(layer.input_size(), 784);
/// assert_eq!(layer.output_size(), 128);
/// assert_eq!(layer.weights().shape(), &[128, 784]);
/// ```
#[derive(Debug, Clone)]
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    weights: Tensor,
    biases: Tensor,
    input_cache: Option<Tensor>,
    grad_weights: Option<Tensor>,
    grad_biases: Option<Tensor>,
}

impl DenseLayer {
    /// Create a new DenseLayer with small Gaussian weights.
    ///
    /// Each weight is drawn from N(0, 1) and scaled by [`WEIGHT_INIT_SCALE`].
    /// Biases start at zero.
    ///
    /// # Arguments
    ///
    /// * `input_size` - Number of input features
    /// * `output_size` - Number of output features
    /// * `rng` - Random number generator for weight initialization
    pub fn new<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let mut weights = Tensor::zeros(&[output_size, input_size]);
        fill_scaled_normal(rng, weights.data_mut(), WEIGHT_INIT_SCALE);

        Self {
            input_size,
            output_size,
            weights,
            biases: Tensor::zeros(&[output_size, 1]),
            input_cache: None,
            grad_weights: None,
            grad_biases: None,
        }
    }

    /// Create a layer whose weights are reproducible from `seed`.
    pub fn with_seed(input_size: usize, output_size: usize, seed: u64) -> Self {
        let mut rng = rng_from_seed(Some(seed));
        Self::new(input_size, output_size, &mut rng)
    }

    /// Create a layer from explicit parameters.
    ///
    /// `weights` must be (output_size × input_size) and `biases` (output_size × 1).
    pub fn from_parameters(weights: Tensor, biases: Tensor) -> Result<Self> {
        let (output_size, input_size) = weights.dims2("dense from_parameters")?;
        biases.ensure_shape(&[output_size, 1], "dense from_parameters")?;

        Ok(Self {
            input_size,
            output_size,
            weights,
            biases,
            input_cache: None,
            grad_weights: None,
            grad_biases: None,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    pub fn biases(&self) -> &Tensor {
        &self.biases
    }

    /// Mutable view of the weight entries (row-major, shape unchanged).
    pub fn weights_mut(&mut self) -> &mut [f32] {
        self.weights.data_mut()
    }

    /// Mutable view of the bias entries.
    pub fn biases_mut(&mut self) -> &mut [f32] {
        self.biases.data_mut()
    }

    /// dW from the last backward pass, if it has not been applied yet.
    pub fn weight_gradients(&self) -> Option<&Tensor> {
        self.grad_weights.as_ref()
    }

    /// db from the last backward pass, if it has not been applied yet.
    pub fn bias_gradients(&self) -> Option<&Tensor> {
        self.grad_biases.as_ref()
    }
}

impl Layer for DenseLayer {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor> {
        // A failed forward must not leave an older batch for backward.
        self.input_cache = None;

        let (batch_size, features) = input.dims2("dense forward")?;
        if features != self.input_size {
            return Err(NetworkError::ShapeMismatch {
                op: "dense forward",
                expected: vec![batch_size, self.input_size],
                found: input.shape().to_vec(),
            });
        }
        if batch_size == 0 {
            return Err(NetworkError::EmptyBatch { op: "dense forward" });
        }
        trace!(
            batch_size,
            input_size = self.input_size,
            output_size = self.output_size,
            "dense forward"
        );

        let mut output = input.matmul_transposed(&self.weights)?;
        let biases = self.biases.data();
        for row in output.data_mut().chunks_exact_mut(self.output_size.max(1)) {
            for (value, b) in row.iter_mut().zip(biases) {
                *value += *b;
            }
        }

        self.input_cache = Some(input.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        let input = self.input_cache.as_ref().ok_or(NetworkError::NotInitialized {
            layer: "dense",
            op: "backward",
        })?;
        let batch_size = input.rows();
        grad_output.ensure_shape(&[batch_size, self.output_size], "dense backward")?;
        trace!(batch_size, "dense backward");

        let scale = 1.0 / batch_size as f32;

        // dW = (1/m) · dZᵗ · A_prev
        let grad_weights = grad_output.transpose()?.matmul(input)?.map(|g| g * scale);

        // db = (1/m) · Σ_rows dZ
        let mut grad_biases = Tensor::zeros(&[self.output_size, 1]);
        for row in grad_output.row_iter() {
            for (acc, g) in grad_biases.data_mut().iter_mut().zip(row) {
                *acc += g;
            }
        }
        let grad_biases = grad_biases.map(|g| g * scale);

        // dA_prev = dZ · W
        let grad_input = grad_output.matmul(&self.weights)?;

        self.grad_weights = Some(grad_weights);
        self.grad_biases = Some(grad_biases);
        Ok(grad_input)
    }

    fn update_with_optimizer(&mut self, optimizer: &mut dyn Optimizer) -> Result<()> {
        let (Some(grad_weights), Some(grad_biases)) =
            (self.grad_weights.take(), self.grad_biases.take())
        else {
            debug!("dense update skipped: no gradients stored");
            return Ok(());
        };

        debug!(learning_rate = optimizer.learning_rate(), "dense update");
        optimizer.update(self.weights.data_mut(), grad_weights.data())?;
        optimizer.update(self.biases.data_mut(), grad_biases.data())?;
        Ok(())
    }

    fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    fn name(&self) -> &'static str {
        "dense"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizers::SGD;

    fn fixed_layer() -> DenseLayer {
        // W = [[1, 2, 3], [4, 5, 6]], b = [0.5, -0.5]
        let weights = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let biases = Tensor::new(vec![0.5, -0.5], vec![2, 1]).unwrap();
        DenseLayer::from_parameters(weights, biases).unwrap()
    }

    #[test]
    fn test_dense_layer_creation() {
        let layer = DenseLayer::with_seed(10, 5, 42);

        assert_eq!(layer.input_size(), 10);
        assert_eq!(layer.output_size(), 5);
        assert_eq!(layer.weights.shape(), &[5, 10]);
        assert_eq!(layer.biases.shape(), &[5, 1]);
        assert_eq!(layer.parameter_count(), 55);
    }

    #[test]
    fn test_initialization_is_small_and_biases_zero() {
        let layer = DenseLayer::with_seed(100, 50, 42);

        // 0.01 * N(0, 1) stays well inside ±0.06 for 5000 draws
        assert!(layer.weights.data().iter().all(|w| w.abs() < 0.06));
        assert!(layer.biases.data().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_deterministic_initialization() {
        let layer1 = DenseLayer::with_seed(10, 5, 42);
        let layer2 = DenseLayer::with_seed(10, 5, 42);
        assert_eq!(layer1.weights, layer2.weights);
    }

    #[test]
    fn test_forward_values() {
        let mut layer = fixed_layer();
        let input = Tensor::new(vec![1.0, 0.0, -1.0, 2.0, 1.0, 0.0], vec![2, 3]).unwrap();
        let output = layer.forward(&input).unwrap();

        // row 0: [1-3, 4-6] + b = [-1.5, -2.5]; row 1: [2+2, 8+5] + b = [4.5, 12.5]
        assert_eq!(output.shape(), &[2, 2]);
        assert_eq!(output.data(), &[-1.5, -2.5, 4.5, 12.5]);
    }

    #[test]
    fn test_forward_rejects_wrong_feature_count() {
        let mut layer = fixed_layer();
        let err = layer.forward(&Tensor::zeros(&[4, 2])).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { op: "dense forward", .. }));
    }

    #[test]
    fn test_forward_rejects_empty_batch() {
        let mut layer = fixed_layer();
        let err = layer.forward(&Tensor::zeros(&[0, 3])).unwrap_err();
        assert_eq!(err, NetworkError::EmptyBatch { op: "dense forward" });
    }

    #[test]
    fn test_backward_before_forward() {
        let mut layer = fixed_layer();
        let err = layer.backward(&Tensor::zeros(&[1, 2])).unwrap_err();
        assert_eq!(
            err,
            NetworkError::NotInitialized {
                layer: "dense",
                op: "backward"
            }
        );
    }

    #[test]
    fn test_failed_forward_clears_cache() {
        let mut layer = fixed_layer();
        layer.forward(&Tensor::zeros(&[4, 3])).unwrap();
        assert!(layer.forward(&Tensor::zeros(&[5, 7])).is_err());

        let err = layer.backward(&Tensor::zeros(&[4, 2])).unwrap_err();
        assert!(matches!(err, NetworkError::NotInitialized { layer: "dense", .. }));
    }

    #[test]
    fn test_backward_values() {
        let mut layer = fixed_layer();
        let input = Tensor::new(vec![1.0, 0.0, -1.0, 2.0, 1.0, 0.0], vec![2, 3]).unwrap();
        layer.forward(&input).unwrap();

        let grad_output = Tensor::new(vec![1.0, 0.0, 0.0, 2.0], vec![2, 2]).unwrap();
        let grad_input = layer.backward(&grad_output).unwrap();

        // dA_prev = dZ · W
        assert_eq!(grad_input.data(), &[1.0, 2.0, 3.0, 8.0, 10.0, 12.0]);
        // dW = 0.5 · dZᵗ · A_prev = 0.5 · [[1, 0, -1], [4, 2, 0]]
        assert_eq!(
            layer.weight_gradients().unwrap().data(),
            &[0.5, 0.0, -0.5, 2.0, 1.0, 0.0]
        );
        // db = 0.5 · column sums of dZ
        assert_eq!(layer.bias_gradients().unwrap().data(), &[0.5, 1.0]);
    }

    #[test]
    fn test_update_applies_and_clears_gradients() {
        let mut layer = fixed_layer();
        let input = Tensor::new(vec![1.0, 0.0, -1.0, 2.0, 1.0, 0.0], vec![2, 3]).unwrap();
        layer.forward(&input).unwrap();
        layer
            .backward(&Tensor::new(vec![1.0, 0.0, 0.0, 2.0], vec![2, 2]).unwrap())
            .unwrap();

        layer.update_with_optimizer(&mut SGD::new(1.0)).unwrap();
        assert_eq!(layer.weights.data(), &[0.5, 2.0, 3.5, 2.0, 4.0, 6.0]);
        assert_eq!(layer.biases.data(), &[0.0, -1.5]);
        assert!(layer.weight_gradients().is_none());

        // Second update without a new backward is a no-op
        layer.update_parameters(1.0).unwrap();
        assert_eq!(layer.weights.data(), &[0.5, 2.0, 3.5, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_update_before_backward_is_noop() {
        let mut layer = fixed_layer();
        let before = layer.weights.clone();
        layer.update_parameters(0.1).unwrap();
        assert_eq!(layer.weights, before);
    }

    #[test]
    fn test_weights_mut_changes_forward() {
        let mut layer = fixed_layer();
        layer.weights_mut().fill(0.0);
        layer.biases_mut().copy_from_slice(&[1.0, 2.0]);

        let input = Tensor::new(vec![3.0, 4.0, 5.0], vec![1, 3]).unwrap();
        let output = layer.forward(&input).unwrap();
        assert_eq!(output.data(), &[1.0, 2.0]);
        assert_eq!(layer.weights().shape(), &[2, 3]);
    }

    #[test]
    fn test_from_parameters_bias_shape() {
        let weights = Tensor::zeros(&[2, 3]);
        let biases = Tensor::zeros(&[3, 1]);
        assert!(DenseLayer::from_parameters(weights, biases).is_err());
    }
}
