//! Activation layer: an elementwise (or row-wise) nonlinearity after a dense layer
//!
//! The layer caches both its input `Z` and output `A` on every forward pass.
//! Sigmoid and softmax gradients are computed from `A`, ReLU from `Z`.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::{NetworkError, Result};
use crate::layers::Layer;
use crate::optimizers::Optimizer;
use crate::utils::activations::{
    relu, relu_derivative, sigmoid, sigmoid_derivative, softmax_rows, softmax_rows_backward,
};
use crate::utils::Tensor;

/// Supported nonlinearities.
///
/// Parsed from configuration names with [`FromStr`]; unknown names are an
/// error rather than a silent identity.
///
/// ```
/// use rust_neural_blocks::layers::ActivationKind;
///
/// assert_eq!("relu".parse::<ActivationKind>().unwrap(), ActivationKind::Relu);
/// assert_eq!("identity".parse::<ActivationKind>().unwrap(), ActivationKind::Linear);
/// assert!("rleu".parse::<ActivationKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationKind {
    Linear,
    #[default]
    Relu,
    Sigmoid,
    /// Normalized exponential over the last axis of each row.
    Softmax,
}

impl ActivationKind {
    pub const NAMES: [&'static str; 4] = ["linear", "relu", "sigmoid", "softmax"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationKind::Linear => "linear",
            ActivationKind::Relu => "relu",
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Softmax => "softmax",
        }
    }
}

impl FromStr for ActivationKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "identity" => Ok(ActivationKind::Linear),
            "relu" => Ok(ActivationKind::Relu),
            "sigmoid" => Ok(ActivationKind::Sigmoid),
            "softmax" => Ok(ActivationKind::Softmax),
            _ => Err(NetworkError::UnknownActivation(s.to_string())),
        }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct ActivationCache {
    input: Tensor,
    output: Tensor,
}

/// Parameter-free layer applying an [`ActivationKind`].
///
/// # Example
///
/// ```
/// use rust_neural_blocks::layers::{ActivationKind, ActivationLayer, Layer};
/// use rust_neural_blocks::Tensor;
///
/// let mut relu = ActivationLayer::new(ActivationKind::Relu);
/// let z = Tensor::new(vec![-1.0, 0.0, 2.0], vec![1, 3]).unwrap();
/// assert_eq!(relu.forward(&z).unwrap().data(), &[0.0, 0.0, 2.0]);
///
/// let grad = Tensor::new(vec![5.0, 5.0, 5.0], vec![1, 3]).unwrap();
/// assert_eq!(relu.backward(&grad).unwrap().data(), &[0.0, 0.0, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ActivationLayer {
    kind: ActivationKind,
    cache: Option<ActivationCache>,
}

impl ActivationLayer {
    pub fn new(kind: ActivationKind) -> Self {
        Self { kind, cache: None }
    }

    pub fn kind(&self) -> ActivationKind {
        self.kind
    }

    /// Output `A` of the last forward pass.
    pub fn output(&self) -> Option<&Tensor> {
        self.cache.as_ref().map(|c| &c.output)
    }

    /// Backward pass with optional one-hot `targets`.
    ///
    /// For softmax with targets this returns `A - targets`, the combined
    /// gradient of softmax followed by categorical cross-entropy; `grad_output`
    /// is then not used. Without targets softmax uses its full Jacobian.
    /// Other kinds ignore `targets`.
    pub fn backward_with_targets(
        &mut self,
        grad_output: &Tensor,
        targets: Option<&Tensor>,
    ) -> Result<Tensor> {
        let cache = self.cache.as_ref().ok_or(NetworkError::NotInitialized {
            layer: "activation",
            op: "backward",
        })?;
        trace!(kind = %self.kind, shape = ?cache.output.shape(), "activation backward");

        if let (ActivationKind::Softmax, Some(targets)) = (self.kind, targets) {
            return cache
                .output
                .zip_map(targets, "softmax cross-entropy backward", |a, y| a - y);
        }

        grad_output.ensure_shape(cache.input.shape(), "activation backward")?;
        match self.kind {
            ActivationKind::Linear => Ok(grad_output.clone()),
            ActivationKind::Relu => {
                grad_output.zip_map(&cache.input, "relu backward", |g, z| g * relu_derivative(z))
            }
            ActivationKind::Sigmoid => {
                grad_output.zip_map(&cache.output, "sigmoid backward", |g, a| {
                    g * sigmoid_derivative(a)
                })
            }
            ActivationKind::Softmax => {
                let cols = *cache.output.shape().last().unwrap_or(&0);
                let data = softmax_rows_backward(cache.output.data(), grad_output.data(), cols);
                Tensor::new(data, cache.output.shape().to_vec())
            }
        }
    }
}

impl Layer for ActivationLayer {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor> {
        trace!(kind = %self.kind, shape = ?input.shape(), "activation forward");

        let output = match self.kind {
            ActivationKind::Linear => input.clone(),
            ActivationKind::Relu => input.map(relu),
            ActivationKind::Sigmoid => input.map(sigmoid),
            ActivationKind::Softmax => {
                let mut output = input.clone();
                let cols = *input.shape().last().unwrap_or(&0);
                softmax_rows(output.data_mut(), cols);
                output
            }
        };

        self.cache = Some(ActivationCache {
            input: input.clone(),
            output: output.clone(),
        });
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor> {
        self.backward_with_targets(grad_output, None)
    }

    fn update_with_optimizer(&mut self, _optimizer: &mut dyn Optimizer) -> Result<()> {
        // No parameters to update
        Ok(())
    }

    fn parameter_count(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "activation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[f32]) -> Tensor {
        Tensor::new(values.to_vec(), vec![1, values.len()]).unwrap()
    }

    #[test]
    fn test_parse_names_case_insensitive() {
        assert_eq!("Sigmoid".parse::<ActivationKind>().unwrap(), ActivationKind::Sigmoid);
        assert_eq!(" softmax ".parse::<ActivationKind>().unwrap(), ActivationKind::Softmax);
        for name in ActivationKind::NAMES {
            assert_eq!(name.parse::<ActivationKind>().unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_unknown_name_fails_loudly() {
        let err = "tanh".parse::<ActivationKind>().unwrap_err();
        assert_eq!(err, NetworkError::UnknownActivation("tanh".to_string()));
    }

    #[test]
    fn test_linear_round_trip() {
        let mut layer = ActivationLayer::new(ActivationKind::Linear);
        let z = row(&[-2.0, 0.5, 3.0]);
        assert_eq!(layer.forward(&z).unwrap(), z);
        let g = row(&[1.0, 2.0, 3.0]);
        assert_eq!(layer.backward(&g).unwrap(), g);
    }

    #[test]
    fn test_relu_backward_zeroes_inactive() {
        let mut layer = ActivationLayer::new(ActivationKind::Relu);
        layer.forward(&row(&[-1.0, 0.0, 2.0])).unwrap();
        let grad = layer.backward(&row(&[5.0, 5.0, 5.0])).unwrap();
        assert_eq!(grad.data(), &[0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_sigmoid_backward_uses_output() {
        let mut layer = ActivationLayer::new(ActivationKind::Sigmoid);
        let a = layer.forward(&row(&[0.0])).unwrap();
        assert!((a.data()[0] - 0.5).abs() < 1e-6);
        let grad = layer.backward(&row(&[2.0])).unwrap();
        assert!((grad.data()[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_with_targets() {
        let mut layer = ActivationLayer::new(ActivationKind::Softmax);
        let a = layer.forward(&row(&[1.0, 2.0, 3.0])).unwrap();
        let y = row(&[0.0, 1.0, 0.0]);
        let grad = layer
            .backward_with_targets(&Tensor::zeros(&[1, 3]), Some(&y))
            .unwrap();
        let expected: Vec<f32> = a.data().iter().zip(y.data()).map(|(a, y)| a - y).collect();
        assert_eq!(grad.data(), expected.as_slice());
    }

    #[test]
    fn test_softmax_targets_shape_checked() {
        let mut layer = ActivationLayer::new(ActivationKind::Softmax);
        layer.forward(&row(&[1.0, 2.0, 3.0])).unwrap();
        let y = row(&[0.0, 1.0]);
        assert!(layer
            .backward_with_targets(&Tensor::zeros(&[1, 3]), Some(&y))
            .is_err());
    }

    #[test]
    fn test_backward_before_forward() {
        let mut layer = ActivationLayer::new(ActivationKind::Sigmoid);
        let err = layer.backward(&row(&[1.0])).unwrap_err();
        assert!(matches!(err, NetworkError::NotInitialized { layer: "activation", .. }));
    }

    #[test]
    fn test_backward_shape_mismatch() {
        let mut layer = ActivationLayer::new(ActivationKind::Relu);
        layer.forward(&row(&[1.0, 2.0])).unwrap();
        assert!(layer.backward(&row(&[1.0, 2.0, 3.0])).is_err());
    }

    #[test]
    fn test_kind_and_cached_output() {
        let mut layer = ActivationLayer::new(ActivationKind::Sigmoid);
        assert_eq!(layer.kind(), ActivationKind::Sigmoid);
        assert!(layer.output().is_none());

        let a = layer.forward(&row(&[0.0, 2.0])).unwrap();
        assert_eq!(layer.output(), Some(&a));
    }

    #[test]
    fn test_no_parameters() {
        let mut layer = ActivationLayer::new(ActivationKind::Relu);
        assert_eq!(layer.parameter_count(), 0);
        layer.update_parameters(0.5).unwrap();
    }
}
