//! Stochastic Gradient Descent (SGD) optimizer implementation
//!
//! Performs the basic gradient descent update:
//! `parameter = parameter - learning_rate * gradient`

use crate::error::{NetworkError, Result};
use crate::optimizers::Optimizer;

/// Vanilla gradient descent without momentum or adaptive rates.
///
/// `w = w - η * ∇L/∂w`
///
/// # Example
///
/// ```
/// use rust_neural_blocks::optimizers::{Optimizer, SGD};
///
/// let mut optimizer = SGD::new(0.1);
/// let mut params = vec![1.0, 2.0, 3.0];
/// optimizer.update(&mut params, &[0.1, 0.2, 0.3]).unwrap();
/// assert!((params[2] - 2.97).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for SGD {
    fn update(&mut self, parameters: &mut [f32], gradients: &[f32]) -> Result<()> {
        if parameters.len() != gradients.len() {
            return Err(NetworkError::ShapeMismatch {
                op: "sgd update",
                expected: vec![parameters.len()],
                found: vec![gradients.len()],
            });
        }

        for (param, grad) in parameters.iter_mut().zip(gradients) {
            *param -= self.learning_rate * grad;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }
}
