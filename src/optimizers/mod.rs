//! Optimizer abstraction for layer parameter updates
//!
//! Layers hand their parameters and accumulated gradients to an
//! [`Optimizer`], which decides how to step. The crate only ships plain
//! gradient descent ([`SGD`]): `parameter = parameter - learning_rate * gradient`.
//!
//! # Example
//!
//! ```
//! use rust_neural_blocks::optimizers::{Optimizer, SGD};
//!
//! let mut optimizer = SGD::new(0.1);
//! let mut weights = vec![1.0, 2.0];
//! optimizer.update(&mut weights, &[0.5, -0.5]).unwrap();
//! assert!((weights[0] - 0.95).abs() < 1e-6);
//! ```

pub mod sgd;

pub use sgd::SGD;

use crate::error::Result;

/// Core trait for parameter update rules.
pub trait Optimizer {
    /// Update `parameters` in place from `gradients` of the same length.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the two slices differ in length.
    fn update(&mut self, parameters: &mut [f32], gradients: &[f32]) -> Result<()>;

    fn learning_rate(&self) -> f32;

    /// Set the learning rate (should be positive).
    fn set_learning_rate(&mut self, lr: f32);
}
