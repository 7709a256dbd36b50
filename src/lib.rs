//! Rust Neural Blocks
//!
//! Building blocks for small feed-forward networks with explicit forward and
//! backward passes: dense layers, activations, flatten, scalar losses and a
//! prediction helper. The caller owns the training loop and drives the layers
//! in order.
//!
//! # Modules
//!
//! - `layers`: Layer trait and implementations (Dense, Activation, Flatten)
//! - `loss`: Binary/categorical cross-entropy and mean squared error
//! - `predict`: Class predictions and accuracy
//! - `optimizers`: Optimizer trait and plain gradient descent
//! - `utils`: Tensor type, RNG seeding and activation kernels
//! - `config`: Training configuration
//! - `architecture`: Layer stack configuration and model building
//!
//! # Example
//!
//! ```
//! use rust_neural_blocks::layers::{ActivationKind, ActivationLayer, DenseLayer, Layer};
//! use rust_neural_blocks::loss::categorical_cross_entropy;
//! use rust_neural_blocks::Tensor;
//!
//! let mut dense = DenseLayer::with_seed(4, 3, 42);
//! let mut softmax = ActivationLayer::new(ActivationKind::Softmax);
//!
//! let x = Tensor::new(vec![0.5; 8], vec![2, 4]).unwrap();
//! let y = Tensor::new(vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0], vec![2, 3]).unwrap();
//!
//! let probs = softmax.forward(&dense.forward(&x).unwrap()).unwrap();
//! let cost =
//!     categorical_cross_entropy(&y.transpose().unwrap(), &probs.transpose().unwrap()).unwrap();
//! assert!(cost > 0.0);
//!
//! let dz = softmax.backward_with_targets(&probs, Some(&y)).unwrap();
//! dense.backward(&dz).unwrap();
//! dense.update_parameters(0.1).unwrap();
//! ```

pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod loss;
pub mod optimizers;
pub mod predict;
pub mod utils;

pub use error::{NetworkError, Result};
pub use utils::Tensor;
