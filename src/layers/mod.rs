//! Layer abstractions for neural networks
//!
//! This module provides the Layer trait and the three layer kinds that
//! implement it: dense (affine), activation and flatten.

mod r#trait;
pub mod activation;
pub mod dense;
pub mod flatten;

// Re-export the Layer trait for convenience
pub use r#trait::Layer;
pub use activation::{ActivationKind, ActivationLayer};
pub use dense::DenseLayer;
pub use flatten::FlattenLayer;
