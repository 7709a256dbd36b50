//! Shared utilities for the layer implementations
//!
//! This module provides the tensor type, random number generation and the
//! activation kernels used across layers.

pub mod activations;
pub mod rng;
pub mod tensor;

pub use rng::rng_from_seed;
pub use tensor::Tensor;
