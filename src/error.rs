//! Error types shared by every layer, loss and helper in the crate.

use thiserror::Error;

/// Errors raised by tensor operations, layers, losses and configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Two operands (or an operand and a layer's parameters) disagree on shape.
    #[error("shape mismatch in {op}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A backward pass ran without the cache a forward pass fills in.
    #[error("{layer} layer not initialized: {op} called before forward")]
    NotInitialized {
        layer: &'static str,
        op: &'static str,
    },

    /// The operation needs at least one example.
    #[error("empty batch passed to {op}")]
    EmptyBatch { op: &'static str },

    #[error("unknown activation function '{0}'")]
    UnknownActivation(String),

    #[error("unknown loss function '{0}'")]
    UnknownLoss(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
