//! Configuration structures for training
//!
//! This module provides the training configuration a caller's loop reads:
//! learning rate, loss function and an optional seed.

use serde::Deserialize;
use std::error::Error;
use std::fs;

use crate::error::NetworkError;
use crate::loss::LossFunction;

/// Training configuration parsed from JSON.
///
/// # Example
///
/// ```json
/// {
///   "learning_rate": 0.05,
///   "loss_function": "binary_cross_entropy",
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Step size for gradient descent (must be positive)
    pub learning_rate: f32,

    /// Loss function name: "binary_cross_entropy", "categorical_cross_entropy",
    /// "mean_squared_error" or the short forms "bce", "cce", "mse"
    pub loss_function: String,

    /// Seed for weight initialization; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl TrainingConfig {
    pub fn loss(&self) -> Result<LossFunction, NetworkError> {
        self.loss_function.parse()
    }
}

/// Loads a training configuration from a JSON file.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or a value fails validation.
///
/// # Examples
///
/// ```no_run
/// use rust_neural_blocks::config::load_config;
///
/// let cfg = load_config("config/training.json").unwrap();
/// assert!(cfg.learning_rate > 0.0);
/// ```
pub fn load_config(path: &str) -> Result<TrainingConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TrainingConfig) -> Result<(), NetworkError> {
    if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
        return Err(NetworkError::InvalidConfig(format!(
            "learning_rate must be positive, got {}",
            config.learning_rate
        )));
    }

    config.loss()?;
    Ok(())
}
