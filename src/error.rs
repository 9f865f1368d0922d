//! Gossip simulator error types.
//!
//! Only configuration and precondition violations are errors. The three
//! terminal run outcomes (success, failure, timeout) are ordinary values of
//! [`crate::engine::Outcome`] and are never surfaced through this type.

use thiserror::Error;

/// Gossip simulator errors.
#[derive(Error, Debug)]
pub enum GossipError {
    /// Requested topology cannot be constructed (e.g. fewer than two agents).
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Policy identifier is not one of the five defined variants.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Experiment parameters are inconsistent.
    #[error("Invalid experiment: {0}")]
    InvalidExperiment(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gossip operations
pub type Result<T> = std::result::Result<T, GossipError>;

impl From<toml::de::Error> for GossipError {
    fn from(err: toml::de::Error) -> Self {
        GossipError::Config(err.to_string())
    }
}
