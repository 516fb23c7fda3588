//! Error types for FIELDBOT
//!
//! Geometric queries report absent results through `Option` (a point off the
//! grid, an unreachable goal, a cluster with no circle). `FieldbotError` covers
//! what is left: building a grid from bad dimensions, loading configuration,
//! and file access.

use thiserror::Error;

/// FIELDBOT errors
#[derive(Debug, Error)]
pub enum FieldbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FieldbotError {
    /// Build a configuration error from any message
    pub fn config(msg: impl Into<String>) -> Self {
        FieldbotError::Config(msg.into())
    }

    /// Build an invalid-grid error from any message
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        FieldbotError::InvalidGrid(msg.into())
    }
}

/// Result type for FIELDBOT operations
pub type FieldbotResult<T> = Result<T, FieldbotError>;
