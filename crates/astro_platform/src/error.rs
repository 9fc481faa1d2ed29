//! Platform error types

use thiserror::Error;

/// Errors reported by host adapters
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid host configuration (zero-sized headless viewport, ...)
    #[error("Invalid host configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
