//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a figure configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A blend constant outside (0, 1)
    #[error("Blend constant `{name}` must be in (0, 1), got {value}")]
    InvalidBlend { name: &'static str, value: f32 },

    /// Blink interval range is empty, inverted, or not positive
    #[error("Blink interval range [{min}, {max}) is invalid")]
    InvalidInterval { min: f32, max: f32 },

    /// Eyes would still be closed when the next blink becomes due
    #[error("Blink dwell {dwell_ms} ms must be shorter than the {min_interval_ms} ms minimum")]
    DwellTooLong { dwell_ms: u64, min_interval_ms: u64 },

    /// Clock step not positive, not finite, or too small to convert to time
    #[error("Clock step {0} is out of range")]
    InvalidClockStep(f64),

    /// A gain or amplitude that is not finite
    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    /// Fallback viewport size not positive
    #[error("Fallback viewport {width}x{height} must be positive")]
    InvalidFallback { width: f32, height: f32 },

    /// Camera parameters that cannot form a projection
    #[error("Invalid camera: {0}")]
    InvalidCamera(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
