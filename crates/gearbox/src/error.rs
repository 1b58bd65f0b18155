//! Error types for the overlay.
//!
//! Only configuration can fail. Everything on the per-frame path degrades
//! silently instead.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a config.
    #[error("Invalid overlay config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written as TOML.
    #[error("Failed to serialize overlay config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
