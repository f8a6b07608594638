//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to parse, or a value has the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section needed to connect has empty required fields.
    #[error("Configuration section '{section}' is not configured (missing: {})", missing.join(", "))]
    NotConfigured {
        section: String,
        missing: Vec<&'static str>,
    },

    /// A field has a value the driver would reject.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
