//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or did not match the config shape.
    #[error("invalid covboard configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A section needed for the requested mode is incomplete.
    #[error("[{section}] is incomplete; set every required field or remove the section")]
    NotConfigured { section: String },

    /// Extracted fine but cannot be used.
    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
