//! Cross-cutting error types for Covboard.
//!
//! `CoreError` covers failures of the configuration surface (validation,
//! referential checks, capability checks). `ProviderError` is what every
//! `DataProvider` implementation reports; storage-specific errors (e.g.
//! `DatabaseError`) are converted into it at the provider boundary.

use thiserror::Error;

/// Errors that can be raised by any Covboard crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (duplicate code, empty field, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A delete was refused because other records still reference the entity.
    #[error("{entity_type} {id} is still referenced by {references} {referenced_by} row(s)")]
    InUse {
        entity_type: String,
        id: String,
        referenced_by: String,
        references: u64,
    },

    /// The session context does not carry the capability the operation needs.
    #[error("Operation '{operation}' requires the admin role (user: {user})")]
    Forbidden { operation: String, user: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors reported by a `DataProvider`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be reached (network, auth, closed handle).
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// A query against the provider failed.
    #[error("provider query '{operation}' failed: {message}")]
    Query { operation: String, message: String },

    /// The provider returned rows it could not decode into entities.
    #[error("provider returned malformed data: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Shorthand for a failed query.
    #[must_use]
    pub fn query(operation: &str, message: impl std::fmt::Display) -> Self {
        Self::Query {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}
