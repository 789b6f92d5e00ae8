//! Database error types for cov-db.

use cov_core::errors::{CoreError, ProviderError};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A domain rule rejected the operation (validation, referential check,
    /// missing capability).
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Convert into the provider-neutral error reported to the aggregator.
    #[must_use]
    pub fn into_provider(self, operation: &str) -> ProviderError {
        match self {
            Self::Query(message) | Self::InvalidState(message) => {
                ProviderError::Malformed(format!("{operation}: {message}"))
            }
            Self::LibSql(error) => ProviderError::query(operation, error),
            other => ProviderError::query(operation, other),
        }
    }
}
