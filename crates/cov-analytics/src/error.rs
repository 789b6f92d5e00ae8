//! Analytics error types.

use cov_core::errors::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The data provider failed; the stage produced no output.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Pages are 1-based and must hold at least one item.
    #[error("invalid page request: page {page}, page size {page_size}")]
    InvalidPage { page: usize, page_size: usize },
}
