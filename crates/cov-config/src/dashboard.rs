//! Dashboard (aggregation and presentation) configuration.

use serde::{Deserialize, Serialize};

/// Default page size for the failed-issue list.
const fn default_failed_page_size() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Rows per page when listing open failures.
    #[serde(default = "default_failed_page_size")]
    pub failed_page_size: u32,

    /// Also push the company filter down to the provider. The local
    /// post-filter runs either way.
    #[serde(default)]
    pub company_pushdown: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            failed_page_size: default_failed_page_size(),
            company_pushdown: false,
        }
    }
}
