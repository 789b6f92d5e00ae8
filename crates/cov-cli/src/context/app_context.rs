use std::path::PathBuf;

use anyhow::Context;
use cov_analytics::pipeline::Dashboard;
use cov_config::CovConfig;
use cov_core::context::SessionContext;
use cov_db::service::CovService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CovService,
    pub config: CovConfig,
    pub session: SessionContext,
    pub dashboard: Dashboard,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the configured database and build the session context.
    pub async fn init(project_root: PathBuf, config: CovConfig) -> anyhow::Result<Self> {
        let service = CovService::from_config(&config, &project_root)
            .await
            .context("failed to open covboard database")?;
        let session = config.session.context();

        tracing::debug!(
            root = %project_root.display(),
            remote = config.turso.is_configured(),
            user = %session.user,
            admin = session.is_admin(),
            "application context ready"
        );

        Ok(Self {
            service,
            config,
            session,
            dashboard: Dashboard::new(),
            project_root,
        })
    }

    /// Configured failed-issue page size.
    #[must_use]
    pub fn failed_page_size(&self) -> usize {
        usize::try_from(self.config.dashboard.failed_page_size).unwrap_or(usize::MAX)
    }
}
