//! Service layer over `CovDb`.
//!
//! `CovService` owns the database handle and the provider capabilities the
//! deployment advertises. Repo methods are implemented as `impl CovService`
//! blocks in `repos/`, and the `DataProvider` implementation lives in
//! `provider.rs`.

use std::path::Path;

use cov_config::CovConfig;
use cov_core::provider::ProviderCapabilities;

use crate::CovDb;
use crate::error::DatabaseError;

pub struct CovService {
    db: CovDb,
    capabilities: ProviderCapabilities,
}

impl CovService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = CovDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service backed by a remote libSQL/Turso database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the remote database cannot be reached.
    pub async fn new_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = CovDb::open_remote(url, auth_token).await?;
        Ok(Self::from_db(db))
    }

    /// Open the database the configuration points at: remote when the
    /// `[turso]` section is complete, otherwise the local file resolved
    /// against `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the local
    /// database directory cannot be created.
    pub async fn from_config(config: &CovConfig, project_root: &Path) -> Result<Self, DatabaseError> {
        let service = if config.turso.is_configured() {
            let (url, token) = config
                .turso
                .require()
                .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
            Self::new_remote(url, token).await?
        } else {
            let path = config.database_path(project_root);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::InvalidState(format!(
                        "cannot create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
            Self::new_local(&path.to_string_lossy()).await?
        };
        Ok(service.with_capabilities(ProviderCapabilities {
            company_pushdown: config.dashboard.company_pushdown,
        }))
    }

    /// Create from an existing `CovDb` (for testing).
    #[must_use]
    pub fn from_db(db: CovDb) -> Self {
        Self {
            db,
            capabilities: ProviderCapabilities::default(),
        }
    }

    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &CovDb {
        &self.db
    }

    #[must_use]
    pub const fn provider_capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }
}
