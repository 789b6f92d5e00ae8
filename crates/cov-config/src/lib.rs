//! # cov-config
//!
//! Layered configuration loading for Covboard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`COVBOARD_*` prefix, `__` as separator)
//! 2. Project-level `.covboard/config.toml`
//! 3. User-level `~/.config/covboard/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `COVBOARD_TURSO__URL` -> `turso.url`,
//! `COVBOARD_DASHBOARD__FAILED_PAGE_SIZE` -> `dashboard.failed_page_size`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use cov_config::CovConfig;
//!
//! let config = CovConfig::load_with_dotenv().expect("config");
//!
//! if config.turso.is_configured() {
//!     println!("remote store: {}", config.turso.url);
//! }
//! ```

mod dashboard;
mod database;
mod error;
mod session;
mod turso;

pub use dashboard::DashboardConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use session::SessionConfig;
pub use turso::TursoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project directory holding config and the local database.
pub const PROJECT_DIR: &str = ".covboard";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CovConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub turso: TursoConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl CovConfig {
    /// Load configuration from all sources, resolving the project file against
    /// the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_project(Path::new("."))
    }

    /// Load configuration with the project file taken from `project_root`.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_at(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if present) before building
    /// the figment. This is the typical entry point for the CLI.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_at(Path::new("."))
    }

    /// Build the figment provider chain for a given project root.
    pub fn figment_at(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("COVBOARD_").split("__"))
    }

    /// Reject values figment accepts but the application cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.failed_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.failed_page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the database path against `project_root` unless it is absolute
    /// or in-memory.
    #[must_use]
    pub fn database_path(&self, project_root: &Path) -> PathBuf {
        let path = Path::new(&self.database.path);
        if self.database.is_in_memory() || path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("covboard").join("config.toml"))
    }
}
