//! Remote libSQL (Turso) configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TursoConfig {
    /// Database URL (e.g., `libsql://covboard-acme.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token.
    #[serde(default)]
    pub auth_token: String,
}

impl TursoConfig {
    /// Check if the Turso config has the minimum required fields for remote access.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Require a usable remote configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when the URL or token is missing and
    /// `ConfigError::InvalidValue` when the URL scheme is not a libSQL/HTTP one.
    pub fn require(&self) -> Result<(&str, &str), ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "turso".to_string(),
            });
        }
        let scheme_ok = ["libsql://", "https://", "http://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme));
        if !scheme_ok {
            return Err(ConfigError::InvalidValue {
                field: "turso.url".to_string(),
                reason: format!("unsupported scheme in '{}'", self.url),
            });
        }
        Ok((&self.url, &self.auth_token))
    }
}
