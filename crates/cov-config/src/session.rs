//! Session identity configuration.

use cov_core::context::SessionContext;
use cov_core::enums::Role;
use serde::{Deserialize, Serialize};

fn default_user() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Name recorded for the user driving this session.
    #[serde(default = "default_user")]
    pub user: String,

    /// Grants the admin role (phase configuration changes).
    #[serde(default)]
    pub admin: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            admin: false,
        }
    }
}

impl SessionConfig {
    /// Build the explicit capability context threaded through the app.
    #[must_use]
    pub fn context(&self) -> SessionContext {
        let role = if self.admin { Role::Admin } else { Role::Viewer };
        SessionContext::new(self.user.clone(), role)
    }
}
