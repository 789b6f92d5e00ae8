use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;
use crate::errors::CoreError;

/// Explicit capability context for one user session.
///
/// Built once at startup (from configuration in `cov-cli`) and passed to the
/// aggregation pipeline and the configuration surface. Nothing reads the
/// user's role from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionContext {
    pub user: String,
    pub role: Role,
}

impl SessionContext {
    #[must_use]
    pub fn new(user: impl Into<String>, role: Role) -> Self {
        Self {
            user: user.into(),
            role,
        }
    }

    #[must_use]
    pub fn admin(user: impl Into<String>) -> Self {
        Self::new(user, Role::Admin)
    }

    #[must_use]
    pub fn viewer(user: impl Into<String>) -> Self {
        Self::new(user, Role::Viewer)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `CoreError::Forbidden` unless the session may change
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Forbidden` for non-admin sessions.
    pub fn require_admin(&self, operation: &str) -> Result<(), CoreError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                operation: operation.to_string(),
                user: self.user.clone(),
            })
        }
    }
}
