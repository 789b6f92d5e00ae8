//! Phase update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl PhaseUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.sort_order.is_none()
    }
}

pub struct PhaseUpdateBuilder(PhaseUpdate);

impl PhaseUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(PhaseUpdate::default())
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.0.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn sort_order(mut self, sort_order: i64) -> Self {
        self.0.sort_order = Some(sort_order);
        self
    }

    #[must_use]
    pub fn build(self) -> PhaseUpdate {
        self.0
    }
}

impl Default for PhaseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
