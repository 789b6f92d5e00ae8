use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Scenario;
use crate::ids::RecordId;

/// The TOR an objective hangs off, carrying the module it bridges to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TorRef {
    pub id: RecordId,
    pub module_id: Option<RecordId>,
}

/// Join row associating an objective with a company.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompanyLink {
    pub objective_id: RecordId,
    pub company_id: RecordId,
}

/// A test objective under execution tracking, with its nested relations
/// expanded by the provider.
///
/// `module_id` is the objective's direct (legacy) module attribute. Module
/// filtering goes through `tor.module_id` instead.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestObjective {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub phase_id: Option<RecordId>,
    #[serde(default)]
    pub module_id: Option<RecordId>,
    #[serde(default)]
    pub tor: Option<TorRef>,
    #[serde(default)]
    pub companies: Vec<CompanyLink>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl TestObjective {
    /// Whether any company link points at `company_id`.
    #[must_use]
    pub fn is_linked_to_company(&self, company_id: &RecordId) -> bool {
        self.companies.iter().any(|link| &link.company_id == company_id)
    }

    /// Module reached through the TOR bridge.
    #[must_use]
    pub fn tor_module_id(&self) -> Option<&RecordId> {
        self.tor.as_ref().and_then(|tor| tor.module_id.as_ref())
    }
}
