//! Filter composition.
//!
//! Three dimensions (company, phase, module) narrow the objective set. Phase
//! and module become provider predicates. Company is the one-to-many
//! dimension: it is pushed to the provider only when the provider says it can
//! evaluate it, and is always re-applied locally with [`apply_post_filter`].

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use cov_core::entities::TestObjective;
use cov_core::ids::RecordId;
use cov_core::provider::ProviderCapabilities;
use cov_core::query::{Field, ObjectiveQuery, Predicate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One filter dimension: everything, or a single record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    #[default]
    All,
    Only(RecordId),
}

impl FilterValue {
    /// `"all"` (any case) and blank text mean no filter.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(RecordId::new(trimmed))
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub const fn id(&self) -> Option<&RecordId> {
        match self {
            Self::All => None,
            Self::Only(id) => Some(id),
        }
    }
}

impl FromStr for FilterValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardFilter {
    #[serde(default)]
    pub company: FilterValue,
    #[serde(default)]
    pub phase: FilterValue,
    #[serde(default)]
    pub module: FilterValue,
}

impl DashboardFilter {
    #[must_use]
    pub const fn new(company: FilterValue, phase: FilterValue, module: FilterValue) -> Self {
        Self {
            company,
            phase,
            module,
        }
    }

    /// All three dimensions are `all`.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.company.is_all() && self.phase.is_all() && self.module.is_all()
    }
}

impl fmt::Display for DashboardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "company={} phase={} module={}",
            self.company, self.phase, self.module
        )
    }
}

/// Build the objective query for `filter`.
///
/// The module predicate targets the TOR's module, never the objective's
/// direct module attribute.
#[must_use]
pub fn compose(filter: &DashboardFilter, capabilities: ProviderCapabilities) -> ObjectiveQuery {
    let mut query = ObjectiveQuery::objectives();
    if let Some(phase) = filter.phase.id() {
        query = query.with_predicate(Predicate::Eq {
            field: Field::ObjectivePhase,
            value: phase.clone(),
        });
    }
    if let Some(module) = filter.module.id() {
        query = query.with_predicate(Predicate::Eq {
            field: Field::TorModule,
            value: module.clone(),
        });
    }
    if let Some(company) = filter.company.id() {
        if capabilities.company_pushdown {
            query = query.with_predicate(Predicate::Eq {
                field: Field::LinkedCompany,
                value: company.clone(),
            });
        }
        query = query.with_company_post_filter(company.clone());
    }
    query
}

/// Keep only objectives linked to the query's post-filter company.
#[must_use]
pub fn apply_post_filter(query: &ObjectiveQuery, rows: Vec<TestObjective>) -> Vec<TestObjective> {
    match query.company_post_filter() {
        None => rows,
        Some(company) => rows
            .into_iter()
            .filter(|objective| objective.is_linked_to_company(company))
            .collect(),
    }
}
