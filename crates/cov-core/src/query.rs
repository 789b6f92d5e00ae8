//! Provider-neutral description of an objective query.
//!
//! An `ObjectiveQuery` names the nested relations to expand (with explicit
//! inner/left semantics), the equality/inclusion predicates the provider
//! should apply, and the company that must be re-checked locally after the
//! rows come back. Providers translate it into their own query language;
//! [`ObjectiveQuery::matches`] is the reference evaluation over an already
//! materialized objective.

use serde::{Deserialize, Serialize};

use crate::entities::TestObjective;
use crate::ids::RecordId;

/// How a nested relation participates in the query.
///
/// An inner join drops the objective when the related collection is empty;
/// a left join keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
}

/// Relations of a test objective the provider can expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Scenarios,
    Tor,
    CompanyLinks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Join {
    pub relation: Relation,
    pub kind: JoinKind,
}

/// Fields predicates can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The objective's phase reference.
    ObjectivePhase,
    /// The module of the objective's TOR.
    TorModule,
    /// Any company in the objective's company links.
    LinkedCompany,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Predicate {
    Eq { field: Field, value: RecordId },
    In { field: Field, values: Vec<RecordId> },
}

impl Predicate {
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Eq { field, .. } | Self::In { field, .. } => *field,
        }
    }

    fn accepts(&self, candidate: &RecordId) -> bool {
        match self {
            Self::Eq { value, .. } => value == candidate,
            Self::In { values, .. } => values.contains(candidate),
        }
    }

    /// Evaluate the predicate against a materialized objective.
    #[must_use]
    pub fn matches(&self, objective: &TestObjective) -> bool {
        match self.field() {
            Field::ObjectivePhase => objective
                .phase_id
                .as_ref()
                .is_some_and(|phase| self.accepts(phase)),
            Field::TorModule => objective
                .tor_module_id()
                .is_some_and(|module| self.accepts(module)),
            Field::LinkedCompany => objective
                .companies
                .iter()
                .any(|link| self.accepts(&link.company_id)),
        }
    }
}

/// Query over test objectives with nested relation expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveQuery {
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    company_post_filter: Option<RecordId>,
}

impl ObjectiveQuery {
    /// Objectives joined to scenarios (inner), TOR (inner) and company links
    /// (left), with no predicates.
    #[must_use]
    pub fn objectives() -> Self {
        Self {
            joins: vec![
                Join {
                    relation: Relation::Scenarios,
                    kind: JoinKind::Inner,
                },
                Join {
                    relation: Relation::Tor,
                    kind: JoinKind::Inner,
                },
                Join {
                    relation: Relation::CompanyLinks,
                    kind: JoinKind::Left,
                },
            ],
            predicates: Vec::new(),
            company_post_filter: None,
        }
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[must_use]
    pub fn with_company_post_filter(mut self, company_id: RecordId) -> Self {
        self.company_post_filter = Some(company_id);
        self
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub fn join_kind(&self, relation: Relation) -> Option<JoinKind> {
        self.joins
            .iter()
            .find(|join| join.relation == relation)
            .map(|join| join.kind)
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub const fn company_post_filter(&self) -> Option<&RecordId> {
        self.company_post_filter.as_ref()
    }

    /// Whether the query carries no predicate and no local refinement.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty() && self.company_post_filter.is_none()
    }

    /// Whether `objective` survives the join plan and every provider-side
    /// predicate. The company post-filter is not evaluated here.
    #[must_use]
    pub fn matches(&self, objective: &TestObjective) -> bool {
        let joins_hold = self.joins.iter().all(|join| match (join.relation, join.kind) {
            (_, JoinKind::Left) => true,
            (Relation::Scenarios, JoinKind::Inner) => !objective.scenarios.is_empty(),
            (Relation::Tor, JoinKind::Inner) => objective.tor.is_some(),
            (Relation::CompanyLinks, JoinKind::Inner) => !objective.companies.is_empty(),
        });
        joins_hold && self.predicates.iter().all(|p| p.matches(objective))
    }
}

impl Default for ObjectiveQuery {
    fn default() -> Self {
        Self::objectives()
    }
}
