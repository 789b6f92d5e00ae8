use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ScenarioResult;
use crate::ids::RecordId;

/// One executable instance of an objective. The unit of execution truth.
///
/// `result`, `severity` and `fix_type` hold the free text testers entered;
/// interpretation happens in the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Scenario {
    pub id: RecordId,
    pub objective_id: RecordId,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub fix_type: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Scenario {
    /// Parsed result, `None` when the text is missing or unrecognized.
    #[must_use]
    pub fn outcome(&self) -> Option<ScenarioResult> {
        self.result.as_deref().and_then(ScenarioResult::parse)
    }

    /// Whether a non-blank result text failed to parse.
    #[must_use]
    pub fn has_unrecognized_result(&self) -> bool {
        self.result
            .as_deref()
            .is_some_and(|raw| !raw.trim().is_empty() && ScenarioResult::parse(raw).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(result: Option<&str>) -> Scenario {
        Scenario {
            id: "scn-1".into(),
            objective_id: "obj-1".into(),
            result: result.map(str::to_string),
            severity: None,
            fix_type: None,
            updated_at: None,
        }
    }

    #[test]
    fn outcome_parses_result_text() {
        assert_eq!(scenario(Some("Not Run")).outcome(), Some(ScenarioResult::NotRun));
        assert_eq!(scenario(None).outcome(), None);
    }

    #[test]
    fn blank_result_is_not_unrecognized() {
        assert!(!scenario(Some("  ")).has_unrecognized_result());
        assert!(!scenario(None).has_unrecognized_result());
        assert!(scenario(Some("Retest")).has_unrecognized_result());
    }
}
