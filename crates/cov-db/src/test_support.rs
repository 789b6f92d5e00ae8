//! Shared test utilities for cov-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use cov_core::context::SessionContext;
    use cov_core::ids::RecordId;

    use crate::repos::objective::{NewObjective, NewScenario};
    use crate::service::CovService;

    /// Create an in-memory `CovService`.
    pub async fn test_service() -> CovService {
        CovService::new_local(":memory:").await.unwrap()
    }

    pub fn admin() -> SessionContext {
        SessionContext::admin("tester")
    }

    /// Create a module, a TOR and one objective with a single passing
    /// scenario. Returns the objective id.
    pub async fn seed_objective(svc: &CovService, phase_id: Option<&RecordId>) -> RecordId {
        let suffix = svc.db().generate_id("tst").await.unwrap();
        let module = svc
            .create_module(&format!("M-{suffix}"), "Seed module")
            .await
            .unwrap();
        let tor = svc
            .create_tor(&format!("TOR-{suffix}"), "Seed TOR", &module.id)
            .await
            .unwrap();
        let id = svc
            .create_objective(NewObjective {
                code: format!("TO-{suffix}"),
                name: "Seed objective".into(),
                phase_id: phase_id.cloned(),
                module_id: Some(module.id),
                tor_id: Some(tor.id),
            })
            .await
            .unwrap();
        svc.add_scenario(
            &id,
            NewScenario {
                result: Some("Pass".into()),
                ..NewScenario::default()
            },
        )
        .await
        .unwrap();
        id
    }
}
