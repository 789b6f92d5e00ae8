//! `DataProvider` behavior of the libSQL service against a seeded database.

use cov_core::context::SessionContext;
use cov_core::enums::Population;
use cov_core::ids::RecordId;
use cov_core::provider::DataProvider;
use cov_core::query::{Field, JoinKind, ObjectiveQuery, Predicate, Relation};
use cov_db::repos::objective::{NewObjective, NewScenario};
use cov_db::repos::phase::NewPhase;
use cov_db::service::CovService;
use pretty_assertions::assert_eq;

struct Seeded {
    svc: CovService,
    uat: RecordId,
    finance: RecordId,
    hr: RecordId,
    acme: RecordId,
    globex: RecordId,
    tor_fin: RecordId,
    tor_hr: RecordId,
    group: RecordId,
}

async fn scenario(svc: &CovService, objective: &RecordId, result: &str) {
    svc.add_scenario(
        objective,
        NewScenario {
            result: Some(result.to_string()),
            ..NewScenario::default()
        },
    )
    .await
    .unwrap();
}

/// Four objectives:
/// - TO-1: UAT, Finance TOR, Acme, two scenarios
/// - TO-2: UAT, HR TOR (direct module Finance), Globex, one scenario
/// - TO-3: SIT, Finance TOR, no company, one scenario
/// - TO-4: UAT, Finance TOR, Acme, no scenarios
/// - TO-5: UAT, no TOR, Acme, one scenario
async fn seeded() -> Seeded {
    let svc = CovService::new_local(":memory:").await.unwrap();
    let admin = SessionContext::admin("tester");

    let uat = svc
        .create_phase(
            &admin,
            NewPhase {
                code: "UAT".into(),
                name: "User acceptance".into(),
                ..NewPhase::default()
            },
        )
        .await
        .unwrap()
        .id;
    let sit = svc
        .create_phase(
            &admin,
            NewPhase {
                code: "SIT".into(),
                name: "System integration".into(),
                ..NewPhase::default()
            },
        )
        .await
        .unwrap()
        .id;

    let finance = svc.create_module("FIN", "Finance").await.unwrap().id;
    let hr = svc.create_module("HR", "Human resources").await.unwrap().id;
    let tor_fin = svc.create_tor("TOR-F", "Ledger", &finance).await.unwrap().id;
    let tor_hr = svc.create_tor("TOR-H", "Payroll", &hr).await.unwrap().id;
    let acme = svc.create_company("Acme").await.unwrap().id;
    let globex = svc.create_company("Globex").await.unwrap().id;

    let to1 = svc
        .create_objective(NewObjective {
            code: "TO-1".into(),
            name: "Post journal".into(),
            phase_id: Some(uat.clone()),
            module_id: Some(finance.clone()),
            tor_id: Some(tor_fin.clone()),
        })
        .await
        .unwrap();
    scenario(&svc, &to1, "Pass").await;
    scenario(&svc, &to1, "Fail").await;
    svc.link_company(&to1, &acme).await.unwrap();

    let to2 = svc
        .create_objective(NewObjective {
            code: "TO-2".into(),
            name: "Run payroll".into(),
            phase_id: Some(uat.clone()),
            module_id: Some(finance.clone()),
            tor_id: Some(tor_hr.clone()),
        })
        .await
        .unwrap();
    scenario(&svc, &to2, "Not Run").await;
    svc.link_company(&to2, &globex).await.unwrap();

    let to3 = svc
        .create_objective(NewObjective {
            code: "TO-3".into(),
            name: "Close period".into(),
            phase_id: Some(sit),
            module_id: Some(finance.clone()),
            tor_id: Some(tor_fin.clone()),
        })
        .await
        .unwrap();
    scenario(&svc, &to3, "Blocked").await;

    let to4 = svc
        .create_objective(NewObjective {
            code: "TO-4".into(),
            name: "Unscheduled".into(),
            phase_id: Some(uat.clone()),
            module_id: Some(finance.clone()),
            tor_id: Some(tor_fin.clone()),
        })
        .await
        .unwrap();
    svc.link_company(&to4, &acme).await.unwrap();

    let to5 = svc
        .create_objective(NewObjective {
            code: "TO-5".into(),
            name: "Orphan".into(),
            phase_id: Some(uat.clone()),
            module_id: Some(hr.clone()),
            tor_id: None,
        })
        .await
        .unwrap();
    scenario(&svc, &to5, "Pass").await;
    svc.link_company(&to5, &acme).await.unwrap();

    let group = svc.create_group("Treasury").await.unwrap().id;
    svc.link_group_tor(&group, &tor_fin).await.unwrap();
    svc.link_group_tor(&group, &tor_hr).await.unwrap();
    svc.link_tor_test_case(&tor_fin, &to1).await.unwrap();
    svc.link_tor_test_case(&tor_fin, &to3).await.unwrap();
    svc.link_tor_test_case(&tor_hr, &to1).await.unwrap();

    Seeded {
        svc,
        uat,
        finance,
        hr,
        acme,
        globex,
        tor_fin,
        tor_hr,
        group,
    }
}

fn codes(objectives: &[cov_core::entities::TestObjective]) -> Vec<&str> {
    objectives.iter().map(|o| o.code.as_str()).collect()
}

#[tokio::test]
async fn default_plan_drops_objectives_without_scenarios_or_tor() {
    let s = seeded().await;
    let rows = s
        .svc
        .fetch_objectives(&ObjectiveQuery::objectives())
        .await
        .unwrap();
    assert_eq!(codes(&rows), vec!["TO-1", "TO-2", "TO-3"]);

    let to1 = &rows[0];
    assert_eq!(to1.scenarios.len(), 2);
    assert_eq!(to1.tor.as_ref().unwrap().id, s.tor_fin);
    assert_eq!(to1.tor_module_id(), Some(&s.finance));
    assert!(to1.is_linked_to_company(&s.acme));
    assert!(rows[2].companies.is_empty(), "left join keeps unlinked objectives");
}

#[tokio::test]
async fn phase_predicate() {
    let s = seeded().await;
    let query = ObjectiveQuery::objectives().with_predicate(Predicate::Eq {
        field: Field::ObjectivePhase,
        value: s.uat.clone(),
    });
    let rows = s.svc.fetch_objectives(&query).await.unwrap();
    assert_eq!(codes(&rows), vec!["TO-1", "TO-2"]);
}

#[tokio::test]
async fn module_predicate_goes_through_tor() {
    let s = seeded().await;
    let query = ObjectiveQuery::objectives().with_predicate(Predicate::Eq {
        field: Field::TorModule,
        value: s.hr.clone(),
    });
    let rows = s.svc.fetch_objectives(&query).await.unwrap();
    // TO-2's direct module is Finance, but its TOR belongs to HR.
    assert_eq!(codes(&rows), vec!["TO-2"]);
}

#[tokio::test]
async fn company_predicate_is_pushed_down() {
    let s = seeded().await;
    let query = ObjectiveQuery::objectives().with_predicate(Predicate::Eq {
        field: Field::LinkedCompany,
        value: s.globex.clone(),
    });
    let rows = s.svc.fetch_objectives(&query).await.unwrap();
    assert_eq!(codes(&rows), vec!["TO-2"]);
}

#[tokio::test]
async fn inclusion_predicate() {
    let s = seeded().await;
    let query = ObjectiveQuery::objectives().with_predicate(Predicate::In {
        field: Field::TorModule,
        values: vec![s.finance.clone(), s.hr.clone()],
    });
    let rows = s.svc.fetch_objectives(&query).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn results_match_reference_evaluation() {
    let s = seeded().await;
    let everything = ObjectiveQuery::objectives();
    let all = s.svc.fetch_objectives(&everything).await.unwrap();

    let query = ObjectiveQuery::objectives()
        .with_predicate(Predicate::Eq {
            field: Field::ObjectivePhase,
            value: s.uat.clone(),
        })
        .with_predicate(Predicate::Eq {
            field: Field::LinkedCompany,
            value: s.acme.clone(),
        });
    let filtered = s.svc.fetch_objectives(&query).await.unwrap();
    let expected: Vec<_> = all.into_iter().filter(|o| query.matches(o)).collect();
    assert_eq!(filtered, expected);
}

#[tokio::test]
async fn counts_whole_populations() {
    let s = seeded().await;
    assert_eq!(s.svc.count(Population::Tor).await.unwrap(), 2);
    assert_eq!(s.svc.count(Population::Module).await.unwrap(), 2);
    assert_eq!(s.svc.count(Population::Objective).await.unwrap(), 5);
    assert_eq!(s.svc.count(Population::Scenario).await.unwrap(), 5);
}

#[tokio::test]
async fn group_links_carry_module() {
    let s = seeded().await;
    let links = s.svc.fetch_group_tor_links(&s.group).await.unwrap();
    assert_eq!(links.len(), 2);
    let hr_link = links.iter().find(|l| l.tor_id == s.tor_hr).unwrap();
    assert_eq!(hr_link.module_id, s.hr);
    assert_eq!(hr_link.module_name, "Human resources");

    let none = s
        .svc
        .fetch_group_tor_links(&"grp-missing".into())
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn tor_test_cases_restricted_to_requested_tors() {
    let s = seeded().await;
    let fin_only = s
        .svc
        .fetch_tor_test_cases(std::slice::from_ref(&s.tor_fin))
        .await
        .unwrap();
    assert_eq!(fin_only.len(), 2);
    assert!(fin_only.iter().all(|l| l.tor_id == s.tor_fin));

    let both = s
        .svc
        .fetch_tor_test_cases(&[s.tor_fin.clone(), s.tor_hr.clone()])
        .await
        .unwrap();
    assert_eq!(both.len(), 3);
    assert!(s.svc.fetch_tor_test_cases(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn relations_absent_from_plan_are_not_expanded() {
    let s = seeded().await;
    let query: ObjectiveQuery = serde_json::from_value(serde_json::json!({
        "joins": [{"relation": "tor", "kind": "left"}],
        "predicates": [],
        "company_post_filter": null
    }))
    .unwrap();
    assert_eq!(query.join_kind(Relation::Tor), Some(JoinKind::Left));

    let rows = s.svc.fetch_objectives(&query).await.unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|o| o.scenarios.is_empty() && o.companies.is_empty()));
    assert!(rows.iter().any(|o| o.tor.is_none()));
}
