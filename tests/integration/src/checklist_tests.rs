//! Checklist runs from a document against live telemetry and a scripted vehicle

use crate::test_utils::{
    init_test_logging, publish_json, qualified, test_config, test_invoker, test_store,
    ScriptedVehicle,
};
use nautilus_checklist::{
    ChecklistDefinitionStore, ChecklistExecutionEngine, Decision, DocumentChecklistStore,
    EngineState, ItemVerdict, Verdict,
};
use nautilus_core::ConsoleConfig;
use nautilus_telemetry::UNREADABLE;
use serde_json::json;
use std::sync::Arc;

const CHECKLISTS: &str = r#"
[[check_lists.check_list]]
id = "pre-dive"

[[check_lists.check_list.check_item]]
id = "navigation"
description = "Navigation solution valid"

[[check_lists.check_list.check_item.check_topic]]
topic_name = "navigator/navigation"
field = [
    { name = "header/stamp/secs", description = "Stamp" },
    { name = "position/depth", description = "Depth (m)" },
]

[[check_lists.check_list.check_item.check_topic]]
topic_name = "batteries/status"
field = [{ name = "charge", description = "Charge (%)" }]

[[check_lists.check_list.check_item]]
id = "thrusters"
description = "Thrusters respond"

[[check_lists.check_list.check_item.check_action]]
action_id = "controller/enable_thrusters"

[[check_lists.check_list.check_item.check_action]]
action_id = "controller/test_thrusters"
param = [{ name = "seconds", value = "3" }]

[[check_lists.check_list.check_item]]
id = "lights"
description = "Lights on"

[[check_lists.check_list]]
id = "post-dive"

[[check_lists.check_list.check_item]]
description = "Rinse the vehicle"
"#;

fn engine_for(
    checklist: &str,
    vehicle: Arc<ScriptedVehicle>,
) -> (ChecklistExecutionEngine, Arc<nautilus_telemetry::SnapshotStore>) {
    init_test_logging();
    let store = test_store();
    publish_json(
        &store,
        "navigator/navigation",
        json!({
            "_new_data": true,
            "header": { "stamp": { "secs": 1_700_000_000 } },
            "position": { "depth": 0.4 }
        }),
    );

    let checklists = DocumentChecklistStore::from_toml_str(CHECKLISTS).unwrap();
    let definition = checklists.definition(checklist).unwrap();
    let engine =
        ChecklistExecutionEngine::open(definition, store.clone(), test_invoker(vehicle)).unwrap();
    (engine, store)
}

#[tokio::test]
async fn test_full_run_with_partial_telemetry_and_actions() {
    let vehicle = Arc::new(
        ScriptedVehicle::new().refusing(&qualified("controller/test_thrusters")),
    );
    let (mut engine, _store) = engine_for("pre-dive", vehicle.clone());

    let state = engine.begin().await;
    assert_eq!(
        state,
        EngineState::AwaitingReview { cursor: 0, item_id: "navigation".into() }
    );

    // The battery topic was never published: only its field is unreadable
    let resolution = engine.resolution("navigation").unwrap();
    let shown: Vec<&str> = resolution.readings.iter().map(|r| r.value.display_text()).collect();
    assert_eq!(shown, vec!["1700000000", "0.4", UNREADABLE]);
    assert_eq!(resolution.failure_count(), 1);

    engine.decide(Decision::Pass).await;
    assert!(vehicle.calls().is_empty());

    let enabled = engine.trigger_action(0).await.unwrap();
    assert!(enabled.is_success());
    let tested = engine.trigger_action(1).await.unwrap();
    assert!(!tested.is_success());

    let calls = vehicle.calls();
    assert_eq!(calls[0].service, "/girona500/controller/enable_thrusters");
    assert_eq!(calls[0].parameters, None);
    assert_eq!(calls[1].service, "/girona500/controller/test_thrusters");
    assert_eq!(
        calls[1].parameters.as_ref().and_then(|p| p.get("seconds")).map(String::as_str),
        Some("3")
    );
    assert_eq!(calls[1].host, "localhost");
    assert_eq!(calls[1].port, 9090);

    // A failed action does not gate the decision
    engine.decide(Decision::Fail).await;
    let state = engine.decide(Decision::Pass).await;
    match state {
        EngineState::Complete { outcomes } => {
            assert_eq!(outcomes.get("navigation"), Some(&Verdict::Pass));
            assert_eq!(outcomes.get("thrusters"), Some(&Verdict::Fail));
            assert_eq!(outcomes.get("lights"), Some(&Verdict::Pass));
        }
        other => panic!("expected complete run, got {:?}", other),
    }

    let report = engine.into_report();
    assert!(report.completed);
    assert!(!report.all_passed());
    assert_eq!((report.passed, report.failed, report.unreviewed), (2, 1, 0));
    assert!(report.to_json().unwrap().contains("\"checklist_id\": \"pre-dive\""));
}

#[tokio::test]
async fn test_back_navigation_reresolves_with_fresh_data() {
    let vehicle = Arc::new(ScriptedVehicle::new());
    let (mut engine, store) = engine_for("pre-dive", vehicle);

    engine.begin().await;
    engine.decide(Decision::Pass).await;

    // Stale snapshot: freshness flag cleared
    publish_json(
        &store,
        "navigator/navigation",
        json!({ "_new_data": false, "position": { "depth": 12.0 } }),
    );
    publish_json(&store, "batteries/status", json!({ "_new_data": true, "charge": 77 }));

    let state = engine.decide(Decision::Back).await;
    assert_eq!(
        state,
        EngineState::AwaitingReview { cursor: 0, item_id: "navigation".into() }
    );

    let shown: Vec<&str> = engine
        .resolution("navigation")
        .unwrap()
        .readings
        .iter()
        .map(|r| r.value.display_text())
        .collect();
    assert_eq!(shown, vec![UNREADABLE, UNREADABLE, "77"]);

    // The earlier verdict survives the revisit until overwritten
    assert_eq!(engine.run_state().verdict("navigation"), Some(Verdict::Pass));
    engine.decide(Decision::Fail).await;
    assert_eq!(engine.run_state().verdict("navigation"), Some(Verdict::Fail));
}

#[tokio::test]
async fn test_cancelled_run_reports_unreviewed_items() {
    let vehicle = Arc::new(ScriptedVehicle::new());
    let (mut engine, _store) = engine_for("pre-dive", vehicle);

    engine.begin().await;
    engine.decide(Decision::Pass).await;

    let report = engine.cancel();
    assert!(!report.completed);
    assert_eq!(report.items[0].verdict, ItemVerdict::Pass);
    assert_eq!(report.items[1].verdict, ItemVerdict::Unreviewed);
    assert_eq!(report.unreviewed, 2);
}

#[tokio::test]
async fn test_item_without_topics_or_actions() {
    let vehicle = Arc::new(ScriptedVehicle::new());
    let (mut engine, _store) = engine_for("post-dive", vehicle);

    let state = engine.begin().await;
    assert_eq!(
        state,
        EngineState::AwaitingReview { cursor: 0, item_id: "post-dive/0".into() }
    );
    assert!(engine.resolution("post-dive/0").unwrap().readings.is_empty());

    let state = engine.decide(Decision::Pass).await;
    assert!(matches!(state, EngineState::Complete { .. }));
}

#[test]
fn test_checklists_loaded_through_console_config() {
    let path = std::env::temp_dir().join(format!(
        "nautilus-checklists-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, CHECKLISTS).unwrap();

    let config = ConsoleConfig::from_toml_str(&format!(
        "[checklists]\npath = {:?}\n",
        path.display().to_string()
    ))
    .unwrap();
    let store = DocumentChecklistStore::from_config(&config.checklists).unwrap();
    std::fs::remove_file(&path).unwrap();

    let ids: Vec<String> = store.list_checklists().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["pre-dive", "post-dive"]);
    assert_eq!(store.items_for("pre-dive").unwrap().len(), 3);
    assert_eq!(test_config().checklists.path, None);
}
