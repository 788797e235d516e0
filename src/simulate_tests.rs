use super::*;
use std::io::Write;

use tempfile::NamedTempFile;

fn three_frame_scenario() -> Scenario {
    serde_json::from_value(json!({
        "frames": [
            { "url": "https://shop.example.com/", "frame_id": 0 },
            {
                "url": "https://checkout.example.com/frame",
                "frame_id": 4,
                "rect": { "left": 100.0, "top": 50.0, "width": 600.0, "height": 400.0 }
            },
            {
                "url": "https://pay.example.net/login",
                "frame_id": 9,
                "rect": { "left": 20.0, "top": 30.0, "width": 300.0, "height": 200.0 },
                "styles": { "border-top-width": "1px" }
            }
        ],
        "field": { "type": "password" }
    }))
    .unwrap()
}

fn commands(report: &SimulationReport, frame: usize) -> Vec<&'static str> {
    report.frames[frame]
        .messages
        .iter()
        .map(ExtensionMessage::command)
        .collect()
}

#[tokio::test]
async fn test_run_resolves_chain_position() {
    let report = run(&three_frame_scenario(), OverlayConfig::default())
        .await
        .unwrap();

    let resolved = report.resolved.unwrap();
    assert_eq!(resolved.left, 120.0);
    assert_eq!(resolved.top, 81.0);
    assert_eq!(resolved.parent_frame_ids, vec![4, 0]);
    assert_eq!(resolved.sub_frame_depth, 2);
    assert_eq!(report.menu_style.get("top").map(String::as_str), Some("81px"));
    assert_eq!(report.menu_style.get("left").map(String::as_str), Some("120px"));
}

#[tokio::test]
async fn test_run_focus_opens_menu_in_deepest_frame() {
    let report = run(&three_frame_scenario(), OverlayConfig::default())
        .await
        .unwrap();

    assert!(commands(&report, 2).contains(&"openAutofillInlineMenu"));
    assert!(commands(&report, 1).is_empty());
    assert_eq!(report.frames[2].frame_id, 9);
}

#[tokio::test]
async fn test_run_reverts_foreign_mutations() {
    let mut scenario = three_frame_scenario();
    scenario.mutations = vec![
        InjectedMutation::Style {
            property: "z-index".to_string(),
            value: "0".to_string(),
        },
        InjectedMutation::Attribute {
            name: "onclick".to_string(),
            value: "steal()".to_string(),
        },
    ];

    let report = run(&scenario, OverlayConfig::default()).await.unwrap();

    assert_eq!(
        report.menu_style.get("z-index").map(String::as_str),
        Some("2147483647")
    );
    assert_eq!(report.foreign_mutations, 1);
    assert!(!commands(&report, 0).contains(&"closeAutofillInlineMenu"));
}

#[tokio::test]
async fn test_run_depth_override_abandons_chain() {
    let mut scenario = three_frame_scenario();
    scenario.max_depth = Some(1);

    let report = run(&scenario, OverlayConfig::default()).await.unwrap();

    assert!(report.resolved.is_none());
    assert!(commands(&report, 0).contains(&"destroyAutofillInlineMenuListeners"));
    assert!(!commands(&report, 0).contains(&"updateSubFrameData"));
}

#[tokio::test]
async fn test_run_single_frame_skips_positioning() {
    let scenario: Scenario = serde_json::from_value(json!({
        "frames": [{ "url": "https://shop.example.com/", "frame_id": 0 }]
    }))
    .unwrap();

    let report = run(&scenario, OverlayConfig::default()).await.unwrap();

    assert!(report.resolved.is_none());
    assert_eq!(report.menu_style.get("top").map(String::as_str), Some("0px"));
    assert!(commands(&report, 0).contains(&"openAutofillInlineMenu"));
}

#[tokio::test]
async fn test_run_empty_chain() {
    let scenario: Scenario = serde_json::from_value(json!({ "frames": [] })).unwrap();
    let result = run(&scenario, OverlayConfig::default()).await;
    assert!(matches!(result, Err(ScenarioError::EmptyChain)));
}

#[tokio::test]
async fn test_run_rejects_invalid_depth() {
    let mut scenario = three_frame_scenario();
    scenario.max_depth = Some(0);
    let result = run(&scenario, OverlayConfig::default()).await;
    assert!(matches!(result, Err(ScenarioError::Config(_))));
}

#[test]
fn test_load_scenario_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"frames": [{{"url": "https://a.example/", "frame_id": 0}}],
            "mutations": [{{"kind": "attribute", "name": "onload", "value": "x()"}}]}}"#
    )
    .unwrap();

    let scenario = load_scenario(file.path()).unwrap();
    assert_eq!(scenario.frames.len(), 1);
    assert!(scenario.field.focus);
    assert_eq!(scenario.field.input_type, "text");
    assert!(matches!(
        &scenario.mutations[0],
        InjectedMutation::Attribute { name, .. } if name == "onload"
    ));
}

#[test]
fn test_load_scenario_invalid_json() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(matches!(
        load_scenario(file.path()),
        Err(ScenarioError::Json(_))
    ));
}
