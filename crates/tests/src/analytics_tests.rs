use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{citizen_token, get, patch_json, responder_token, seeded_app, test_app};

fn count_for<'a>(rows: &'a Value, key: &str, value: &str) -> &'a Value {
    &rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r[key] == value)
        .unwrap()["count"]
}

#[tokio::test]
async fn statistics_over_demo_records() {
    let (app, state) = seeded_app().await;
    let token = responder_token(&state).await;

    let (status, stats) = get(&app, "/api/analytics/statistics", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["open"], 4);
    assert_eq!(stats["unassigned"], 2);
    assert_eq!(stats["resolution_rate"], 0.2);
    assert_eq!(count_for(&stats["by_status"], "status", "Pending"), 2);
    assert_eq!(count_for(&stats["by_status"], "status", "Under Investigation"), 2);
    assert_eq!(count_for(&stats["by_status"], "status", "Closed"), 0);
    assert_eq!(count_for(&stats["by_category"], "category", "Cybercrime"), 1);
    assert_eq!(
        stats["officer_workload"],
        json!([
            { "officer": "Officer Johnson", "open_cases": 1 },
            { "officer": "Officer Smith", "open_cases": 1 }
        ])
    );
}

#[tokio::test]
async fn statistics_follow_status_changes() {
    let (app, state) = seeded_app().await;
    let token = responder_token(&state).await;

    patch_json(
        &app,
        "/api/fir/FIR00123/status",
        r#"{"status": "Resolved"}"#,
        Some(&token),
    )
    .await;
    let (_, stats) = get(&app, "/api/analytics/statistics", Some(&token)).await;

    assert_eq!(stats["open"], 3);
    assert_eq!(stats["resolution_rate"], 0.4);
    assert_eq!(
        stats["officer_workload"],
        json!([{ "officer": "Officer Johnson", "open_cases": 1 }])
    );
}

#[tokio::test]
async fn empty_store_has_zero_rate() {
    let (app, state) = test_app();
    let token = responder_token(&state).await;

    let (_, stats) = get(&app, "/api/analytics/statistics", Some(&token)).await;

    assert_eq!(stats["total"], 0);
    assert_eq!(stats["resolution_rate"], 0.0);
    assert_eq!(stats["officer_workload"], json!([]));
}

#[tokio::test]
async fn heatmap_skips_records_without_coordinates() {
    let (app, state) = seeded_app().await;
    let token = responder_token(&state).await;

    let (status, points) = get(&app, "/api/analytics/heatmap", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let points = points.as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[0]["latitude"], 40.785091);
    assert_eq!(points[0]["longitude"], -73.968285);
    assert_eq!(points[0]["category"], "Theft");
    assert!(points.iter().all(|p| p["category"] != "Cybercrime"));
}

#[tokio::test]
async fn analytics_are_for_responders() {
    let (app, state) = seeded_app().await;
    let token = citizen_token(&state).await;

    let (status, _) = get(&app, "/api/analytics/statistics", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app, "/api/analytics/heatmap", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
