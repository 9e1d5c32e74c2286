use axum::http::StatusCode;
use serde_json::json;

use crate::common::{citizen_token, file_fir, get, patch_json, responder_token, seeded_app, test_app};

#[tokio::test]
async fn assign_then_unassign() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/fir/{id}/assign");

    let (status, assigned) =
        patch_json(&app, &uri, &json!({ "officer": "Officer Smith" }).to_string(), Some(&officer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["assigned_officer"], "Officer Smith");
    // Assignment alone never touches the status.
    assert_eq!(assigned["status"], "Pending");
    assert_eq!(assigned["status_history"].as_array().unwrap().len(), 1);

    let (status, cleared) =
        patch_json(&app, &uri, &json!({ "officer": null }).to_string(), Some(&officer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["assigned_officer"], json!(null));
}

#[tokio::test]
async fn blank_officer_unassigns() {
    let (app, state) = seeded_app().await;
    let officer = responder_token(&state).await;

    let (_, cleared) = patch_json(
        &app,
        "/api/fir/FIR00123/assign",
        r#"{"officer": "  "}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(cleared["assigned_officer"], json!(null));
}

#[tokio::test]
async fn reassignment_shows_in_officer_filter() {
    let (app, state) = seeded_app().await;
    let officer = responder_token(&state).await;

    patch_json(
        &app,
        "/api/fir/FIR00124/assign",
        r#"{"officer": "Officer Smith"}"#,
        Some(&officer),
    )
    .await;

    let (_, body) = get(&app, "/api/fir?officer=Officer%20Smith", Some(&officer)).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["FIR00123", "FIR00124"]);
}

#[tokio::test]
async fn assign_missing_record_is_not_found() {
    let (app, state) = test_app();
    let officer = responder_token(&state).await;

    let (status, _) = patch_json(
        &app,
        "/api/fir/FIR00001/assign",
        r#"{"officer": "Officer Smith"}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
