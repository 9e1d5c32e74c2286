use axum::http::StatusCode;
use serde_json::json;

use crate::common::{citizen_token, file_fir, get, patch_json, post_json, responder_token, test_app};

#[tokio::test]
async fn status_update_appends_history() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let created = file_fir(&app, &citizen, "Bike stolen").await;
    let id = created["id"].as_str().unwrap();

    let body = json!({ "status": "Under Investigation", "comment": "Reviewing CCTV" });
    let (status, updated) =
        patch_json(&app, &format!("/api/fir/{id}/status"), &body.to_string(), Some(&officer)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Under Investigation");
    let history = updated["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["status"], "Under Investigation");
    assert_eq!(history[1]["comment"], "Reviewing CCTV");
}

#[tokio::test]
async fn missing_comment_gets_a_default() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();

    let (_, updated) = patch_json(
        &app,
        &format!("/api/fir/{id}/status"),
        r#"{"status": "resolved"}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(updated["status"], "Resolved");
    assert_eq!(updated["status_history"][1]["comment"], "Status updated to Resolved");
}

#[tokio::test]
async fn repeating_a_status_still_records_it() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/fir/{id}/status");
    let body = r#"{"status": "Under Review"}"#;

    patch_json(&app, &uri, body, Some(&officer)).await;
    let (status, updated) = patch_json(&app, &uri, body, Some(&officer)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status_history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn resolved_records_can_be_reopened() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/fir/{id}/status");

    patch_json(&app, &uri, r#"{"status": "Closed"}"#, Some(&officer)).await;
    let (status, updated) = patch_json(&app, &uri, r#"{"status": "Pending"}"#, Some(&officer)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Pending");
}

#[tokio::test]
async fn citizen_sees_status_changes_on_their_record() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();

    patch_json(
        &app,
        &format!("/api/fir/{id}/status"),
        r#"{"status": "Assigned"}"#,
        Some(&officer),
    )
    .await;

    let (_, mine) = get(&app, &format!("/api/fir/citizen/{id}"), Some(&citizen)).await;
    assert_eq!(mine["status"], "Assigned");
    assert_eq!(mine["status_history"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();

    let (status, body) = patch_json(
        &app,
        &format!("/api/fir/{id}/status"),
        r#"{"status": "Archived"}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid status: Archived"));
    assert!(message.contains("Under Investigation"));

    let (_, unchanged) = get(&app, &format!("/api/fir/{id}"), Some(&officer)).await;
    assert_eq!(unchanged["status_history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn status_update_on_missing_record_is_not_found() {
    let (app, state) = test_app();
    let officer = responder_token(&state).await;

    let (status, body) = patch_json(
        &app,
        "/api/fir/FIR00042/status",
        r#"{"status": "Closed"}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "FIR FIR00042 not found");
}

#[tokio::test]
async fn citizens_cannot_change_status() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();

    let (status, _) = patch_json(
        &app,
        &format!("/api/fir/{id}/status"),
        r#"{"status": "Closed"}"#,
        Some(&citizen),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn notes_append_without_changing_status() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();

    let (status, updated) = post_json(
        &app,
        &format!("/api/fir/{id}/notes"),
        r#"{"comment": "  Called the complainant  "}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(updated["status"], "Pending");
    let history = updated["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["status"], "Pending");
    assert_eq!(history[1]["comment"], "Called the complainant");
}

#[tokio::test]
async fn blank_note_is_rejected() {
    let (app, state) = test_app();
    let citizen = citizen_token(&state).await;
    let officer = responder_token(&state).await;
    let id = file_fir(&app, &citizen, "x").await["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        &format!("/api/fir/{id}/notes"),
        r#"{"comment": "   "}"#,
        Some(&officer),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "comment must not be empty");
}
