use axum::http::StatusCode;
use serde_json::json;

use crate::common::{citizen_token, file_fir, get, post_json, responder_token, test_app, token_for, valid_fir};
use shared_types::UserRole;

#[tokio::test]
async fn create_fir_success() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;

    let created = file_fir(&app, &token, "Phone stolen at bus stop").await;

    assert_eq!(created["id"], "FIR00001");
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["category"], "Theft");
    assert_eq!(created["assigned_officer"], json!(null));
    assert_eq!(created["latitude"], 18.5308);
    let history = created["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["status"], "Pending");
    assert_eq!(history[0]["comment"], "FIR submitted successfully");
}

#[tokio::test]
async fn ids_increase_per_filing() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;

    let first = file_fir(&app, &token, "First").await;
    let second = file_fir(&app, &token, "Second").await;

    assert_eq!(first["id"], "FIR00001");
    assert_eq!(second["id"], "FIR00002");
}

#[tokio::test]
async fn create_fir_requires_auth() {
    let (app, _state) = test_app();

    let (status, body) = post_json(&app, "/api/fir", &valid_fir("x").to_string(), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
}

#[tokio::test]
async fn responders_cannot_file() {
    let (app, state) = test_app();
    let token = responder_token(&state).await;

    let (status, body) = post_json(&app, "/api/fir", &valid_fir("x").to_string(), Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "citizen role required");
}

#[tokio::test]
async fn invalid_fields_are_reported_per_field() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;

    let mut body = valid_fir("x");
    body["phone"] = json!("12345");
    body["description"] = json!("Too short");
    body["date"] = json!("2999-01-01");

    let (status, resp) = post_json(&app, "/api/fir", &body.to_string(), Some(&token)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["field_errors"]["phone"], "Phone number must be 10 digits");
    assert_eq!(
        resp["field_errors"]["description"],
        "Please provide more details (at least 50 characters)"
    );
    assert_eq!(resp["field_errors"]["date"], "Date cannot be in the future");
}

#[tokio::test]
async fn half_a_coordinate_is_rejected() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;

    let mut body = valid_fir("x");
    body["longitude"] = json!(null);

    let (status, resp) = post_json(&app, "/api/fir", &body.to_string(), Some(&token)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["longitude"].is_string());
}

#[tokio::test]
async fn rejected_filing_does_not_use_an_id() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;

    let mut bad = valid_fir("bad");
    bad["category"] = json!("Jaywalking");
    let (status, _) = post_json(&app, "/api/fir", &bad.to_string(), Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let created = file_fir(&app, &token, "good").await;
    assert_eq!(created["id"], "FIR00001");
}

#[tokio::test]
async fn citizens_only_see_their_own_records() {
    let (app, state) = test_app();
    let alice = citizen_token(&state).await;
    let bob = token_for(&state, "bob@test.com", UserRole::Citizen).await;

    let mine = file_fir(&app, &alice, "Alice's report").await;
    file_fir(&app, &bob, "Bob's report").await;

    let (status, list) = get(&app, "/api/fir/citizen", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Alice's report");

    let id = mine["id"].as_str().unwrap();
    let (status, _) = get(&app, &format!("/api/fir/citizen/{id}"), Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &format!("/api/fir/citizen/{id}"), Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;

    let (status, body) = get(&app, "/api/fir/citizen/123", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid FIR id"));
}
