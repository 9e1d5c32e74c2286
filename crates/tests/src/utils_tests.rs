use axum::http::StatusCode;
use serde_json::json;

use crate::common::{citizen_token, get, post_json, responder_token, test_app};

#[tokio::test]
async fn stolen_phone_suggests_theft() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;
    let body = json!({ "description": "Someone stole my phone on the train" }).to_string();

    let (status, resp) = post_json(&app, "/api/utils/categorize", &body, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["suggestions"], json!(["Theft"]));
}

#[tokio::test]
async fn several_categories_keep_ranking_order() {
    let (app, state) = test_app();
    let token = responder_token(&state).await;
    let body = json!({ "description": "They hacked my account online and then broke into my flat" }).to_string();

    let (_, resp) = post_json(&app, "/api/utils/categorize", &body, Some(&token)).await;

    assert_eq!(resp["suggestions"], json!(["Burglary", "Cybercrime"]));
}

#[tokio::test]
async fn no_keyword_falls_back_to_first_three() {
    let (app, state) = test_app();
    let token = citizen_token(&state).await;
    let body = json!({ "description": "Loud music every night" }).to_string();

    let (_, resp) = post_json(&app, "/api/utils/categorize", &body, Some(&token)).await;

    assert_eq!(resp["suggestions"], json!(["Theft", "Assault", "Burglary"]));
}

#[tokio::test]
async fn categorize_requires_sign_in() {
    let (app, _state) = test_app();
    let body = json!({ "description": "stolen" }).to_string();

    let (status, _) = post_json(&app, "/api/utils/categorize", &body, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn officer_roster_comes_from_settings() {
    let (app, state) = test_app();
    let token = responder_token(&state).await;

    let (status, body) = get(&app, "/api/officers", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "name": "Officer Smith" },
            { "id": 2, "name": "Officer Johnson" }
        ])
    );
}
