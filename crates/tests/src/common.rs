use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    Router,
};
use serde_json::{json, Value};
use server::auth::jwt::{create_access_token, AuthKeys};
use server::repo::user as user_repo;
use server::state::AppState;
use shared_types::{ServerSettings, UserRole};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a router over fresh, empty in-memory stores.
///
/// Each call gets its own state, so tests never see each other's records.
pub fn test_app() -> (Router, AppState) {
    let settings = ServerSettings {
        officers: vec!["Officer Smith".into(), "Officer Johnson".into()],
        ..ServerSettings::default()
    };
    let state = AppState::new(settings, AuthKeys::new(TEST_SECRET, 60));
    (router_for(&state), state)
}

/// Same as [`test_app`] with the sample records loaded.
pub async fn seeded_app() -> (Router, AppState) {
    let (app, state) = test_app();
    server::repo::fir::seed_demo(&state.firs, chrono::Utc::now()).await;
    (app, state)
}

/// The REST router with the permissive auth middleware, as served.
pub fn router_for(state: &AppState) -> Router {
    server::rest::api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state.clone())
}

/// Register a user directly in the store and return a bearer token for them.
/// The password hash is a placeholder; use the auth routes to test login.
pub async fn token_for(state: &AppState, email: &str, role: UserRole) -> String {
    let user = user_repo::create(&state.users, "Test User", email, "unused".into(), role)
        .await
        .expect("Failed to create test user");
    create_access_token(&state.auth, &user.to_auth_user()).expect("Failed to sign token")
}

pub async fn citizen_token(state: &AppState) -> String {
    token_for(state, "citizen@test.com", UserRole::Citizen).await
}

pub async fn responder_token(state: &AppState) -> String {
    token_for(state, "officer@test.com", UserRole::Responder).await
}

/// A filing that passes every wizard rule.
pub fn valid_fir(title: &str) -> Value {
    json!({
        "name": "Priya Sharma",
        "phone": "9876543210",
        "email": "priya@example.com",
        "address": "12 MG Road, Pune",
        "title": title,
        "description": "My phone was stolen from my bag while I was waiting at the crowded bus stop.",
        "date": "2024-02-28",
        "time": "18:45",
        "category": "Theft",
        "location": "Shivajinagar Bus Stand",
        "latitude": 18.5308,
        "longitude": 73.8475
    })
}

/// File an FIR through the API and return the created record.
pub async fn file_fir(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = post_json(app, "/api/fir", &valid_fir(title).to_string(), Some(token)).await;
    assert_eq!(status, StatusCode::CREATED, "filing failed: {body}");
    body
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let req = Request::builder().method(method).uri(uri);
    match token {
        Some(t) => req.header("authorization", format!("Bearer {t}")),
        None => req,
    }
}

pub async fn post_json(app: &Router, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = builder("POST", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

pub async fn patch_json(app: &Router, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = builder("PATCH", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

pub async fn put_json(app: &Router, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = builder("PUT", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = builder("GET", uri, token).body(Body::empty()).unwrap();

    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}

/// Serve the full app on an ephemeral local port and return its base URL.
pub async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    let app = server::openapi::app_router(state, false);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}
