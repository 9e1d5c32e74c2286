//! The portal's HTTP client against a live server on a local port.

use pretty_assertions::assert_eq;
use shared_types::{
    AppErrorKind, FirDraft, FirSearchParams, FirStatus, LoginRequest, RegisterRequest, Session,
    UpdateProfileRequest, UserRole,
};

use portal::api::ApiClient;
use portal::auth::AuthClient;
use portal::session_store::SessionStore;
use portal::tracking::StatusTracker;
use portal::{HttpBackend, RecordBackend};

use crate::common::{spawn_server, test_app};

fn draft() -> FirDraft {
    FirDraft {
        name: "Priya Sharma".into(),
        phone: "9876543210".into(),
        email: "priya@example.com".into(),
        address: "12 MG Road, Pune".into(),
        title: "Laptop stolen from car".into(),
        description: "Someone broke the rear window of my car and stole the laptop bag from the seat."
            .into(),
        date: "2024-02-28".into(),
        time: "21:10".into(),
        category: "Theft".into(),
        location: "FC Road".into(),
        latitude: Some(18.5236),
        longitude: Some(73.8414),
        ..FirDraft::default()
    }
}

fn register_request(email: &str, role: UserRole) -> RegisterRequest {
    RegisterRequest {
        name: "Test Person".into(),
        email: email.into(),
        password: "password123".into(),
        role,
    }
}

#[tokio::test]
async fn register_persists_session_and_files_a_record() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let client = AuthClient::new(ApiClient::new(&base), store.clone());

    let mut session = Session::new();
    client.restore(&mut session);
    assert!(!session.is_authenticated());

    let user = client
        .register(&mut session, &register_request("priya@test.com", UserRole::Citizen))
        .await
        .unwrap();
    assert_eq!(user.role, UserRole::Citizen);
    assert_eq!(store.load().unwrap().user, user);

    let backend = HttpBackend::new(client.authed_api(&session).unwrap());
    let receipt = backend.create_record(draft()).await.unwrap();
    assert_eq!(receipt.id, "FIR00001");
    assert_eq!(receipt.status, FirStatus::Pending);
}

#[tokio::test]
async fn restored_session_survives_a_restart() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let first = AuthClient::new(ApiClient::new(&base), SessionStore::new(&path));
    let mut session = Session::new();
    first
        .register(&mut session, &register_request("cop@test.com", UserRole::Responder))
        .await
        .unwrap();

    let second = AuthClient::new(ApiClient::new(&base), SessionStore::new(&path));
    let mut restored = Session::new();
    second.restore(&mut restored);
    assert_eq!(restored.role(), Some(UserRole::Responder));

    let profile = second.refresh_profile(&mut restored).await.unwrap();
    assert_eq!(profile.email, "cop@test.com");
}

#[tokio::test]
async fn logout_clears_the_store_and_revokes_the_token() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let client = AuthClient::new(ApiClient::new(&base), store.clone());

    let mut session = Session::new();
    client
        .register(&mut session, &register_request("bye@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let old_api = client.authed_api(&session).unwrap();

    client.logout(&mut session).await.unwrap();

    assert!(!session.is_authenticated());
    assert!(store.load().is_none());
    let err = old_api
        .get::<shared_types::AuthUser>("/api/auth/profile")
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Unauthorized);
}

#[tokio::test]
async fn rejected_token_signs_the_user_out() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let client = AuthClient::new(ApiClient::new(&base), store.clone());

    let mut session = Session::new();
    session.login(
        shared_types::AuthUser {
            id: "ghost".into(),
            name: "Ghost".into(),
            email: "ghost@test.com".into(),
            role: UserRole::Citizen,
        },
        "forged-token".into(),
    );

    let err = client.refresh_profile(&mut session).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Unauthorized);
    assert!(!session.is_authenticated());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn bad_login_surfaces_the_server_message() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let client = AuthClient::new(ApiClient::new(&base), SessionStore::new(dir.path().join("s.json")));

    let mut session = Session::new();
    let err = client
        .login(
            &mut session,
            &LoginRequest {
                email: "nobody@test.com".into(),
                password: "password123".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Unauthorized);
    assert_eq!(err.message, "Invalid email or password");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn responder_manages_records_over_http() {
    let (_app, state) = test_app();
    state.seed_demo().await.unwrap();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let client = AuthClient::new(ApiClient::new(&base), SessionStore::new(dir.path().join("s.json")));

    let mut session = Session::new();
    client
        .login(
            &mut session,
            &LoginRequest {
                email: server::repo::user::DEMO_RESPONDER_EMAIL.into(),
                password: server::repo::user::DEMO_PASSWORD.into(),
            },
        )
        .await
        .unwrap();
    let backend = HttpBackend::new(client.authed_api(&session).unwrap());

    let params = FirSearchParams {
        q: Some("central park".into()),
        ..FirSearchParams::default()
    };
    let page = backend.list_records(&params).await.unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].id, "FIR00123");

    let updated = backend
        .update_status("FIR00123", FirStatus::Resolved, Some("Phone recovered".into()))
        .await
        .unwrap();
    assert_eq!(updated.status, FirStatus::Resolved);

    let assigned = backend
        .assign_officer("FIR00124", Some("Officer Johnson".into()))
        .await
        .unwrap();
    assert_eq!(assigned.assigned_officer.as_deref(), Some("Officer Johnson"));

    let officers = backend.list_officers().await.unwrap();
    assert_eq!(officers.len(), 2);

    let err = backend.get_record("FIR00999").await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotFound);
}

#[tokio::test]
async fn citizen_cannot_use_responder_endpoints() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let client = AuthClient::new(ApiClient::new(&base), SessionStore::new(dir.path().join("s.json")));

    let mut session = Session::new();
    client
        .register(&mut session, &register_request("c@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let backend = HttpBackend::new(client.authed_api(&session).unwrap());

    let err = backend.list_records(&FirSearchParams::default()).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Forbidden);
}

#[tokio::test]
async fn profile_update_replaces_the_stored_identity() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let client = AuthClient::new(ApiClient::new(&base), store.clone());

    let mut session = Session::new();
    client
        .register(&mut session, &register_request("old@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let old_api = client.authed_api(&session).unwrap();

    let user = client
        .update_profile(
            &mut session,
            &UpdateProfileRequest {
                name: "Asha Rao".into(),
                email: "asha@test.com".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(user.name, "Asha Rao");
    assert_eq!(session.user(), Some(&user));
    let stored = store.load().unwrap();
    assert_eq!(stored.user, user);
    assert_eq!(Some(stored.access_token.as_str()), session.access_token());

    let profile = client.refresh_profile(&mut session).await.unwrap();
    assert_eq!(profile.email, "asha@test.com");

    let err = old_api
        .get::<shared_types::AuthUser>("/api/auth/profile")
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Unauthorized);
}

#[tokio::test]
async fn invalid_profile_update_keeps_the_session() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let client = AuthClient::new(ApiClient::new(&base), store.clone());

    let mut session = Session::new();
    client
        .register(&mut session, &register_request("keep@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let before = store.load().unwrap();

    let err = client
        .update_profile(
            &mut session,
            &UpdateProfileRequest {
                name: "Keep".into(),
                email: "not-an-email".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::ValidationError);
    assert!(err.field_errors.contains_key("email"));
    assert_eq!(store.load().unwrap(), before);
    assert_eq!(session.user(), Some(&before.user));
}

#[tokio::test]
async fn refreshed_profile_is_written_back() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();
    let laptop_store = SessionStore::new(dir.path().join("laptop.json"));
    let laptop = AuthClient::new(ApiClient::new(&base), laptop_store.clone());
    let phone = AuthClient::new(ApiClient::new(&base), SessionStore::new(dir.path().join("phone.json")));

    let mut on_laptop = Session::new();
    laptop
        .register(&mut on_laptop, &register_request("two@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let mut on_phone = Session::new();
    phone
        .login(
            &mut on_phone,
            &LoginRequest {
                email: "two@test.com".into(),
                password: "password123".into(),
            },
        )
        .await
        .unwrap();
    phone
        .update_profile(
            &mut on_phone,
            &UpdateProfileRequest {
                name: "Renamed".into(),
                email: "two@test.com".into(),
            },
        )
        .await
        .unwrap();

    let token_before = on_laptop.access_token().map(str::to_string);
    laptop.refresh_profile(&mut on_laptop).await.unwrap();

    assert_eq!(on_laptop.user().map(|u| u.name.as_str()), Some("Renamed"));
    assert_eq!(on_laptop.access_token().map(str::to_string), token_before);
    assert_eq!(laptop_store.load().unwrap().user.name, "Renamed");
}

#[tokio::test]
async fn citizen_tracks_own_records() {
    let (_app, state) = test_app();
    let base = spawn_server(state).await;
    let dir = tempfile::tempdir().unwrap();

    let mine = AuthClient::new(ApiClient::new(&base), SessionStore::new(dir.path().join("a.json")));
    let mut me = Session::new();
    mine.register(&mut me, &register_request("me@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let my_backend = HttpBackend::new(mine.authed_api(&me).unwrap());

    let other = AuthClient::new(ApiClient::new(&base), SessionStore::new(dir.path().join("b.json")));
    let mut them = Session::new();
    other
        .register(&mut them, &register_request("them@test.com", UserRole::Citizen))
        .await
        .unwrap();
    let their_backend = HttpBackend::new(other.authed_api(&them).unwrap());

    let theft = my_backend.create_record(draft()).await.unwrap();
    let theirs = their_backend.create_record(draft()).await.unwrap();
    let mut cyber = draft();
    cyber.title = "Bank account hacked".into();
    cyber.category = "Cybercrime".into();
    let cyber = my_backend.create_record(cyber).await.unwrap();

    let mut tracker = StatusTracker::new(my_backend);
    tracker.load().await.unwrap();
    let ids: Vec<&str> = tracker.visible().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![theft.id.as_str(), cyber.id.as_str()]);

    tracker.search("cyber");
    let ids: Vec<&str> = tracker.visible().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![cyber.id.as_str()]);

    tracker.search("laptop");
    assert_eq!(tracker.visible().len(), 1);

    let opened = tracker.open(&theft.id).await.unwrap();
    assert_eq!(opened.status, FirStatus::Pending);
    assert_eq!(tracker.expanded().map(|r| r.id.as_str()), Some(theft.id.as_str()));

    let err = tracker.open(&theirs.id).await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotFound);
    assert!(tracker.banner().is_some());
}
