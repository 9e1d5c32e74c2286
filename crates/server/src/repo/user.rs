use shared_types::{AppError, AuthUser, UserRole};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stored account. The password hash never leaves this module.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    password_hash: String,
}

impl UserRecord {
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// In-memory account table plus the set of revoked token ids.
#[derive(Clone, Default)]
pub struct UserStore {
    /// Keyed by lowercased email.
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    revoked: Arc<RwLock<HashSet<String>>>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account. Emails are unique, case-insensitively.
pub async fn create(
    store: &UserStore,
    name: &str,
    email: &str,
    password_hash: String,
    role: UserRole,
) -> Result<UserRecord, AppError> {
    let key = email_key(email);
    let mut users = store.users.write().await;
    if users.contains_key(&key) {
        return Err(AppError::conflict("An account with this email already exists"));
    }
    let record = UserRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        role,
        password_hash,
    };
    users.insert(key, record.clone());
    Ok(record)
}

pub async fn find_by_email(store: &UserStore, email: &str) -> Option<UserRecord> {
    store.users.read().await.get(&email_key(email)).cloned()
}

pub async fn find_by_id(store: &UserStore, id: &str) -> Option<UserRecord> {
    store
        .users
        .read()
        .await
        .values()
        .find(|u| u.id == id)
        .cloned()
}

/// Change an account's name and email. The new email must not belong to
/// another account.
pub async fn update_profile(
    store: &UserStore,
    id: &str,
    name: &str,
    email: &str,
) -> Result<UserRecord, AppError> {
    let new_key = email_key(email);
    let mut users = store.users.write().await;
    let old_key = users
        .iter()
        .find(|(_, u)| u.id == id)
        .map(|(k, _)| k.clone())
        .ok_or_else(|| AppError::not_found("Account not found"))?;
    if new_key != old_key && users.contains_key(&new_key) {
        return Err(AppError::conflict("An account with this email already exists"));
    }
    let mut record = users
        .remove(&old_key)
        .ok_or_else(|| AppError::not_found("Account not found"))?;
    record.name = name.trim().to_string();
    record.email = email.trim().to_string();
    users.insert(new_key, record.clone());
    Ok(record)
}

/// Mark a token id as logged out.
pub async fn revoke(store: &UserStore, jti: &str) {
    store.revoked.write().await.insert(jti.to_string());
}

pub async fn is_revoked(store: &UserStore, jti: &str) -> bool {
    store.revoked.read().await.contains(jti)
}

// ── Demo accounts ───────────────────────────────────────────────────

pub const DEMO_CITIZEN_EMAIL: &str = "citizen@example.com";
pub const DEMO_RESPONDER_EMAIL: &str = "officer@example.com";
pub const DEMO_PASSWORD: &str = "password123";

/// One citizen and one responder, both with [`DEMO_PASSWORD`].
pub async fn seed_demo(store: &UserStore) -> Result<(), AppError> {
    let accounts = [
        ("Demo Citizen", DEMO_CITIZEN_EMAIL, UserRole::Citizen),
        ("Officer Smith", DEMO_RESPONDER_EMAIL, UserRole::Responder),
    ];
    for (name, email, role) in accounts {
        if find_by_email(store, email).await.is_some() {
            continue;
        }
        let hash = crate::auth::password::hash_password_async(DEMO_PASSWORD.to_string()).await?;
        create(store, name, email, hash, role).await?;
    }
    Ok(())
}
