use axum::extract::FromRef;
use chrono::Utc;
use shared_types::{AppError, ServerSettings};
use std::sync::Arc;

use crate::auth::jwt::AuthKeys;
use crate::repo::{fir::FirStore, user::UserStore};

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract just the store they need.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub firs: FirStore,
    pub users: UserStore,
    pub auth: AuthKeys,
    pub settings: Arc<ServerSettings>,
}

impl AppState {
    /// Empty stores.
    pub fn new(settings: ServerSettings, auth: AuthKeys) -> Self {
        Self {
            firs: FirStore::default(),
            users: UserStore::default(),
            auth,
            settings: Arc::new(settings),
        }
    }

    /// Load the sample FIRs and the two demo accounts.
    pub async fn seed_demo(&self) -> Result<(), AppError> {
        let seeded = crate::repo::fir::seed_demo(&self.firs, Utc::now()).await;
        crate::repo::user::seed_demo(&self.users).await?;
        tracing::info!(records = seeded, "Seeded demo data");
        Ok(())
    }
}
