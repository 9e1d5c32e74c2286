use shared_types::{
    AppError, AppErrorKind, AuthResponse, AuthUser, LoginRequest, RegisterRequest, Session,
    UpdateProfileRequest,
};

use crate::api::ApiClient;
use crate::session_store::SessionStore;

/// Drives the [`Session`] against the auth API and keeps the on-disk copy
/// in step with it.
pub struct AuthClient {
    api: ApiClient,
    store: SessionStore,
}

impl AuthClient {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// API client authenticated as the current user, if any.
    pub fn authed_api(&self, session: &Session) -> Option<ApiClient> {
        session.access_token().map(|t| self.api.with_token(t))
    }

    /// Leave `Initializing` with whatever identity was stored.
    pub fn restore(&self, session: &mut Session) {
        session.restore(self.store.load());
    }

    pub async fn login(
        &self,
        session: &mut Session,
        request: &LoginRequest,
    ) -> Result<AuthUser, AppError> {
        let response: AuthResponse = self.api.post("/api/auth/login", request).await?;
        let user = self.establish(session, response)?;
        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(user)
    }

    pub async fn register(
        &self,
        session: &mut Session,
        request: &RegisterRequest,
    ) -> Result<AuthUser, AppError> {
        let response: AuthResponse = self.api.post("/api/auth/register", request).await?;
        let user = self.establish(session, response)?;
        tracing::info!(user_id = %user.id, role = %user.role, "Registered and signed in");
        Ok(user)
    }

    /// End the session locally. Revoking the token server-side is best-effort.
    pub async fn logout(&self, session: &mut Session) -> Result<(), AppError> {
        if let Some(api) = self.authed_api(session) {
            if let Err(e) = api.post_empty("/api/auth/logout").await {
                tracing::warn!(error = %e, "Server-side logout failed");
            }
        }
        session.logout();
        self.store.clear()
    }

    /// Save name and email. The server re-issues the token, which replaces
    /// the stored one.
    pub async fn update_profile(
        &self,
        session: &mut Session,
        request: &UpdateProfileRequest,
    ) -> Result<AuthUser, AppError> {
        let api = self
            .authed_api(session)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
        let response: AuthResponse = api.put("/api/auth/profile", request).await?;
        let user = self.establish(session, response)?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Re-read the profile and keep the local copy in step with it. A
    /// rejected token signs the user out.
    pub async fn refresh_profile(&self, session: &mut Session) -> Result<AuthUser, AppError> {
        let (api, token) = match (self.authed_api(session), session.access_token()) {
            (Some(api), Some(token)) => (api, token.to_string()),
            _ => return Err(AppError::unauthorized("Authentication required")),
        };
        match api.get::<AuthUser>("/api/auth/profile").await {
            Ok(user) => self.establish(session, AuthResponse { user, access_token: token }),
            Err(e) if e.kind == AppErrorKind::Unauthorized => {
                tracing::info!("Stored token rejected, signing out");
                session.logout();
                self.store.clear()?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Make `response` the current identity and persist it.
    fn establish(&self, session: &mut Session, response: AuthResponse) -> Result<AuthUser, AppError> {
        let AuthResponse { user, access_token } = response;
        session.login(user.clone(), access_token);
        if let Some(stored) = session.stored() {
            self.store.save(stored)?;
        }
        Ok(user)
    }
}
