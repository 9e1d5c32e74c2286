use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use super::jwt::validate_access_token;
use crate::repo::user as user_repo;
use crate::state::AppState;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Permissive auth middleware.
///
/// Validates the bearer token (signature, expiry, not revoked by logout) and
/// inserts its `Claims` into the request extensions. Does NOT reject
/// unauthenticated requests; downstream extractors decide authorization.
pub async fn auth_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = extract_bearer_token(req.headers()) {
        match validate_access_token(&state.auth, &token) {
            Ok(claims) => {
                let revoked = match &claims.jti {
                    Some(jti) => user_repo::is_revoked(&state.users, jti).await,
                    None => false,
                };
                if revoked {
                    tracing::debug!(user_id = %claims.sub, "Rejected revoked token");
                } else {
                    req.extensions_mut().insert(claims);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }

    next.run(req).await
}
