use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, UserRole};

use super::jwt::Claims;

/// Role constants for [`RoleRequired`].
pub const CITIZEN: u8 = 0;
pub const RESPONDER: u8 = 1;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor that requires authentication AND an exact portal role.
/// Returns 401 if unauthenticated, 403 if the user has the other role.
///
/// Roles do not nest: a responder cannot use citizen endpoints and vice versa.
pub struct RoleRequired<const ROLE: u8>(pub Claims);

impl<const ROLE: u8, S: Send + Sync> FromRequestParts<S> for RoleRequired<ROLE> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let required = match ROLE {
            RESPONDER => UserRole::Responder,
            _ => UserRole::Citizen,
        };

        if claims.role() != required {
            return Err(AppError::forbidden(format!(
                "{} role required",
                required.as_str()
            )));
        }

        Ok(RoleRequired(claims))
    }
}

pub type CitizenOnly = RoleRequired<CITIZEN>;
pub type ResponderOnly = RoleRequired<RESPONDER>;
