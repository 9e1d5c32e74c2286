use axum::{extract::State, http::StatusCode, Json};

use shared_types::{
    AppError, AuthResponse, AuthUser, LoginRequest, RegisterRequest, UpdateProfileRequest,
};

use crate::auth::extractors::AuthRequired;
use crate::auth::jwt::{self, AuthKeys};
use crate::auth::password;
use crate::error_convert::ValidateRequest;
use crate::repo::user::{self as user_repo, UserStore};

fn issue_token(keys: &AuthKeys, user: AuthUser) -> Result<AuthResponse, AppError> {
    let access_token =
        jwt::create_access_token(keys, &user).map_err(|e| AppError::internal(e.to_string()))?;
    Ok(AuthResponse { user, access_token })
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(users, keys, payload), fields(email = %payload.email))]
pub async fn register(
    State(users): State<UserStore>,
    State(keys): State<AuthKeys>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate_request()?;

    let password_hash = password::hash_password_async(payload.password).await?;
    let user = user_repo::create(&users, &payload.name, &payload.email, password_hash, payload.role)
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Account registered");
    let response = issue_token(&keys, user.to_auth_user())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(users, keys, payload), fields(email = %payload.email))]
pub async fn login(
    State(users): State<UserStore>,
    State(keys): State<AuthKeys>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate_request()?;

    let invalid = || AppError::unauthorized("Invalid email or password");
    let user = user_repo::find_by_email(&users, &payload.email)
        .await
        .ok_or_else(invalid)?;

    let valid =
        password::verify_password_async(payload.password, user.password_hash().to_string()).await?;
    if !valid {
        tracing::warn!("Failed login attempt");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "Logged in");
    Ok(Json(issue_token(&keys, user.to_auth_user())?))
}

/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(users, auth))]
pub async fn logout(
    State(users): State<UserStore>,
    auth: AuthRequired,
) -> Result<StatusCode, AppError> {
    if let Some(jti) = &auth.0.jti {
        user_repo::revoke(&users, jti).await;
    }
    tracing::info!(user_id = %auth.0.sub, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = AuthUser),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(users, auth))]
pub async fn profile(
    State(users): State<UserStore>,
    auth: AuthRequired,
) -> Result<Json<AuthUser>, AppError> {
    let user = user_repo::find_by_id(&users, &auth.0.sub)
        .await
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;
    Ok(Json(user.to_auth_user()))
}

/// PUT /api/auth/profile
///
/// The token carries the name and email, so a fresh one is issued and the
/// old one revoked.
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated, token re-issued", body = AuthResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(users, keys, auth, payload))]
pub async fn update_profile(
    State(users): State<UserStore>,
    State(keys): State<AuthKeys>,
    auth: AuthRequired,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate_request()?;

    let user = user_repo::update_profile(&users, &auth.0.sub, &payload.name, &payload.email).await?;
    if let Some(jti) = &auth.0.jti {
        user_repo::revoke(&users, jti).await;
    }

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(Json(issue_token(&keys, user.to_auth_user())?))
}
