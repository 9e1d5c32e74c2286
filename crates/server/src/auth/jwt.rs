use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_types::{AuthUser, UserRole};
use std::sync::Arc;

/// JWT claims stored in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier, used to revoke a token on logout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn role(&self) -> UserRole {
        UserRole::from_str_or_default(&self.role)
    }

    pub fn user(&self) -> AuthUser {
        AuthUser {
            id: self.sub.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role(),
        }
    }
}

/// Signing secret and token lifetime.
#[derive(Clone)]
pub struct AuthKeys {
    secret: Arc<str>,
    pub expiry_minutes: i64,
}

impl AuthKeys {
    pub fn new(secret: impl Into<Arc<str>>, expiry_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_minutes,
        }
    }

    /// Read `JWT_SECRET`. Without it a random per-process secret is used, so
    /// every token dies with the process.
    pub fn from_env(expiry_minutes: i64) -> Self {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Self::new(secret, expiry_minutes),
            _ => {
                tracing::warn!("JWT_SECRET not set, using an ephemeral signing secret");
                Self::new(uuid::Uuid::new_v4().to_string(), expiry_minutes)
            }
        }
    }
}

pub fn create_access_token(
    keys: &AuthKeys,
    user: &AuthUser,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(keys.expiry_minutes)).timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(keys.secret.as_bytes()),
    )
}

pub fn validate_access_token(
    keys: &AuthKeys,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(keys.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
