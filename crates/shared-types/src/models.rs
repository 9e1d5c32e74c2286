use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Portal role. Responders are the police officers who manage FIRs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Citizen,
    #[serde(alias = "police")]
    Responder,
}

impl UserRole {
    /// Parse from a JWT `role` claim or form value. Unknown values default to Citizen.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "responder" | "police" => UserRole::Responder,
            _ => UserRole::Citizen,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "citizen",
            UserRole::Responder => "responder",
        }
    }

    /// Label shown next to the user's name in the navigation shell.
    pub fn display_label(&self) -> &'static str {
        match self {
            UserRole::Citizen => "Citizen",
            UserRole::Responder => "Police Officer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated identity (safe to send to the client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Login request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register request. `role` defaults to citizen when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password should be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Profile edit. Role and password are not editable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
}

/// Response returned after successful authentication (login, register or
/// a profile edit, which re-issues the token).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub user: AuthUser,
    pub access_token: String,
}

/// An officer that FIRs can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Officer {
    pub id: u32,
    pub name: String,
}
