use serde::{Deserialize, Serialize};

use crate::models::{AuthUser, UserRole};

/// Identity plus the bearer token issued for it. This is what the portal
/// persists between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: AuthUser,
    pub access_token: String,
}

/// Who is logged in. There is at most one identity at a time.
///
/// A session starts in `Initializing` until the persisted identity (if any)
/// has been looked up; guards report "loading" until then.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Initializing,
    Unauthenticated,
    Authenticated(StoredSession),
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish initialization with whatever was found in storage.
    pub fn restore(&mut self, stored: Option<StoredSession>) {
        *self = match stored {
            Some(s) => Session::Authenticated(s),
            None => Session::Unauthenticated,
        };
    }

    /// Replace the current identity.
    pub fn login(&mut self, user: AuthUser, access_token: String) {
        *self = Session::Authenticated(StoredSession { user, access_token });
    }

    pub fn logout(&mut self) {
        *self = Session::Unauthenticated;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Session::Authenticated(s) => Some(&s.user),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Session::Authenticated(s) => Some(&s.access_token),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user().map(|u| u.role)
    }

    pub fn stored(&self) -> Option<&StoredSession> {
        match self {
            Session::Authenticated(s) => Some(s),
            _ => None,
        }
    }
}
