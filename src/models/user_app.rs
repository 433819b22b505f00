use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff member as known by the auth backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl AuthUser {
    /// Name shown in the dashboard header
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Signed in session handed out by the auth backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Data needed to register a new staff member
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Answer of the auth backend to a sign up, the access token is only present
/// when email confirmation is disabled for the project
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub user: AuthUser,
    pub access_token: Option<String>,
}

/// Row stored in the profile table after a sign up
#[derive(Serialize, Debug, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
