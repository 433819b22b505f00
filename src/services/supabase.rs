//! # Supabase Client
//!
//! Talks to the Supabase auth (GoTrue) and REST (PostgREST) endpoints of a
//! project. The client is built once at startup and shared through the app
//! state.

use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::models::user_app::{AuthSession, AuthUser, NewUser, SignUp, UserProfile};

#[derive(Clone)]
pub struct SupabaseAuthClient {
    client: reqwest::Client,
    /// Project url, e.g. "https://abcdefgh.supabase.co"
    base_url: String,
    anon_key: String,
    users_table: String,
}

#[derive(Debug, Deserialize, Default)]
struct UserMetadata {
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        Self {
            id: user.id,
            email: user.email.unwrap_or_default(),
            full_name: user.user_metadata.and_then(|m| m.full_name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    expires_in: i64,
    user: GoTrueUser,
}

impl From<GoTrueSession> for AuthSession {
    fn from(session: GoTrueSession) -> Self {
        Self {
            user: session.user.into(),
            access_token: session.access_token,
            expires_at: Utc::now() + Duration::seconds(session.expires_in),
        }
    }
}

/// The signup endpoint answers a session when email confirmation is
/// disabled, and the bare user otherwise
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GoTrueSignUp {
    Session(GoTrueSession),
    User(GoTrueUser),
}

/// Extracts the human readable message of a GoTrue/PostgREST error body
pub fn auth_error_message(body: &str) -> String {
    let value = serde_json::from_str::<serde_json::Value>(body).unwrap_or_default();

    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "unknown error from auth backend".to_string()
            } else {
                body.to_string()
            }
        })
}

impl SupabaseAuthClient {
    pub fn new(client: reqwest::Client, base_url: &str, anon_key: &str, users_table: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            users_table: users_table.to_string(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Returns the body of a successful response, or the backend message as error
    async fn read_body(response: reqwest::Response) -> anyhow::Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read auth backend response")?;

        if !status.is_success() {
            bail!("{}", auth_error_message(&body));
        }

        Ok(body)
    }
}

#[async_trait]
impl crate::services::AuthService for SupabaseAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<AuthSession> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .context("failed to reach auth backend")?;

        let body = Self::read_body(response).await?;
        let session: GoTrueSession =
            serde_json::from_str(&body).context("failed to parse sign in session")?;

        Ok(session.into())
    }

    async fn sign_up(&self, new_user: &NewUser, redirect_to: &str) -> anyhow::Result<SignUp> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": new_user.email,
                "password": new_user.password,
                "data": {"full_name": new_user.full_name},
            }))
            .send()
            .await
            .context("failed to reach auth backend")?;

        let body = Self::read_body(response).await?;
        let sign_up = match serde_json::from_str::<GoTrueSignUp>(&body)
            .context("failed to parse sign up response")?
        {
            GoTrueSignUp::Session(session) => SignUp {
                access_token: Some(session.access_token),
                user: session.user.into(),
            },
            GoTrueSignUp::User(user) => SignUp {
                user: user.into(),
                access_token: None,
            },
        };

        Ok(sign_up)
    }

    async fn insert_user_profile(
        &self,
        profile: &UserProfile,
        access_token: Option<String>,
    ) -> anyhow::Result<()> {
        let bearer = access_token.unwrap_or_else(|| self.anon_key.to_string());

        let response = self
            .client
            .post(self.rest_url(&self.users_table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(bearer)
            .json(&[profile])
            .send()
            .await
            .context("failed to reach profile table")?;

        Self::read_body(response).await.map(|_| ())
    }

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("failed to reach auth backend")?;

        Self::read_body(response).await.map(|_| ())
    }

    async fn get_user(&self, access_token: &str) -> anyhow::Result<AuthUser> {
        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("failed to reach auth backend")?;

        let body = Self::read_body(response).await?;
        let user: GoTrueUser = serde_json::from_str(&body).context("failed to parse user")?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = SupabaseAuthClient::new(
            reqwest::Client::new(),
            "https://project.supabase.co/",
            "anon",
            "users",
        );

        assert_eq!(
            client.auth_url("token"),
            "https://project.supabase.co/auth/v1/token"
        );
        assert_eq!(
            client.rest_url("users"),
            "https://project.supabase.co/rest/v1/users"
        );
    }

    #[test]
    fn test_auth_error_message() {
        assert_eq!(
            auth_error_message(r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            auth_error_message(r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#),
            "Email not confirmed"
        );
        assert_eq!(
            auth_error_message(r#"{"message":"duplicate key value violates unique constraint"}"#),
            "duplicate key value violates unique constraint"
        );
        assert_eq!(auth_error_message("upstream timeout"), "upstream timeout");
        assert_eq!(auth_error_message(""), "unknown error from auth backend");
    }

    #[test]
    fn test_session_conversion() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": "8d0f", "email": "ops@example.com", "user_metadata": {"full_name": "Ops"}}
        }"#;

        let session: AuthSession = serde_json::from_str::<GoTrueSession>(body).unwrap().into();

        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.full_name.as_deref(), Some("Ops"));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_sign_up_answers() {
        let unconfirmed = r#"{"id": "8d0f", "email": "ops@example.com", "user_metadata": {}}"#;
        assert!(matches!(
            serde_json::from_str::<GoTrueSignUp>(unconfirmed).unwrap(),
            GoTrueSignUp::User(_)
        ));

        let confirmed = r#"{"access_token": "jwt", "expires_in": 3600, "user": {"id": "8d0f"}}"#;
        assert!(matches!(
            serde_json::from_str::<GoTrueSignUp>(confirmed).unwrap(),
            GoTrueSignUp::Session(_)
        ));
    }
}
