pub mod supabase;
pub mod whatsapp;

use crate::models;
use async_trait::async_trait;

/// Outbound templated messaging provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingService {
    /// Sends `template` to `to`. Never fails as a whole: every failure is
    /// folded into the returned [`DeliveryResult`](models::campaign::DeliveryResult).
    async fn send_template(
        &self,
        to: &str,
        template: &models::campaign::TemplateReference,
    ) -> models::campaign::DeliveryResult;
}

/// Managed authentication and profile storage backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<models::user_app::AuthSession>;

    async fn sign_up(
        &self,
        new_user: &models::user_app::NewUser,
        redirect_to: &str,
    ) -> anyhow::Result<models::user_app::SignUp>;

    async fn insert_user_profile(
        &self,
        profile: &models::user_app::UserProfile,
        access_token: Option<String>,
    ) -> anyhow::Result<()>;

    async fn sign_out(&self, access_token: &str) -> anyhow::Result<()>;

    /// Looks up the user owning `access_token`, fails if the session is gone
    async fn get_user(&self, access_token: &str) -> anyhow::Result<models::user_app::AuthUser>;
}

pub type ImplMessagingService = Box<dyn MessagingService>;
pub type ImplAuthService = Box<dyn AuthService>;
