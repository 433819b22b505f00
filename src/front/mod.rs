pub mod auth;
pub mod campaign;
pub mod dashboard;
pub mod errors;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod templates;
pub mod utils;

use std::time::Duration;

use crate::{config, services};
use csrf::AesGcmCsrfProtection;

/// Values of the [AppConfig](config::AppConfig) the handlers need
#[derive(Clone, Debug)]
pub struct WebSettings {
    pub base_url: String,
    pub policy_contact_email: String,
    pub template_language: String,
    pub send_pacing: Duration,
}

impl From<&config::AppConfig> for WebSettings {
    fn from(app_config: &config::AppConfig) -> Self {
        Self {
            base_url: app_config.base_url(),
            policy_contact_email: app_config.policy_contact_email.to_string(),
            template_language: app_config.whatsapp_template_language.to_string(),
            send_pacing: app_config.send_pacing(),
        }
    }
}

pub struct AppState {
    pub csrf_protec: AesGcmCsrfProtection,
    pub auth_service: services::ImplAuthService,
    /// `None` when the WhatsApp credentials are not configured
    pub messaging_service: Option<services::ImplMessagingService>,
    pub settings: WebSettings,
}
