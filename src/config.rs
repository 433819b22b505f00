//! Application configuration management with security considerations.
//!
//! All values come from environment variables (upper-cased field names) and
//! are loaded once at startup by [`init_config`].
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - WhatsApp credentials are optional on purpose: without them the app still
//!   serves uploads and pages, only the send operation is refused

use anyhow::anyhow;
use envconfig::Envconfig;
use std::{sync::OnceLock, time::Duration};

/// Application configuration with security-aware field management.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "localhost")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: CSRF protection password (UUID format)
    pub csrf_pass: String,

    /// 🔒 SENSITIVE: CSRF protection salt (UUID format)
    pub csrf_salt: String,

    /// 🔒 SENSITIVE: Logfire write token, only used in prod
    #[envconfig(default = "")]
    pub logfire_token: String,

    /// Supabase project url (NON-SENSITIVE)
    /// Example: "https://abcdefgh.supabase.co"
    pub supabase_url: String,

    /// Supabase anon key (SEMI-SENSITIVE)
    /// Security: public by design, row level security protects the data
    pub supabase_anon_key: String,

    /// Table receiving the user profile row on sign up (NON-SENSITIVE)
    #[envconfig(default = "users")]
    pub supabase_users_table: String,

    /// 🔒 SENSITIVE: WhatsApp Business access token
    pub whatsapp_access_token: Option<String>,

    /// WhatsApp Business phone number ID (SEMI-SENSITIVE)
    pub whatsapp_phone_number_id: Option<String>,

    /// Graph API base url including the version (NON-SENSITIVE)
    #[envconfig(default = "https://graph.facebook.com/v19.0")]
    pub whatsapp_graph_api_url: String,

    /// Language code of the approved templates (NON-SENSITIVE)
    #[envconfig(default = "en_US")]
    pub whatsapp_template_language: String,

    /// Pause between two consecutive sends, in milliseconds (NON-SENSITIVE)
    #[envconfig(default = "2000")]
    pub whatsapp_send_pacing_ms: u64,

    /// Contact address shown on the policy pages (NON-SENSITIVE)
    #[envconfig(default = "info@amenitybusiness.com")]
    pub policy_contact_email: String,
}

/// Credentials needed to reach the WhatsApp Cloud API
#[derive(Clone, Debug, PartialEq)]
pub struct WhatsAppCredentials {
    pub access_token: String,
    pub phone_number_id: String,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Gets the server URL host with port for non-production environments
    pub fn url_host(&self) -> String {
        if self.is_prod() {
            return self.web_server_host.to_string();
        }

        format!(
            "{host}:{port}",
            host = self.web_server_host,
            port = self.web_server_port
        )
    }

    /// Gets the appropriate protocol (HTTP/HTTPS) based on environment
    pub fn web_server_protocol(&self) -> String {
        if self.is_prod() {
            return "https".into();
        }
        "http".into()
    }

    /// Constructs the complete base URL for the application
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.web_server_protocol(), self.url_host())
    }

    /// Both WhatsApp credentials, or `None` if any of them is missing or blank
    pub fn whatsapp_credentials(&self) -> Option<WhatsAppCredentials> {
        Some(WhatsAppCredentials {
            access_token: non_blank(&self.whatsapp_access_token)?,
            phone_number_id: non_blank(&self.whatsapp_phone_number_id)?,
        })
    }

    pub fn send_pacing(&self) -> Duration {
        Duration::from_millis(self.whatsapp_send_pacing_ms)
    }
}

/// Global application configuration, set once by [`init_config`]
pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Loads the configuration from the environment into [`APP_CONFIG`]
pub fn init_config() -> anyhow::Result<()> {
    let app_config = AppConfig::init_from_env()
        .map_err(|e| anyhow!("failed to load app config from env: {e}"))?;

    APP_CONFIG
        .set(app_config)
        .map_err(|_| anyhow!("app config was already initialized"))
}
