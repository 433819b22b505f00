//! # WhatsApp Campaign Web Application
//!
//! Main entry point of the staff web app sending approved WhatsApp templates
//! to the phone numbers of an uploaded csv file.
//! Configures SSL, middleware, cryptographic keys, services and route handling.
#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod metric;
pub mod models;
pub mod services;
pub mod utils;

use anyhow::Context;
use csrf::AesGcmCsrfProtection;
use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use ntex_identity::{CookieIdentityPolicy, IdentityService};
use ntex_session::CookieSession;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

/// Outbound clients shared by all the server workers
#[derive(Clone)]
struct ServiceClients {
    auth: services::supabase::SupabaseAuthClient,
    whatsapp: Option<services::whatsapp::WhatsAppClient>,
}

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    config::init_config()?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;

    // Initialize logging and metrics, only exported in prod
    let send_to_logfire = if app_config.is_prod() && !app_config.logfire_token.is_empty() {
        SendToLogfire::Yes
    } else {
        SendToLogfire::No
    };
    let shutdown_handler = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(send_to_logfire)
        .with_token(&app_config.logfire_token)
        .finish()?;

    // Fail fast on a broken template instead of on the first request
    front::templates::load_templates().context("web templates could not be parsed")?;

    let service_clients = create_service_clients(app_config)?;

    // Generate cryptographically secure keys for application security
    // The csrf key is derived from configured password and salt using Argon2
    let csrf_key = utils::build_csrf_key(&app_config.csrf_pass, &app_config.csrf_salt)?;
    let session_key = utils::build_random_csrf_key()?;
    let identity_key = utils::build_random_csrf_key()?;

    // Configure and start the web server
    configure_and_run_server(csrf_key, session_key, identity_key, service_clients).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Builds the outbound clients over a single pooled http client
fn create_service_clients(app_config: &config::AppConfig) -> anyhow::Result<ServiceClients> {
    let http_client = utils::build_http_client()?;

    let whatsapp = app_config.whatsapp_credentials().map(|credentials| {
        services::whatsapp::WhatsAppClient::new(
            http_client.clone(),
            &app_config.whatsapp_graph_api_url,
            &credentials,
        )
    });
    if whatsapp.is_none() {
        logfire::warn!("WhatsApp credentials are not configured, campaigns will be refused");
    }

    Ok(ServiceClients {
        auth: services::supabase::SupabaseAuthClient::new(
            http_client,
            &app_config.supabase_url,
            &app_config.supabase_anon_key,
            &app_config.supabase_users_table,
        ),
        whatsapp,
    })
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(
    csrf_key: [u8; 32],
    service_clients: ServiceClients,
    settings: front::WebSettings,
) -> front::AppState {
    front::AppState {
        csrf_protec: AesGcmCsrfProtection::from_key(csrf_key),
        auth_service: Box::new(service_clients.auth),
        messaging_service: service_clients
            .whatsapp
            .map(|client| Box::new(client) as services::ImplMessagingService),
        settings,
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    csrf_key: [u8; 32],
    session_key: [u8; 32],
    identity_key: [u8; 32],
    service_clients: ServiceClients,
) -> anyhow::Result<()> {
    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    let server_addr = ("0.0.0.0", app_config.web_server_port);
    let settings = front::WebSettings::from(app_config);

    let server = web::server(move || {
        web::App::new()
            .wrap(
                CookieSession::private(&session_key)
                    .secure(app_config.is_prod())
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .name(consts::SESSION_COOKIE_NAME),
            )
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&identity_key)
                    .name(consts::IDENTITY_COOKIE_NAME)
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .secure(app_config.is_prod()),
            ))
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(
                csrf_key,
                service_clients.clone(),
                settings.clone(),
            ))
            .configure(front::routes::body_limits)
            .configure(front::routes::auth)
            .configure(front::routes::campaign)
            .configure(front::routes::policies)
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    logfire::info!(
        "serving on {base_url}",
        base_url = app_config.base_url()
    );

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
