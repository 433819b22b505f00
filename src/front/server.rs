//! Handlers not linked to a logged user: policy pages and not found

use ntex::web;
use serde_json::json;

use crate::front::{AppState, WebSettings, errors, utils};

/// Revision dates shown on the policy pages, update them with their content
const TERMS_LAST_UPDATED: &str = "September 27, 2025";
const DATA_DELETION_LAST_UPDATED: &str = "October 4, 2025";

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

fn policy_context(settings: &WebSettings, last_updated: &str) -> tera::Context {
    tera::Context::from_value(json!({
        "contact_email": &settings.policy_contact_email,
        "base_url": &settings.base_url,
        "last_updated": last_updated,
    }))
    .unwrap_or_default()
}

#[web::get("/privacy-policy")]
async fn privacy_policy(
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    utils::render_template(
        "privacy_policy.html",
        &policy_context(&app_state.settings, TERMS_LAST_UPDATED),
    )
}

#[web::get("/terms-of-service")]
async fn terms_of_service(
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    utils::render_template(
        "terms_of_service.html",
        &policy_context(&app_state.settings, TERMS_LAST_UPDATED),
    )
}

/// Instructions to request the deletion of the data held about a person
#[web::get("/data-deletion")]
async fn data_deletion(
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    utils::render_template(
        "data_deletion.html",
        &policy_context(&app_state.settings, DATA_DELETION_LAST_UPDATED),
    )
}
