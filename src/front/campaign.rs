//! Campaign sends, from the dashboard form and from the JSON API

use ntex::{util::Bytes, web};
use serde_json::json;

use crate::{
    api::{self, campaign::CampaignError},
    front::{AppState, errors, forms, middleware, utils},
    models::{
        self,
        campaign::{CampaignSummary, SendOutcome},
    },
};

impl From<CampaignError> for errors::ApiError {
    fn from(error: CampaignError) -> Self {
        if error.is_validation_error() {
            return errors::ApiError::Validation(error.to_string());
        }

        errors::ApiError::Configuration(error.to_string())
    }
}

fn campaign_error_page(error: CampaignError) -> web::Error {
    if error.is_validation_error() {
        return errors::UserError::FormInputValueError(error.to_string()).into();
    }

    errors::ServerError::MissingConfiguration(error.to_string()).into()
}

fn results_context(template_name: &str, outcomes: &[SendOutcome]) -> tera::Context {
    let rows = outcomes
        .iter()
        .map(|outcome| {
            json!({
                "to": &outcome.to,
                "status": outcome.result.to_string(),
                "accepted": outcome.result.is_accepted(),
                "detail": outcome.result.detail(),
            })
        })
        .collect::<Vec<_>>();

    tera::Context::from_value(json!({
        "template_name": template_name,
        "summary": CampaignSummary::from_outcomes(outcomes),
        "outcomes": rows,
    }))
    .unwrap_or_default()
}

/// Endpoint to send the template to the recipients of the dashboard form.
///
/// The page is rendered once every recipient was attempted.
#[web::post("/campaign/send")]
async fn send_campaign_form(
    _: middleware::csrf_token::CsrfToken,
    session: models::user_app::AuthSession,
    form: web::types::Form<forms::campaign::CampaignForm>,
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    let template = form.template(&app_state.settings.template_language);

    logfire::info!(
        "campaign {template} started by {user}",
        template = template.name.to_string(),
        user = session.user.id.to_string()
    );

    let outcomes = api::campaign::send_campaign(
        app_state.messaging_service.as_ref(),
        &form.recipients(),
        &template,
        app_state.settings.send_pacing,
    )
    .await
    .map_err(campaign_error_page)?;

    utils::render_template(
        "campaign_results.html",
        &results_context(&template.name, &outcomes),
    )
}

/// JSON endpoint to send a template to a list of numbers.
///
/// The body is parsed here so a malformed one gets the same `{"error"}`
/// answer as the other validation failures.
#[web::post("/api/send-whatsapp")]
async fn send_whatsapp_api(
    logged_user: middleware::logged_user::MaybeLoggedUser,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    let Some(session) = logged_user.0 else {
        return Err(errors::ApiError::Unauthorized.into());
    };

    let request = serde_json::from_slice::<forms::campaign::SendCampaignRequest>(&body)
        .map_err(|e| errors::ApiError::Validation(format!("Invalid request body: {e}")))?;
    let template = request.template(&app_state.settings.template_language);

    logfire::info!(
        "api campaign {template} started by {user}",
        template = template.name.to_string(),
        user = session.user.id.to_string()
    );

    let outcomes = api::campaign::send_campaign(
        app_state.messaging_service.as_ref(),
        &request.recipients(),
        &template,
        app_state.settings.send_pacing,
    )
    .await
    .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "success": true,
        "results": outcomes,
    })))
}
