//! Dashboard of the logged staff: recipients upload and campaign form

use anyhow::bail;
use futures::TryStreamExt;
use ntex::web;
use ntex_identity::Identity;
use serde_json::json;

use crate::{
    api, consts,
    front::{AppState, WebSettings, errors, middleware, utils},
    metric,
    models::{recipients::CsvExtraction, user_app::AuthSession},
};

fn dashboard_context(
    session: &AuthSession,
    settings: &WebSettings,
    messaging_configured: bool,
    extraction: Option<&CsvExtraction>,
) -> tera::Context {
    let extraction = extraction.map(|extraction| {
        let preview_len = extraction.rows.len().min(consts::CSV_PREVIEW_ROWS);
        json!({
            "summary": extraction.summary(),
            "total_rows": extraction.rows.len(),
            "preview_count": preview_len,
            "rows_preview": &extraction.rows[..preview_len],
            "rows_rest": &extraction.rows[preview_len..],
            "recipients_count": extraction.recipients.len(),
            "recipients_text": extraction.recipients.join("\n"),
        })
    });

    tera::Context::from_value(json!({
        "user_name": session.user.display_name(),
        "user_email": &session.user.email,
        "default_template_name": consts::DEFAULT_TEMPLATE_NAME,
        "template_language": &settings.template_language,
        "messaging_configured": messaging_configured,
        "extraction": extraction,
    }))
    .unwrap_or_default()
}

/// Reads the uploaded csv file out of the multipart form
async fn read_csv_upload(mut payload: ntex_multipart::Multipart) -> anyhow::Result<Vec<u8>> {
    while let Some(field) = payload
        .try_next()
        .await
        .map_err(|e| anyhow::anyhow!("the upload could not be read: {e}"))?
    {
        let content_disposition =
            utils::get_header_str_value(field.headers(), "content-disposition");

        if utils::get_field_name(&content_disposition) != Some(consts::CSV_FILE_FIELD) {
            continue;
        }

        let extension = utils::get_filename_extension(&content_disposition)?;
        if !consts::ACCEPTED_CSV_EXTENSIONS.contains(&extension.as_str()) {
            bail!("only .csv files are accepted, got .{extension}");
        }

        return utils::get_bytes_value(field, consts::CSV_MAX_SIZE_BYTES).await;
    }

    bail!("no csv file was uploaded")
}

/// Endpoint to render the dashboard, anonymous visitors go to the login form
#[web::get("/")]
async fn index(
    logged_user: middleware::logged_user::MaybeLoggedUser,
    app_state: web::types::State<AppState>,
    identity: Identity,
) -> Result<web::HttpResponse, web::Error> {
    let Some(session) = logged_user.0 else {
        return utils::redirect_to("/login");
    };

    if !api::user::is_session_alive(&app_state.auth_service, &session).await {
        identity.forget();
        return utils::redirect_to("/login");
    }

    utils::render_template(
        "dashboard.html",
        &dashboard_context(
            &session,
            &app_state.settings,
            app_state.messaging_service.is_some(),
            None,
        ),
    )
}

/// Endpoint to extract the recipients of an uploaded csv file.
///
/// Nothing is stored: the parsed rows are rendered back and the phone
/// numbers travel with the campaign form.
#[web::post("/csv/upload")]
async fn upload_csv(
    _: middleware::csrf_token::CsrfToken,
    session: AuthSession,
    app_state: web::types::State<AppState>,
    payload: ntex_multipart::Multipart,
) -> Result<web::HttpResponse, web::Error> {
    let body = read_csv_upload(payload)
        .await
        .map_err(|e| errors::UserError::FormInputValueError(e.to_string()))?;

    let extraction = api::recipients::extract_recipients(body.as_slice()).map_err(|e| {
        metric::incr_csv_import_statds("failed");
        errors::UserError::CsvParseError(format!("{e:#}"))
    })?;

    metric::incr_csv_import_statds("parsed");
    logfire::info!(
        "csv uploaded by {user}: {summary}",
        user = session.user.id.to_string(),
        summary = extraction.summary()
    );

    utils::render_template(
        "dashboard.html",
        &dashboard_context(
            &session,
            &app_state.settings,
            app_state.messaging_service.is_some(),
            Some(&extraction),
        ),
    )
}
