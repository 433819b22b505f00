//! Frontend route configuration module.
//!
//! Routes are grouped by functionality, each group is added to the app with
//! `App::configure`.

use super::{auth, campaign, dashboard, server};
use crate::consts;
use ntex::web;

/// Raises the body limits of the `Form` and `Bytes` extractors so a
/// campaign built from a full size csv upload is accepted.
pub fn body_limits(cfg: &mut web::ServiceConfig) {
    cfg.state(web::types::FormConfig::default().limit(consts::FORM_MAX_SIZE_BYTES))
        .state(web::types::PayloadConfig::new(consts::JSON_MAX_SIZE_BYTES));
}

/// Configures the staff authentication routes.
///
/// # Routes
/// - `GET /login` - Login form
/// - `POST /login` - Sign in with email and password
/// - `GET /sign-up` - Sign up form
/// - `POST /sign-up` - Register a new staff member
/// - `POST /logout` - Close the session
pub fn auth(cfg: &mut web::ServiceConfig) {
    cfg.service((
        auth::get_login_view,
        auth::login,
        auth::get_sign_up_view,
        auth::sign_up,
        auth::logout,
    ));
}

/// Configures the campaign routes. All of them need a logged user.
///
/// # Routes
/// - `GET /` - Dashboard
/// - `POST /csv/upload` - Extract the recipients of a csv file
/// - `POST /campaign/send` - Send the template from the dashboard form
/// - `POST /api/send-whatsapp` - Send the template, JSON in and out
pub fn campaign(cfg: &mut web::ServiceConfig) {
    cfg.service((
        dashboard::index,
        dashboard::upload_csv,
        campaign::send_campaign_form,
        campaign::send_whatsapp_api,
    ));
}

/// Configures the public policy pages required by the messaging provider.
///
/// # Routes
/// - `GET /privacy-policy`
/// - `GET /terms-of-service`
/// - `GET /data-deletion`
pub fn policies(cfg: &mut web::ServiceConfig) {
    cfg.service((
        server::privacy_policy,
        server::terms_of_service,
        server::data_deletion,
    ));
}
