//! Login, sign up and logout of the staff members

use ntex::web;
use ntex_identity::Identity;
use serde_json::json;

use crate::{
    api,
    front::{AppState, forms, middleware, utils},
    models,
};

/// `auth_error` is the auth backend message, shown as is
fn login_context(
    email: &str,
    errors: &api::user::FormErrors,
    auth_error: Option<&str>,
    notice: Option<&str>,
) -> tera::Context {
    tera::Context::from_value(json!({
        "email": email,
        "errors": errors,
        "auth_error": auth_error,
        "notice": notice,
    }))
    .unwrap_or_default()
}

fn sign_up_context(
    full_name: &str,
    email: &str,
    errors: &api::user::FormErrors,
    auth_error: Option<&str>,
) -> tera::Context {
    tera::Context::from_value(json!({
        "full_name": full_name,
        "email": email,
        "errors": errors,
        "auth_error": auth_error,
    }))
    .unwrap_or_default()
}

/// Endpoint to render the login form, logged users go to the dashboard
#[web::get("/login")]
async fn get_login_view(
    logged_user: middleware::logged_user::MaybeLoggedUser,
    q: web::types::Query<forms::user::LoginQuery>,
) -> Result<web::HttpResponse, web::Error> {
    if logged_user.0.is_some() {
        return utils::redirect_to("/");
    }

    let notice = q
        .registered
        .unwrap_or_default()
        .then_some("Account created. Confirm your email if asked to, then log in.");

    utils::render_template(
        "login.html",
        &login_context("", &api::user::FormErrors::new(), None, notice),
    )
}

/// Endpoint to sign in with email and password
#[web::post("/login")]
async fn login(
    form: web::types::Form<forms::user::LoginForm>,
    app_state: web::types::State<AppState>,
    identity: Identity,
    cookie: ntex_session::Session,
) -> Result<web::HttpResponse, web::Error> {
    let form_errors = api::user::validate_login_form(&form.email, &form.password);
    if !form_errors.is_empty() {
        return utils::render_template(
            "login.html",
            &login_context(&form.email, &form_errors, None, None),
        );
    }

    let session = match api::user::sign_in(&app_state.auth_service, &form.email, &form.password).await
    {
        Ok(session) => session,
        Err(e) => {
            logfire::info!("sign in refused: {error}", error = e.to_string());
            return utils::render_template(
                "login.html",
                &login_context(&form.email, &form_errors, Some(&e.to_string()), None),
            );
        }
    };

    middleware::csrf_token::CsrfToken::store_new(&app_state.csrf_protec, &cookie)?;
    identity.remember(serde_json::to_string(&session)?);

    utils::redirect_to("/")
}

/// Endpoint to render the sign up form
#[web::get("/sign-up")]
async fn get_sign_up_view(
    logged_user: middleware::logged_user::MaybeLoggedUser,
) -> Result<web::HttpResponse, web::Error> {
    if logged_user.0.is_some() {
        return utils::redirect_to("/");
    }

    utils::render_template(
        "sign_up.html",
        &sign_up_context("", "", &api::user::FormErrors::new(), None),
    )
}

/// Endpoint to register a new staff member
#[web::post("/sign-up")]
async fn sign_up(
    form: web::types::Form<forms::user::SignUpForm>,
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    let form_errors = api::user::validate_sign_up_form(
        &form.full_name,
        &form.email,
        &form.password,
        &form.confirm_password,
    );
    if !form_errors.is_empty() {
        return utils::render_template(
            "sign_up.html",
            &sign_up_context(&form.full_name, &form.email, &form_errors, None),
        );
    }

    let new_user = models::user_app::NewUser {
        full_name: form.full_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.to_string(),
    };
    let redirect_to = format!("{}/login", app_state.settings.base_url);

    if let Err(e) = api::user::sign_up(&app_state.auth_service, &new_user, &redirect_to).await {
        logfire::info!("sign up refused: {error}", error = e.to_string());
        return utils::render_template(
            "sign_up.html",
            &sign_up_context(
                &form.full_name,
                &form.email,
                &form_errors,
                Some(&e.to_string()),
            ),
        );
    }

    utils::redirect_to("/login?registered=true")
}

/// Endpoint to close the staff session
#[web::post("/logout")]
async fn logout(
    _: middleware::csrf_token::CsrfToken,
    session: models::user_app::AuthSession,
    app_state: web::types::State<AppState>,
    identity: Identity,
    cookie: ntex_session::Session,
) -> Result<web::HttpResponse, web::Error> {
    if let Err(e) = api::user::sign_out(&app_state.auth_service, &session.access_token).await {
        logfire::warn!(
            "session of {user} could not be closed upstream: {error}",
            user = session.user.id.to_string(),
            error = e.to_string()
        );
    }

    identity.forget();
    cookie.clear();

    utils::redirect_to("/login")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_context_keeps_errors() {
        let form_errors = api::user::validate_login_form("ops@example", "");

        let context = login_context(
            "ops@example",
            &form_errors,
            Some("Invalid login credentials"),
            None,
        )
        .into_json();

        assert_eq!(context["email"], "ops@example");
        assert_eq!(context["errors"]["email"], "Please enter a valid email");
        assert_eq!(context["errors"]["password"], "Password is required");
        assert_eq!(context["auth_error"], "Invalid login credentials");
        assert!(context["notice"].is_null());
    }
}
