//! # User API Module
//!
//! Staff authentication: form validation and the calls to the auth backend
//! for sign in, sign up and sign out.

use std::{collections::BTreeMap, sync::LazyLock};

use chrono::Utc;
use regex::Regex;

use crate::{consts, metric, models, services};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Invalid form fields, keyed by the form field name
pub type FormErrors = BTreeMap<&'static str, &'static str>;

fn validate_email(email: &str, errors: &mut FormErrors) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !EMAIL_REGEX.is_match(email) {
        errors.insert("email", "Please enter a valid email");
    }
}

/// Validates the login form before calling the auth backend
pub fn validate_login_form(email: &str, password: &str) -> FormErrors {
    let mut errors = FormErrors::new();

    validate_email(email, &mut errors);
    if password.is_empty() {
        errors.insert("password", "Password is required");
    }

    errors
}

/// Validates the sign up form before calling the auth backend
pub fn validate_sign_up_form(
    full_name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> FormErrors {
    let mut errors = FormErrors::new();

    if full_name.trim().is_empty() {
        errors.insert("full_name", "Name is required");
    }

    validate_email(email, &mut errors);

    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.chars().count() < consts::MIN_PASSWORD_LENGTH {
        errors.insert("password", "Password must be at least 6 characters");
    }

    if confirm_password.is_empty() {
        errors.insert("confirm_password", "Please confirm your password");
    } else if password != confirm_password {
        errors.insert("confirm_password", "Passwords do not match");
    }

    errors
}

/// Signs in a staff member with email and password
pub async fn sign_in(
    auth_service: &services::ImplAuthService,
    email: &str,
    password: &str,
) -> anyhow::Result<models::user_app::AuthSession> {
    let session = auth_service.sign_in(email.trim(), password).await?;

    metric::incr_user_action_statds("sign_in");
    Ok(session)
}

/// Registers a new staff member and stores its profile row.
///
/// The profile row is best effort: the auth user already exists when its
/// insert fails, so the failure is only logged.
///
/// # Arguments
/// * `auth_service` - Auth backend
/// * `new_user` - Validated sign up form values
/// * `redirect_to` - Where the confirmation email should send the user back
pub async fn sign_up(
    auth_service: &services::ImplAuthService,
    new_user: &models::user_app::NewUser,
    redirect_to: &str,
) -> anyhow::Result<models::user_app::AuthUser> {
    let sign_up = auth_service.sign_up(new_user, redirect_to).await?;

    let profile = models::user_app::UserProfile {
        id: sign_up.user.id.to_string(),
        full_name: new_user.full_name.to_string(),
        email: new_user.email.to_string(),
        created_at: Utc::now(),
    };

    if let Err(e) = auth_service
        .insert_user_profile(&profile, sign_up.access_token)
        .await
    {
        logfire::error!(
            "user profile {id} could not be inserted: {error}",
            id = profile.id.to_string(),
            error = e.to_string()
        );
    }

    metric::incr_user_action_statds("sign_up");
    Ok(sign_up.user)
}

/// Closes the session on the auth backend
pub async fn sign_out(
    auth_service: &services::ImplAuthService,
    access_token: &str,
) -> anyhow::Result<()> {
    auth_service.sign_out(access_token).await?;

    metric::incr_user_action_statds("sign_out");
    Ok(())
}

/// Checks with the auth backend that the session is still alive
pub async fn is_session_alive(
    auth_service: &services::ImplAuthService,
    session: &models::user_app::AuthSession,
) -> bool {
    if session.is_expired() {
        return false;
    }

    auth_service
        .get_user(&session.access_token)
        .await
        .is_ok_and(|user| user.id == session.user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockAuthService;
    use anyhow::anyhow;
    use chrono::Duration;
    use mockall::predicate::*;

    fn create_test_user(id: &str, email: &str) -> models::user_app::AuthUser {
        models::user_app::AuthUser {
            id: id.to_string(),
            email: email.to_string(),
            full_name: Some("Ops".to_string()),
        }
    }

    fn create_test_session(expires_in: i64) -> models::user_app::AuthSession {
        models::user_app::AuthSession {
            user: create_test_user("8d0f", "ops@example.com"),
            access_token: "jwt".to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    fn new_user() -> models::user_app::NewUser {
        models::user_app::NewUser {
            full_name: "Ops".to_string(),
            email: "ops@example.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_validate_login_form() {
        assert!(validate_login_form("ops@example.com", "pwd").is_empty());

        let errors = validate_login_form("  ", "");
        assert_eq!(errors.get("email"), Some(&"Email is required"));
        assert_eq!(errors.get("password"), Some(&"Password is required"));

        let errors = validate_login_form("ops@example", "pwd");
        assert_eq!(errors.get("email"), Some(&"Please enter a valid email"));
    }

    #[test]
    fn test_validate_sign_up_form() {
        assert!(validate_sign_up_form("Ops", "ops@example.com", "secret1", "secret1").is_empty());

        let errors = validate_sign_up_form("", "ops@@example.com", "12345", "");
        assert_eq!(errors.get("full_name"), Some(&"Name is required"));
        assert_eq!(errors.get("email"), Some(&"Please enter a valid email"));
        assert_eq!(
            errors.get("password"),
            Some(&"Password must be at least 6 characters")
        );
        assert_eq!(
            errors.get("confirm_password"),
            Some(&"Please confirm your password")
        );

        let errors = validate_sign_up_form("Ops", "ops@example.com", "secret1", "secret2");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("confirm_password"),
            Some(&"Passwords do not match")
        );
    }

    #[ntex::test]
    async fn test_sign_in_trims_email() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_in()
            .with(eq("ops@example.com"), eq("secret1"))
            .times(1)
            .returning(|_, _| Ok(create_test_session(3600)));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        let result = sign_in(&mock_auth, " ops@example.com ", "secret1").await;

        assert!(result.is_ok_and(|s| s.access_token == "jwt"));
    }

    #[ntex::test]
    async fn test_sign_in_keeps_backend_message() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_in()
            .times(1)
            .returning(|_, _| Err(anyhow!("Invalid login credentials")));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        let result = sign_in(&mock_auth, "ops@example.com", "bad").await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid login credentials"
        );
    }

    #[ntex::test]
    async fn test_sign_up_inserts_profile() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_up()
            .withf(|new_user, redirect_to| {
                new_user.email == "ops@example.com" && redirect_to == "http://localhost:8080/login"
            })
            .times(1)
            .returning(|_, _| {
                Ok(models::user_app::SignUp {
                    user: create_test_user("8d0f", "ops@example.com"),
                    access_token: None,
                })
            });
        mock_auth
            .expect_insert_user_profile()
            .withf(|profile, access_token| {
                profile.id == "8d0f" && profile.full_name == "Ops" && access_token.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        let result = sign_up(&mock_auth, &new_user(), "http://localhost:8080/login").await;

        assert!(result.is_ok_and(|u| u.id == "8d0f"));
    }

    #[ntex::test]
    async fn test_sign_up_survives_profile_failure() {
        let mut mock_auth = MockAuthService::new();
        mock_auth.expect_sign_up().times(1).returning(|_, _| {
            Ok(models::user_app::SignUp {
                user: create_test_user("8d0f", "ops@example.com"),
                access_token: Some("jwt".to_string()),
            })
        });
        mock_auth
            .expect_insert_user_profile()
            .times(1)
            .returning(|_, _| Err(anyhow!("permission denied for table users")));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        let result = sign_up(&mock_auth, &new_user(), "http://localhost:8080/login").await;

        assert!(result.is_ok());
    }

    #[ntex::test]
    async fn test_sign_up_failure_skips_profile() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_up()
            .times(1)
            .returning(|_, _| Err(anyhow!("User already registered")));
        mock_auth.expect_insert_user_profile().times(0);
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        let result = sign_up(&mock_auth, &new_user(), "http://localhost:8080/login").await;

        assert_eq!(result.unwrap_err().to_string(), "User already registered");
    }

    #[ntex::test]
    async fn test_sign_out() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_sign_out()
            .with(eq("jwt"))
            .times(1)
            .returning(|_| Ok(()));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        assert!(sign_out(&mock_auth, "jwt").await.is_ok());
    }

    #[ntex::test]
    async fn test_is_session_alive() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_get_user()
            .with(eq("jwt"))
            .times(1)
            .returning(|_| Ok(create_test_user("8d0f", "ops@example.com")));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        assert!(is_session_alive(&mock_auth, &create_test_session(3600)).await);
    }

    #[ntex::test]
    async fn test_expired_session_is_not_looked_up() {
        let mut mock_auth = MockAuthService::new();
        mock_auth.expect_get_user().times(0);
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        assert!(!is_session_alive(&mock_auth, &create_test_session(-10)).await);
    }

    #[ntex::test]
    async fn test_revoked_session_is_not_alive() {
        let mut mock_auth = MockAuthService::new();
        mock_auth
            .expect_get_user()
            .times(1)
            .returning(|_| Err(anyhow!("invalid JWT")));
        let mock_auth: services::ImplAuthService = Box::new(mock_auth);

        assert!(!is_session_alive(&mock_auth, &create_test_session(3600)).await);
    }
}
