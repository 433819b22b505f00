use std::sync::LazyLock;
use tera::Tera;

const TEMPLATES_GLOB: &str = "web/templates/**/*.html";

/// Parses every html template of the web app
pub fn load_templates() -> tera::Result<Tera> {
    Tera::new(TEMPLATES_GLOB)
}

/// Templates are checked with [load_templates] at startup, the default is
/// only reached if the files changed afterwards
pub static WEB_TEMPLATES: LazyLock<Tera> = LazyLock::new(|| {
    load_templates().unwrap_or_else(|e| {
        logfire::error!("templates could not be loaded: {error}", error = e.to_string());
        Tera::default()
    })
});

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_render() {
        let tera = load_templates().unwrap();
        let context = tera::Context::from_value(json!({
            "contact_email": "info@example.com",
            "last_updated": "June 1, 2025",
            "base_url": "http://localhost:8080",
            "msg_details": "details",
            "errors": {},
            "email": "",
            "notice": null,
            "auth_error": null,
            "full_name": "",
        }))
        .unwrap();

        for name in [
            "privacy_policy.html",
            "terms_of_service.html",
            "data_deletion.html",
            "login.html",
            "sign_up.html",
            "errors/url_not_found.html",
            "errors/need_login.html",
            "errors/invalid_input_values.html",
            "errors/internal_error.html",
        ] {
            assert!(tera.render(name, &context).is_ok(), "{name} failed to render");
        }
    }
}
