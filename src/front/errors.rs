use super::templates;
use derive_more::{Display, Error};
use ntex::{http, web};
use serde_json::json;

#[derive(Debug, Display, Error)]
pub enum UserError {
    UrlNotFound,
    Unauthorized,
    FormInputValueError(#[error(not(source))] String),
    CsvParseError(#[error(not(source))] String),
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        let mut context = tera::Context::new();
        logfire::warn!("user error: {error}", error = format!("{:?}", self));

        let template_name = match self {
            UserError::UrlNotFound => {
                context.insert("msg_details", "resource not found");
                "errors/url_not_found.html"
            }
            UserError::Unauthorized => {
                context.insert("msg_details", "please log in first");
                "errors/need_login.html"
            }
            UserError::FormInputValueError(msg) => {
                context.insert("msg_details", &format!("invalid form values: {msg}"));
                "errors/invalid_input_values.html"
            }
            UserError::CsvParseError(msg) => {
                context.insert("msg_details", &format!("the CSV file could not be parsed: {msg}"));
                "errors/invalid_input_values.html"
            }
        };

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/html; charset=utf-8")
            .body(
                templates::WEB_TEMPLATES
                    .render(template_name, &context)
                    .unwrap_or(self.to_string()),
            )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            UserError::FormInputValueError(_) | UserError::CsvParseError(_) => {
                http::StatusCode::BAD_REQUEST
            }
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    TemplateError(#[error(not(source))] String),
    MissingConfiguration(#[error(not(source))] String),
    InternalServerError(#[error(not(source))] String),
    InvalidCsrfToken,
}

impl ServerError {
    fn get_error_message(&self) -> String {
        match self {
            ServerError::TemplateError(msg) => format!("[TemplateError] {:#?}", msg),
            ServerError::MissingConfiguration(msg) => format!("[MissingConfiguration] {:#?}", msg),
            ServerError::InternalServerError(msg) => format!("[InternalServerError] {:#?}", msg),
            ServerError::InvalidCsrfToken => "[InvalidCsrfToken]".to_string(),
        }
    }
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        logfire::error!("{message}", message = self.get_error_message());

        let mut context = tera::Context::new();
        if let ServerError::MissingConfiguration(msg) = self {
            context.insert("msg_details", msg);
        }

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/html; charset=utf-8")
            .body(
                templates::WEB_TEMPLATES
                    .render("errors/internal_error.html", &context)
                    .unwrap_or(self.to_string()),
            )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ServerError::InvalidCsrfToken => http::StatusCode::FORBIDDEN,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors of the JSON endpoints, rendered as `{"error": "..."}`
#[derive(Debug, Display, Error)]
pub enum ApiError {
    Unauthorized,
    Configuration(#[error(not(source))] String),
    Validation(#[error(not(source))] String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Not authenticated".to_string(),
            ApiError::Configuration(msg) | ApiError::Validation(msg) => msg.to_string(),
        }
    }
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        logfire::warn!("api error: {error}", error = self.message());

        web::HttpResponse::build(self.status_code()).json(&json!({ "error": self.message() }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ApiError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            ApiError::Configuration(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}
