use std::path::Path;

use anyhow::bail;
use futures::StreamExt;
use ntex::web;

use super::{errors, templates};

/// [ntext responder](ntex::web::HttpResponse) to redirect to `url`
pub fn redirect_to(url: &str) -> Result<web::HttpResponse, web::Error> {
    Ok(web::HttpResponse::Found().header("location", url).finish())
}

/// Renders `template_name` as a `200 OK` html page
pub fn render_template(
    template_name: &str,
    context: &tera::Context,
) -> Result<web::HttpResponse, web::Error> {
    Ok(web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(
            templates::WEB_TEMPLATES
                .render(template_name, context)
                .map_err(|e| {
                    errors::ServerError::TemplateError(format!(
                        "{template_name} couldnt be rendered: {e}"
                    ))
                })?,
        ))
}

pub fn get_header_str_value(headers: &ntex::http::HeaderMap, key: &str) -> String {
    headers
        .get(key)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Value of the `key="value"` section of a content disposition header
fn get_disposition_param<'a>(content_disposition: &'a str, key: &str) -> Option<&'a str> {
    content_disposition
        .split(';')
        .map(str::trim)
        .find_map(|section| section.strip_prefix(key)?.strip_prefix('='))
        .map(|value| value.trim_matches('"'))
}

/// Form field name of a multipart section
pub fn get_field_name(content_disposition: &str) -> Option<&str> {
    get_disposition_param(content_disposition, "name")
}

/// Lowercase extension of the uploaded file name
pub fn get_filename_extension(content_disposition: &str) -> anyhow::Result<String> {
    let filename = get_disposition_param(content_disposition, "filename").unwrap_or_default();

    if let Some(extension) = Path::new(filename).extension().and_then(|e| e.to_str()) {
        return Ok(extension.trim().to_lowercase());
    }

    bail!("filename extension couldnt be found in the request content_disposition form")
}

/// Concats the bytes of a multipart [Field](ntex_multipart::Field), failing as
/// soon as they go over `max_size`
pub async fn get_bytes_value(
    mut field: ntex_multipart::Field,
    max_size: usize,
) -> anyhow::Result<Vec<u8>> {
    let mut body = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| anyhow::anyhow!("upload could not be read: {e}"))?;
        if body.len() + chunk.len() > max_size {
            bail!("file is too big. max size: {max_size} bytes");
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
