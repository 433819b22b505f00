pub const CSRF_TOKEN_COOKIE_NAME: &str = "csrf_token";
pub const SESSION_COOKIE_NAME: &str = "wa-campaign-session";
pub const IDENTITY_COOKIE_NAME: &str = "wa_campaign_user";

/// CSV column holding the recipients phone numbers
pub const PHONE_NUMBERS_COLUMN: &str = "phone_numbers";
/// Multipart field of the upload form holding the file
pub const CSV_FILE_FIELD: &str = "csv_file";
pub const CSV_MAX_SIZE_BYTES: usize = 5_000_000;
/// Campaign form body, every number of an uploaded file may travel in it
/// urlencoded (`+` and the line breaks take three bytes each)
pub const FORM_MAX_SIZE_BYTES: usize = CSV_MAX_SIZE_BYTES * 3;
/// Raw body of the JSON endpoints
pub const JSON_MAX_SIZE_BYTES: usize = CSV_MAX_SIZE_BYTES * 2;
pub const ACCEPTED_CSV_EXTENSIONS: [&str; 1] = ["csv"];
/// Rows rendered before the "show all" toggle
pub const CSV_PREVIEW_ROWS: usize = 50;

pub const DEFAULT_TEMPLATE_NAME: &str = "hello_world";
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(4).num_seconds();
