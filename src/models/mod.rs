pub mod campaign;
pub mod recipients;
pub mod user_app;
