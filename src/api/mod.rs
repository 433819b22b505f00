//! # API Module
//!
//! Business logic of the campaign app. Each submodule handles a specific
//! domain of functionality and knows nothing about the web layer.
//!
//! ## Modules
//!
//! - [`campaign`] - Sequential template sends with pacing
//! - [`recipients`] - CSV parsing and phone number extraction
//! - [`user`] - Staff authentication and form validation

pub mod campaign;
pub mod recipients;
pub mod user;
