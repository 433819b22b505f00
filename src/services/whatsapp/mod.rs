//! WhatsApp Business Cloud API integration
//!
//! ## Submodules
//!
//! - [`client`] - WhatsApp API client for sending template messages
//! - [`outgoing_schemas`] - Request and response payloads of the messages endpoint

pub mod client;
pub mod outgoing_schemas;

pub use client::WhatsAppClient;
