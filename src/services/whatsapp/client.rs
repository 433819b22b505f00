//! # WhatsApp API Client
//!
//! Sends approved template messages through the WhatsApp Business Cloud API
//! and classifies every answer into a [`DeliveryResult`].

use async_trait::async_trait;

use super::outgoing_schemas::{
    GraphErrorResponse, OutgoingTemplateMessage, WhatsAppMessageResponse,
};
use crate::{
    config::WhatsAppCredentials,
    models::campaign::{DeliveryResult, ProviderError, TemplateReference},
};

/// WhatsApp API client for sending template messages
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// WhatsApp Business API endpoint for sending messages
    endpoint: String,
    /// Authentication token
    auth_token: String,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `graph_api_url` - Graph API base url with version, e.g. "https://graph.facebook.com/v19.0"
    /// * `credentials` - Access token and sender phone number ID
    pub fn new(
        client: reqwest::Client,
        graph_api_url: &str,
        credentials: &WhatsAppCredentials,
    ) -> Self {
        Self {
            client,
            endpoint: send_msg_endpoint(graph_api_url, &credentials.phone_number_id),
            auth_token: credentials.access_token.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Constructs the WhatsApp Business API endpoint for sending messages
pub fn send_msg_endpoint(graph_api_url: &str, phone_number_id: &str) -> String {
    format!(
        "{base}/{id}/messages",
        base = graph_api_url.trim_end_matches('/'),
        id = phone_number_id
    )
}

/// Classifies the answer of the messages endpoint
pub fn delivery_result_from_response(status_code: u16, body: &str) -> DeliveryResult {
    if !(200..300).contains(&status_code) {
        let error = serde_json::from_str::<GraphErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| ProviderError {
                message: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.to_string()
                },
                ..Default::default()
            });

        return DeliveryResult::Rejected { status_code, error };
    }

    match serde_json::from_str::<WhatsAppMessageResponse>(body) {
        Ok(response) => DeliveryResult::Accepted {
            message_ids: response.messages.into_iter().map(|m| m.id).collect(),
            wa_id: response.contacts.into_iter().next().map(|c| c.wa_id),
        },
        Err(e) => DeliveryResult::TransportFailure {
            reason: format!("failed to parse WhatsApp API response: {e}"),
        },
    }
}

#[async_trait]
impl crate::services::MessagingService for WhatsAppClient {
    async fn send_template(&self, to: &str, template: &TemplateReference) -> DeliveryResult {
        let message = OutgoingTemplateMessage::new(to, template);

        let response = match self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .bearer_auth(&self.auth_token)
            .json(&message)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return DeliveryResult::TransportFailure {
                    reason: format!("failed to send request to WhatsApp API: {e}"),
                };
            }
        };

        let status_code = response.status().as_u16();
        match response.text().await {
            Ok(body) => delivery_result_from_response(status_code, &body),
            Err(e) => DeliveryResult::TransportFailure {
                reason: format!("failed to read WhatsApp API response ({status_code}): {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_msg_endpoint() {
        assert_eq!(
            send_msg_endpoint("https://graph.facebook.com/v19.0/", "10987"),
            "https://graph.facebook.com/v19.0/10987/messages"
        );

        let client = WhatsAppClient::new(
            reqwest::Client::new(),
            "https://graph.facebook.com/v19.0",
            &WhatsAppCredentials {
                access_token: "token".into(),
                phone_number_id: "10987".into(),
            },
        );
        assert_eq!(
            client.endpoint(),
            "https://graph.facebook.com/v19.0/10987/messages"
        );
    }

    #[test]
    fn test_accepted_response() {
        let body = r#"{
            "messaging_product": "whatsapp",
            "contacts": [{"input": "+15550001", "wa_id": "15550001"}],
            "messages": [{"id": "wamid.HBgL"}]
        }"#;

        assert_eq!(
            delivery_result_from_response(200, body),
            DeliveryResult::Accepted {
                message_ids: vec!["wamid.HBgL".into()],
                wa_id: Some("15550001".into()),
            }
        );
    }

    #[test]
    fn test_graph_error_response() {
        let body = r#"{"error": {
            "message": "(#132001) Template name does not exist in the translation",
            "type": "OAuthException",
            "code": 132001,
            "fbtrace_id": "A1b2"
        }}"#;

        let DeliveryResult::Rejected { status_code, error } =
            delivery_result_from_response(404, body)
        else {
            panic!("expected a rejected delivery");
        };

        assert_eq!(status_code, 404);
        assert_eq!(error.code, Some(132001));
        assert_eq!(error.error_type.as_deref(), Some("OAuthException"));
        assert_eq!(error.fbtrace_id.as_deref(), Some("A1b2"));
    }

    #[test]
    fn test_unreadable_error_keeps_raw_body() {
        assert_eq!(
            delivery_result_from_response(502, "Bad Gateway"),
            DeliveryResult::Rejected {
                status_code: 502,
                error: ProviderError {
                    message: "Bad Gateway".into(),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn test_unreadable_success_is_transport_failure() {
        assert!(matches!(
            delivery_result_from_response(200, "<html>"),
            DeliveryResult::TransportFailure { .. }
        ));
    }
}
