//! # WhatsApp Cloud API Schemas
//!
//! Payloads sent to, and responses read from, the `/{phone_number_id}/messages`
//! endpoint of the WhatsApp Business Cloud API.

use serde::{Deserialize, Serialize};

use crate::models::campaign::{ProviderError, TemplateReference};

/// Template message to send to WhatsApp
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTemplateMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Recipient's WhatsApp ID (phone number)
    pub to: String,
    /// Message type, "template"
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Template content
    pub template: TemplateContent,
}

impl OutgoingTemplateMessage {
    /// Creates a new template message for `to`
    pub fn new(to: &str, template: &TemplateReference) -> Self {
        let mut components = Vec::new();
        if !template.parameters.is_empty() {
            components.push(TemplateComponent {
                component_type: "body".to_string(),
                parameters: template
                    .parameters
                    .iter()
                    .map(|text| TemplateParameter {
                        parameter_type: "text".to_string(),
                        text: text.to_string(),
                    })
                    .collect(),
            });
        }

        Self {
            messaging_product: "whatsapp".to_string(),
            to: to.to_string(),
            msg_type: "template".to_string(),
            template: TemplateContent {
                name: template.name.to_string(),
                language: TemplateLanguage {
                    code: template.language_code.to_string(),
                },
                components,
            },
        }
    }
}

/// Template reference and its substitutions
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateContent {
    /// Approved template name
    pub name: String,
    /// Template language
    pub language: TemplateLanguage,
    /// Parameterized components, omitted for templates without variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<TemplateComponent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateLanguage {
    /// Language and locale code (e.g., "en_US")
    pub code: String,
}

/// Template component (only "body" is used)
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub parameters: Vec<TemplateParameter>,
}

/// Positional template parameter
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub parameter_type: String,
    pub text: String,
}

/// Response from WhatsApp API when sending a message
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsAppMessageResponse {
    /// Messaging product
    pub messaging_product: String,
    /// Array of contacts (recipients)
    #[serde(default)]
    pub contacts: Vec<WhatsAppContact>,
    /// Array of messages sent
    #[serde(default)]
    pub messages: Vec<WhatsAppMessageStatus>,
}

/// Contact information in response
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsAppContact {
    /// WhatsApp ID of the contact
    pub wa_id: String,
    /// Input phone number
    pub input: String,
}

/// Message status in response
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsAppMessageStatus {
    /// Message ID
    pub id: String,
}

/// Error envelope of the Graph API
#[derive(Debug, Deserialize)]
pub struct GraphErrorResponse {
    pub error: ProviderError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_message_with_parameters() {
        let template = TemplateReference::new(
            "order_update",
            "en_US",
            vec!["Ana".to_string(), "#42".to_string()],
        );

        let message = OutgoingTemplateMessage::new("+15550001", &template);

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "messaging_product": "whatsapp",
                "to": "+15550001",
                "type": "template",
                "template": {
                    "name": "order_update",
                    "language": {"code": "en_US"},
                    "components": [{
                        "type": "body",
                        "parameters": [
                            {"type": "text", "text": "Ana"},
                            {"type": "text", "text": "#42"}
                        ]
                    }]
                }
            })
        );
    }

    #[test]
    fn test_template_message_without_parameters_has_no_components() {
        let template = TemplateReference::new("hello_world", "en_US", vec![]);

        let message = serde_json::to_value(OutgoingTemplateMessage::new("+15550001", &template))
            .unwrap();

        assert!(message["template"].get("components").is_none());
    }
}
