use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Pre-approved template registered with the messaging provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateReference {
    pub name: String,
    pub language_code: String,
    /// Positional values for the `{{1}}`, `{{2}}`, ... placeholders of the body
    pub parameters: Vec<String>,
}

impl TemplateReference {
    pub fn new(name: &str, language_code: &str, parameters: Vec<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            language_code: language_code.to_string(),
            parameters,
        }
    }
}

/// Error object reported by the provider on a rejected send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderError {
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_subcode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbtrace_id: Option<String>,
}

/// What happened to a single send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryResult {
    /// The provider accepted the message
    #[display("accepted")]
    Accepted {
        message_ids: Vec<String>,
        wa_id: Option<String>,
    },
    /// The provider answered with a non-success status
    #[display("rejected")]
    Rejected {
        status_code: u16,
        error: ProviderError,
    },
    /// The request never got a readable answer
    #[display("transport_failure")]
    TransportFailure { reason: String },
}

impl DeliveryResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DeliveryResult::Accepted { .. })
    }

    /// Human readable detail shown next to the recipient
    pub fn detail(&self) -> String {
        match self {
            DeliveryResult::Accepted { message_ids, .. } => message_ids.join(", "),
            DeliveryResult::Rejected { status_code, error } => {
                format!("[{status_code}] {}", error.message)
            }
            DeliveryResult::TransportFailure { reason } => reason.to_string(),
        }
    }
}

/// A recipient paired with the result of its send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub to: String,
    #[serde(flatten)]
    pub result: DeliveryResult,
}

/// Totals rendered on top of the outcome table
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub total: usize,
    pub accepted: usize,
    pub failed: usize,
}

impl CampaignSummary {
    pub fn from_outcomes(outcomes: &[SendOutcome]) -> Self {
        let accepted = outcomes.iter().filter(|o| o.result.is_accepted()).count();

        Self {
            total: outcomes.len(),
            accepted,
            failed: outcomes.len() - accepted,
        }
    }
}
