//! # Campaign API Module
//!
//! Sends one approved WhatsApp template to a list of recipients, strictly one
//! after the other, pausing between two sends to respect the provider rate
//! limits.

use std::time::Duration;

use derive_more::{Display, Error};

use crate::{
    metric,
    models::campaign::{SendOutcome, TemplateReference},
    services,
};

/// Reasons for refusing a whole campaign before anything is sent
#[derive(Debug, Display, Error, PartialEq)]
pub enum CampaignError {
    #[display("Missing WhatsApp credentials in the server configuration")]
    MissingCredentials,
    #[display("No recipient numbers provided")]
    NoRecipients,
    #[display("No template name provided")]
    NoTemplateName,
}

impl CampaignError {
    /// Whether the caller can fix the request (as opposed to the server setup)
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, CampaignError::MissingCredentials)
    }
}

/// Checks everything that would make the whole campaign fail and returns the
/// configured messaging service.
///
/// Credentials are checked first so a misconfigured server reports the
/// configuration problem whatever the request holds.
pub fn validate_campaign<'a>(
    messaging_service: Option<&'a services::ImplMessagingService>,
    recipients: &[String],
    template: &TemplateReference,
) -> Result<&'a services::ImplMessagingService, CampaignError> {
    let Some(messaging_service) = messaging_service else {
        return Err(CampaignError::MissingCredentials);
    };

    if recipients.is_empty() {
        return Err(CampaignError::NoRecipients);
    }

    if template.name.trim().is_empty() {
        return Err(CampaignError::NoTemplateName);
    }

    Ok(messaging_service)
}

/// Sends `template` to every recipient, in order.
///
/// Every recipient is attempted exactly once, whatever happened to the
/// previous ones, and the outcome at index `i` belongs to `recipients[i]`.
/// After each send the loop waits `pacing` before the next one; a zero
/// `pacing` disables the wait.
///
/// # Errors
/// Fails before any send if there are no credentials, no recipients or no
/// template name (see [`validate_campaign`]).
#[tracing::instrument(skip_all, fields(recipients = recipients.len(), template = %template.name))]
pub async fn send_campaign(
    messaging_service: Option<&services::ImplMessagingService>,
    recipients: &[String],
    template: &TemplateReference,
    pacing: Duration,
) -> Result<Vec<SendOutcome>, CampaignError> {
    let messaging_service = validate_campaign(messaging_service, recipients, template)?;

    let mut outcomes = Vec::with_capacity(recipients.len());
    for (index, to) in recipients.iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        let result = messaging_service.send_template(to, template).await;

        metric::incr_delivery_status_statds(&result.to_string());
        if !result.is_accepted() {
            logfire::warn!(
                "template {template} to {to} failed: {detail}",
                template = template.name.to_string(),
                to = to.to_string(),
                detail = result.detail()
            );
        }

        outcomes.push(SendOutcome {
            to: to.to_string(),
            result,
        });
    }

    logfire::info!(
        "campaign {template} finished for {total} recipients",
        template = template.name.to_string(),
        total = outcomes.len() as i64
    );

    Ok(outcomes)
}

/// Splits a multiline form field into its non empty, trimmed lines
pub fn split_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
