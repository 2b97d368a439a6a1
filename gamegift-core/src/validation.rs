//! Checks a purchase request must pass before it can be submitted.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::purchase::PurchaseRequest;

static EMAIL_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseValidationError {
    #[error("select at least one recipient or invite someone by email")]
    NoRecipients,
    #[error("invite email #{index} is not a valid address: {value:?}")]
    InvalidEmail { index: usize, value: String },
    #[error("invitation emails must be acknowledged")]
    InviteNotAcknowledged,
    #[error("the game's age restriction must be acknowledged for invitations")]
    InviteAgeNotAcknowledged,
}

/// Whether `value` looks like `local@domain.tld`.
#[must_use]
pub fn is_plausible_email(value: &str) -> bool {
    EMAIL_SHAPE
        .as_ref()
        .is_some_and(|re| re.is_match(value.trim()))
}

/// Non-empty invite emails with their slot index.
#[must_use]
pub fn committed_invites(request: &PurchaseRequest) -> Vec<(usize, &str)> {
    request
        .invite_emails
        .iter()
        .enumerate()
        .filter(|(_, email)| !email.trim().is_empty())
        .map(|(idx, email)| (idx, email.as_str()))
        .collect()
}

/// Check that the request names someone to receive the game and that
/// invitations carry the required acknowledgements.
///
/// # Errors
///
/// Returns the first rule the request breaks.
pub fn validate_purchase(request: &PurchaseRequest) -> Result<(), PurchaseValidationError> {
    let invites = committed_invites(request);
    if request.selected_recipient_ids.is_empty() && invites.is_empty() {
        return Err(PurchaseValidationError::NoRecipients);
    }
    if let Some((index, value)) = invites
        .iter()
        .find(|(_, email)| !is_plausible_email(email))
    {
        return Err(PurchaseValidationError::InvalidEmail {
            index: *index,
            value: (*value).to_string(),
        });
    }
    if invites.is_empty() {
        return Ok(());
    }
    if !request.acknowledge_invite {
        return Err(PurchaseValidationError::InviteNotAcknowledged);
    }
    if request.game.is_age_restricted() && !request.acknowledge_invite_age {
        return Err(PurchaseValidationError::InviteAgeNotAcknowledged);
    }
    Ok(())
}
