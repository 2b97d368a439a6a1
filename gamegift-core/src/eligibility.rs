//! Age eligibility of a recipient for a restricted game.
use serde::{Deserialize, Serialize};

use crate::recipient::RecipientId;

/// Why a recipient cannot be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclaimerReason {
    BelowMinimumAge,
    AgeUnknown,
}

impl DisclaimerReason {
    /// i18n key of the user-facing message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::BelowMinimumAge => "disclaimer.below_minimum_age",
            Self::AgeUnknown => "disclaimer.age_unknown",
        }
    }
}

/// Result of [`evaluate_age_eligibility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    pub reason: Option<DisclaimerReason>,
}

impl Eligibility {
    pub const ELIGIBLE: Self = Self {
        eligible: true,
        reason: None,
    };

    #[must_use]
    pub const fn blocked(reason: DisclaimerReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

/// The single disclaimer shown next to a recipient that could not be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityDisclaimer {
    pub recipient_id: RecipientId,
    pub reason: DisclaimerReason,
}

/// Decide whether a recipient of `recipient_age` may receive a game with `min_age`.
///
/// Rules, first match wins:
/// 1. no minimum age: eligible
/// 2. unknown recipient age: `AgeUnknown`
/// 3. recipient younger than the minimum: `BelowMinimumAge`
/// 4. otherwise eligible
#[must_use]
pub const fn evaluate_age_eligibility(
    min_age: Option<u32>,
    recipient_age: Option<u32>,
) -> Eligibility {
    let Some(min_age) = min_age else {
        return Eligibility::ELIGIBLE;
    };
    match recipient_age {
        None => Eligibility::blocked(DisclaimerReason::AgeUnknown),
        Some(age) if age < min_age => Eligibility::blocked(DisclaimerReason::BelowMinimumAge),
        Some(_) => Eligibility::ELIGIBLE,
    }
}
