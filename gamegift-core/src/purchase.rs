//! Purchase request snapshot and the game it refers to.
use serde::{Deserialize, Serialize};

use crate::recipient::RecipientId;

/// Upper bound on invite email slots in one request.
pub const MAX_INVITE_SLOTS: usize = 50;

/// Age rules attached to a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRestrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
}

/// The game being purchased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRef {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<GameRestrictions>,
}

impl GameRef {
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            restrictions: None,
        }
    }

    #[must_use]
    pub fn with_min_age(mut self, min_age: u32) -> Self {
        self.restrictions = Some(GameRestrictions {
            min_age: Some(min_age),
        });
        self
    }

    /// Minimum recipient age, if the game has one.
    #[must_use]
    pub fn min_age(&self) -> Option<u32> {
        self.restrictions.and_then(|r| r.min_age)
    }

    #[must_use]
    pub fn is_age_restricted(&self) -> bool {
        self.min_age().is_some()
    }
}

/// The two acknowledgement checkboxes of the invite panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcknowledgementFlag {
    /// Invitation emails will be sent to the listed addresses.
    Invite,
    /// The game is age restricted and may be unavailable to the invitee.
    InviteAge,
}

/// Purchase progress reported by the surrounding checkout flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

impl BuyStatus {
    /// Inputs are locked while a purchase is being submitted.
    #[must_use]
    pub const fn locks_inputs(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Snapshot of the purchase form, owned by the parent.
///
/// Every change produces a new value; existing snapshots are never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub game: GameRef,
    #[serde(default)]
    pub selected_recipient_ids: Vec<RecipientId>,
    /// Slot-addressed emails; an empty string is an empty slot.
    #[serde(default)]
    pub invite_emails: Vec<String>,
    #[serde(default)]
    pub acknowledge_invite: bool,
    #[serde(default)]
    pub acknowledge_invite_age: bool,
}

impl PurchaseRequest {
    #[must_use]
    pub fn for_game(game: GameRef) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: RecipientId) -> bool {
        self.selected_recipient_ids.contains(&id)
    }

    #[must_use]
    pub const fn acknowledgement(&self, flag: AcknowledgementFlag) -> bool {
        match flag {
            AcknowledgementFlag::Invite => self.acknowledge_invite,
            AcknowledgementFlag::InviteAge => self.acknowledge_invite_age,
        }
    }

    /// Copy of this snapshot with `flag` set to `checked`.
    #[must_use]
    pub fn with_acknowledgement(&self, flag: AcknowledgementFlag, checked: bool) -> Self {
        let mut next = self.clone();
        match flag {
            AcknowledgementFlag::Invite => next.acknowledge_invite = checked,
            AcknowledgementFlag::InviteAge => next.acknowledge_invite_age = checked,
        }
        next
    }

    /// Copy of this snapshot with `value` written to email slot `index`.
    ///
    /// Writing past the end fills the gap with empty slots. Returns `None`
    /// when `index` is not below [`MAX_INVITE_SLOTS`].
    #[must_use]
    pub fn with_invite_email(&self, index: usize, value: impl Into<String>) -> Option<Self> {
        let len = index.checked_add(1).filter(|len| *len <= MAX_INVITE_SLOTS)?;
        let mut next = self.clone();
        if next.invite_emails.len() < len {
            next.invite_emails.resize(len, String::new());
        }
        next.invite_emails[index] = value.into();
        Some(next)
    }

    /// Copy of this snapshot with the invite panel state cleared.
    #[must_use]
    pub fn without_invites(&self) -> Self {
        Self {
            invite_emails: Vec::new(),
            acknowledge_invite: false,
            acknowledge_invite_age: false,
            ..self.clone()
        }
    }

    /// Email slots to display: every committed slot plus one empty trailing
    /// slot while the request is below [`MAX_INVITE_SLOTS`].
    #[must_use]
    pub fn invite_slots(&self) -> Vec<&str> {
        let trailing = (self.invite_emails.len() < MAX_INVITE_SLOTS).then_some("");
        self.invite_emails
            .iter()
            .map(String::as_str)
            .chain(trailing)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_past_the_end_leaves_empty_slots() {
        let request = PurchaseRequest {
            invite_emails: vec!["a@x.io".into()],
            ..PurchaseRequest::default()
        };
        let next = request.with_invite_email(2, "c@x.io").unwrap();
        assert_eq!(next.invite_emails, vec!["a@x.io", "", "c@x.io"]);
        assert_eq!(request.invite_emails.len(), 1);
    }

    #[test]
    fn overwriting_a_slot_keeps_length() {
        let request = PurchaseRequest {
            invite_emails: vec!["a@x.io".into(), "b@x.io".into()],
            ..PurchaseRequest::default()
        };
        let next = request.with_invite_email(0, "").unwrap();
        assert_eq!(next.invite_emails, vec!["", "b@x.io"]);
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        let request = PurchaseRequest::default();
        assert!(request.with_invite_email(usize::MAX, "x@y.io").is_none());
        assert!(request.with_invite_email(MAX_INVITE_SLOTS, "x@y.io").is_none());
        let last = request
            .with_invite_email(MAX_INVITE_SLOTS - 1, "x@y.io")
            .unwrap();
        assert_eq!(last.invite_emails.len(), MAX_INVITE_SLOTS);
        assert_eq!(last.invite_slots().len(), MAX_INVITE_SLOTS);
    }

    #[test]
    fn invite_slots_always_end_with_an_empty_slot() {
        let request = PurchaseRequest::default();
        assert_eq!(request.invite_slots(), vec![""]);
        let request = request.with_invite_email(1, "b@x.io").unwrap();
        assert_eq!(request.invite_slots(), vec!["", "b@x.io", ""]);
    }

    #[test]
    fn acknowledgement_flags_are_independent() {
        let request = PurchaseRequest::default()
            .with_acknowledgement(AcknowledgementFlag::InviteAge, true);
        assert!(request.acknowledgement(AcknowledgementFlag::InviteAge));
        assert!(!request.acknowledgement(AcknowledgementFlag::Invite));
        let request = request.with_acknowledgement(AcknowledgementFlag::Invite, true);
        assert!(request.acknowledge_invite && request.acknowledge_invite_age);
    }

    #[test]
    fn without_invites_resets_only_invite_fields() {
        let request = PurchaseRequest {
            game: GameRef::new(9, "Quest").with_min_age(18),
            selected_recipient_ids: vec![1, 2],
            invite_emails: vec!["a@x.io".into()],
            acknowledge_invite: true,
            acknowledge_invite_age: true,
        };
        let cleared = request.without_invites();
        assert!(cleared.invite_emails.is_empty());
        assert!(!cleared.acknowledge_invite);
        assert!(!cleared.acknowledge_invite_age);
        assert_eq!(cleared.selected_recipient_ids, vec![1, 2]);
        assert_eq!(cleared.game.min_age(), Some(18));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let request = PurchaseRequest::for_game(GameRef::new(1, "Quest").with_min_age(16));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["game"]["restrictions"]["minAge"], 16);
        assert!(json.get("selectedRecipientIds").is_some());
        assert!(json.get("acknowledgeInviteAge").is_some());
    }

    #[test]
    fn only_in_progress_locks_inputs() {
        assert!(BuyStatus::InProgress.locks_inputs());
        assert!(!BuyStatus::Idle.locks_inputs());
        assert!(!BuyStatus::Failed.locks_inputs());
    }
}
