//! Gamegift Core
//!
//! Platform-agnostic logic for the gift purchase form: who may receive a
//! game, which recipients are selected, and which people are invited by
//! email. This crate has no UI or network dependencies; the friend list is
//! supplied through [`FriendDirectory`].

pub mod eligibility;
pub mod engine;
pub mod fetch;
pub mod purchase;
pub mod recipient;
pub mod validation;

// Re-export commonly used types
pub use eligibility::{
    DisclaimerReason, Eligibility, EligibilityDisclaimer, evaluate_age_eligibility,
};
pub use engine::{FormAction, InvitePanel, RecipientSelectionEngine};
pub use fetch::{FetchOutcome, FetchResolution, FetchSequencer, FetchTicket, fetch_recipients};
pub use purchase::{
    AcknowledgementFlag, BuyStatus, GameRef, GameRestrictions, MAX_INVITE_SLOTS, PurchaseRequest,
};
pub use recipient::{CaseFoldCollator, NameCollator, Recipient, RecipientId, RecipientRoster};
pub use validation::{
    PurchaseValidationError, committed_invites, is_plausible_email, validate_purchase,
};

/// Trait for abstracting the friend-list lookup.
/// Platform-specific implementations should provide this
#[allow(async_fn_in_trait)]
pub trait FriendDirectory {
    type Error: std::error::Error + 'static;

    /// Fetch the friends of `user_id`. The user themself is not included.
    ///
    /// # Errors
    ///
    /// Returns an error if the friend list cannot be retrieved.
    async fn fetch_friends(&self, user_id: RecipientId) -> Result<Vec<Recipient>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;

    #[derive(Default)]
    struct MemoryDirectory {
        friends: HashMap<RecipientId, Vec<Recipient>>,
        calls: RefCell<Vec<RecipientId>>,
    }

    impl FriendDirectory for MemoryDirectory {
        type Error = Infallible;

        async fn fetch_friends(&self, user_id: RecipientId) -> Result<Vec<Recipient>, Self::Error> {
            self.calls.borrow_mut().push(user_id);
            Ok(self.friends.get(&user_id).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn engine_refreshes_roster_through_directory() {
        let mut directory = MemoryDirectory::default();
        directory.friends.insert(
            10,
            vec![
                Recipient::new(11, "Yara", Some(22)),
                Recipient::new(12, "Abe", Some(15)),
            ],
        );
        let mut engine = RecipientSelectionEngine::new();
        let me = Recipient::new(10, "Max", Some(35));

        let outcome = block_on(engine.refresh(&directory, Some(me)));
        assert_eq!(outcome, FetchOutcome::Applied(3));
        let names: Vec<_> = engine
            .roster()
            .entries()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Abe", "Max", "Yara"]);
        assert_eq!(*directory.calls.borrow(), vec![10]);
    }

    #[test]
    fn anonymous_users_skip_the_directory() {
        let directory = MemoryDirectory::default();
        let mut engine = RecipientSelectionEngine::new();
        let outcome = block_on(engine.refresh(&directory, None));
        assert_eq!(outcome, FetchOutcome::Skipped);
        assert!(directory.calls.borrow().is_empty());
        assert!(engine.roster().is_empty());
    }
}
