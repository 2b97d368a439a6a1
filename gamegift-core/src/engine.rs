//! Recipient selection engine.
//!
//! The engine is a reducer over the parent-owned [`PurchaseRequest`]: each
//! action reads the latest snapshot and either returns a new snapshot to
//! emit or `None` when nothing should be emitted. The roster, the live
//! disclaimer and the invite panel visibility are local to the engine.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::FriendDirectory;
use crate::eligibility::{Eligibility, EligibilityDisclaimer, evaluate_age_eligibility};
use crate::fetch::{FetchOutcome, FetchResolution, FetchSequencer, FetchTicket, fetch_recipients};
use crate::purchase::{AcknowledgementFlag, MAX_INVITE_SLOTS, PurchaseRequest};
use crate::recipient::{CaseFoldCollator, NameCollator, Recipient, RecipientId, RecipientRoster};

/// One user input on the purchase form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormAction {
    ToggleRecipient {
        recipient_id: RecipientId,
        checked: bool,
    },
    ToggleInvitePanel {
        open: bool,
    },
    SetInviteEmail {
        index: usize,
        value: String,
    },
    SetAcknowledgement {
        flag: AcknowledgementFlag,
        checked: bool,
    },
}

/// Visibility of the "invite friends" sub-panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvitePanel {
    #[default]
    Hidden,
    Shown,
}

/// Local state of one purchase form.
#[derive(Debug, Clone, Default)]
pub struct RecipientSelectionEngine<C = CaseFoldCollator> {
    roster: RecipientRoster,
    disclaimer: Option<EligibilityDisclaimer>,
    invite_panel: InvitePanel,
    sequencer: FetchSequencer,
    collator: C,
}

impl RecipientSelectionEngine<CaseFoldCollator> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: NameCollator> RecipientSelectionEngine<C> {
    pub fn with_collator(collator: C) -> Self {
        Self {
            roster: RecipientRoster::empty(),
            disclaimer: None,
            invite_panel: InvitePanel::Hidden,
            sequencer: FetchSequencer::default(),
            collator,
        }
    }

    #[must_use]
    pub const fn roster(&self) -> &RecipientRoster {
        &self.roster
    }

    #[must_use]
    pub const fn disclaimer(&self) -> Option<EligibilityDisclaimer> {
        self.disclaimer
    }

    /// The live disclaimer, if it concerns `id`.
    #[must_use]
    pub fn disclaimer_for(&self, id: RecipientId) -> Option<EligibilityDisclaimer> {
        self.disclaimer.filter(|d| d.recipient_id == id)
    }

    #[must_use]
    pub const fn invite_panel(&self) -> InvitePanel {
        self.invite_panel
    }

    #[must_use]
    pub const fn is_invite_panel_open(&self) -> bool {
        matches!(self.invite_panel, InvitePanel::Shown)
    }

    /// Re-open the invite panel when the snapshot already carries invites,
    /// e.g. after the form is mounted again.
    pub fn restore_invite_panel(&mut self, current: &PurchaseRequest) {
        if !current.invite_emails.is_empty() {
            self.invite_panel = InvitePanel::Shown;
        }
    }

    /// Start loading the roster for a new identity.
    ///
    /// Returns the ticket the caller must pass the directory result back
    /// with. Without a user no fetch is needed: the roster is cleared and
    /// every pending fetch becomes stale.
    pub fn begin_fetch(&mut self, current_user: Option<Recipient>) -> Option<FetchTicket> {
        match current_user {
            Some(user) => {
                let ticket = self.sequencer.issue(user);
                log::debug!(
                    "friend fetch #{} issued for user {}",
                    ticket.seq(),
                    ticket.user_id()
                );
                Some(ticket)
            }
            None => {
                self.sequencer.invalidate();
                self.replace_roster(RecipientRoster::empty());
                None
            }
        }
    }

    // A disclaimer names an entry of the roster it was raised against.
    fn replace_roster(&mut self, roster: RecipientRoster) {
        self.roster = roster;
        self.disclaimer = None;
    }

    /// Apply a finished fetch if it is still the latest one.
    pub fn resolve_fetch<E: Display>(&mut self, resolution: FetchResolution<E>) -> FetchOutcome {
        let FetchResolution { ticket, result } = resolution;
        if !self.sequencer.is_current(&ticket) {
            log::debug!(
                "dropping stale friend fetch #{} (latest #{})",
                ticket.seq(),
                self.sequencer.latest()
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(friends) => {
                let me = ticket.user().clone();
                let roster = RecipientRoster::assemble(me, friends, &self.collator);
                self.replace_roster(roster);
                FetchOutcome::Applied(self.roster.len())
            }
            Err(err) => {
                log::warn!(
                    "friend fetch for user {} failed: {err}",
                    ticket.user_id()
                );
                self.replace_roster(RecipientRoster::empty());
                FetchOutcome::Failed
            }
        }
    }

    /// Issue, await and apply a fetch in one step.
    ///
    /// Holds the engine for the whole lookup, so overlapping fetches need
    /// [`Self::begin_fetch`] and [`Self::resolve_fetch`] instead.
    pub async fn refresh<D>(
        &mut self,
        directory: &D,
        current_user: Option<Recipient>,
    ) -> FetchOutcome
    where
        D: FriendDirectory,
        D::Error: Display,
    {
        match self.begin_fetch(current_user) {
            Some(ticket) => {
                let resolution = fetch_recipients(directory, ticket).await;
                self.resolve_fetch(resolution)
            }
            None => FetchOutcome::Skipped,
        }
    }

    /// Eligibility of a roster entry for the snapshot's game.
    ///
    /// Ids missing from the roster have an unknown age.
    #[must_use]
    pub fn eligibility_for(&self, current: &PurchaseRequest, id: RecipientId) -> Eligibility {
        let age = self.roster.get(id).and_then(|r| r.age);
        evaluate_age_eligibility(current.game.min_age(), age)
    }

    /// Check or uncheck a recipient.
    ///
    /// Checking an ineligible recipient leaves the selection alone, shows a
    /// disclaimer for it and emits nothing.
    pub fn toggle_recipient(
        &mut self,
        current: &PurchaseRequest,
        recipient_id: RecipientId,
        checked: bool,
    ) -> Option<PurchaseRequest> {
        let mut next = current.clone();
        if checked {
            let eligibility = self.eligibility_for(current, recipient_id);
            if let Some(reason) = eligibility.reason {
                log::debug!("recipient {recipient_id} blocked: {reason:?}");
                self.disclaimer = Some(EligibilityDisclaimer {
                    recipient_id,
                    reason,
                });
                return None;
            }
            if !next.selected_recipient_ids.contains(&recipient_id) {
                next.selected_recipient_ids.push(recipient_id);
            }
        } else {
            next.selected_recipient_ids.retain(|id| *id != recipient_id);
        }
        self.disclaimer = None;
        Some(next)
    }

    /// Show or hide the invite panel. Hiding clears emails and both flags.
    pub fn toggle_invite_panel(
        &mut self,
        current: &PurchaseRequest,
        open: bool,
    ) -> Option<PurchaseRequest> {
        if open {
            self.invite_panel = InvitePanel::Shown;
            None
        } else {
            self.invite_panel = InvitePanel::Hidden;
            Some(current.without_invites())
        }
    }

    /// Write email slot `index`. Slots past [`MAX_INVITE_SLOTS`] emit nothing.
    #[must_use]
    pub fn set_invite_email(
        &self,
        current: &PurchaseRequest,
        index: usize,
        value: impl Into<String>,
    ) -> Option<PurchaseRequest> {
        let next = current.with_invite_email(index, value);
        if next.is_none() {
            log::debug!("invite slot {index} rejected, limit is {MAX_INVITE_SLOTS}");
        }
        next
    }

    #[must_use]
    pub fn set_acknowledgement(
        &self,
        current: &PurchaseRequest,
        flag: AcknowledgementFlag,
        checked: bool,
    ) -> PurchaseRequest {
        current.with_acknowledgement(flag, checked)
    }

    /// Apply one action to the latest snapshot.
    pub fn dispatch(
        &mut self,
        current: &PurchaseRequest,
        action: FormAction,
    ) -> Option<PurchaseRequest> {
        match action {
            FormAction::ToggleRecipient {
                recipient_id,
                checked,
            } => self.toggle_recipient(current, recipient_id, checked),
            FormAction::ToggleInvitePanel { open } => self.toggle_invite_panel(current, open),
            FormAction::SetInviteEmail { index, value } => {
                self.set_invite_email(current, index, value)
            }
            FormAction::SetAcknowledgement { flag, checked } => {
                Some(self.set_acknowledgement(current, flag, checked))
            }
        }
    }

    /// [`Self::dispatch`], handing any new snapshot to `on_change`.
    ///
    /// Returns whether a snapshot was emitted.
    pub fn dispatch_with<F>(
        &mut self,
        current: &PurchaseRequest,
        action: FormAction,
        on_change: F,
    ) -> bool
    where
        F: FnOnce(PurchaseRequest),
    {
        match self.dispatch(current, action) {
            Some(next) => {
                on_change(next);
                true
            }
            None => false,
        }
    }
}
