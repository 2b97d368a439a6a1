//! Sequenced friend-list fetches.
//!
//! Fetches are fire-and-forget and may resolve out of order. Every fetch
//! carries a [`FetchTicket`]; only the most recently issued ticket may
//! replace the roster, older resolutions are dropped.
use crate::FriendDirectory;
use crate::recipient::{Recipient, RecipientId};

/// Tag for one in-flight friend-list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    user: Recipient,
}

impl FetchTicket {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// The user whose friends were requested.
    #[must_use]
    pub const fn user(&self) -> &Recipient {
        &self.user
    }

    #[must_use]
    pub const fn user_id(&self) -> RecipientId {
        self.user.id
    }
}

/// Issues monotonically increasing fetch tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSequencer {
    latest: u64,
}

impl FetchSequencer {
    pub fn issue(&mut self, user: Recipient) -> FetchTicket {
        self.latest += 1;
        FetchTicket {
            seq: self.latest,
            user,
        }
    }

    /// Make every outstanding ticket stale without issuing a new one.
    pub const fn invalidate(&mut self) {
        self.latest += 1;
    }

    #[must_use]
    pub const fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.latest
    }

    #[must_use]
    pub const fn latest(&self) -> u64 {
        self.latest
    }
}

/// A finished fetch, still tagged with the ticket it was issued for.
#[derive(Debug)]
pub struct FetchResolution<E> {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Recipient>, E>,
}

impl<E> FetchResolution<E> {
    #[must_use]
    pub const fn new(ticket: FetchTicket, result: Result<Vec<Recipient>, E>) -> Self {
        Self { ticket, result }
    }
}

/// What applying a [`FetchResolution`] did to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The roster was replaced and now holds this many entries.
    Applied(usize),
    /// A newer fetch was issued; the resolution was dropped.
    Stale,
    /// The directory failed; the roster was emptied.
    Failed,
    /// No user was signed in, so no fetch ran and the roster is empty.
    Skipped,
}

/// Run the directory lookup for `ticket`.
pub async fn fetch_recipients<D>(directory: &D, ticket: FetchTicket) -> FetchResolution<D::Error>
where
    D: FriendDirectory,
{
    let result = directory.fetch_friends(ticket.user_id()).await;
    FetchResolution::new(ticket, result)
}
