//! Gift recipients and the sorted candidate roster.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Internal user id.
pub type RecipientId = u64;

/// A person (the buyer or one of their friends) who can receive a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    pub name: String,
    /// Age in whole years, when the directory knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl Recipient {
    #[must_use]
    pub fn new(id: RecipientId, name: impl Into<String>, age: Option<u32>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
        }
    }
}

/// Ordering used to sort display names.
///
/// Platforms with a real locale collator (the browser's `Intl.Collator`)
/// provide their own implementation.
pub trait NameCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> NameCollator for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Case-insensitive ordering with a byte-wise tie break.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFoldCollator;

impl NameCollator for CaseFoldCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let folded_a = a.chars().flat_map(char::to_lowercase);
        let folded_b = b.chars().flat_map(char::to_lowercase);
        folded_a.cmp(folded_b).then_with(|| a.cmp(b))
    }
}

/// Candidate recipients for the current user, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientRoster {
    me: Option<RecipientId>,
    entries: Vec<Recipient>,
}

impl RecipientRoster {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the roster from the current user and their fetched friends.
    ///
    /// The current user is prepended, duplicate ids keep their first
    /// occurrence, and the result is stably sorted with `collator`.
    #[must_use]
    pub fn assemble<C>(me: Recipient, friends: Vec<Recipient>, collator: &C) -> Self
    where
        C: NameCollator + ?Sized,
    {
        let me_id = me.id;
        let mut seen = HashSet::with_capacity(friends.len() + 1);
        let mut entries: Vec<Recipient> = std::iter::once(me)
            .chain(friends)
            .filter(|r| seen.insert(r.id))
            .collect();
        entries.sort_by(|a, b| collator.compare(&a.name, &b.name));
        Self {
            me: Some(me_id),
            entries,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Recipient] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: RecipientId) -> Option<&Recipient> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Whether `id` belongs to the user the roster was built for.
    #[must_use]
    pub fn is_me(&self, id: RecipientId) -> bool {
        self.me == Some(id)
    }

    #[must_use]
    pub const fn me(&self) -> Option<RecipientId> {
        self.me
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
