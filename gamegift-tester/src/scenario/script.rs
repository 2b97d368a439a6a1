//! JSON scenario scripts replayed against the engine.
//!
//! A script names the game, the signed-in user and their friends, then a
//! list of form actions. Expectations are checked on the final snapshot.
use anyhow::{Result, ensure};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use super::ScenarioResult;
use gamegift_core::{
    EligibilityDisclaimer, FetchOutcome, FormAction, FriendDirectory, GameRef, MAX_INVITE_SLOTS,
    PurchaseRequest, Recipient, RecipientId, RecipientSelectionEngine, validate_purchase,
};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Friend lists served from memory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    friends: HashMap<RecipientId, Vec<Recipient>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn with_friends(user_id: RecipientId, friends: Vec<Recipient>) -> Self {
        let mut directory = Self::default();
        directory.friends.insert(user_id, friends);
        directory
    }
}

impl FriendDirectory for MemoryDirectory {
    type Error = Infallible;

    async fn fetch_friends(&self, user_id: RecipientId) -> Result<Vec<Recipient>, Self::Error> {
        Ok(self.friends.get(&user_id).cloned().unwrap_or_default())
    }
}

// Distinguishes an absent field from an explicit `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Checks applied after the last step. Absent fields are not checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptExpectation {
    #[serde(default)]
    pub selected: Option<Vec<RecipientId>>,
    #[serde(default)]
    pub invite_emails: Option<Vec<String>>,
    /// `null` asserts that no disclaimer is shown.
    #[serde(default, deserialize_with = "present")]
    pub disclaimer: Option<Option<EligibilityDisclaimer>>,
    #[serde(default)]
    pub acknowledge_invite: Option<bool>,
    #[serde(default)]
    pub acknowledge_invite_age: Option<bool>,
    #[serde(default)]
    pub invite_panel_open: Option<bool>,
    /// Whether the final snapshot passes submit-time validation.
    #[serde(default)]
    pub valid: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptScenario {
    pub name: String,
    pub game: GameRef,
    #[serde(default)]
    pub me: Option<Recipient>,
    #[serde(default)]
    pub friends: Vec<Recipient>,
    #[serde(default)]
    pub steps: Vec<FormAction>,
    #[serde(default)]
    pub expect: ScriptExpectation,
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns [`ScriptError`] when the file cannot be read or is not a script.
pub fn load_script(path: &Path) -> Result<ScriptScenario, ScriptError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ScriptError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl ScriptScenario {
    pub async fn run(&self, verbose: bool) -> ScenarioResult {
        let start = Instant::now();
        let outcome = self.replay(verbose).await;
        ScenarioResult::from_outcome(&self.name, outcome, start.elapsed())
    }

    /// Reject steps the form could never produce.
    fn validate_steps(&self) -> Result<()> {
        for (step, action) in self.steps.iter().enumerate() {
            if let FormAction::SetInviteEmail { index, .. } = action {
                ensure!(
                    *index < MAX_INVITE_SLOTS,
                    "step {}: invite slot {index} is out of range (limit {MAX_INVITE_SLOTS})",
                    step + 1
                );
            }
        }
        Ok(())
    }

    async fn replay(&self, verbose: bool) -> Result<()> {
        self.validate_steps()?;
        let directory = self.me.as_ref().map_or_else(MemoryDirectory::default, |me| {
            MemoryDirectory::with_friends(me.id, self.friends.clone())
        });
        let mut engine = RecipientSelectionEngine::new();
        let outcome = engine.refresh(&directory, self.me.clone()).await;
        ensure!(
            matches!(outcome, FetchOutcome::Applied(_) | FetchOutcome::Skipped),
            "roster not loaded: {outcome:?}"
        );

        let mut current = PurchaseRequest::for_game(self.game.clone());
        for (step, action) in self.steps.iter().enumerate() {
            let emitted = match engine.dispatch(&current, action.clone()) {
                Some(next) => {
                    current = next;
                    true
                }
                None => false,
            };
            if verbose {
                println!(
                    "   step {}: {action:?} -> {}",
                    step + 1,
                    if emitted { "emitted" } else { "no change" }
                );
            }
        }

        self.check(&engine, &current)
    }

    fn check(&self, engine: &RecipientSelectionEngine, current: &PurchaseRequest) -> Result<()> {
        let expect = &self.expect;
        if let Some(selected) = &expect.selected {
            ensure!(
                &current.selected_recipient_ids == selected,
                "selected: expected {selected:?}, got {:?}",
                current.selected_recipient_ids
            );
        }
        if let Some(emails) = &expect.invite_emails {
            ensure!(
                &current.invite_emails == emails,
                "invite_emails: expected {emails:?}, got {:?}",
                current.invite_emails
            );
        }
        if let Some(disclaimer) = &expect.disclaimer {
            ensure!(
                engine.disclaimer() == *disclaimer,
                "disclaimer: expected {disclaimer:?}, got {:?}",
                engine.disclaimer()
            );
        }
        if let Some(flag) = expect.acknowledge_invite {
            ensure!(
                current.acknowledge_invite == flag,
                "acknowledge_invite: expected {flag}"
            );
        }
        if let Some(flag) = expect.acknowledge_invite_age {
            ensure!(
                current.acknowledge_invite_age == flag,
                "acknowledge_invite_age: expected {flag}"
            );
        }
        if let Some(open) = expect.invite_panel_open {
            ensure!(
                engine.is_invite_panel_open() == open,
                "invite panel: expected open={open}"
            );
        }
        if let Some(valid) = expect.valid {
            let verdict = validate_purchase(current);
            ensure!(
                verdict.is_ok() == valid,
                "validation: expected valid={valid}, got {verdict:?}"
            );
        }
        Ok(())
    }
}
