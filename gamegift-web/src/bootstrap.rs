//! Page-supplied configuration for the purchase form.
//!
//! The host page embeds a JSON document in
//! `<script id="gamegift-bootstrap" type="application/json">`.
use gamegift_core::{GameRef, Recipient};
use serde::{Deserialize, Serialize};

use crate::context::DEFAULT_API_BASE;

pub const BOOTSTRAP_ELEMENT_ID: &str = "gamegift-bootstrap";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Signed-in user; absent for anonymous visitors.
    #[serde(default)]
    pub user: Option<Recipient>,
    pub game: GameRef,
    #[serde(default)]
    pub locale: Option<String>,
}

impl BootstrapConfig {
    /// Parse the embedded bootstrap document.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or has no `game`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read the bootstrap document from the current page.
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn from_document() -> Option<Self> {
        let text = crate::dom::window()?
            .document()?
            .get_element_by_id(BOOTSTRAP_ELEMENT_ID)?
            .text_content()?;
        match Self::from_json(&text) {
            Ok(config) => Some(config),
            Err(err) => {
                crate::dom::console_error(&format!("Invalid purchase form bootstrap: {err}"));
                None
            }
        }
    }
}
