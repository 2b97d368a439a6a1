//! Friend directory backed by the Game Market HTTP API.
use gamegift_core::{FriendDirectory, Recipient, RecipientId};
use thiserror::Error;

use crate::dom;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Friend lookup returned HTTP {0}")]
    Status(u16),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `GET {api_base}/users/{id}/friends`, answered with a JSON array of recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFriendDirectory {
    api_base: String,
}

impl HttpFriendDirectory {
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    #[must_use]
    pub fn friends_url(&self, user_id: RecipientId) -> String {
        format!(
            "{}/users/{user_id}/friends",
            self.api_base.trim_end_matches('/')
        )
    }
}

/// Decode the friend-list payload.
///
/// # Errors
/// Returns an error if the body is not a JSON array of recipients.
pub fn parse_friends(body: &str) -> Result<Vec<Recipient>, DirectoryError> {
    Ok(serde_json::from_str(body)?)
}

impl FriendDirectory for HttpFriendDirectory {
    type Error = DirectoryError;

    async fn fetch_friends(&self, user_id: RecipientId) -> Result<Vec<Recipient>, Self::Error> {
        let url = self.friends_url(user_id);
        let response = dom::fetch_response(&url)
            .await
            .map_err(|err| DirectoryError::Request(dom::js_error_message(&err)))?;
        if !response.ok() {
            return Err(DirectoryError::Status(response.status()));
        }
        let body = dom::response_text(&response)
            .await
            .map_err(|err| DirectoryError::Request(dom::js_error_message(&err)))?;
        parse_friends(&body)
    }
}
