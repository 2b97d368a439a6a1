//! Values the purchase form reads from Yew contexts.
use gamegift_core::Recipient;
use yew::AttrValue;

pub const DEFAULT_API_BASE: &str = "/api";

/// Where the Game Market API lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_base: AttrValue,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: AttrValue::Static(DEFAULT_API_BASE),
        }
    }
}

/// The signed-in user, or `None` when anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser(pub Option<Recipient>);
