//! The navigable screens.

use harvest_home_core::{FarmId, ProductId};
use serde::{Deserialize, Serialize};

/// The single currently displayed screen.
///
/// Serialized adjacently tagged, e.g. `{"name":"farm","payload":1}` or
/// `{"name":"browse"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "kebab-case")]
pub enum View {
    #[default]
    Home,
    Browse,
    Farms,
    Farm(FarmId),
    Product(ProductId),
    Checkout,
    RecipeAssistant,
}

impl View {
    /// Decode a view sent by the UI, falling back to `Home` for anything
    /// unrecognized (unknown tag, missing payload, wrong payload type).
    #[must_use]
    pub fn from_json_lenient(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unrecognized view, falling back to home");
            Self::Home
        })
    }
}
