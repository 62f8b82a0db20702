use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authenticated principal for cross-crate passing.
///
/// Produced by `seva-auth`, consumed by `seva-server` and `seva-cli` to fill in
/// reporter identity. Contains only data fields, no auth logic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl Principal {
    /// Name shown on reports: display name when set, else the email.
    #[must_use]
    pub fn reporter_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}
