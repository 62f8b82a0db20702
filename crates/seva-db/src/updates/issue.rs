//! Issue update builder.

use serde::{Deserialize, Deserializer, Serialize};
use seva_core::enums::{IssueCategory, IssuePriority};

/// General field update. Status and assignment have their own operations.
///
/// Nullable columns use `Option<Option<_>>`: `Some(None)` clears the value,
/// and an explicit JSON `null` deserializes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IssueCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<IssuePriority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub ward: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub address: Option<Option<String>>,
}

/// A present field (value or `null`) is `Some`; an absent one stays `None`
/// through `#[serde(default)]`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl IssueUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub struct IssueUpdateBuilder(IssueUpdate);

impl Default for IssueUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(IssueUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: IssueCategory) -> Self {
        self.0.category = Some(category);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: IssuePriority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn ward(mut self, ward: Option<String>) -> Self {
        self.0.ward = Some(ward);
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.0.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: Option<String>) -> Self {
        self.0.address = Some(address);
        self
    }

    #[must_use]
    pub fn build(self) -> IssueUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_null_clears_and_absent_leaves_alone() {
        let update: IssueUpdate = serde_json::from_str(r#"{"ward":null,"priority":"high"}"#).unwrap();
        assert_eq!(update.ward, Some(None));
        assert_eq!(update.address, None);
        assert_eq!(update.priority, Some(IssuePriority::High));
    }

    #[test]
    fn empty_body_is_empty_update() {
        let update: IssueUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }
}
