use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{IssueCategory, IssuePriority, IssueStatus};
use crate::identity::Principal;

/// Reporter name stored when nobody is signed in.
pub const GUEST_REPORTER: &str = "guest";

/// A citizen-reported civic problem.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    /// Free-text location as typed by the reporter.
    pub location: String,
    pub address: Option<String>,
    /// Durable fetch URLs of uploaded photos. Empty when none were attached
    /// or the upload failed.
    pub images: Vec<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub ward: Option<String>,
    pub reported_by: Reporter,
    pub assigned_to: Option<Assignment>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
}

/// Denormalized copy of who filed an issue. Not a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    pub user_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
}

impl Reporter {
    #[must_use]
    pub fn guest() -> Self {
        Self {
            user_id: None,
            name: GUEST_REPORTER.to_string(),
            email: None,
        }
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }
}

impl From<&Principal> for Reporter {
    fn from(principal: &Principal) -> Self {
        Self {
            user_id: Some(principal.user_id.clone()),
            name: principal.reporter_name().to_string(),
            email: Some(principal.email.clone()),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::guest()
    }
}

/// Worker currently holding an issue, with the name copied at assignment time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub worker_id: String,
    pub worker_name: String,
}

/// Fields supplied when reporting a new issue. Status, timestamps, and images
/// are set by the store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    /// Defaults to the category's title when empty.
    #[serde(default)]
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub priority: IssuePriority,
    #[serde(default)]
    pub ward: Option<String>,
}

impl NewIssue {
    /// Title to persist: the given one, or the category's default.
    #[must_use]
    pub fn effective_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            self.category.default_title()
        } else {
            title
        }
    }

    /// Check the fields a report cannot be filed without.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first empty required field.
    pub fn validate(&self) -> Result<(), crate::errors::CoreError> {
        if self.description.trim().is_empty() {
            return Err(crate::errors::CoreError::validation("description is required"));
        }
        if self.location.trim().is_empty() {
            return Err(crate::errors::CoreError::validation("location is required"));
        }
        Ok(())
    }
}

/// Complaint intake payload. Images arrive as already-uploaded URLs.
///
/// Stored as an ordinary issue with status `open` and priority `low`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    #[serde(default)]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_complaint_category")]
    pub category: IssueCategory,
    #[serde(default)]
    pub images: Vec<String>,
}

const fn default_complaint_category() -> IssueCategory {
    IssueCategory::Other
}

impl NewComplaint {
    /// The equivalent issue report.
    #[must_use]
    pub fn to_new_issue(&self) -> NewIssue {
        NewIssue {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            location: self.location.clone(),
            address: None,
            priority: IssuePriority::Low,
            ward: None,
        }
    }
}
