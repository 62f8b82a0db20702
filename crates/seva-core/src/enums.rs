//! Status enums, categories, priorities, and audit vocabularies for Seva-Setu.
//!
//! Every enum has exactly one canonical string form, produced by `as_str()` and
//! used both in SQL storage and on the wire. Older spellings are accepted only
//! by [`crate::legacy`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// IssueStatus
// ---------------------------------------------------------------------------

/// Status of a citizen-reported issue.
///
/// ```text
/// open → assigned → in_progress → resolved
/// ```
///
/// The lifecycle is a convention: status updates are never rejected, but
/// [`IssueStatus::can_transition_to`] lets callers notice when one leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    Assigned,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub const ALL: [Self; 4] = [Self::Open, Self::Assigned, Self::InProgress, Self::Resolved];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::Assigned],
            Self::Assigned => &[Self::Assigned, Self::InProgress],
            Self::InProgress => &[Self::Resolved],
            Self::Resolved => &[],
        }
    }

    /// Check whether transitioning to `next` follows the lifecycle.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `true` while a worker holds the issue (shown as "ongoing" on the board).
    #[must_use]
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IssueCategory
// ---------------------------------------------------------------------------

/// Kind of civic problem being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Pothole,
    Garbage,
    StreetLight,
    Water,
    Other,
}

impl IssueCategory {
    pub const ALL: [Self; 5] = [
        Self::Pothole,
        Self::Garbage,
        Self::StreetLight,
        Self::Water,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pothole => "pothole",
            Self::Garbage => "garbage",
            Self::StreetLight => "street-light",
            Self::Water => "water",
            Self::Other => "other",
        }
    }

    /// Human-readable title used when a report arrives without one.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::Pothole => "Pothole on Road",
            Self::Garbage => "Garbage Dump",
            Self::StreetLight => "Street Light Issue",
            Self::Water => "Water Leakage",
            Self::Other => "Other Issue",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IssuePriority
// ---------------------------------------------------------------------------

/// Triage priority. Variants are declared in ascending urgency, so the derived
/// `Ord` sorts `low` first.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl IssuePriority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkerStatus
// ---------------------------------------------------------------------------

/// Availability of a field worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Free,
    Onsite,
    Break,
}

impl WorkerStatus {
    pub const ALL: [Self; 3] = [Self::Free, Self::Onsite, Self::Break];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Onsite => "onsite",
            Self::Break => "break",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Assigned,
    StatusChanged,
    Imported,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Assigned => "assigned",
            Self::StatusChanged => "status_changed",
            Self::Imported => "imported",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Issue,
    Worker,
    Account,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Worker => "worker",
            Self::Account => "account",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IssueStatus::Open, "\"open\"")]
    #[case(IssueStatus::Assigned, "\"assigned\"")]
    #[case(IssueStatus::InProgress, "\"in_progress\"")]
    #[case(IssueStatus::Resolved, "\"resolved\"")]
    fn issue_status_serializes_to_as_str(#[case] status: IssueStatus, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
        assert_eq!(format!("\"{status}\""), json);
    }

    #[test]
    fn legacy_status_spellings_do_not_deserialize() {
        assert!(serde_json::from_str::<IssueStatus>("\"pending\"").is_err());
        assert!(serde_json::from_str::<IssueStatus>("\"in-progress\"").is_err());
    }

    #[test]
    fn street_light_uses_hyphen() {
        let json = serde_json::to_string(&IssueCategory::StreetLight).unwrap();
        assert_eq!(json, "\"street-light\"");
        for category in IssueCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn lifecycle_follows_open_assigned_in_progress_resolved() {
        assert!(IssueStatus::Open.can_transition_to(IssueStatus::Assigned));
        assert!(IssueStatus::Assigned.can_transition_to(IssueStatus::InProgress));
        assert!(IssueStatus::InProgress.can_transition_to(IssueStatus::Resolved));
        assert!(!IssueStatus::Open.can_transition_to(IssueStatus::Resolved));
        assert!(IssueStatus::Resolved.allowed_next_states().is_empty());
    }

    #[test]
    fn ongoing_covers_assigned_and_in_progress() {
        let ongoing: Vec<_> = IssueStatus::ALL.into_iter().filter(|s| s.is_ongoing()).collect();
        assert_eq!(ongoing, vec![IssueStatus::Assigned, IssueStatus::InProgress]);
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(IssuePriority::Low < IssuePriority::Medium);
        assert!(IssuePriority::High < IssuePriority::Urgent);
        assert_eq!(IssuePriority::default(), IssuePriority::Medium);
    }

    #[test]
    fn worker_break_roundtrips() {
        let status: WorkerStatus = serde_json::from_str("\"break\"").unwrap();
        assert_eq!(status, WorkerStatus::Break);
        assert_eq!(status.as_str(), "break");
    }
}
