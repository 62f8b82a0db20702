//! Issue query filters and client-side worker filtering.
//!
//! `IssueFilter` is pushed down into SQL by `seva-db`; `matches` is the same
//! predicate evaluated in memory, so both sides agree on semantics.

use serde::{Deserialize, Serialize};

use crate::entities::{Issue, Worker};
use crate::enums::{IssueCategory, IssuePriority, IssueStatus, WorkerStatus};

/// Conditions combined with logical AND. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFilter {
    #[serde(default)]
    pub status: Option<IssueStatus>,
    #[serde(default)]
    pub priority: Option<IssuePriority>,
    #[serde(default)]
    pub ward: Option<String>,
    /// Matches `Issue::reported_by.user_id`.
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub category: Option<IssueCategory>,
}

impl IssueFilter {
    #[must_use]
    pub fn with_status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Evaluate the filter against an in-memory issue.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.status.is_none_or(|status| issue.status == status)
            && self.priority.is_none_or(|priority| issue.priority == priority)
            && self.category.is_none_or(|category| issue.category == category)
            && self
                .ward
                .as_deref()
                .is_none_or(|ward| issue.ward.as_deref() == Some(ward))
            && self
                .reporter
                .as_deref()
                .is_none_or(|user_id| issue.reported_by.user_id.as_deref() == Some(user_id))
    }
}

/// Workers whose status equals `status`.
#[must_use]
pub fn workers_by_status(workers: &[Worker], status: WorkerStatus) -> Vec<&Worker> {
    workers.iter().filter(|w| w.status == status).collect()
}

/// Workers in `department`, compared case-insensitively.
#[must_use]
pub fn workers_by_department<'a>(workers: &'a [Worker], department: &str) -> Vec<&'a Worker> {
    workers
        .iter()
        .filter(|w| w.department.eq_ignore_ascii_case(department))
        .collect()
}
