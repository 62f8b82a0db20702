//! Dashboard grouping for the admin view.
//!
//! Everything here is computed from a full snapshot; callers rebuild the board
//! on every feed update.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::{Issue, Worker};
use crate::enums::{IssueStatus, WorkerStatus};

/// Department label for workers with an empty department.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// Issues split into the three dashboard columns plus summary counts.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueBoard {
    /// Status `open`.
    pub new: Vec<Issue>,
    /// Status `assigned` or `in_progress`.
    pub ongoing: Vec<Issue>,
    pub resolved: Vec<Issue>,
    pub by_category: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub total: usize,
}

impl IssueBoard {
    #[must_use]
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut board = Self {
            total: issues.len(),
            ..Self::default()
        };
        for issue in issues {
            *board
                .by_category
                .entry(issue.category.as_str().to_string())
                .or_default() += 1;
            *board
                .by_priority
                .entry(issue.priority.as_str().to_string())
                .or_default() += 1;

            let column = match issue.status {
                IssueStatus::Open => &mut board.new,
                IssueStatus::Assigned | IssueStatus::InProgress => &mut board.ongoing,
                IssueStatus::Resolved => &mut board.resolved,
            };
            column.push(issue.clone());
        }
        board
    }

    #[must_use]
    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            new: self.new.len(),
            ongoing: self.ongoing.len(),
            resolved: self.resolved.len(),
            total: self.total,
        }
    }
}

/// Counts only, for table output and quick checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub new: usize,
    pub ongoing: usize,
    pub resolved: usize,
    pub total: usize,
}

/// Worker availability panel.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRoster {
    pub free: usize,
    pub onsite: usize,
    pub on_break: usize,
    pub total: usize,
    pub by_department: BTreeMap<String, Vec<Worker>>,
}

impl WorkerRoster {
    #[must_use]
    pub fn from_workers(workers: &[Worker]) -> Self {
        let mut roster = Self {
            total: workers.len(),
            ..Self::default()
        };
        for worker in workers {
            match worker.status {
                WorkerStatus::Free => roster.free += 1,
                WorkerStatus::Onsite => roster.onsite += 1,
                WorkerStatus::Break => roster.on_break += 1,
            }
            let department = if worker.department.trim().is_empty() {
                UNASSIGNED_DEPARTMENT.to_string()
            } else {
                worker.department.clone()
            };
            roster
                .by_department
                .entry(department)
                .or_default()
                .push(worker.clone());
        }
        roster
    }
}
