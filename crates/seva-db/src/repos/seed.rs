//! Sample data for demos and local development.

use chrono::Duration;
use serde::Serialize;
use seva_core::entities::{Assignment, Issue, Reporter, Worker};
use seva_core::enums::{
    AuditAction, EntityType, IssueCategory, IssuePriority, IssueStatus, WorkerStatus,
};
use seva_core::ids::{PREFIX_ISSUE, PREFIX_WORKER};

use crate::error::DatabaseError;
use crate::helpers::now_utc;
use crate::service::SevaService;

struct SampleWorker {
    name: &'static str,
    department: &'static str,
    status: WorkerStatus,
    phone: &'static str,
}

const SAMPLE_WORKERS: [SampleWorker; 4] = [
    SampleWorker {
        name: "Ravi Kumar",
        department: "Water",
        status: WorkerStatus::Free,
        phone: "9876543210",
    },
    SampleWorker {
        name: "Priya Singh",
        department: "Electricity",
        status: WorkerStatus::Onsite,
        phone: "9876543211",
    },
    SampleWorker {
        name: "Arjun Patel",
        department: "Roads",
        status: WorkerStatus::Free,
        phone: "9876543212",
    },
    SampleWorker {
        name: "Lakshmi Nair",
        department: "Sanitation",
        status: WorkerStatus::Break,
        phone: "9876543213",
    },
];

struct SampleIssue {
    title: &'static str,
    description: &'static str,
    category: IssueCategory,
    priority: IssuePriority,
    status: IssueStatus,
    ward: &'static str,
    location: &'static str,
    address: &'static str,
    reporter: &'static str,
    minutes_ago: i64,
    /// Index into `SAMPLE_WORKERS`.
    worker: Option<usize>,
}

const SAMPLE_ISSUES: [SampleIssue; 4] = [
    SampleIssue {
        title: "Broken Water Pipe",
        description: "Major water leak on MG Road causing flooding on the street. Urgent repair needed.",
        category: IssueCategory::Water,
        priority: IssuePriority::Urgent,
        status: IssueStatus::Open,
        ward: "Ward 5",
        location: "MG Road",
        address: "Near Central Mall, MG Road, Bangalore",
        reporter: "Rahul Sharma",
        minutes_ago: 4,
        worker: None,
    },
    SampleIssue {
        title: "Street Light Not Working",
        description: "Street lights have been off for 3 days in the residential area. Safety concern for residents.",
        category: IssueCategory::StreetLight,
        priority: IssuePriority::Medium,
        status: IssueStatus::Open,
        ward: "Ward 12",
        location: "Jayanagar 4th Block",
        address: "4th Cross, Jayanagar 4th Block",
        reporter: "Priya Menon",
        minutes_ago: 3,
        worker: None,
    },
    SampleIssue {
        title: "Pothole on Main Road",
        description: "Large pothole causing accidents. Multiple vehicles have been damaged.",
        category: IssueCategory::Pothole,
        priority: IssuePriority::Urgent,
        status: IssueStatus::Assigned,
        ward: "Ward 8",
        location: "Indiranagar",
        address: "100 Feet Road, Indiranagar",
        reporter: "Arun Kumar",
        minutes_ago: 2,
        worker: Some(2),
    },
    SampleIssue {
        title: "Garbage Not Collected",
        description: "Garbage has not been collected for a week. Bad smell and health hazard.",
        category: IssueCategory::Garbage,
        priority: IssuePriority::Medium,
        status: IssueStatus::InProgress,
        ward: "Ward 3",
        location: "Koramangala",
        address: "5th Block, Koramangala",
        reporter: "Meera Reddy",
        minutes_ago: 1,
        worker: Some(3),
    },
];

/// What `seed_sample_data` inserted.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub issues: Vec<Issue>,
    pub workers: Vec<Worker>,
}

impl SevaService {
    /// Insert four sample workers and four sample issues (two open, one
    /// assigned, one in progress). Running it twice inserts duplicates.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; earlier inserts remain.
    pub async fn seed_sample_data(&self) -> Result<SeedReport, DatabaseError> {
        let now = now_utc();

        let mut workers = Vec::with_capacity(SAMPLE_WORKERS.len());
        for sample in &SAMPLE_WORKERS {
            let worker = Worker {
                id: self.db().generate_id(PREFIX_WORKER).await?,
                name: sample.name.to_string(),
                department: sample.department.to_string(),
                status: sample.status,
                phone: sample.phone.to_string(),
                created_at: now,
            };
            self.insert_worker_record(&worker).await?;
            self.record_mutation(EntityType::Worker, &worker.id, AuditAction::Created, None)
                .await?;
            workers.push(worker);
        }

        let mut issues = Vec::with_capacity(SAMPLE_ISSUES.len());
        for sample in &SAMPLE_ISSUES {
            let created_at = now - Duration::minutes(sample.minutes_ago);
            let assigned_to = sample.worker.map(|idx| Assignment {
                worker_id: workers[idx].id.clone(),
                worker_name: workers[idx].name.clone(),
            });
            let issue = Issue {
                id: self.db().generate_id(PREFIX_ISSUE).await?,
                title: sample.title.to_string(),
                description: sample.description.to_string(),
                category: sample.category,
                location: sample.location.to_string(),
                address: Some(sample.address.to_string()),
                images: Vec::new(),
                status: sample.status,
                priority: sample.priority,
                ward: Some(sample.ward.to_string()),
                reported_by: Reporter {
                    user_id: None,
                    name: sample.reporter.to_string(),
                    email: None,
                },
                assigned_at: assigned_to.as_ref().map(|_| created_at),
                assigned_to,
                notes: None,
                created_at,
                updated_at: created_at,
            };
            self.insert_issue_record(&issue).await?;
            self.record_mutation(EntityType::Issue, &issue.id, AuditAction::Created, None)
                .await?;
            issues.push(issue);
        }

        tracing::info!(
            issues = issues.len(),
            workers = workers.len(),
            "seeded sample data"
        );
        Ok(SeedReport { issues, workers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;
    use seva_core::board::{BoardSummary, IssueBoard, WorkerRoster};
    use seva_core::filters::IssueFilter;

    #[tokio::test]
    async fn seeded_board_has_two_new_and_two_ongoing() {
        let svc = test_service().await;
        svc.seed_sample_data().await.unwrap();

        let issues = svc.list_issues(&IssueFilter::default(), None).await.unwrap();
        let board = IssueBoard::from_issues(&issues);
        assert_eq!(
            board.summary(),
            BoardSummary {
                new: 2,
                ongoing: 2,
                resolved: 0,
                total: 4
            }
        );

        let open = svc
            .list_issues(&IssueFilter::with_status(IssueStatus::Open), None)
            .await
            .unwrap();
        assert_eq!(open.len(), board.new.len());
    }

    #[tokio::test]
    async fn seeded_roster_matches_worker_statuses() {
        let svc = test_service().await;
        let report = svc.seed_sample_data().await.unwrap();
        let statuses: Vec<_> = report.workers.iter().map(|w| w.status).collect();
        assert_eq!(
            statuses,
            vec![
                WorkerStatus::Free,
                WorkerStatus::Onsite,
                WorkerStatus::Free,
                WorkerStatus::Break
            ]
        );
        let roster = WorkerRoster::from_workers(&svc.list_workers().await.unwrap());
        assert_eq!((roster.free, roster.onsite, roster.on_break), (2, 1, 1));
    }

    #[tokio::test]
    async fn list_order_is_newest_first() {
        let svc = test_service().await;
        svc.seed_sample_data().await.unwrap();
        let titles: Vec<_> = svc
            .list_issues(&IssueFilter::default(), None)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Garbage Not Collected",
                "Pothole on Main Road",
                "Street Light Not Working",
                "Broken Water Pipe"
            ]
        );
    }
}
