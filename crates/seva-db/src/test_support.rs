//! Shared test utilities for seva-db unit tests.

use std::sync::Arc;

use seva_core::entities::{NewIssue, NewWorker, Reporter};
use seva_core::enums::{IssueCategory, IssuePriority, WorkerStatus};
use seva_storage::ImageStore;

use crate::SevaDb;
use crate::service::SevaService;

/// In-memory service without an image store.
pub async fn test_service() -> SevaService {
    let db = SevaDb::open_local(":memory:").await.unwrap();
    SevaService::from_db(db, None)
}

/// In-memory service with an in-memory image store.
pub async fn test_service_with_images() -> SevaService {
    let db = SevaDb::open_local(":memory:").await.unwrap();
    SevaService::from_db(db, Some(ImageStore::in_memory()))
}

pub async fn shared_service() -> Arc<SevaService> {
    Arc::new(test_service().await)
}

pub fn new_issue(category: IssueCategory, ward: &str) -> NewIssue {
    NewIssue {
        title: String::new(),
        description: "Reported from the field".into(),
        category,
        location: "MG Road".into(),
        address: None,
        priority: IssuePriority::Medium,
        ward: Some(ward.into()),
    }
}

pub fn new_worker(name: &str, department: &str, status: WorkerStatus) -> NewWorker {
    NewWorker {
        name: name.into(),
        department: department.into(),
        status,
        phone: "9876543210".into(),
    }
}

pub fn citizen() -> Reporter {
    Reporter {
        user_id: Some("usr-00000001".into()),
        name: "Asha".into(),
        email: Some("asha@example.org".into()),
    }
}
