//! End-to-end tests over the public `SevaService` API with a database file.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use pretty_assertions::assert_eq;
use seva_config::DatabaseConfig;
use seva_core::board::IssueBoard;
use seva_core::entities::{NewIssue, Reporter};
use seva_core::enums::{IssueCategory, IssuePriority, IssueStatus};
use seva_core::filters::IssueFilter;
use seva_db::service::SevaService;
use tokio::time::timeout;

fn pothole() -> NewIssue {
    NewIssue {
        title: "Crater near school".into(),
        description: "Two-wheelers keep falling".into(),
        category: IssueCategory::Pothole,
        location: "Indiranagar".into(),
        address: None,
        priority: IssuePriority::High,
        ward: Some("Ward 8".into()),
    }
}

#[tokio::test]
async fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("nested/seva.db").display().to_string(),
    };

    let id = {
        let svc = SevaService::from_config(&config, None).await.unwrap();
        let issue = svc.create_issue(&pothole(), None, &Reporter::guest()).await.unwrap();
        svc.assign_issue_to_worker(&issue.id, "wrk-0000abcd", "Arjun Patel")
            .await
            .unwrap();
        issue.id
    };

    let svc = SevaService::from_config(&config, None).await.unwrap();
    let issue = svc.get_issue(&id).await.unwrap();
    assert_eq!(issue.status, IssueStatus::Assigned);
    assert_eq!(issue.assigned_to.unwrap().worker_name, "Arjun Patel");
    assert_eq!(issue.reported_by, Reporter::guest());
}

#[tokio::test]
async fn seeded_board_and_live_stream_agree() {
    let svc = Arc::new(SevaService::new_local(":memory:", None).await.unwrap());
    svc.seed_sample_data().await.unwrap();

    let mut stream = Box::pin(
        svc.live_issues(IssueFilter::with_status(IssueStatus::Open))
            .into_stream(),
    );
    let first = loop {
        let state = timeout(Duration::from_secs(2), stream.next())
            .await
            .unwrap()
            .unwrap();
        if !state.loading {
            break state;
        }
    };
    assert_eq!(first.items.len(), 2);

    let all = svc.list_issues(&IssueFilter::default(), None).await.unwrap();
    assert_eq!(IssueBoard::from_issues(&all).new.len(), first.items.len());

    let target = first.items[0].id.clone();
    svc.assign_issue_to_worker(&target, "wrk-00000001", "Ravi Kumar")
        .await
        .unwrap();
    let next = timeout(Duration::from_secs(2), stream.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.items.len(), 1);
    assert!(next.items.iter().all(|i| i.status == IssueStatus::Open));
}
