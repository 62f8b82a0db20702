//! Bulk import of exported records written in older shapes.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use seva_core::audit_detail::ImportedDetail;
use seva_core::entities::Issue;
use seva_core::enums::{AuditAction, EntityType};
use seva_core::ids::{PREFIX_ISSUE, PREFIX_WORKER};
use seva_core::legacy;

use crate::error::DatabaseError;
use crate::service::SevaService;

/// Outcome of [`SevaService::import_legacy`].
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    pub issues: usize,
    pub workers: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// A record that could not be normalized. Nothing was written for it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedRecord {
    pub collection: String,
    pub legacy_id: String,
    pub reason: String,
}

/// Yield `(legacy_id, record)` pairs from either an id-keyed map or an array.
///
/// Array entries use their own `id` field when present, otherwise their index.
fn entries(collection: &Value) -> Vec<(String, Value)> {
    match collection {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                let id = v
                    .get("id")
                    .and_then(Value::as_str)
                    .map_or_else(|| idx.to_string(), str::to_string);
                (id, v.clone())
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Complaints were written without a priority and meant "low".
fn complaint_defaults(mut record: Value) -> Value {
    if let Some(obj) = record.as_object_mut() {
        obj.entry("priority")
            .or_insert_with(|| Value::String("low".into()));
    }
    record
}

impl SevaService {
    /// Import an export document with optional `issues`, `complaints` and
    /// `workers` collections. Every imported record gets a fresh id; the old
    /// one is kept in the audit detail.
    ///
    /// Records that fail normalization are skipped and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if `document` is not an object, or
    /// any error from the inserts themselves.
    pub async fn import_legacy(&self, document: &Value) -> Result<ImportReport, DatabaseError> {
        let obj = document
            .as_object()
            .ok_or_else(|| DatabaseError::Validation("import document must be a JSON object".into()))?;
        let mut report = ImportReport::default();

        // Workers first, so issue assignments can be pointed at the new ids.
        let mut worker_ids: HashMap<String, (String, String)> = HashMap::new();
        if let Some(records) = obj.get("workers") {
            for (legacy_id, record) in entries(records) {
                let id = self.db().generate_id(PREFIX_WORKER).await?;
                match legacy::normalize_worker(&id, &record) {
                    Ok(worker) => {
                        self.insert_worker_record(&worker).await?;
                        worker_ids
                            .insert(legacy_id.clone(), (worker.id.clone(), worker.name.clone()));
                        self.record_imported(EntityType::Worker, &worker.id, &legacy_id)
                            .await?;
                        report.workers += 1;
                    }
                    Err(e) => report.skip("workers", legacy_id, &e),
                }
            }
        }

        for collection in ["issues", "complaints"] {
            let Some(records) = obj.get(collection) else {
                continue;
            };
            for (legacy_id, record) in entries(records) {
                let record = if collection == "complaints" {
                    complaint_defaults(record)
                } else {
                    record
                };
                let id = self.db().generate_id(PREFIX_ISSUE).await?;
                match legacy::normalize_issue(&id, &record) {
                    Ok(mut issue) => {
                        remap_assignment(&mut issue, &worker_ids);
                        self.insert_issue_record(&issue).await?;
                        self.record_imported(EntityType::Issue, &issue.id, &legacy_id)
                            .await?;
                        report.issues += 1;
                    }
                    Err(e) => report.skip(collection, legacy_id, &e),
                }
            }
        }

        tracing::info!(
            issues = report.issues,
            workers = report.workers,
            skipped = report.skipped.len(),
            "legacy import finished"
        );
        Ok(report)
    }

    async fn record_imported(
        &self,
        entity_type: EntityType,
        id: &str,
        legacy_id: &str,
    ) -> Result<(), DatabaseError> {
        let detail = serde_json::to_value(ImportedDetail {
            legacy_id: legacy_id.to_string(),
        })?;
        self.record_mutation(entity_type, id, AuditAction::Imported, Some(detail))
            .await
    }
}

/// Point an imported assignment at the worker imported from the same
/// document. Unknown legacy ids are kept as they are.
fn remap_assignment(issue: &mut Issue, worker_ids: &HashMap<String, (String, String)>) {
    let Some(assignment) = issue.assigned_to.as_mut() else {
        return;
    };
    if let Some((new_id, name)) = worker_ids.get(&assignment.worker_id) {
        assignment.worker_id.clone_from(new_id);
        if assignment.worker_name.is_empty() {
            assignment.worker_name.clone_from(name);
        }
    }
}

impl ImportReport {
    fn skip(&mut self, collection: &str, legacy_id: String, reason: &impl std::fmt::Display) {
        tracing::warn!(collection, %legacy_id, %reason, "skipping record");
        self.skipped.push(SkippedRecord {
            collection: collection.to_string(),
            legacy_id,
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;
    use seva_core::enums::{IssueCategory, IssuePriority, IssueStatus, WorkerStatus};
    use seva_core::filters::IssueFilter;
    use serde_json::json;

    #[tokio::test]
    async fn mixed_shapes_are_normalized() {
        let svc = test_service().await;
        let doc = json!({
            "issues": {
                "-Nabc": {
                    "title": "Road damage",
                    "description": "Cracked surface",
                    "category": "roads",
                    "location": "Ward 8",
                    "status": "in-progress",
                    "assignedTo": "w1",
                    "assignedToName": "Arjun",
                    "createdAt": 1_700_000_000_000_i64
                }
            },
            "complaints": [
                {"id": "c1", "description": "Overflowing bin", "category": "sanitation", "status": "pending"}
            ],
            "workers": [
                {"name": "Ravi", "department": "Water", "status": "available", "phone": 9_876_543_210_i64}
            ]
        });

        let report = svc.import_legacy(&doc).await.unwrap();
        assert_eq!((report.issues, report.workers), (2, 1));
        assert!(report.skipped.is_empty());

        let issues = svc.list_issues(&IssueFilter::default(), None).await.unwrap();
        let road = issues.iter().find(|i| i.title == "Road damage").unwrap();
        assert_eq!(road.category, IssueCategory::Pothole);
        assert_eq!(road.status, IssueStatus::InProgress);
        assert_eq!(road.assigned_to.as_ref().unwrap().worker_name, "Arjun");

        let bin = issues.iter().find(|i| i.description == "Overflowing bin").unwrap();
        assert_eq!(bin.priority, IssuePriority::Low);
        assert_eq!(bin.status, IssueStatus::Open);
        assert_eq!(bin.title, "Garbage Dump");

        let workers = svc.list_workers().await.unwrap();
        assert_eq!(workers[0].status, WorkerStatus::Free);
        assert_eq!(workers[0].phone, "9876543210");
    }

    #[tokio::test]
    async fn bad_records_are_skipped_not_fatal() {
        let svc = test_service().await;
        let doc = json!({
            "issues": [{"id": "x1", "description": "d", "status": "archived"}],
            "workers": {"w9": {"department": "Roads"}}
        });
        let report = svc.import_legacy(&doc).await.unwrap();
        assert_eq!((report.issues, report.workers), (0, 0));
        let ids: Vec<_> = report.skipped.iter().map(|s| s.legacy_id.as_str()).collect();
        assert_eq!(ids, vec!["w9", "x1"]);
        assert!(report.skipped[1].reason.contains("archived"));
    }

    #[tokio::test]
    async fn legacy_id_lands_in_audit_detail() {
        let svc = test_service().await;
        let doc = json!({"workers": {"old-7": {"name": "Lakshmi", "status": "on-break"}}});
        svc.import_legacy(&doc).await.unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                action: Some(AuditAction::Imported),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].detail, Some(json!({"legacy_id": "old-7"})));
    }

    #[tokio::test]
    async fn non_object_document_is_rejected() {
        let svc = test_service().await;
        let err = svc.import_legacy(&json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn assignments_follow_imported_worker_ids() {
        let svc = test_service().await;
        let doc = json!({
            "issues": {
                "i1": {
                    "description": "Leaking main",
                    "category": "water",
                    "location": "Ward 5",
                    "status": "assigned",
                    "assignedTo": {"workerId": "w1"}
                },
                "i2": {
                    "description": "Dark street",
                    "category": "street-light",
                    "location": "Ward 2",
                    "status": "assigned",
                    "assignedWorker": "w-gone",
                    "assignedToName": "Someone"
                }
            },
            "workers": {"w1": {"name": "Ravi Kumar", "status": "onsite"}}
        });
        svc.import_legacy(&doc).await.unwrap();

        let workers = svc.list_workers().await.unwrap();
        assert_eq!(workers.len(), 1);
        let issues = svc.list_issues(&IssueFilter::default(), None).await.unwrap();

        let leak = issues.iter().find(|i| i.description == "Leaking main").unwrap();
        let assignment = leak.assigned_to.as_ref().unwrap();
        assert_eq!(assignment.worker_id, workers[0].id);
        assert_eq!(assignment.worker_name, "Ravi Kumar");

        let dark = issues.iter().find(|i| i.description == "Dark street").unwrap();
        assert_eq!(dark.assigned_to.as_ref().unwrap().worker_id, "w-gone");
    }
}
