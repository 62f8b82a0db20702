//! Wire-shape checks: records serialize to camelCase JSON that validates
//! against their generated JSON Schema.

use chrono::Utc;
use schemars::schema_for;
use serde_json::json;
use seva_core::entities::{Assignment, AuditEntry, Issue, NewIssue, Reporter, Worker};
use seva_core::enums::{
    AuditAction, EntityType, IssueCategory, IssuePriority, IssueStatus, WorkerStatus,
};

fn schema_errors(schema: &serde_json::Value, instance: &serde_json::Value) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator.iter_errors(instance).map(|e| format!("{e}")).collect()
}

macro_rules! validates_against_schema {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = schema_errors(&schema, &instance);
            assert!(
                errors.is_empty(),
                "schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn assigned_issue() -> Issue {
    let now = Utc::now();
    Issue {
        id: "iss-a3f8b2c1".into(),
        title: "Pothole on Main Road".into(),
        description: "Large pothole causing traffic issues".into(),
        category: IssueCategory::Pothole,
        location: "Indiranagar".into(),
        address: Some("100 Feet Road, Indiranagar".into()),
        images: vec!["https://cdn.example/issues/u1/p.jpg".into()],
        status: IssueStatus::Assigned,
        priority: IssuePriority::Urgent,
        ward: Some("Ward 8".into()),
        reported_by: Reporter {
            user_id: Some("usr-0000beef".into()),
            name: "Amit Sharma".into(),
            email: Some("amit@example.org".into()),
        },
        assigned_to: Some(Assignment {
            worker_id: "wrk-0000cafe".into(),
            worker_name: "Arjun Patel".into(),
        }),
        notes: None,
        created_at: now,
        updated_at: now,
        assigned_at: Some(now),
    }
}

validates_against_schema!(issue_matches_schema, Issue, assigned_issue());

validates_against_schema!(
    worker_matches_schema,
    Worker,
    Worker {
        id: "wrk-0000cafe".into(),
        name: "Priya Singh".into(),
        department: "Electricity".into(),
        status: WorkerStatus::Onsite,
        phone: "9876543211".into(),
        created_at: Utc::now(),
    }
);

validates_against_schema!(
    audit_entry_matches_schema,
    AuditEntry,
    AuditEntry {
        id: "aud-00000001".into(),
        entity_type: EntityType::Issue,
        entity_id: "iss-a3f8b2c1".into(),
        action: AuditAction::StatusChanged,
        detail: Some(json!({"from": "assigned", "to": "in_progress", "notes": null})),
        created_at: Utc::now(),
    }
);

#[test]
fn issue_uses_camel_case_on_the_wire() {
    let value = serde_json::to_value(assigned_issue()).unwrap();
    assert_eq!(value["reportedBy"]["userId"], "usr-0000beef");
    assert_eq!(value["assignedTo"]["workerName"], "Arjun Patel");
    assert!(value.get("createdAt").is_some());
    assert!(value.get("assignedAt").is_some());
    assert!(value.get("reported_by").is_none());
}

#[test]
fn new_issue_schema_rejects_unknown_category() {
    let schema = serde_json::to_value(schema_for!(NewIssue)).unwrap();
    let bad = json!({"description": "d", "category": "electricity", "location": "l"});
    assert!(!schema_errors(&schema, &bad).is_empty());
    let good = json!({"description": "d", "category": "street-light", "location": "l"});
    assert!(schema_errors(&schema, &good).is_empty());
}
