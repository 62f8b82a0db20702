//! Normalization of issue and worker records written in older shapes.
//!
//! Two write paths used to exist side by side, so exported records disagree on
//! status spelling, assignment shape, reporter shape, image field, and
//! timestamp encoding. Everything funnels through here into the canonical
//! [`Issue`] and [`Worker`] structs; nothing downstream sees the old shapes.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::entities::{Assignment, Issue, Reporter, Worker};
use crate::enums::{IssueCategory, IssuePriority, IssueStatus, WorkerStatus};
use crate::errors::CoreError;

/// Map any known status spelling onto [`IssueStatus`].
///
/// # Errors
///
/// Returns `CoreError::Validation` for unrecognized values.
pub fn parse_status(raw: &str) -> Result<IssueStatus, CoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "open" | "pending" | "new" => Ok(IssueStatus::Open),
        "assigned" => Ok(IssueStatus::Assigned),
        "in_progress" | "in-progress" | "inprogress" => Ok(IssueStatus::InProgress),
        "resolved" => Ok(IssueStatus::Resolved),
        other => Err(CoreError::validation(format!("unknown issue status: {other}"))),
    }
}

/// Map a category or one of its old aliases. Unknown values become `other`.
#[must_use]
pub fn parse_category(raw: &str) -> IssueCategory {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pothole" | "road" | "roads" => IssueCategory::Pothole,
        "garbage" | "sanitation" => IssueCategory::Garbage,
        "street-light" | "street_light" | "streetlight" | "electricity" => {
            IssueCategory::StreetLight
        }
        "water" => IssueCategory::Water,
        _ => IssueCategory::Other,
    }
}

/// # Errors
///
/// Returns `CoreError::Validation` for unrecognized values.
pub fn parse_priority(raw: &str) -> Result<IssuePriority, CoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(IssuePriority::Low),
        "medium" | "normal" => Ok(IssuePriority::Medium),
        "high" => Ok(IssuePriority::High),
        "urgent" | "critical" => Ok(IssuePriority::Urgent),
        other => Err(CoreError::validation(format!("unknown issue priority: {other}"))),
    }
}

/// Convert one exported issue object into the canonical record.
///
/// `id` becomes the record id; any id inside `value` is ignored.
///
/// # Errors
///
/// Returns `CoreError::Validation` when `value` is not an object, the status
/// or priority is unrecognized, or a timestamp cannot be read.
pub fn normalize_issue(id: &str, value: &Value) -> Result<Issue, CoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| CoreError::validation("issue record must be a JSON object"))?;

    let category = str_field(obj, "category").map_or(IssueCategory::Other, parse_category);
    let status = str_field(obj, "status").map_or(Ok(IssueStatus::Open), parse_status)?;
    let priority = str_field(obj, "priority").map_or(Ok(IssuePriority::default()), parse_priority)?;

    let title = str_field(obj, "title")
        .filter(|t| !t.trim().is_empty())
        .map_or_else(|| category.default_title().to_string(), str::to_string);

    let now = Utc::now();
    let created_at = timestamp_field(obj, "createdAt")?.unwrap_or(now);
    let updated_at = timestamp_field(obj, "updatedAt")?.unwrap_or(created_at);

    Ok(Issue {
        id: id.to_string(),
        title,
        description: str_field(obj, "description").unwrap_or_default().to_string(),
        category,
        location: str_field(obj, "location").unwrap_or_default().to_string(),
        address: opt_string(obj, "address"),
        images: images(obj),
        status,
        priority,
        ward: opt_string(obj, "ward"),
        reported_by: reporter(obj),
        assigned_to: assignment(obj),
        notes: opt_string(obj, "notes"),
        created_at,
        updated_at,
        assigned_at: timestamp_field(obj, "assignedAt")?,
    })
}

/// Convert one exported worker object into the canonical record.
///
/// # Errors
///
/// Returns `CoreError::Validation` when `value` is not an object, has no
/// name, or carries an unknown status.
pub fn normalize_worker(id: &str, value: &Value) -> Result<Worker, CoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| CoreError::validation("worker record must be a JSON object"))?;
    let name = str_field(obj, "name")
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| CoreError::validation("worker name is required"))?;
    let status = match str_field(obj, "status").map(|s| s.trim().to_ascii_lowercase()) {
        None => WorkerStatus::Free,
        Some(s) => match s.as_str() {
            "free" | "available" => WorkerStatus::Free,
            "onsite" | "on-site" | "on_site" | "busy" => WorkerStatus::Onsite,
            "break" | "on-break" | "on_break" => WorkerStatus::Break,
            other => {
                return Err(CoreError::validation(format!(
                    "unknown worker status: {other}"
                )));
            }
        },
    };
    // Phone numbers were sometimes exported as JSON numbers.
    let phone = match obj.get("phone") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Ok(Worker {
        id: id.to_string(),
        name: name.to_string(),
        department: str_field(obj, "department").unwrap_or_default().to_string(),
        status,
        phone,
        created_at: timestamp_field(obj, "createdAt")?.unwrap_or_else(Utc::now),
    })
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn opt_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    str_field(obj, key)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn images(obj: &Map<String, Value>) -> Vec<String> {
    if let Some(Value::Array(items)) = obj.get("images") {
        return items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    opt_string(obj, "imageUrl").into_iter().collect()
}

fn reporter(obj: &Map<String, Value>) -> Reporter {
    match obj.get("reportedBy") {
        Some(Value::Object(r)) => Reporter {
            user_id: opt_string(r, "userId"),
            name: opt_string(r, "name").unwrap_or_else(|| Reporter::guest().name),
            email: opt_string(r, "email"),
        },
        Some(Value::String(name)) if !name.trim().is_empty() => Reporter {
            user_id: None,
            name: name.clone(),
            email: None,
        },
        _ => Reporter::guest(),
    }
}

fn assignment(obj: &Map<String, Value>) -> Option<Assignment> {
    match obj.get("assignedTo") {
        Some(Value::Object(a)) => {
            let worker_id = opt_string(a, "workerId")?;
            let worker_name = opt_string(a, "workerName").unwrap_or_default();
            Some(Assignment {
                worker_id,
                worker_name,
            })
        }
        Some(Value::String(worker_id)) if !worker_id.is_empty() => Some(Assignment {
            worker_id: worker_id.clone(),
            worker_name: opt_string(obj, "assignedToName").unwrap_or_default(),
        }),
        _ => opt_string(obj, "assignedWorker").map(|worker_id| Assignment {
            worker_id,
            worker_name: opt_string(obj, "assignedToName").unwrap_or_default(),
        }),
    }
}

/// Read a timestamp stored as epoch milliseconds, an RFC 3339 string, or a
/// `{seconds, nanoseconds}` object. Absent or null yields `None`.
fn timestamp_field(obj: &Map<String, Value>, key: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
    let invalid = || CoreError::validation(format!("invalid timestamp in {key}"));
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            let millis = n.as_i64().ok_or_else(invalid)?;
            Utc.timestamp_millis_opt(millis).single().map(Some).ok_or_else(invalid)
        }
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| invalid()),
        Some(Value::Object(ts)) => {
            let seconds = ts
                .get("seconds")
                .or_else(|| ts.get("_seconds"))
                .and_then(Value::as_i64)
                .ok_or_else(invalid)?;
            let nanos = ts
                .get("nanoseconds")
                .or_else(|| ts.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos)
                .single()
                .map(Some)
                .ok_or_else(invalid)
        }
        Some(_) => Err(invalid()),
    }
}
