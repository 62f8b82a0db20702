//! Issue repository: reporting, assignment, status updates, live queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;

use seva_core::audit_detail::{AssignedDetail, StatusChangedDetail};
use seva_core::entities::{Assignment, Issue, NewComplaint, NewIssue, Reporter};
use seva_core::enums::{AuditAction, EntityType, IssueStatus};
use seva_core::filters::IssueFilter;
use seva_core::ids::PREFIX_ISSUE;
use seva_storage::ImageUpload;

use crate::error::DatabaseError;
use crate::feed::{LiveQuery, SnapshotQuery, Subscription};
use crate::helpers::{
    format_datetime, get_opt_string, now_utc, parse_datetime, parse_enum,
    parse_optional_datetime, parse_string_list,
};
use crate::service::SevaService;
use crate::updates::issue::IssueUpdate;

const SELECT_COLS: &str = "id, title, description, category, location, address, images, status, \
     priority, ward, reporter_user_id, reporter_name, reporter_email, assigned_worker_id, \
     assigned_worker_name, notes, created_at, updated_at, assigned_at";

fn row_to_issue(row: &libsql::Row) -> Result<Issue, DatabaseError> {
    let assigned_to = match get_opt_string(row, 13)? {
        Some(worker_id) => Some(Assignment {
            worker_id,
            worker_name: get_opt_string(row, 14)?.unwrap_or_default(),
        }),
        None => None,
    };
    Ok(Issue {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: parse_enum(&row.get::<String>(3)?)?,
        location: row.get(4)?,
        address: get_opt_string(row, 5)?,
        images: parse_string_list(&row.get::<String>(6)?)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        priority: parse_enum(&row.get::<String>(8)?)?,
        ward: get_opt_string(row, 9)?,
        reported_by: Reporter {
            user_id: get_opt_string(row, 10)?,
            name: row.get(11)?,
            email: get_opt_string(row, 12)?,
        },
        assigned_to,
        notes: get_opt_string(row, 15)?,
        created_at: parse_datetime(&row.get::<String>(16)?)?,
        updated_at: parse_datetime(&row.get::<String>(17)?)?,
        assigned_at: parse_optional_datetime(get_opt_string(row, 18)?.as_deref())?,
    })
}

/// WHERE clause (possibly empty) and its positional params.
fn filter_clause(filter: &IssueFilter) -> (String, Vec<libsql::Value>) {
    let mut conditions = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(status) = filter.status {
        params.push(status.as_str().into());
        conditions.push(format!("status = ?{}", params.len()));
    }
    if let Some(priority) = filter.priority {
        params.push(priority.as_str().into());
        conditions.push(format!("priority = ?{}", params.len()));
    }
    if let Some(category) = filter.category {
        params.push(category.as_str().into());
        conditions.push(format!("category = ?{}", params.len()));
    }
    if let Some(ref ward) = filter.ward {
        params.push(ward.clone().into());
        conditions.push(format!("ward = ?{}", params.len()));
    }
    if let Some(ref user_id) = filter.reporter {
        params.push(user_id.clone().into());
        conditions.push(format!("reporter_user_id = ?{}", params.len()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

fn opt_text(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

fn opt_datetime(value: Option<&DateTime<Utc>>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |dt| format_datetime(dt).into())
}

impl SevaService {
    /// Report a new issue with status `open`.
    ///
    /// The image, if any, is uploaded first. An upload failure is logged and
    /// the issue is stored without images. A failed write propagates and any
    /// uploaded image stays in the store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if a required field is empty, or
    /// `DatabaseError` if the insert fails.
    pub async fn create_issue(
        &self,
        new_issue: &NewIssue,
        image: Option<ImageUpload>,
        reporter: &Reporter,
    ) -> Result<Issue, DatabaseError> {
        new_issue.validate()?;
        let images = match image {
            Some(upload) => self.upload_for_issue(upload).await.into_iter().collect(),
            None => Vec::new(),
        };
        self.insert_reported_issue(new_issue, images, reporter).await
    }

    /// Store a complaint as an issue (status `open`, priority `low`).
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_issue`].
    pub async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Issue, DatabaseError> {
        let new_issue = complaint.to_new_issue();
        new_issue.validate()?;
        let images = complaint
            .images
            .iter()
            .filter(|url| !url.is_empty())
            .cloned()
            .collect();
        self.insert_reported_issue(&new_issue, images, &Reporter::guest())
            .await
    }

    async fn upload_for_issue(&self, upload: ImageUpload) -> Option<String> {
        let Some(store) = self.images() else {
            tracing::warn!(
                file = %upload.file_name,
                "image attached but no image store configured, dropping it"
            );
            return None;
        };
        // One folder per upload, keyed by time, so equal file names never collide.
        let owner = Utc::now().timestamp_millis().to_string();
        match store
            .upload_issue_image(&owner, &upload.file_name, upload.bytes)
            .await
        {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::warn!(%error, file = %upload.file_name, "image upload failed, storing issue without images");
                None
            }
        }
    }

    async fn insert_reported_issue(
        &self,
        new_issue: &NewIssue,
        images: Vec<String>,
        reporter: &Reporter,
    ) -> Result<Issue, DatabaseError> {
        let now = now_utc();
        let issue = Issue {
            id: self.db().generate_id(PREFIX_ISSUE).await?,
            title: new_issue.effective_title().to_string(),
            description: new_issue.description.trim().to_string(),
            category: new_issue.category,
            location: new_issue.location.trim().to_string(),
            address: new_issue.address.clone().filter(|a| !a.trim().is_empty()),
            images,
            status: IssueStatus::Open,
            priority: new_issue.priority,
            ward: new_issue.ward.clone().filter(|w| !w.trim().is_empty()),
            reported_by: reporter.clone(),
            assigned_to: None,
            notes: None,
            created_at: now,
            updated_at: now,
            assigned_at: None,
        };
        self.insert_issue_record(&issue).await?;
        self.record_mutation(EntityType::Issue, &issue.id, AuditAction::Created, None)
            .await?;
        Ok(issue)
    }

    /// Insert a fully formed record as-is. Used by creation, seeding, and
    /// import; callers record the audit entry.
    pub(crate) async fn insert_issue_record(&self, issue: &Issue) -> Result<(), DatabaseError> {
        let images = serde_json::to_string(&issue.images)?;
        let assigned = issue.assigned_to.as_ref();
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO issues ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
                ),
                libsql::params_from_iter(vec![
                    libsql::Value::from(issue.id.as_str()),
                    issue.title.as_str().into(),
                    issue.description.as_str().into(),
                    issue.category.as_str().into(),
                    issue.location.as_str().into(),
                    opt_text(issue.address.as_deref()),
                    images.into(),
                    issue.status.as_str().into(),
                    issue.priority.as_str().into(),
                    opt_text(issue.ward.as_deref()),
                    opt_text(issue.reported_by.user_id.as_deref()),
                    issue.reported_by.name.as_str().into(),
                    opt_text(issue.reported_by.email.as_deref()),
                    opt_text(assigned.map(|a| a.worker_id.as_str())),
                    opt_text(assigned.map(|a| a.worker_name.as_str())),
                    opt_text(issue.notes.as_deref()),
                    format_datetime(&issue.created_at).into(),
                    format_datetime(&issue.updated_at).into(),
                    opt_datetime(issue.assigned_at.as_ref()),
                ]),
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no issue has this id.
    pub async fn get_issue(&self, id: &str) -> Result<Issue, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM issues WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Issue, id))?;
        row_to_issue(&row)
    }

    /// One-shot query, newest first. `limit = None` returns every match.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is unreadable.
    pub async fn list_issues(
        &self,
        filter: &IssueFilter,
        limit: Option<u32>,
    ) -> Result<Vec<Issue>, DatabaseError> {
        let (where_clause, mut params) = filter_clause(filter);
        let limit_clause = match limit {
            Some(limit) => {
                params.push(i64::from(limit).into());
                format!("LIMIT ?{}", params.len())
            }
            None => String::new(),
        };
        let sql = format!(
            "SELECT {SELECT_COLS} FROM issues {where_clause}
             ORDER BY created_at DESC, rowid DESC {limit_clause}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut issues = Vec::new();
        while let Some(row) = rows.next().await? {
            issues.push(row_to_issue(&row)?);
        }
        Ok(issues)
    }

    /// Partial update of the descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id, or
    /// `DatabaseError::Validation` if a required text field is set empty.
    pub async fn update_issue(
        &self,
        issue_id: &str,
        update: IssueUpdate,
    ) -> Result<Issue, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        for (column, value) in [
            ("title", update.title.as_deref()),
            ("description", update.description.as_deref()),
            ("location", update.location.as_deref()),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(DatabaseError::Validation(format!("{column} cannot be empty")));
                }
                params.push(value.trim().into());
                sets.push(format!("{column} = ?{}", params.len()));
            }
        }
        if let Some(category) = update.category {
            params.push(category.as_str().into());
            sets.push(format!("category = ?{}", params.len()));
        }
        if let Some(priority) = update.priority {
            params.push(priority.as_str().into());
            sets.push(format!("priority = ?{}", params.len()));
        }
        if let Some(ref ward) = update.ward {
            params.push(opt_text(ward.as_deref()));
            sets.push(format!("ward = ?{}", params.len()));
        }
        if let Some(ref address) = update.address {
            params.push(opt_text(address.as_deref()));
            sets.push(format!("address = ?{}", params.len()));
        }

        if sets.is_empty() {
            return self.get_issue(issue_id).await;
        }

        params.push(format_datetime(&Utc::now()).into());
        sets.push(format!("updated_at = ?{}", params.len()));
        params.push(issue_id.into());
        let sql = format!(
            "UPDATE issues SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::Issue, issue_id));
        }

        self.record_mutation(
            EntityType::Issue,
            issue_id,
            AuditAction::Updated,
            Some(serde_json::to_value(&update)?),
        )
        .await?;
        self.get_issue(issue_id).await
    }

    /// Hand an issue to a worker: status `assigned`, worker reference, and
    /// assignment time. A later call overwrites the assignment. The worker
    /// record is not read or changed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown issue id, or
    /// `DatabaseError::Validation` for an empty worker id.
    pub async fn assign_issue_to_worker(
        &self,
        issue_id: &str,
        worker_id: &str,
        worker_name: &str,
    ) -> Result<Issue, DatabaseError> {
        if worker_id.trim().is_empty() {
            return Err(DatabaseError::Validation("worker id is required".into()));
        }
        let previous = self.get_issue(issue_id).await?;
        let now = format_datetime(&Utc::now());

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE issues
                 SET status = ?1, assigned_worker_id = ?2, assigned_worker_name = ?3,
                     assigned_at = ?4, updated_at = ?4
                 WHERE id = ?5",
                libsql::params![
                    IssueStatus::Assigned.as_str(),
                    worker_id,
                    worker_name,
                    now.as_str(),
                    issue_id
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::Issue, issue_id));
        }

        let detail = AssignedDetail {
            worker_id: worker_id.to_string(),
            worker_name: worker_name.to_string(),
            previous_worker_id: previous.assigned_to.map(|a| a.worker_id),
        };
        self.record_mutation(
            EntityType::Issue,
            issue_id,
            AuditAction::Assigned,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;
        self.get_issue(issue_id).await
    }

    /// Overwrite the status, and the notes when given. Any transition is
    /// accepted; leaving the usual lifecycle order is logged.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown issue id.
    pub async fn update_issue_status(
        &self,
        issue_id: &str,
        status: IssueStatus,
        notes: Option<&str>,
    ) -> Result<Issue, DatabaseError> {
        let current = self.get_issue(issue_id).await?;
        if current.status != status && !current.status.can_transition_to(status) {
            tracing::warn!(
                issue_id,
                from = %current.status,
                to = %status,
                "status change outside the usual lifecycle"
            );
        }

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE issues SET status = ?1, notes = COALESCE(?2, notes), updated_at = ?3
                 WHERE id = ?4",
                libsql::params![
                    status.as_str(),
                    notes,
                    format_datetime(&Utc::now()),
                    issue_id
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found(EntityType::Issue, issue_id));
        }

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: status.as_str().to_string(),
            notes: notes.map(String::from),
        };
        self.record_mutation(
            EntityType::Issue,
            issue_id,
            AuditAction::StatusChanged,
            Some(serde_json::to_value(&detail)?),
        )
        .await?;
        self.get_issue(issue_id).await
    }

    fn issue_snapshot_query(self: &Arc<Self>, filter: IssueFilter) -> SnapshotQuery<Issue> {
        let svc = Arc::clone(self);
        Box::new(move || {
            let svc = Arc::clone(&svc);
            let filter = filter.clone();
            async move { svc.list_issues(&filter, None).await }.boxed()
        })
    }

    /// Live feed of every issue matching `filter`, newest first.
    ///
    /// `callback` receives the full result set now and again after every
    /// change to the issue set. Failed re-queries are logged and skipped.
    pub fn subscribe_issues<F>(self: &Arc<Self>, filter: IssueFilter, mut callback: F) -> Subscription
    where
        F: FnMut(Vec<Issue>) + Send + 'static,
    {
        let query = self.issue_snapshot_query(filter);
        Subscription::spawn(self.feed(), EntityType::Issue, query, move |result| match result {
            Ok(issues) => callback(issues),
            Err(error) => tracing::warn!(%error, "issue subscription re-query failed"),
        })
    }

    /// Same feed as [`Self::subscribe_issues`], held in a watch channel.
    #[must_use]
    pub fn live_issues(self: &Arc<Self>, filter: IssueFilter) -> LiveQuery<Issue> {
        LiveQuery::spawn(self.feed(), EntityType::Issue, self.issue_snapshot_query(filter))
    }
}
