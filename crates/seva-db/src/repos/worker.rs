//! Worker repository. Filtering by status or department happens client-side
//! over the full list (see `seva_core::filters`).

use std::sync::Arc;

use futures::FutureExt;
use seva_core::entities::{NewWorker, Worker};
use seva_core::enums::{AuditAction, EntityType};
use seva_core::ids::PREFIX_WORKER;

use crate::error::DatabaseError;
use crate::feed::{LiveQuery, SnapshotQuery, Subscription};
use crate::helpers::{format_datetime, now_utc, parse_datetime, parse_enum};
use crate::service::SevaService;

const SELECT_COLS: &str = "id, name, department, status, phone, created_at";

fn row_to_worker(row: &libsql::Row) -> Result<Worker, DatabaseError> {
    Ok(Worker {
        id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        phone: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl SevaService {
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for an empty name, or
    /// `DatabaseError` if the insert fails.
    pub async fn create_worker(&self, new_worker: &NewWorker) -> Result<Worker, DatabaseError> {
        let name = new_worker.name.trim();
        if name.is_empty() {
            return Err(DatabaseError::Validation("worker name is required".into()));
        }
        let worker = Worker {
            id: self.db().generate_id(PREFIX_WORKER).await?,
            name: name.to_string(),
            department: new_worker.department.trim().to_string(),
            status: new_worker.status,
            phone: new_worker.phone.trim().to_string(),
            created_at: now_utc(),
        };
        self.insert_worker_record(&worker).await?;
        self.record_mutation(EntityType::Worker, &worker.id, AuditAction::Created, None)
            .await?;
        Ok(worker)
    }

    pub(crate) async fn insert_worker_record(&self, worker: &Worker) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO workers ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    worker.id.as_str(),
                    worker.name.as_str(),
                    worker.department.as_str(),
                    worker.status.as_str(),
                    worker.phone.as_str(),
                    format_datetime(&worker.created_at)
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no worker has this id.
    pub async fn get_worker(&self, id: &str) -> Result<Worker, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM workers WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Worker, id))?;
        row_to_worker(&row)
    }

    /// Every worker, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_workers(&self) -> Result<Vec<Worker>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM workers ORDER BY name COLLATE NOCASE, id"),
                (),
            )
            .await?;
        let mut workers = Vec::new();
        while let Some(row) = rows.next().await? {
            workers.push(row_to_worker(&row)?);
        }
        Ok(workers)
    }

    fn worker_snapshot_query(self: &Arc<Self>) -> SnapshotQuery<Worker> {
        let svc = Arc::clone(self);
        Box::new(move || {
            let svc = Arc::clone(&svc);
            async move { svc.list_workers().await }.boxed()
        })
    }

    /// Live feed of the full worker list.
    pub fn subscribe_workers<F>(self: &Arc<Self>, mut callback: F) -> Subscription
    where
        F: FnMut(Vec<Worker>) + Send + 'static,
    {
        Subscription::spawn(
            self.feed(),
            EntityType::Worker,
            self.worker_snapshot_query(),
            move |result| match result {
                Ok(workers) => callback(workers),
                Err(error) => tracing::warn!(%error, "worker subscription re-query failed"),
            },
        )
    }

    #[must_use]
    pub fn live_workers(self: &Arc<Self>) -> LiveQuery<Worker> {
        LiveQuery::spawn(self.feed(), EntityType::Worker, self.worker_snapshot_query())
    }
}
