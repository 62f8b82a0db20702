use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use seva_core::entities::{NewWorker, Worker};
use seva_core::enums::WorkerStatus;
use seva_core::filters::{workers_by_department, workers_by_status};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WorkerQuery {
    pub status: Option<WorkerStatus>,
    pub department: Option<String>,
}

/// Filtering happens over the full set, after the query.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<WorkerQuery>, QueryRejection>,
) -> Result<Json<Vec<Worker>>, ApiError> {
    let Query(query) = query?;
    let mut workers = state.store.list_workers().await?;
    if let Some(status) = query.status {
        workers = workers_by_status(&workers, status).into_iter().cloned().collect();
    }
    if let Some(department) = query.department.as_deref() {
        workers = workers_by_department(&workers, department)
            .into_iter()
            .cloned()
            .collect();
    }
    Ok(Json(workers))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewWorker>, JsonRejection>,
) -> Result<(StatusCode, Json<Worker>), ApiError> {
    let Json(new_worker) = payload?;
    let worker = state.store.create_worker(&new_worker).await?;
    Ok((StatusCode::CREATED, Json(worker)))
}
