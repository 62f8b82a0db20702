use axum::Json;
use axum::extract::State;
use serde::Serialize;
use seva_core::board::{IssueBoard, WorkerRoster};
use seva_core::filters::IssueFilter;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub issues: IssueBoard,
    pub workers: WorkerRoster,
}

pub async fn show(State(state): State<AppState>) -> Result<Json<Dashboard>, ApiError> {
    let issues = state.store.list_issues(&IssueFilter::default(), None).await?;
    let workers = state.store.list_workers().await?;
    Ok(Json(Dashboard {
        issues: IssueBoard::from_issues(&issues),
        workers: WorkerRoster::from_workers(&workers),
    }))
}
