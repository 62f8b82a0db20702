//! Public complaint intake.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use seva_core::entities::NewComplaint;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ComplaintCreated {
    pub id: String,
    pub success: bool,
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewComplaint>, JsonRejection>,
) -> Result<Json<ComplaintCreated>, ApiError> {
    let Json(complaint) = payload?;
    let issue = state.store.create_complaint(&complaint).await?;
    tracing::info!(issue_id = %issue.id, "complaint received");
    Ok(Json(ComplaintCreated {
        id: issue.id,
        success: true,
    }))
}
