//! Issue intake, triage, and the live feed.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::{Stream, StreamExt, future};
use serde::Deserialize;
use seva_core::entities::{Issue, NewIssue, Reporter};
use seva_core::enums::{IssueCategory, IssuePriority, IssueStatus};
use seva_core::filters::IssueFilter;
use seva_db::feed::LiveState;
use seva_db::updates::issue::IssueUpdate;
use seva_storage::ImageUpload;

use super::{SUCCESS, Success};
use crate::error::ApiError;
use crate::state::AppState;

/// Query string shared by the list and stream endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct IssueQuery {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub ward: Option<String>,
    pub reporter: Option<String>,
    pub category: Option<IssueCategory>,
    pub limit: Option<u32>,
}

impl IssueQuery {
    fn filter(&self) -> IssueFilter {
        IssueFilter {
            status: self.status,
            priority: self.priority,
            ward: self.ward.clone(),
            reporter: self.reporter.clone(),
            category: self.category,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[serde(flatten)]
    pub issue: NewIssue,
    #[serde(default)]
    pub image: Option<ImagePayload>,
}

/// Inline image, standard base64.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub file_name: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub worker_id: String,
    pub worker_name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: IssueStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<IssueQuery>, QueryRejection>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let Query(query) = query?;
    let issues = state.store.list_issues(&query.filter(), query.limit).await?;
    Ok(Json(issues))
}

/// Reporter comes from the bearer token; anonymous callers report as guest.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateIssueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Issue>), ApiError> {
    let Json(request) = payload?;
    let image = request
        .image
        .map(|image| {
            STANDARD
                .decode(image.data.as_bytes())
                .map(|bytes| ImageUpload {
                    file_name: image.file_name,
                    bytes,
                })
                .map_err(|e| ApiError::BadRequest(format!("image data is not valid base64: {e}")))
        })
        .transpose()?;
    let reporter = state
        .principal(&headers)
        .await
        .map_or_else(Reporter::guest, |principal| Reporter::from(&principal));

    let issue = state
        .store
        .create_issue(&request.issue, image, &reporter)
        .await?;
    tracing::info!(issue_id = %issue.id, images = issue.images.len(), "issue reported");
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Issue>, ApiError> {
    Ok(Json(state.store.get_issue(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<IssueUpdate>, JsonRejection>,
) -> Result<Json<Issue>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(state.store.update_issue(&id, update).await?))
}

pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<Success>, ApiError> {
    let Json(request) = payload?;
    state
        .store
        .assign_issue_to_worker(&id, &request.worker_id, &request.worker_name)
        .await?;
    Ok(Json(SUCCESS))
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<Issue>, ApiError> {
    let Json(request) = payload?;
    let issue = state
        .store
        .update_issue_status(&id, request.status, request.notes.as_deref())
        .await?;
    Ok(Json(issue))
}

/// Server-sent events: a `snapshot` event with the full matching list now
/// and after every change, or an `error` event when a refresh fails.
pub async fn stream(
    State(state): State<AppState>,
    query: Result<Query<IssueQuery>, QueryRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let Query(query) = query?;
    let live = state.store.live_issues(query.filter());
    let events = live
        .into_stream()
        .filter(|snapshot| future::ready(!snapshot.loading))
        .map(|snapshot| snapshot_event(&snapshot));
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn snapshot_event(snapshot: &LiveState<Issue>) -> Result<Event, axum::Error> {
    match &snapshot.error {
        Some(message) => Ok(Event::default().event("error").data(message)),
        None => Event::default().event("snapshot").json_data(&snapshot.items),
    }
}
