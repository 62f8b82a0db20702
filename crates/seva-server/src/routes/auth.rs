use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use seva_auth::IssuedSession;
use seva_core::identity::Principal;

use super::{SUCCESS, Success};
use crate::error::ApiError;
use crate::state::{AppState, bearer_token};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: Principal,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            token: issued.token,
            user: issued.principal,
            expires_at: issued.expires_at,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let Json(request) = payload?;
    let issued = state
        .auth
        .register(
            &request.email,
            &request.password,
            request.display_name.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(issued.into())))
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = payload?;
    let issued = state.auth.sign_in(&request.email, &request.password).await?;
    Ok(Json(issued.into()))
}

/// Revokes the bearer token. Without one there is nothing to revoke.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Success>, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        state.auth.sign_out(token).await?;
    }
    Ok(Json(SUCCESS))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Principal>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    Ok(Json(state.auth.principal_for_token(token).await?))
}
