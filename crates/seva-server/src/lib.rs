//! # seva-server
//!
//! JSON-over-HTTP surface for Seva-Setu built on axum.
//!
//! No handler checks roles. A bearer token, when present, only supplies the
//! reporter identity for new issues and the answer to `/api/auth/me`.

pub mod error;
mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};

pub use error::ApiError;
pub use state::AppState;

/// All `/api` routes over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/complaints", post(routes::complaints::create))
        .route(
            "/api/issues",
            get(routes::issues::list).post(routes::issues::create),
        )
        .route("/api/issues/stream", get(routes::issues::stream))
        .route(
            "/api/issues/:id",
            get(routes::issues::get).patch(routes::issues::update),
        )
        .route("/api/issues/:id/assign", post(routes::issues::assign))
        .route("/api/issues/:id/status", post(routes::issues::set_status))
        .route(
            "/api/workers",
            get(routes::workers::list).post(routes::workers::create),
        )
        .route("/api/dashboard", get(routes::dashboard::show))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/signin", post(routes::auth::sign_in))
        .route("/api/auth/signout", post(routes::auth::sign_out))
        .route("/api/auth/me", get(routes::auth::me))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
///
/// # Errors
///
/// Returns the I/O error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "seva api listening");
    axum::serve(listener, router(state)).await
}
