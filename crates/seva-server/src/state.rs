use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use seva_auth::AuthService;
use seva_core::identity::Principal;
use seva_db::service::SevaService;

/// Shared handler state. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<SevaService>,
    pub auth: AuthService,
}

impl AppState {
    #[must_use]
    pub const fn new(store: Arc<SevaService>, auth: AuthService) -> Self {
        Self { store, auth }
    }

    /// Principal behind the request's bearer token. Missing, unknown, and
    /// expired tokens all yield `None`.
    pub async fn principal(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = bearer_token(headers)?;
        match self.auth.principal_for_token(token).await {
            Ok(principal) => Some(principal),
            Err(error) => {
                tracing::debug!(%error, "ignoring bearer token");
                None
            }
        }
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn state_debug_covers_store_and_auth() {
        let store = Arc::new(SevaService::new_local(":memory:", None).await.unwrap());
        let auth = AuthService::new(Arc::clone(&store), seva_config::AuthConfig::default());
        let rendered = format!("{:?}", AppState::new(store, auth));
        assert!(rendered.contains("SevaService"));
        assert!(rendered.contains("AuthService"));
    }
}
