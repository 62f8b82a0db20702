//! Sign in, persist the token, and restore the session in a later run.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use seva_auth::token_store::TokenStore;
use seva_auth::{AuthService, SessionState};
use seva_config::AuthConfig;
use seva_db::service::SevaService;

#[tokio::test]
async fn token_saved_by_one_run_restores_the_next() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("seva.db").display().to_string();
    let tokens = TokenStore::new(dir.path().join("credentials"));

    {
        let store = Arc::new(SevaService::new_local(&db_path, None).await.unwrap());
        let state = SessionState::init(AuthService::new(store, AuthConfig::default()), None).await;
        let issued = state
            .register("ravi@example.org", "pipes-and-valves", Some("Ravi"))
            .await
            .unwrap();
        tokens.store(&issued.token).unwrap();
        state.teardown();
    }

    let store = Arc::new(SevaService::new_local(&db_path, None).await.unwrap());
    let auth = AuthService::new(store, AuthConfig::default());
    let stored = std::fs::read_to_string(tokens.path()).unwrap();
    let state = SessionState::init(auth, Some(stored)).await;
    let principal = state.current().unwrap();
    assert_eq!(principal.email, "ravi@example.org");
    assert_eq!(principal.reporter_name(), "Ravi");

    state.sign_out().await.unwrap();
    tokens.delete().unwrap();
    assert!(!tokens.path().exists());
}
