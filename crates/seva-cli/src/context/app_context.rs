use std::sync::Arc;

use anyhow::Context;
use seva_auth::AuthService;
use seva_auth::token_store::TokenStore;
use seva_config::SevaConfig;
use seva_db::service::SevaService;
use seva_storage::ImageStore;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub store: Arc<SevaService>,
    pub auth: AuthService,
    pub config: SevaConfig,
    pub tokens: TokenStore,
}

impl AppContext {
    /// Open the configured database and image store.
    ///
    /// An image store that fails to build is logged and left out; issues are
    /// then stored without photos.
    pub async fn init(config: SevaConfig) -> anyhow::Result<Self> {
        let images = match ImageStore::from_config(&config.storage) {
            Ok(images) => Some(images),
            Err(error) => {
                tracing::warn!(%error, "image store unavailable; uploads will be skipped");
                None
            }
        };

        let store = SevaService::from_config(&config.database, images)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let store = Arc::new(store);
        let auth = AuthService::new(Arc::clone(&store), config.auth.clone());
        let tokens = TokenStore::default_location().context("failed to locate credentials file")?;

        Ok(Self {
            store,
            auth,
            config,
            tokens,
        })
    }

    /// Principal behind the stored CLI token. Missing or stale tokens yield
    /// `None`.
    pub async fn signed_in_principal(&self) -> Option<seva_core::identity::Principal> {
        let token = self.tokens.load()?;
        match self.auth.principal_for_token(&token).await {
            Ok(principal) => Some(principal),
            Err(error) => {
                tracing::debug!(%error, "stored token not usable");
                None
            }
        }
    }
}

#[cfg(test)]
impl AppContext {
    /// In-memory database and images, with credentials kept under `dir`.
    pub async fn for_tests(dir: &std::path::Path) -> Self {
        let store = SevaService::new_local(":memory:", Some(ImageStore::in_memory()))
            .await
            .expect("in-memory database should open");
        let store = Arc::new(store);
        let config = SevaConfig::default();
        Self {
            auth: AuthService::new(Arc::clone(&store), config.auth.clone()),
            store,
            config,
            tokens: TokenStore::new(dir.join("credentials")),
        }
    }
}
