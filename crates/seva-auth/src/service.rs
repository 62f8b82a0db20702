//! Register, sign in, sign out, and resolve bearer tokens.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use seva_config::AuthConfig;
use seva_core::entities::AuthSessionRecord;
use seva_core::identity::Principal;
use seva_db::service::SevaService;

use crate::error::AuthError;
use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::token::{generate_token, token_digest};

/// A freshly issued bearer token. The token itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

/// Account operations over the shared store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<SevaService>,
    config: AuthConfig,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    #[must_use]
    pub const fn new(store: Arc<SevaService>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// `InvalidEmail` when the address has no `@`, `WeakPassword` below the
    /// configured minimum, `EmailTaken` when the address is registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IssuedSession, AuthError> {
        let email = validate_email(email)?;
        if password.chars().count() < self.config.min_password_len {
            return Err(AuthError::WeakPassword {
                min: self.config.min_password_len,
            });
        }
        if self.store.find_account_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let hash = hash_password_blocking(password.to_string()).await?;
        let account = self.store.create_account(&email, display_name, &hash).await?;
        tracing::info!(account_id = %account.id, "account registered");
        self.issue(account.principal()).await
    }

    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let Some(account) = self.store.find_account_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password_blocking(password.to_string(), account.password_hash.clone()).await? {
            tracing::debug!(account_id = %account.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        self.issue(account.principal()).await
    }

    /// Revoke `token`. Revoking an unknown token is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Database` if the delete fails.
    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let removed = self.store.delete_auth_session(&token_digest(token)).await?;
        tracing::debug!(removed, "signed out");
        Ok(())
    }

    /// Resolve a bearer token to its account.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` for an unknown token, `SessionExpired` once its
    /// TTL has passed (the session is removed).
    pub async fn principal_for_token(&self, token: &str) -> Result<Principal, AuthError> {
        let digest = token_digest(token);
        let Some(session) = self.store.find_auth_session(&digest).await? else {
            return Err(AuthError::NotAuthenticated);
        };
        if session.expires_at <= Utc::now() {
            self.store.delete_auth_session(&digest).await?;
            return Err(AuthError::SessionExpired);
        }
        let account = self.store.get_account(&session.account_id).await?;
        Ok(account.principal())
    }

    async fn issue(&self, principal: Principal) -> Result<IssuedSession, AuthError> {
        let token = generate_token()?;
        let created_at = Utc::now().trunc_subsecs(6);
        let expires_at = created_at + Duration::hours(i64::from(self.config.session_ttl_hours));
        self.store
            .insert_auth_session(&AuthSessionRecord {
                token_hash: token_digest(&token),
                account_id: principal.user_id.clone(),
                created_at,
                expires_at,
            })
            .await?;
        Ok(IssuedSession {
            token,
            principal,
            expires_at,
        })
    }
}

fn validate_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(email.to_lowercase())
        }
        _ => Err(AuthError::InvalidEmail(email.to_string())),
    }
}
