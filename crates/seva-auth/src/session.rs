//! Current-user state for interactive clients.
//!
//! A `SessionState` is created explicitly with [`SessionState::init`] and
//! handed to whatever needs it. The current principal is published on a
//! `watch` channel; [`SessionState::teardown`] closes it.

use std::sync::{Mutex, PoisonError};

use seva_core::identity::Principal;
use tokio::sync::watch;

use crate::error::AuthError;
use crate::service::{AuthService, IssuedSession};

pub struct SessionState {
    auth: AuthService,
    token: Mutex<Option<String>>,
    principal: watch::Sender<Option<Principal>>,
    error: Mutex<Option<String>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("principal", &*self.principal.borrow())
            .field("error", &self.error())
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Start tracking, restoring `stored_token` if it still resolves.
    ///
    /// A stale or revoked token leaves the state signed out; the reason is
    /// kept in [`Self::error`].
    pub async fn init(auth: AuthService, stored_token: Option<String>) -> Self {
        let (principal, _) = watch::channel(None);
        let state = Self {
            auth,
            token: Mutex::new(None),
            principal,
            error: Mutex::new(None),
        };
        if let Some(token) = stored_token {
            match state.auth.principal_for_token(&token).await {
                Ok(principal) => state.set_signed_in(token, principal),
                Err(error) => {
                    tracing::debug!(%error, "stored token no longer valid");
                    state.set_error(&error);
                }
            }
        }
        state
    }

    /// Observe sign-in and sign-out. The channel closes on teardown.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Principal>> {
        self.principal.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Option<Principal> {
        self.principal.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    /// Message from the last rejected operation, if the last one failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }

    /// # Errors
    ///
    /// Propagates [`AuthService::register`] errors after recording them.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IssuedSession, AuthError> {
        self.clear_error();
        let result = self.auth.register(email, password, display_name).await;
        self.absorb(result)
    }

    /// # Errors
    ///
    /// Propagates [`AuthService::sign_in`] errors after recording them.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        self.clear_error();
        let result = self.auth.sign_in(email, password).await;
        self.absorb(result)
    }

    /// Revoke the current token, if any, and publish `None`.
    ///
    /// The local state is cleared even when revocation fails.
    ///
    /// # Errors
    ///
    /// Propagates [`AuthService::sign_out`] errors after recording them.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.clear_error();
        let token = lock(&self.token).take();
        self.principal.send_replace(None);
        let Some(token) = token else {
            return Ok(());
        };
        self.auth.sign_out(&token).await.inspect_err(|error| self.set_error(error))
    }

    /// Detach. Receivers from [`Self::watch`] observe the channel closing.
    pub fn teardown(self) {
        tracing::debug!("session state torn down");
    }

    fn absorb(&self, result: Result<IssuedSession, AuthError>) -> Result<IssuedSession, AuthError> {
        match result {
            Ok(issued) => {
                self.set_signed_in(issued.token.clone(), issued.principal.clone());
                Ok(issued)
            }
            Err(error) => {
                self.set_error(&error);
                Err(error)
            }
        }
    }

    fn set_signed_in(&self, token: String, principal: Principal) {
        *lock(&self.token) = Some(token);
        self.principal.send_replace(Some(principal));
    }

    fn clear_error(&self) {
        *lock(&self.error) = None;
    }

    fn set_error(&self, error: &AuthError) {
        *lock(&self.error) = Some(error.to_string());
    }
}

fn lock<T>(slot: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
