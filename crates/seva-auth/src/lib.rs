//! # seva-auth
//!
//! Email/password authentication for Seva-Setu.
//!
//! Accounts live in the main store; passwords are hashed with argon2. A
//! sign-in issues a random bearer token of which only the SHA-256 digest is
//! persisted. [`SessionState`] wraps an [`AuthService`] for clients that
//! track "the current user", and [`token_store`] keeps the CLI's token on
//! disk between runs.

pub mod error;
pub mod password;
pub mod service;
pub mod session;
pub mod token;
pub mod token_store;

pub use error::AuthError;
pub use service::{AuthService, IssuedSession};
pub use session::SessionState;
