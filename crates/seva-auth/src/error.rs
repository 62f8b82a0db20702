use seva_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not authenticated, run `seva auth login`")]
    NotAuthenticated,

    #[error("session expired, run `seva auth login` to sign in again")]
    SessionExpired,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("random token generation failed: {0}")]
    Random(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(_) => Self::EmailTaken,
            other => Self::Database(other),
        }
    }
}
