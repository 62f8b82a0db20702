use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Principal;

/// A stored email/password account.
///
/// Deliberately not `Serialize`: the password hash must never reach the wire.
/// Use [`Account::principal`] for anything outward-facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    /// Lower-cased on write; lookups are case-insensitive.
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// A signed-in session as stored: only the token digest is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSessionRecord {
    pub token_hash: String,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
