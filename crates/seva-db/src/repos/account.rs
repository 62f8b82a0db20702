//! Account and auth-session storage. Hashing and token handling live in
//! `seva-auth`; this layer only stores what it is given.

use chrono::{DateTime, Utc};
use seva_core::entities::{Account, AuthSessionRecord};
use seva_core::enums::{AuditAction, EntityType};
use seva_core::ids::PREFIX_ACCOUNT;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, map_unique_violation, now_utc, parse_datetime};
use crate::service::SevaService;

const ACCOUNT_COLS: &str = "id, email, display_name, password_hash, created_at";

fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        display_name: get_opt_string(row, 2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl SevaService {
    /// Store a new account. The email is lower-cased.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the email is already registered.
    pub async fn create_account(
        &self,
        email: &str,
        display_name: Option<&str>,
        password_hash: &str,
    ) -> Result<Account, DatabaseError> {
        let account = Account {
            id: self.db().generate_id(PREFIX_ACCOUNT).await?,
            email: email.trim().to_lowercase(),
            display_name: display_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            password_hash: password_hash.to_string(),
            created_at: now_utc(),
        };
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO accounts ({ACCOUNT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    account.id.as_str(),
                    account.email.as_str(),
                    account.display_name.as_deref(),
                    account.password_hash.as_str(),
                    format_datetime(&account.created_at)
                ],
            )
            .await
            .map_err(|e| map_unique_violation(e, "account"))?;
        // The detail never carries the hash.
        self.record_mutation(EntityType::Account, &account.id, AuditAction::Created, None)
            .await?;
        Ok(account)
    }

    /// Case-insensitive lookup.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ACCOUNT_COLS} FROM accounts WHERE email = ?1"),
                [email.trim().to_lowercase()],
            )
            .await?;
        rows.next().await?.map(|row| row_to_account(&row)).transpose()
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no account has this id.
    pub async fn get_account(&self, id: &str) -> Result<Account, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ACCOUNT_COLS} FROM accounts WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Account, id))?;
        row_to_account(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn insert_auth_session(&self, record: &AuthSessionRecord) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO auth_sessions (token_hash, account_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    record.token_hash.as_str(),
                    record.account_id.as_str(),
                    format_datetime(&record.created_at),
                    format_datetime(&record.expires_at)
                ],
            )
            .await?;
        Ok(())
    }

    /// Session for a token digest, if one exists. Expiry is the caller's check.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_auth_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<AuthSessionRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT token_hash, account_id, created_at, expires_at
                 FROM auth_sessions WHERE token_hash = ?1",
                [token_hash],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        Ok(Some(AuthSessionRecord {
            token_hash: row.get(0)?,
            account_id: row.get(1)?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
            expires_at: parse_datetime(&row.get::<String>(3)?)?,
        }))
    }

    /// Returns whether a session was removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_auth_session(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .db()
            .conn()
            .execute("DELETE FROM auth_sessions WHERE token_hash = ?1", [token_hash])
            .await?;
        Ok(removed > 0)
    }

    /// Drop sessions that expired before `now`. Returns how many went.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let removed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM auth_sessions WHERE expires_at < ?1",
                [format_datetime(&now)],
            )
            .await?;
        Ok(removed)
    }
}
