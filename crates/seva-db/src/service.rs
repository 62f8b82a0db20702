//! Service layer orchestrating database mutations with audit and change feed.
//!
//! `SevaService` wraps `SevaDb` (raw database access), the [`ChangeFeed`],
//! and an optional [`ImageStore`]. All repo methods are implemented as
//! `impl SevaService` blocks under `repos/`.

use std::path::Path;

use chrono::Utc;
use seva_config::DatabaseConfig;
use seva_core::entities::AuditEntry;
use seva_core::enums::{AuditAction, EntityType};
use seva_core::ids::PREFIX_AUDIT;
use seva_storage::ImageStore;

use crate::SevaDb;
use crate::error::DatabaseError;
use crate::feed::{ChangeEvent, ChangeFeed};

/// Single data-access interface for issues, workers, and accounts.
///
/// Every mutation method follows this protocol:
/// 1. Execute SQL
/// 2. Append audit entry
/// 3. Publish a change event
///
/// Wrap in `Arc` to open subscriptions; they hold a reference for re-queries.
pub struct SevaService {
    db: SevaDb,
    feed: ChangeFeed,
    images: Option<ImageStore>,
}

impl std::fmt::Debug for SevaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SevaService")
            .field("subscribers", &self.feed.receiver_count())
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}

impl SevaService {
    /// Create a service over a local database file or `":memory:"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, images: Option<ImageStore>) -> Result<Self, DatabaseError> {
        let db = SevaDb::open_local(db_path).await?;
        Ok(Self::from_db(db, images))
    }

    /// Open the database named by `config`, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created or the
    /// database cannot be opened.
    pub async fn from_config(
        config: &DatabaseConfig,
        images: Option<ImageStore>,
    ) -> Result<Self, DatabaseError> {
        if let Some(dir) = config.parent_dir() {
            create_dir(&dir)?;
        }
        Self::new_local(&config.path, images).await
    }

    #[must_use]
    pub fn from_db(db: SevaDb, images: Option<ImageStore>) -> Self {
        Self {
            db,
            feed: ChangeFeed::new(),
            images,
        }
    }

    #[must_use]
    pub const fn db(&self) -> &SevaDb {
        &self.db
    }

    #[must_use]
    pub const fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Image store used by `create_issue`, if one is configured.
    #[must_use]
    pub const fn images(&self) -> Option<&ImageStore> {
        self.images.as_ref()
    }

    /// Append an audit entry and publish the change.
    pub(crate) async fn record_mutation(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        let entry = AuditEntry {
            id: self.db.generate_id(PREFIX_AUDIT).await?,
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            detail,
            created_at: Utc::now(),
        };
        self.append_audit(&entry).await?;
        self.feed.publish(ChangeEvent {
            entity_type,
            entity_id: entity_id.to_string(),
            action,
        });
        tracing::debug!(%entity_type, entity_id, %action, "mutation recorded");
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<(), DatabaseError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        DatabaseError::Other(anyhow::anyhow!(
            "failed to create database directory {}: {e}",
            dir.display()
        ))
    })
}
