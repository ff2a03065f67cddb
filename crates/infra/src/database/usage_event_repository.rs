//! Usage event repository implementation using SQLCipher
//!
//! Erasure anonymizes events in place instead of deleting them: the owner
//! column becomes the anonymization sentinel and the metadata is nulled,
//! keeping aggregate analytics intact.

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_common::storage::StorageError;
use gearbook_core::events::ports::UsageEventRepository as UsageEventRepositoryPort;
use gearbook_core::reconciliation::ports::{OwnedRecordStore, OwnerRef};
use gearbook_domain::{Result as DomainResult, UsageEvent, UsageSummary};
use rusqlite::{params, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{in_placeholders, map_join_error, map_storage_error};

/// SQLCipher-backed implementation of `UsageEventRepository`
pub struct SqlCipherUsageEventRepository {
    db: Arc<DbManager>,
}

impl SqlCipherUsageEventRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsageEventRepositoryPort for SqlCipherUsageEventRepository {
    async fn record(&self, event: UsageEvent) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_event(&conn, &event).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn anonymize_by_owner(
        &self,
        owner_shapes: &[String],
        sentinel: &str,
    ) -> DomainResult<usize> {
        if owner_shapes.is_empty() {
            return Ok(0);
        }
        let db = Arc::clone(&self.db);
        let shapes = owner_shapes.to_vec();
        let sentinel = sentinel.to_string();

        task::spawn_blocking(move || -> DomainResult<usize> {
            let conn = db.get_connection()?;
            // Sentinel is ?1; shapes start at ?2
            let placeholders = in_placeholders(shapes.len(), 2);
            let sql = format!(
                "UPDATE usage_events SET owner_id = ?1, metadata = NULL
                 WHERE owner_id IN ({placeholders})"
            );

            let mut params: Vec<&dyn ToSql> = vec![&sentinel];
            params.extend(shapes.iter().map(|s| s as &dyn ToSql));

            conn.execute(&sql, &params).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn summary_by_owner(&self, owner_shapes: &[String]) -> DomainResult<UsageSummary> {
        if owner_shapes.is_empty() {
            return Ok(UsageSummary::default());
        }
        let db = Arc::clone(&self.db);
        let shapes = owner_shapes.to_vec();

        task::spawn_blocking(move || -> DomainResult<UsageSummary> {
            let conn = db.get_connection()?;
            let placeholders = in_placeholders(shapes.len(), 1);
            let params: Vec<&dyn ToSql> = shapes.iter().map(|s| s as &dyn ToSql).collect();

            let sql = format!(
                "SELECT COUNT(*), MIN(created_at), MAX(created_at)
                 FROM usage_events WHERE owner_id IN ({placeholders})"
            );
            let (total_events, first_event_at, last_event_at) = conn
                .query_row(&sql, &params, |row| {
                    Ok((row.get::<_, i64>(0)?, row.get(1)?, row.get(2)?))
                })
                .map_err(map_storage_error)?;

            let sql = format!(
                "SELECT DISTINCT event_type FROM usage_events
                 WHERE owner_id IN ({placeholders}) ORDER BY event_type ASC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            let event_types =
                stmt.query_map(&params, |row| row.get(0)).map_err(map_storage_error)?;

            Ok(UsageSummary { total_events, event_types, first_event_at, last_event_at })
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl OwnedRecordStore for SqlCipherUsageEventRepository {
    fn store_name(&self) -> &'static str {
        "usage_events"
    }

    async fn list_owner_refs(&self) -> DomainResult<Vec<OwnerRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OwnerRef>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare("SELECT id, owner_id FROM usage_events")
                .map_err(map_storage_error)?;
            stmt.query_map(&[], |row| {
                Ok(OwnerRef { record_id: row.get(0)?, owner_id: row.get(1)? })
            })
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn rewrite_owner(&self, record_id: &str, owner_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let record_id = record_id.to_string();
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE usage_events SET owner_id = ?1 WHERE id = ?2",
                params![&owner_id, &record_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn insert_event(conn: &SqlCipherConnection, event: &UsageEvent) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO usage_events (id, owner_id, event_type, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            &event.id,
            &event.owner_id,
            &event.event_type,
            &event.metadata,
            &event.created_at,
        ],
    )?;
    Ok(())
}
