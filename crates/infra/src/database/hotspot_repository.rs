//! Hotspot repository implementation using SQLCipher

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::error::StorageError;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_core::garage::ports::HotspotRepository as HotspotRepositoryPort;
use gearbook_core::reconciliation::ports::{OwnedRecordStore, OwnerRef};
use gearbook_domain::{Hotspot, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{map_join_error, map_storage_error};

const HOTSPOT_COLUMNS: &str =
    "id, vehicle_id, owner_id, image_url, x, y, part_id, label, created_at";

/// SQLCipher-backed implementation of `HotspotRepository`
pub struct SqlCipherHotspotRepository {
    db: Arc<DbManager>,
}

impl SqlCipherHotspotRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HotspotRepositoryPort for SqlCipherHotspotRepository {
    async fn insert(&self, hotspot: Hotspot) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_hotspot(&conn, &hotspot).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Hotspot>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Hotspot>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {HOTSPOT_COLUMNS} FROM hotspots WHERE id = ?1");

            match conn.query_row(&sql, params![&id], map_hotspot_row) {
                Ok(hotspot) => Ok(Some(hotspot)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_vehicle(&self, vehicle_id: &str) -> DomainResult<Vec<Hotspot>> {
        let db = Arc::clone(&self.db);
        let vehicle_id = vehicle_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Hotspot>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {HOTSPOT_COLUMNS} FROM hotspots
                 WHERE vehicle_id = ?1 ORDER BY created_at ASC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(params![&vehicle_id], map_hotspot_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM hotspots WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_by_vehicle(&self, vehicle_id: &str) -> DomainResult<usize> {
        let db = Arc::clone(&self.db);
        let vehicle_id = vehicle_id.to_string();

        task::spawn_blocking(move || -> DomainResult<usize> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM hotspots WHERE vehicle_id = ?1", params![&vehicle_id])
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl OwnedRecordStore for SqlCipherHotspotRepository {
    fn store_name(&self) -> &'static str {
        "hotspots"
    }

    async fn list_owner_refs(&self) -> DomainResult<Vec<OwnerRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OwnerRef>> {
            let conn = db.get_connection()?;
            let mut stmt =
                conn.prepare("SELECT id, owner_id FROM hotspots").map_err(map_storage_error)?;
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
                "UPDATE hotspots SET owner_id = ?1 WHERE id = ?2",
                params![&owner_id, &record_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_hotspot_row(row: &Row<'_>) -> rusqlite::Result<Hotspot> {
    Ok(Hotspot {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        owner_id: row.get(2)?,
        image_url: row.get(3)?,
        x: row.get(4)?,
        y: row.get(5)?,
        part_id: row.get(6)?,
        label: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn insert_hotspot(conn: &SqlCipherConnection, hotspot: &Hotspot) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 9] = [
        &hotspot.id,
        &hotspot.vehicle_id,
        &hotspot.owner_id,
        &hotspot.image_url,
        &hotspot.x,
        &hotspot.y,
        &hotspot.part_id,
        &hotspot.label,
        &hotspot.created_at,
    ];

    conn.execute(
        "INSERT INTO hotspots (
            id, vehicle_id, owner_id, image_url, x, y, part_id, label, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params.as_slice(),
    )?;

    Ok(())
}
