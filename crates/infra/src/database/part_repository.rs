//! Part repository implementation using SQLCipher

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::error::StorageError;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_core::garage::ports::PartRepository as PartRepositoryPort;
use gearbook_core::reconciliation::ports::{OwnedRecordStore, OwnerRef};
use gearbook_domain::{Part, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{map_join_error, map_storage_error};

const PART_COLUMNS: &str = "id, vehicle_id, owner_id, name, category, brand, price_cents,
                            purchase_url, notes, installed_at, created_at";

/// SQLCipher-backed implementation of `PartRepository`
pub struct SqlCipherPartRepository {
    db: Arc<DbManager>,
}

impl SqlCipherPartRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PartRepositoryPort for SqlCipherPartRepository {
    async fn insert(&self, part: Part) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_part(&conn, &part).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Part>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Part>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = ?1");

            match conn.query_row(&sql, params![&id], map_part_row) {
                Ok(part) => Ok(Some(part)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_vehicle(&self, vehicle_id: &str) -> DomainResult<Vec<Part>> {
        let db = Arc::clone(&self.db);
        let vehicle_id = vehicle_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Part>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {PART_COLUMNS} FROM parts WHERE vehicle_id = ?1 ORDER BY created_at ASC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(params![&vehicle_id], map_part_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM parts WHERE id = ?1", params![&id])
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
            conn.execute("DELETE FROM parts WHERE vehicle_id = ?1", params![&vehicle_id])
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl OwnedRecordStore for SqlCipherPartRepository {
    fn store_name(&self) -> &'static str {
        "parts"
    }

    async fn list_owner_refs(&self) -> DomainResult<Vec<OwnerRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OwnerRef>> {
            let conn = db.get_connection()?;
            let mut stmt =
                conn.prepare("SELECT id, owner_id FROM parts").map_err(map_storage_error)?;
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
                "UPDATE parts SET owner_id = ?1 WHERE id = ?2",
                params![&owner_id, &record_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_part_row(row: &Row<'_>) -> rusqlite::Result<Part> {
    Ok(Part {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        owner_id: row.get(2)?,
        name: row.get(3)?,
        category: row.get(4)?,
        brand: row.get(5)?,
        price_cents: row.get(6)?,
        purchase_url: row.get(7)?,
        notes: row.get(8)?,
        installed_at: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn insert_part(conn: &SqlCipherConnection, part: &Part) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 11] = [
        &part.id,
        &part.vehicle_id,
        &part.owner_id,
        &part.name,
        &part.category,
        &part.brand,
        &part.price_cents,
        &part.purchase_url,
        &part.notes,
        &part.installed_at,
        &part.created_at,
    ];

    conn.execute(
        "INSERT INTO parts (
            id, vehicle_id, owner_id, name, category, brand, price_cents,
            purchase_url, notes, installed_at, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params.as_slice(),
    )?;

    Ok(())
}
