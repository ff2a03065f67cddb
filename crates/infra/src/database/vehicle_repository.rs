//! Vehicle repository implementation using SQLCipher
//!
//! Owner-filtered reads take every identifier shape the caller knows for
//! the user, because legacy rows were written in whichever shape the
//! calling code had at hand.

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::error::StorageError;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_core::garage::ports::VehicleRepository as VehicleRepositoryPort;
use gearbook_core::reconciliation::ports::{OwnedRecordStore, OwnerRef};
use gearbook_domain::{Result as DomainResult, Vehicle};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{
    bool_to_int, in_placeholders, int_to_bool, map_join_error, map_storage_error,
};

const VEHICLE_COLUMNS: &str = "id, owner_id, make, model, year, trim, description,
                               primary_image_url, is_public, created_at, updated_at";

/// SQLCipher-backed implementation of `VehicleRepository`
pub struct SqlCipherVehicleRepository {
    db: Arc<DbManager>,
}

impl SqlCipherVehicleRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn list_by_owner_filtered(
        &self,
        owner_shapes: &[String],
        public_only: bool,
    ) -> DomainResult<Vec<Vehicle>> {
        if owner_shapes.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        let shapes = owner_shapes.to_vec();

        task::spawn_blocking(move || -> DomainResult<Vec<Vehicle>> {
            let conn = db.get_connection()?;
            let placeholders = in_placeholders(shapes.len(), 1);
            let visibility = if public_only { " AND is_public = 1" } else { "" };
            let sql = format!(
                "SELECT {VEHICLE_COLUMNS} FROM vehicles
                 WHERE owner_id IN ({placeholders}){visibility}
                 ORDER BY created_at ASC"
            );

            let params: Vec<&dyn ToSql> = shapes.iter().map(|s| s as &dyn ToSql).collect();
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&params, map_vehicle_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl VehicleRepositoryPort for SqlCipherVehicleRepository {
    async fn insert(&self, vehicle: Vehicle) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_vehicle(&conn, &vehicle).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Vehicle>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = ?1");

            match conn.query_row(&sql, params![&id], map_vehicle_row) {
                Ok(vehicle) => Ok(Some(vehicle)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_owner(&self, owner_shapes: &[String]) -> DomainResult<Vec<Vehicle>> {
        self.list_by_owner_filtered(owner_shapes, false).await
    }

    async fn list_public_by_owner(&self, owner_shapes: &[String]) -> DomainResult<Vec<Vehicle>> {
        self.list_by_owner_filtered(owner_shapes, true).await
    }

    async fn update(&self, vehicle: Vehicle) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_vehicle(&conn, &vehicle).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM vehicles WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl OwnedRecordStore for SqlCipherVehicleRepository {
    fn store_name(&self) -> &'static str {
        "vehicles"
    }

    async fn list_owner_refs(&self) -> DomainResult<Vec<OwnerRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OwnerRef>> {
            let conn = db.get_connection()?;
            let mut stmt =
                conn.prepare("SELECT id, owner_id FROM vehicles").map_err(map_storage_error)?;
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
                "UPDATE vehicles SET owner_id = ?1 WHERE id = ?2",
                params![&owner_id, &record_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_vehicle_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        make: row.get(2)?,
        model: row.get(3)?,
        year: row.get(4)?,
        trim: row.get(5)?,
        description: row.get(6)?,
        primary_image_url: row.get(7)?,
        is_public: int_to_bool(row.get(8)?),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn insert_vehicle(conn: &SqlCipherConnection, vehicle: &Vehicle) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 11] = [
        &vehicle.id,
        &vehicle.owner_id,
        &vehicle.make,
        &vehicle.model,
        &vehicle.year,
        &vehicle.trim,
        &vehicle.description,
        &vehicle.primary_image_url,
        &bool_to_int(vehicle.is_public),
        &vehicle.created_at,
        &vehicle.updated_at,
    ];

    conn.execute(
        "INSERT INTO vehicles (
            id, owner_id, make, model, year, trim, description,
            primary_image_url, is_public, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params.as_slice(),
    )?;

    Ok(())
}

fn update_vehicle(conn: &SqlCipherConnection, vehicle: &Vehicle) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 10] = [
        &vehicle.make,
        &vehicle.model,
        &vehicle.year,
        &vehicle.trim,
        &vehicle.description,
        &vehicle.primary_image_url,
        &bool_to_int(vehicle.is_public),
        &vehicle.updated_at,
        &vehicle.owner_id,
        &vehicle.id, // WHERE clause
    ];

    conn.execute(
        "UPDATE vehicles SET
            make = ?1, model = ?2, year = ?3, trim = ?4, description = ?5,
            primary_image_url = ?6, is_public = ?7, updated_at = ?8, owner_id = ?9
         WHERE id = ?10",
        params.as_slice(),
    )?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path.to_str().unwrap(), 5, Some("test-key"))
            .expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    fn create_test_vehicle(owner_id: &str, is_public: bool) -> Vehicle {
        let now = Utc::now().timestamp();
        Vehicle {
            id: Uuid::now_v7().to_string(),
            owner_id: owner_id.into(),
            make: "Toyota".into(),
            model: "Supra".into(),
            year: 1997,
            trim: Some("MK4".into()),
            description: None,
            primary_image_url: None,
            is_public,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_and_get() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherVehicleRepository::new(db);
        let vehicle = create_test_vehicle("user_2abc", true);

        repo.insert(vehicle.clone()).await.expect("insert vehicle");

        let retrieved = repo.get(&vehicle.id).await.expect("query").expect("found");
        assert_eq!(retrieved.make, "Toyota");
        assert!(retrieved.is_public);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_by_owner_matches_any_shape() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherVehicleRepository::new(db);

        // Rows written under three different identifier shapes for the
        // same logical user
        let internal = Uuid::now_v7().to_string();
        repo.insert(create_test_vehicle("user_2abc", true)).await.expect("insert");
        repo.insert(create_test_vehicle("clerk|user_2abc", false)).await.expect("insert");
        repo.insert(create_test_vehicle(&internal, true)).await.expect("insert");
        repo.insert(create_test_vehicle("user_other", true)).await.expect("insert");

        let shapes =
            vec![internal.clone(), "clerk|user_2abc".to_string(), "user_2abc".to_string()];

        let all = repo.list_by_owner(&shapes).await.expect("list");
        assert_eq!(all.len(), 3);

        let public = repo.list_public_by_owner(&shapes).await.expect("list public");
        assert_eq!(public.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_shape_list_returns_nothing() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherVehicleRepository::new(db);
        repo.insert(create_test_vehicle("user_2abc", true)).await.expect("insert");

        assert!(repo.list_by_owner(&[]).await.expect("list").is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rewrite_owner() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherVehicleRepository::new(db);
        let vehicle = create_test_vehicle("clerk|user_2abc", true);
        repo.insert(vehicle.clone()).await.expect("insert");

        repo.rewrite_owner(&vehicle.id, "user_2abc").await.expect("rewrite");

        let refs = repo.list_owner_refs().await.expect("refs");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].owner_id, "user_2abc");
    }
}
