//! Affiliate application repository implementation using SQLCipher

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::error::StorageError;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_core::moderation::ports::ApplicationRepository as ApplicationRepositoryPort;
use gearbook_core::reconciliation::ports::{OwnedRecordStore, OwnerRef};
use gearbook_domain::{AffiliateApplication, ApplicationStatus, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{in_placeholders, map_join_error, map_storage_error};

const APPLICATION_COLUMNS: &str = "id, applicant_id, brand_name, website, pitch, status,
                                   reviewed_by, reviewed_at, created_at";

/// SQLCipher-backed implementation of `ApplicationRepository`
pub struct SqlCipherApplicationRepository {
    db: Arc<DbManager>,
}

impl SqlCipherApplicationRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepositoryPort for SqlCipherApplicationRepository {
    async fn insert(&self, application: AffiliateApplication) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_application(&conn, &application).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<AffiliateApplication>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<AffiliateApplication>> {
            let conn = db.get_connection()?;
            let sql =
                format!("SELECT {APPLICATION_COLUMNS} FROM affiliate_applications WHERE id = ?1");

            match conn.query_row(&sql, params![&id], map_application_row) {
                Ok(application) => Ok(Some(application)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn pending_for_applicant(
        &self,
        applicant_shapes: &[String],
    ) -> DomainResult<Option<AffiliateApplication>> {
        if applicant_shapes.is_empty() {
            return Ok(None);
        }
        let db = Arc::clone(&self.db);
        let shapes = applicant_shapes.to_vec();

        task::spawn_blocking(move || -> DomainResult<Option<AffiliateApplication>> {
            let conn = db.get_connection()?;
            let placeholders = in_placeholders(shapes.len(), 1);
            let sql = format!(
                "SELECT {APPLICATION_COLUMNS} FROM affiliate_applications
                 WHERE status = 'pending' AND applicant_id IN ({placeholders})
                 LIMIT 1"
            );

            let params: Vec<&dyn ToSql> = shapes.iter().map(|s| s as &dyn ToSql).collect();
            match conn.query_row(&sql, &params, map_application_row) {
                Ok(application) => Ok(Some(application)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> DomainResult<Vec<AffiliateApplication>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<AffiliateApplication>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {APPLICATION_COLUMNS} FROM affiliate_applications
                 WHERE status = ?1 ORDER BY created_at ASC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(params![&status.as_str()], map_application_row)
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_review(
        &self,
        id: &str,
        status: ApplicationStatus,
        reviewed_by: &str,
        reviewed_at: i64,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let reviewed_by = reviewed_by.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE affiliate_applications
                 SET status = ?1, reviewed_by = ?2, reviewed_at = ?3
                 WHERE id = ?4",
                params![&status.as_str(), &reviewed_by, &reviewed_at, &id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_by_applicant(&self, applicant_shapes: &[String]) -> DomainResult<usize> {
        if applicant_shapes.is_empty() {
            return Ok(0);
        }
        let db = Arc::clone(&self.db);
        let shapes = applicant_shapes.to_vec();

        task::spawn_blocking(move || -> DomainResult<usize> {
            let conn = db.get_connection()?;
            let placeholders = in_placeholders(shapes.len(), 1);
            let sql = format!(
                "DELETE FROM affiliate_applications WHERE applicant_id IN ({placeholders})"
            );
            let params: Vec<&dyn ToSql> = shapes.iter().map(|s| s as &dyn ToSql).collect();
            conn.execute(&sql, &params).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl OwnedRecordStore for SqlCipherApplicationRepository {
    fn store_name(&self) -> &'static str {
        "affiliate_applications"
    }

    async fn list_owner_refs(&self) -> DomainResult<Vec<OwnerRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OwnerRef>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare("SELECT id, applicant_id FROM affiliate_applications")
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
                "UPDATE affiliate_applications SET applicant_id = ?1 WHERE id = ?2",
                params![&owner_id, &record_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_application_row(row: &Row<'_>) -> rusqlite::Result<AffiliateApplication> {
    let status_raw: String = row.get(5)?;
    let status = ApplicationStatus::parse(&status_raw).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown application status: {status_raw}").into(),
        )
    })?;

    Ok(AffiliateApplication {
        id: row.get(0)?,
        applicant_id: row.get(1)?,
        brand_name: row.get(2)?,
        website: row.get(3)?,
        pitch: row.get(4)?,
        status,
        reviewed_by: row.get(6)?,
        reviewed_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn insert_application(
    conn: &SqlCipherConnection,
    application: &AffiliateApplication,
) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 9] = [
        &application.id,
        &application.applicant_id,
        &application.brand_name,
        &application.website,
        &application.pitch,
        &application.status.as_str(),
        &application.reviewed_by,
        &application.reviewed_at,
        &application.created_at,
    ];

    conn.execute(
        "INSERT INTO affiliate_applications (
            id, applicant_id, brand_name, website, pitch, status,
            reviewed_by, reviewed_at, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params.as_slice(),
    )?;

    Ok(())
}

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

    fn create_test_application(applicant_id: &str) -> AffiliateApplication {
        AffiliateApplication {
            id: Uuid::now_v7().to_string(),
            applicant_id: applicant_id.into(),
            brand_name: "Apex Garage Co".into(),
            website: "https://apexgarage.example.com".into(),
            pitch: "Wheels and aero for the community".into(),
            status: ApplicationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now().timestamp(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pending_lookup_across_shapes() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherApplicationRepository::new(db);

        // Legacy row keyed by composite identifier
        repo.insert(create_test_application("clerk|user_2abc")).await.expect("insert");

        let shapes = vec!["user_2abc".to_string(), "clerk|user_2abc".to_string()];
        let pending = repo.pending_for_applicant(&shapes).await.expect("query");
        assert!(pending.is_some());

        let none = repo
            .pending_for_applicant(&["user_other".to_string()])
            .await
            .expect("query");
        assert!(none.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_review_stamps_decision() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherApplicationRepository::new(db);

        let application = create_test_application("user_2abc");
        repo.insert(application.clone()).await.expect("insert");

        repo.set_review(&application.id, ApplicationStatus::Approved, "user_admin", 1_700_000_500)
            .await
            .expect("review");

        let reviewed = repo.get(&application.id).await.expect("query").expect("found");
        assert_eq!(reviewed.status, ApplicationStatus::Approved);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some("user_admin"));
        assert_eq!(reviewed.reviewed_at, Some(1_700_000_500));

        assert!(repo
            .list_by_status(ApplicationStatus::Pending)
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_by_applicant() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherApplicationRepository::new(db);

        repo.insert(create_test_application("user_2abc")).await.expect("insert");
        repo.insert(create_test_application("user_other")).await.expect("insert");

        let removed =
            repo.delete_by_applicant(&["user_2abc".to_string()]).await.expect("delete");
        assert_eq!(removed, 1);
    }
}
