//! Issue report repository implementation using SQLCipher

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::error::StorageError;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_core::moderation::ports::IssueReportRepository as IssueReportRepositoryPort;
use gearbook_core::reconciliation::ports::{OwnedRecordStore, OwnerRef};
use gearbook_domain::{IssueReport, IssueStatus, ReportSubject, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{in_placeholders, map_join_error, map_storage_error};

const REPORT_COLUMNS: &str = "id, reporter_id, subject_kind, subject_id, reason, status,
                              resolved_by, resolved_at, created_at";

/// SQLCipher-backed implementation of `IssueReportRepository`
pub struct SqlCipherIssueReportRepository {
    db: Arc<DbManager>,
}

impl SqlCipherIssueReportRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IssueReportRepositoryPort for SqlCipherIssueReportRepository {
    async fn insert(&self, report: IssueReport) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_report(&conn, &report).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<IssueReport>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<IssueReport>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {REPORT_COLUMNS} FROM issue_reports WHERE id = ?1");

            match conn.query_row(&sql, params![&id], map_report_row) {
                Ok(report) => Ok(Some(report)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_status(&self, status: IssueStatus) -> DomainResult<Vec<IssueReport>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<IssueReport>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {REPORT_COLUMNS} FROM issue_reports
                 WHERE status = ?1 ORDER BY created_at ASC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(params![&status.as_str()], map_report_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn resolve(&self, id: &str, resolved_by: &str, resolved_at: i64) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let resolved_by = resolved_by.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE issue_reports
                 SET status = 'resolved', resolved_by = ?1, resolved_at = ?2
                 WHERE id = ?3",
                params![&resolved_by, &resolved_at, &id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn reattribute_reporter(
        &self,
        reporter_shapes: &[String],
        sentinel: &str,
    ) -> DomainResult<usize> {
        if reporter_shapes.is_empty() {
            return Ok(0);
        }
        let db = Arc::clone(&self.db);
        let shapes = reporter_shapes.to_vec();
        let sentinel = sentinel.to_string();

        task::spawn_blocking(move || -> DomainResult<usize> {
            let conn = db.get_connection()?;
            // Sentinel is ?1; shapes start at ?2
            let placeholders = in_placeholders(shapes.len(), 2);
            let sql = format!(
                "UPDATE issue_reports SET reporter_id = ?1
                 WHERE reporter_id IN ({placeholders})"
            );

            let mut params: Vec<&dyn ToSql> = vec![&sentinel];
            params.extend(shapes.iter().map(|s| s as &dyn ToSql));

            conn.execute(&sql, &params).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl OwnedRecordStore for SqlCipherIssueReportRepository {
    fn store_name(&self) -> &'static str {
        "issue_reports"
    }

    async fn list_owner_refs(&self) -> DomainResult<Vec<OwnerRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OwnerRef>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare("SELECT id, reporter_id FROM issue_reports")
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
                "UPDATE issue_reports SET reporter_id = ?1 WHERE id = ?2",
                params![&owner_id, &record_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_report_row(row: &Row<'_>) -> rusqlite::Result<IssueReport> {
    let kind_raw: String = row.get(2)?;
    let subject_kind = ReportSubject::parse(&kind_raw).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown report subject: {kind_raw}").into(),
        )
    })?;
    let status_raw: String = row.get(5)?;
    let status = IssueStatus::parse(&status_raw).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown issue status: {status_raw}").into(),
        )
    })?;

    Ok(IssueReport {
        id: row.get(0)?,
        reporter_id: row.get(1)?,
        subject_kind,
        subject_id: row.get(3)?,
        reason: row.get(4)?,
        status,
        resolved_by: row.get(6)?,
        resolved_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn insert_report(conn: &SqlCipherConnection, report: &IssueReport) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 9] = [
        &report.id,
        &report.reporter_id,
        &report.subject_kind.as_str(),
        &report.subject_id,
        &report.reason,
        &report.status.as_str(),
        &report.resolved_by,
        &report.resolved_at,
        &report.created_at,
    ];

    conn.execute(
        "INSERT INTO issue_reports (
            id, reporter_id, subject_kind, subject_id, reason, status,
            resolved_by, resolved_at, created_at
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

    fn create_test_report(reporter_id: &str) -> IssueReport {
        IssueReport {
            id: Uuid::now_v7().to_string(),
            reporter_id: reporter_id.into(),
            subject_kind: ReportSubject::Vehicle,
            subject_id: "veh_1".into(),
            reason: "stolen photos".into(),
            status: IssueStatus::Open,
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now().timestamp(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_resolve_and_list() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherIssueReportRepository::new(db);

        let report = create_test_report("user_2abc");
        repo.insert(report.clone()).await.expect("insert");

        assert_eq!(repo.list_by_status(IssueStatus::Open).await.expect("list").len(), 1);

        repo.resolve(&report.id, "user_admin", 1_700_000_500).await.expect("resolve");

        let resolved = repo.get(&report.id).await.expect("query").expect("found");
        assert_eq!(resolved.status, IssueStatus::Resolved);
        assert_eq!(resolved.resolved_by.as_deref(), Some("user_admin"));
        assert!(repo.list_by_status(IssueStatus::Open).await.expect("list").is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reattribute_reporter() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqlCipherIssueReportRepository::new(db);

        repo.insert(create_test_report("clerk|user_2abc")).await.expect("insert");
        repo.insert(create_test_report("user_other")).await.expect("insert");

        let shapes = vec!["user_2abc".to_string(), "clerk|user_2abc".to_string()];
        let touched =
            repo.reattribute_reporter(&shapes, "deleted_user").await.expect("reattribute");
        assert_eq!(touched, 1);

        let open = repo.list_by_status(IssueStatus::Open).await.expect("list");
        assert!(open.iter().any(|r| r.reporter_id == "deleted_user"));
        assert!(open.iter().any(|r| r.reporter_id == "user_other"));
    }
}
