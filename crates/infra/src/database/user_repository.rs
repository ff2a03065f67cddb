//! User record repository implementation using SQLCipher
//!
//! The canonical user record store. Every lookup the identity resolver
//! relies on is a unique indexed query; the bare canonical-subject lookup
//! in particular is backed by the `idx_users_subject` index rather than a
//! scan over composite identifiers.

use std::sync::Arc;

use async_trait::async_trait;
use gearbook_common::storage::error::StorageError;
use gearbook_common::storage::sqlcipher::SqlCipherConnection;
use gearbook_core::user::ports::UserRepository as UserRepositoryPort;
use gearbook_domain::{Result as DomainResult, UserRecord};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::repository::{bool_to_int, int_to_bool, map_insert_error, map_join_error, map_storage_error};

const USER_COLUMNS: &str = "id, subject, token_identifier, email, username, display_name,
                            avatar_url, role, profile_complete, created_at, updated_at";

/// SQLCipher-backed implementation of `UserRepository`
pub struct SqlCipherUserRepository {
    db: Arc<DbManager>,
}

impl SqlCipherUserRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn get_by_column(&self, column: &'static str, value: String) -> DomainResult<Option<UserRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<UserRecord>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");

            match conn.query_row(&sql, params![&value], map_user_row) {
                Ok(user) => Ok(Some(user)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl UserRepositoryPort for SqlCipherUserRepository {
    async fn insert(&self, user: UserRecord) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_user(&conn, &user).map_err(map_insert_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_internal_id(&self, id: &str) -> DomainResult<Option<UserRecord>> {
        self.get_by_column("id", id.to_string()).await
    }

    async fn get_by_token_identifier(
        &self,
        token_identifier: &str,
    ) -> DomainResult<Option<UserRecord>> {
        self.get_by_column("token_identifier", token_identifier.to_string()).await
    }

    async fn get_by_canonical_id(&self, subject: &str) -> DomainResult<Option<UserRecord>> {
        self.get_by_column("subject", subject.to_string()).await
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<Option<UserRecord>> {
        self.get_by_column("email", email.to_string()).await
    }

    async fn get_by_username(&self, username: &str) -> DomainResult<Option<UserRecord>> {
        self.get_by_column("username", username.to_string()).await
    }

    async fn list_all(&self) -> DomainResult<Vec<UserRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<UserRecord>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_user_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, user: UserRecord) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_user(&conn, &user).map_err(map_insert_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_role(&self, internal_id: &str, role: Option<&str>) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let internal_id = internal_id.to_string();
        let role = role.map(str::to_string);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE users SET role = ?1 WHERE id = ?2",
                params![&role, &internal_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, internal_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let internal_id = internal_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM users WHERE id = ?1", params![&internal_id])
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

/// Map a row to a UserRecord
fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        subject: row.get(1)?,
        token_identifier: row.get(2)?,
        email: row.get(3)?,
        username: row.get(4)?,
        display_name: row.get(5)?,
        avatar_url: row.get(6)?,
        role: row.get(7)?,
        profile_complete: int_to_bool(row.get(8)?),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn insert_user(conn: &SqlCipherConnection, user: &UserRecord) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 11] = [
        &user.id,
        &user.subject,
        &user.token_identifier,
        &user.email,
        &user.username,
        &user.display_name,
        &user.avatar_url,
        &user.role,
        &bool_to_int(user.profile_complete),
        &user.created_at,
        &user.updated_at,
    ];

    conn.execute(
        "INSERT INTO users (
            id, subject, token_identifier, email, username, display_name,
            avatar_url, role, profile_complete, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params.as_slice(),
    )?;

    Ok(())
}

fn update_user(conn: &SqlCipherConnection, user: &UserRecord) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 11] = [
        &user.subject,
        &user.token_identifier,
        &user.email,
        &user.username,
        &user.display_name,
        &user.avatar_url,
        &user.role,
        &bool_to_int(user.profile_complete),
        &user.created_at,
        &user.updated_at,
        &user.id, // WHERE clause
    ];

    conn.execute(
        "UPDATE users SET
            subject = ?1, token_identifier = ?2, email = ?3, username = ?4,
            display_name = ?5, avatar_url = ?6, role = ?7, profile_complete = ?8,
            created_at = ?9, updated_at = ?10
         WHERE id = ?11",
        params.as_slice(),
    )?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
