//! SQLCipher connection pool
//!
//! Provides r2d2-based connection pooling for SQLCipher databases. Every
//! connection handed out by the pool has the encryption key and the
//! per-connection pragmas already applied.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, warn};

use super::cipher::{configure_sqlcipher, verify_encryption, SqlCipherConfig};
use super::config::SqlCipherPoolConfig;
use super::connection::SqlCipherConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};

/// SQLCipher connection pool
///
/// Manages a pool of encrypted SQLite connections using r2d2:
/// - automatic encryption key application on every connection
/// - WAL mode for concurrency
/// - connection timeout handling
/// - encryption verified with a test connection before the pool is returned
#[derive(Debug)]
pub struct SqlCipherPool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlCipherPoolConfig,
}

fn classify_pool_error(message: &str) -> Option<StorageError> {
    let lowered = message.to_lowercase();
    if lowered.contains("file is not a database")
        || lowered.contains("file is encrypted")
        || lowered.contains("database disk image is malformed")
        || lowered.contains("notadb")
    {
        Some(StorageError::WrongKeyOrNotEncrypted)
    } else {
        None
    }
}

impl SqlCipherPool {
    /// Create a new SQLCipher connection pool
    ///
    /// # Errors
    /// Returns an error if the database file can't be accessed, the
    /// encryption key is wrong, or pool creation fails.
    pub fn new(
        path: &Path,
        encryption_key: String,
        config: SqlCipherPoolConfig,
    ) -> StorageResult<Self> {
        let cipher_config = SqlCipherConfig::new(encryption_key);
        let pool_config = config.clone();

        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            // Key must be applied before anything else touches the file
            configure_sqlcipher(conn, &cipher_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

            Ok(())
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(error = %e, "Failed to create connection pool");
                classify_pool_error(&e.to_string()).unwrap_or_else(|| {
                    StorageError::Connection(format!("Failed to create pool: {e}"))
                })
            })?;

        // Verify encryption with a throwaway connection so a wrong key fails
        // here instead of at the first repository call
        {
            let conn = pool.get().map_err(|e| {
                classify_pool_error(&e.to_string()).unwrap_or_else(|| {
                    StorageError::Connection(format!("Failed to get test connection: {e}"))
                })
            })?;
            verify_encryption(&conn)?;
            debug!("Encryption verified successfully");
        }

        info!(pool_size = config.max_size, "SQLCipher pool created");
        Ok(Self { pool, config })
    }

    /// Maximum number of connections the pool will hand out
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }

    /// Get a connection from the pool
    pub fn get_sqlcipher_connection(&self) -> StorageResult<SqlCipherConnection> {
        match self.pool.get() {
            Ok(conn) => Ok(SqlCipherConnection::new(conn)),
            Err(e) => {
                let err_str = e.to_string().to_lowercase();
                if err_str.contains("timeout") {
                    warn!(timeout = ?self.config.connection_timeout, "Connection timeout");
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!(error = %e, "Connection error");
                    Err(StorageError::Connection(format!("Failed to get connection: {e}")))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    fn test_key() -> String {
        "test_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()
    }

    #[test]
    fn pool_creation_and_basic_query() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool =
            SqlCipherPool::new(&db_path, test_key(), SqlCipherPoolConfig::default()).unwrap();

        let conn = pool.get_sqlcipher_connection().unwrap();
        conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[]).unwrap();
    }

    #[test]
    fn concurrent_connections() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = Arc::new(
            SqlCipherPool::new(&db_path, test_key(), SqlCipherPoolConfig::default()).unwrap(),
        );

        {
            let conn = pool.get_sqlcipher_connection().unwrap();
            conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, value TEXT)", &[]).unwrap();
        }

        let mut handles = vec![];
        for i in 0..5 {
            let pool_clone = Arc::clone(&pool);
            handles.push(std::thread::spawn(move || {
                let conn = pool_clone.get_sqlcipher_connection().unwrap();
                let value = format!("thread_{i}");
                conn.execute("INSERT INTO t (value) VALUES (?)", &[&value]).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let conn = pool.get_sqlcipher_connection().unwrap();
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM t", &[], |row| row.get(0)).unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn wrong_encryption_key_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let pool =
                SqlCipherPool::new(&db_path, test_key(), SqlCipherPoolConfig::default()).unwrap();
            let conn = pool.get_sqlcipher_connection().unwrap();
            conn.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();
        }

        let result = SqlCipherPool::new(
            &db_path,
            "wrong_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            SqlCipherPoolConfig::default(),
        );

        assert!(matches!(result, Err(StorageError::WrongKeyOrNotEncrypted)));
    }
}
