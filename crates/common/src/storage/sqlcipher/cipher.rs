//! SQLCipher encryption configuration
//!
//! Provides SQLCipher pragma configuration for database encryption.

use rusqlite::Connection;
use tracing::{debug, error};

use crate::storage::error::{StorageError, StorageResult};

/// SQLCipher encryption configuration
#[derive(Clone)]
pub struct SqlCipherConfig {
    /// Encryption key; never logged
    key: String,

    /// Cipher compatibility version (default: 4 for SQLCipher 4.x)
    pub cipher_compatibility: i32,

    /// KDF iterations for key derivation (default: 256000)
    pub kdf_iter: i32,

    /// Enable cipher memory security (default: true)
    pub cipher_memory_security: bool,
}

// Custom Debug impl to avoid exposing the key
impl std::fmt::Debug for SqlCipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlCipherConfig")
            .field("key", &"***")
            .field("cipher_compatibility", &self.cipher_compatibility)
            .field("kdf_iter", &self.kdf_iter)
            .field("cipher_memory_security", &self.cipher_memory_security)
            .finish()
    }
}

impl SqlCipherConfig {
    /// Create default configuration with the given key
    pub fn new(key: String) -> Self {
        Self { key, cipher_compatibility: 4, kdf_iter: 256_000, cipher_memory_security: true }
    }

    /// Set cipher compatibility version
    pub fn with_cipher_compatibility(mut self, version: i32) -> Self {
        self.cipher_compatibility = version;
        self
    }

    /// Set KDF iterations
    pub fn with_kdf_iter(mut self, iterations: i32) -> Self {
        self.kdf_iter = iterations;
        self
    }
}

fn classify_key_error(e: &rusqlite::Error) -> Option<StorageError> {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("file is not a database")
        || err_str.contains("file is encrypted")
        || err_str.contains("database disk image is malformed")
        || err_str.contains("notadb")
    {
        Some(StorageError::WrongKeyOrNotEncrypted)
    } else {
        None
    }
}

/// Configure SQLCipher for a connection
///
/// Applies encryption pragmas. Must be called immediately after opening the
/// connection, before any other statement touches the database.
///
/// ```sql
/// PRAGMA key = '<encryption_key>';
/// PRAGMA cipher_compatibility = 4;
/// PRAGMA kdf_iter = 256000;
/// PRAGMA cipher_memory_security = ON;
/// ```
pub fn configure_sqlcipher(conn: &Connection, config: &SqlCipherConfig) -> StorageResult<()> {
    // Apply encryption key (must be first)
    conn.pragma_update(None, "key", &config.key).map_err(|e| {
        classify_key_error(&e).unwrap_or_else(|| {
            error!(error = %e, "SQLCipher key setup failed");
            StorageError::Encryption(format!("Failed to set encryption key: {e}"))
        })
    })?;

    conn.pragma_update(None, "cipher_compatibility", config.cipher_compatibility).map_err(|e| {
        StorageError::Encryption(format!("Failed to set cipher_compatibility: {e}"))
    })?;

    conn.pragma_update(None, "kdf_iter", config.kdf_iter)
        .map_err(|e| StorageError::Encryption(format!("Failed to set kdf_iter: {e}")))?;

    let memory_security = if config.cipher_memory_security { "ON" } else { "OFF" };
    conn.pragma_update(None, "cipher_memory_security", memory_security).map_err(|e| {
        StorageError::Encryption(format!("Failed to set cipher_memory_security: {e}"))
    })?;

    debug!("SQLCipher configuration applied");
    Ok(())
}

/// Verify that encryption is working by querying the database
///
/// Uses `PRAGMA user_version` plus a `sqlite_master` read, both of which
/// force SQLCipher to decrypt pages, so a wrong key fails here rather than
/// on the first real query.
pub fn verify_encryption(conn: &Connection) -> StorageResult<()> {
    conn.query_row("PRAGMA user_version", [], |_| Ok::<(), rusqlite::Error>(()))
        .and_then(|()| conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(())))
        .map_err(|e| {
            error!(error = %e, "Encryption verification failed");
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("file is not a database")
                || err_str.contains("file is encrypted")
                || err_str.contains("database disk image is malformed")
                || err_str.contains("notadb")
                || err_str.contains("unsupported file format")
                || err_str.contains("unable to open database")
            {
                StorageError::WrongKeyOrNotEncrypted
            } else {
                StorageError::from(e)
            }
        })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn config_defaults() {
        let config = SqlCipherConfig::new("test_key".to_string());
        assert_eq!(config.cipher_compatibility, 4);
        assert_eq!(config.kdf_iter, 256_000);
        assert!(config.cipher_memory_security);
    }

    #[test]
    fn debug_never_exposes_key() {
        let config = SqlCipherConfig::new("super_secret".to_string());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super_secret"));
    }

    #[test]
    fn configure_and_verify_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let conn = Connection::open(&db_path).unwrap();
        let config = SqlCipherConfig::new(
            "test_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
        );

        configure_sqlcipher(&conn, &config).unwrap();
        verify_encryption(&conn).unwrap();
    }

    #[test]
    fn wrong_key_is_detected() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let conn = Connection::open(&db_path).unwrap();
            let config = SqlCipherConfig::new(
                "correct_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            );
            configure_sqlcipher(&conn, &config).unwrap();
            conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", []).unwrap();
        }

        {
            let conn = Connection::open(&db_path).unwrap();
            let config = SqlCipherConfig::new(
                "wrong_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            );
            configure_sqlcipher(&conn, &config).unwrap();

            let result = verify_encryption(&conn);
            assert!(matches!(result, Err(StorageError::WrongKeyOrNotEncrypted)));
        }
    }
}
