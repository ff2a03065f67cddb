//! SQLCipher pool helpers
//!
//! Thin wrapper around the shared SQLCipher connection pool that converts
//! storage errors into the domain error type used by infrastructure code.

use std::path::Path;
use std::sync::Arc;

use gearbook_common::storage::sqlcipher::SqlCipherPool as CommonSqlCipherPool;
pub use gearbook_common::storage::sqlcipher::SqlCipherPoolConfig;
use gearbook_common::storage::StorageError;
use gearbook_domain::{GearbookError, Result};

/// Re-export the common SQLCipher pool so callers can depend on the shared
/// type.
pub type SqlCipherPool = CommonSqlCipherPool;

/// Convenience helper for creating an `Arc<SqlCipherPool>` using domain
/// error semantics.
pub fn create_sqlcipher_pool<P: AsRef<Path>>(
    path: P,
    encryption_key: String,
    config: SqlCipherPoolConfig,
) -> Result<Arc<SqlCipherPool>> {
    SqlCipherPool::new(path.as_ref(), encryption_key, config)
        .map(Arc::new)
        .map_err(map_storage_error)
}

fn map_storage_error(err: StorageError) -> GearbookError {
    GearbookError::Database(err.to_string())
}
