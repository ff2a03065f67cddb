//! Shared repository plumbing
//!
//! Error mapping and SQL helpers used by every SQLCipher repository.

use gearbook_common::storage::StorageError;
use gearbook_domain::GearbookError;
use tokio::task;

/// Map a storage error into the domain error type
pub(crate) fn map_storage_error(err: StorageError) -> GearbookError {
    match err {
        StorageError::WrongKeyOrNotEncrypted => {
            GearbookError::Database("sqlcipher key rejected or database not encrypted".into())
        }
        StorageError::Timeout(seconds) => {
            GearbookError::Database(format!("database timeout after {seconds}s"))
        }
        StorageError::Connection(message)
        | StorageError::Query(message)
        | StorageError::Encryption(message)
        | StorageError::Migration(message)
        | StorageError::InvalidConfig(message) => GearbookError::Database(message),
        StorageError::Io(io_err) => GearbookError::Database(io_err.to_string()),
        StorageError::Rusqlite(sql_err) => GearbookError::Database(sql_err.to_string()),
        StorageError::R2d2(r2d2_err) => GearbookError::Database(r2d2_err.to_string()),
    }
}

/// Map an insert error, surfacing UNIQUE violations as `Conflict`.
///
/// The application layer checks uniqueness before inserting; the schema's
/// UNIQUE indexes are the backstop for the documented check-then-insert
/// race, and a violation reaching this point means the race fired.
pub(crate) fn map_insert_error(err: StorageError) -> GearbookError {
    if let StorageError::Rusqlite(sql_err) = &err {
        if matches!(
            sql_err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        ) {
            return GearbookError::Conflict("record violates a uniqueness constraint".into());
        }
    }
    map_storage_error(err)
}

/// Map a blocking-task join error into the domain error type
pub(crate) fn map_join_error(err: task::JoinError) -> GearbookError {
    if err.is_cancelled() {
        GearbookError::Internal("blocking task cancelled".into())
    } else {
        GearbookError::Internal(format!("blocking task failed: {err}"))
    }
}

/// Build a `?N, ?N+1, ...` placeholder list for an `IN (...)` clause,
/// starting at placeholder index `start`
pub(crate) fn in_placeholders(count: usize, start: usize) -> String {
    (0..count).map(|i| format!("?{}", start + i)).collect::<Vec<_>>().join(", ")
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}
