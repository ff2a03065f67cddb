//! Storage layer: pooled, encrypted SQLite access.

pub mod error;
pub mod sqlcipher;

pub use error::{StorageError, StorageResult};
