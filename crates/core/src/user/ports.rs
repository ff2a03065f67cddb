//! Port interfaces for user record persistence
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for the user record store.

use async_trait::async_trait;
use gearbook_domain::{Result, UserRecord};

/// Trait for user record persistence and retrieval
///
/// Each getter is a unique lookup returning `None` on miss. Uniqueness of
/// email and username is checked at the application layer before insert;
/// the storage layer's UNIQUE indexes are only a backstop.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record
    async fn insert(&self, user: UserRecord) -> Result<()>;

    /// Get a user by internal storage id
    async fn get_by_internal_id(&self, id: &str) -> Result<Option<UserRecord>>;

    /// Get a user by composite token identifier
    async fn get_by_token_identifier(&self, token_identifier: &str)
        -> Result<Option<UserRecord>>;

    /// Get a user by canonical subject
    async fn get_by_canonical_id(&self, subject: &str) -> Result<Option<UserRecord>>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Every user record, for the reconciliation batch job
    async fn list_all(&self) -> Result<Vec<UserRecord>>;

    /// Replace an existing record (matched on internal id)
    async fn update(&self, user: UserRecord) -> Result<()>;

    /// Set or clear the mirrored role column
    async fn set_role(&self, internal_id: &str, role: Option<&str>) -> Result<()>;

    /// Delete a user record by internal id (erasure only)
    async fn delete(&self, internal_id: &str) -> Result<()>;
}
