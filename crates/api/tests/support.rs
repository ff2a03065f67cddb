//! Shared harness for command-layer integration tests
//!
//! Builds a full application context over an isolated temporary SQLCipher
//! database, and fabricates request contexts the way the provider
//! integration would after validating a token.
#![allow(dead_code)]

use std::sync::Arc;

use gearbook_domain::{AuthClaims, AuthConfig, Config, DatabaseConfig, RequestContext};
use gearbook_infra::database::DbManager;
use gearbook_lib::AppContext;
use tempfile::TempDir;

pub const TEST_DB_KEY: &str = "test_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// A wired application context over a temporary database
pub struct TestApp {
    pub ctx: AppContext,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("api-test.db");

        let manager = Arc::new(
            DbManager::new(&db_path, 4, Some(TEST_DB_KEY)).expect("db manager should be created"),
        );
        manager.run_migrations().expect("migrations should run");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.to_string_lossy().into_owned(),
                pool_size: 4,
                encryption_key: Some(TEST_DB_KEY.to_string()),
            },
            auth: AuthConfig::default(),
        };

        Self { ctx: AppContext::with_database(config, manager), _temp_dir: temp_dir }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Claims for a signed-in user, as the provider integration would build
/// them from a validated token
pub fn claims(subject: &str) -> AuthClaims {
    AuthClaims {
        subject: subject.to_string(),
        token_identifier: format!("clerk|{subject}"),
        email: Some(format!("{subject}@example.com")),
        name: Some("Test Driver".to_string()),
        role: None,
    }
}

/// Authenticated request context for a subject
pub fn auth_ctx(subject: &str) -> RequestContext {
    RequestContext::authenticated(claims(subject))
}

/// Authenticated request context carrying the admin metadata claim
pub fn admin_auth_ctx(subject: &str) -> RequestContext {
    let mut admin_claims = claims(subject);
    admin_claims.role = Some("admin".to_string());
    RequestContext::authenticated(admin_claims)
}
