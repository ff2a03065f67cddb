//! Configuration structures
//!
//! Loaded by `gearbook-infra` from environment variables or a config file.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLCipher database file
    pub path: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Encryption key; required at runtime, optional here so it can come
    /// from the environment instead of the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Issuer tag expected in composite token identifiers
    /// (`"<issuer>|<subject>"`)
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { issuer: "clerk".to_string() }
    }
}

fn default_pool_size() -> u32 {
    10
}
