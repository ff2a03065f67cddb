//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `GEARBOOK_DB_PATH`: Database file path
//! - `GEARBOOK_DB_POOL_SIZE`: Connection pool size (optional, default 10)
//! - `GEARBOOK_DB_ENCRYPTION_KEY`: Database encryption key
//! - `GEARBOOK_AUTH_ISSUER`: Issuer tag expected in composite token
//!   identifiers (optional, default "clerk")
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml`
//! 2. `./gearbook.json` or `./gearbook.toml`
//! 3. `../config.json` or `../config.toml`

use std::path::{Path, PathBuf};

use gearbook_domain::{AuthConfig, Config, DatabaseConfig, GearbookError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `GearbookError::Config` if configuration cannot be loaded from
/// either source, the file format is invalid, or required fields are
/// missing.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `GearbookError::Config` if `GEARBOOK_DB_PATH` is missing or a
/// numeric variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("GEARBOOK_DB_PATH")?;
    let pool_size = match std::env::var("GEARBOOK_DB_POOL_SIZE") {
        Ok(value) => value
            .parse::<u32>()
            .map_err(|e| GearbookError::Config(format!("Invalid pool size: {e}")))?,
        Err(_) => 10,
    };
    let encryption_key = std::env::var("GEARBOOK_DB_ENCRYPTION_KEY").ok();
    let issuer =
        std::env::var("GEARBOOK_AUTH_ISSUER").unwrap_or_else(|_| AuthConfig::default().issuer);

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size, encryption_key },
        auth: AuthConfig { issuer },
    })
}

/// Load configuration from a file
///
/// When `path` is `None`, probes the default locations for a JSON or TOML
/// config file.
///
/// # Errors
/// Returns `GearbookError::Config` when no config file is found or the
/// file cannot be parsed.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => probe_config_paths().ok_or_else(|| {
            GearbookError::Config("no config file found in the probed locations".into())
        })?,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        GearbookError::Config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|e| {
            GearbookError::Config(format!("invalid JSON in {}: {e}", path.display()))
        })?,
        Some("toml") => toml::from_str(&contents).map_err(|e| {
            GearbookError::Config(format!("invalid TOML in {}: {e}", path.display()))
        })?,
        other => {
            return Err(GearbookError::Config(format!(
                "unsupported config format: {other:?}"
            )))
        }
    };

    tracing::info!(path = %path.display(), "Configuration loaded from file");
    Ok(config)
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| GearbookError::Config(format!("missing environment variable {name}")))
}

fn probe_config_paths() -> Option<PathBuf> {
    let candidates = [
        "config.json",
        "config.toml",
        "gearbook.json",
        "gearbook.toml",
        "../config.json",
        "../config.toml",
    ];

    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}
