//! Gearbook operator CLI
//!
//! Headless entry point for out-of-band operations: the identity
//! reconciliation batch job and a database health check. The web-facing
//! command layer lives in the library crate; this binary is what an
//! operator runs on a box with database access.

use gearbook_lib::AppContext;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("usage: gearbook <command>");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  reconcile   rewrite drifted owner identifiers to canonical form");
    eprintln!("              and print the audit report as JSON");
    eprintln!("  health      check database connectivity and schema");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    if std::env::var("GEARBOOK_DB_ENCRYPTION_KEY").is_err() {
        warn!("GEARBOOK_DB_ENCRYPTION_KEY not found in environment");
    }

    let command = std::env::args().nth(1);
    let Some(command) = command else {
        print_usage();
        anyhow::bail!("no command given");
    };

    let config = gearbook_infra::config::load()?;
    let ctx = AppContext::new(config)?;

    match command.as_str() {
        "reconcile" => {
            info!("starting identity reconciliation");
            let report = ctx.reconciliation.run().await?;
            info!(
                users = report.users_processed,
                updates = report.total_updates(),
                "reconciliation finished"
            );
            // The audit report goes to stdout for the operator
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "health" => {
            ctx.db.health_check()?;
            info!(db_path = %ctx.db.path().display(), "database healthy");
        }
        other => {
            print_usage();
            anyhow::bail!("unknown command: {other}");
        }
    }

    Ok(())
}
