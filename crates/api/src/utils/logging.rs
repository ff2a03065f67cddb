//! Structured logging helpers for the command layer

use std::future::Future;
use std::time::{Duration, Instant};

use gearbook_domain::{GearbookError, Result};
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is the logical command identifier (e.g.
/// `"garage::create_vehicle"`). Callers must avoid forwarding sensitive
/// values in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `GearbookError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &GearbookError) -> &'static str {
    match error {
        GearbookError::Database(_) => "database",
        GearbookError::Config(_) => "config",
        GearbookError::Unauthenticated(_) => "unauthenticated",
        GearbookError::Forbidden(_) => "forbidden",
        GearbookError::NotFound(_) => "not_found",
        GearbookError::Conflict(_) => "conflict",
        GearbookError::InvalidInput(_) => "invalid_input",
        GearbookError::Internal(_) => "internal",
    }
}

/// Run a command future, logging its duration and outcome.
pub async fn run_command<T, F>(command: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = fut.await;

    let elapsed = start.elapsed();
    log_command_execution(command, elapsed, result.is_ok());
    if let Err(error) = &result {
        warn!(command, error_type = error_label(error), error = %error, "command failed");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_command_passes_through_results() {
        let ok: Result<i32> = run_command("test::ok", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: Result<i32> = run_command("test::err", async {
            Err(GearbookError::NotFound("nope".into()))
        })
        .await;
        assert!(matches!(err, Err(GearbookError::NotFound(_))));
    }

    #[test]
    fn error_labels_are_stable() {
        assert_eq!(error_label(&GearbookError::Forbidden("x".into())), "forbidden");
        assert_eq!(error_label(&GearbookError::Conflict("x".into())), "conflict");
    }
}
