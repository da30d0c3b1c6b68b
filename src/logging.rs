//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily rotating file, never to the terminal the grid is
//! drawn on.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log filter if neither `RUST_LOG` nor a configured filter is set.
pub const DEFAULT_LOG_FILTER: &str = "synctable=info,warn";

/// Filter used with `--debug`.
const DEBUG_LOG_FILTER: &str = "synctable=debug,warn";

/// Pick the filter directive.
///
/// `RUST_LOG` wins over `--debug`, which wins over the configured filter.
fn filter_directive(env: Option<String>, debug: bool, configured: Option<&str>) -> String {
    if let Some(env) = env.filter(|v| !v.trim().is_empty()) {
        return env;
    }
    if debug {
        return DEBUG_LOG_FILTER.to_string();
    }
    configured.unwrap_or(DEFAULT_LOG_FILTER).to_string()
}

/// Initialize the logging system.
///
/// Sets up tracing with a daily rotating file appender in the user's local
/// data directory:
/// - Linux: `~/.local/share/synctable/logs/`
/// - macOS: `~/Library/Application Support/synctable/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\synctable\logs\`
///
/// # Errors
///
/// Returns an error if the log directory cannot be created, the filter is
/// invalid, or a global subscriber is already set.
pub fn init(debug: bool, configured_filter: Option<&str>) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "synctable.log");

    let directive = filter_directive(std::env::var("RUST_LOG").ok(), debug, configured_filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "synctable starting up");
    tracing::debug!(log_dir = %log_dir.display(), filter = %directive, "Log directory");

    Ok(())
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("synctable").join("logs"))
}

/// Where logs are stored, for telling the user.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("synctable shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("synctable/logs"));
        }
    }

    #[test]
    fn test_env_filter_wins() {
        let directive = filter_directive(Some("trace".to_string()), true, Some("warn"));
        assert_eq!(directive, "trace");
    }

    #[test]
    fn test_debug_flag_over_config() {
        assert_eq!(filter_directive(None, true, Some("warn")), DEBUG_LOG_FILTER);
        assert_eq!(filter_directive(Some("  ".to_string()), true, None), DEBUG_LOG_FILTER);
    }

    #[test]
    fn test_configured_then_default() {
        assert_eq!(filter_directive(None, false, Some("synctable=trace")), "synctable=trace");
        assert_eq!(filter_directive(None, false, None), DEFAULT_LOG_FILTER);
    }
}
