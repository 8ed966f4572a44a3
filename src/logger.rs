use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;

use crate::config::ConfigManager;
use crate::VerbosityLevel;

/// Initialize the logging system
///
/// Console logging goes to stderr; stdout is reserved for command output such
/// as the instance name printed by `--find` or a snapshot exported to `-`.
///
/// `RUST_LOG` takes precedence when set. Otherwise the level follows the
/// verbosity flags:
/// - `--quiet` - errors only
/// - default - warnings and errors
/// - `--verbose` - debug and above
///
/// ## Examples
///
/// ```bash
/// # Show every request made
/// RUST_LOG=debug copy-autoscaler myapp --export settings.json
/// ```
pub fn init_logger(verbosity: VerbosityLevel) -> Result<()> {
    let default_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(match verbosity {
            VerbosityLevel::Quiet => LevelFilter::Error,
            VerbosityLevel::Normal => LevelFilter::Warn,
            VerbosityLevel::Verbose => LevelFilter::Debug,
        });

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(default_level)
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok(); // Ignore error if logger is already initialized

    Ok(())
}

/// Append a line to the audit log in the config directory
pub fn log_to_file(message: &str) -> Result<()> {
    ConfigManager::ensure_config_dir()?;
    let log_path = ConfigManager::log_file_path()?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;

    Ok(())
}

/// Rotate the audit log once it exceeds 10MB
pub fn rotate_log_if_needed() -> Result<()> {
    const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

    let log_path = ConfigManager::log_file_path()?;

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;

        if metadata.len() > MAX_LOG_SIZE {
            let old_log_path = log_path.with_extension("log.old");

            if old_log_path.exists() {
                std::fs::remove_file(&old_log_path)?;
            }

            std::fs::rename(&log_path, &old_log_path)?;

            log::info!("Log file rotated to {}", old_log_path.display());
        }
    }

    Ok(())
}
