use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::copy::DEFAULT_SERVICE_OFFERING;

const APP_DIR_NAME: &str = "copy-autoscaler";

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path.
    ///
    /// `COPY_AUTOSCALER_CONFIG_DIR` wins when set, otherwise platform conventions apply:
    /// - Linux: $XDG_CONFIG_HOME/copy-autoscaler or ~/.config/copy-autoscaler
    /// - macOS: ~/Library/Application Support/copy-autoscaler
    /// - Windows: %APPDATA%\copy-autoscaler
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("COPY_AUTOSCALER_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        #[cfg(target_os = "linux")]
        {
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join(APP_DIR_NAME))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join(APP_DIR_NAME))
            }
        }

        #[cfg(not(target_os = "linux"))]
        {
            Ok(dirs::config_dir()
                .context("Failed to get config directory")?
                .join(APP_DIR_NAME))
        }
    }

    /// Get the settings file path (config.toml)
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("copy-autoscaler.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// User settings read from `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// HTTP request timeout in seconds; unset keeps the client default
    pub timeout_secs: Option<u64>,

    /// Offering label used to find the autoscaler among bound services
    #[serde(default = "default_service_offering")]
    pub service_offering: String,

    /// Directory holding the cf CLI's `.cf/config.json` (default: $CF_HOME or ~)
    pub cf_home: Option<PathBuf>,
}

fn default_service_offering() -> String {
    DEFAULT_SERVICE_OFFERING.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            timeout_secs: None,
            service_offering: default_service_offering(),
            cf_home: None,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, or defaults when there is no file
    pub fn load() -> Result<Self> {
        let path = ConfigManager::settings_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_timeout_override(mut self, timeout_secs: Option<u64>) -> Self {
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
