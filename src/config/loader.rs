//! Settings file loading and persistence.

use super::OctaneConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_SUBDIR: &str = ".config/octane";
const SETTINGS_FILE: &str = "settings.json";

fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or_else(|| ConfigError::ValidationFailed("Cannot determine home directory".to_string()))
}

/// Get the global settings path: ~/.config/octane/settings.json
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(CONFIG_SUBDIR).join(SETTINGS_FILE))
}

/// Ensure the global settings directory exists
pub fn ensure_settings_dir_exists() -> Result<(), ConfigError> {
    let config_dir = home_dir()?.join(CONFIG_SUBDIR);
    fs::create_dir_all(&config_dir).map_err(ConfigError::IoError)?;
    Ok(())
}

/// Default report directory: `<data dir>/octane/reports`, or a relative
/// `octane-reports` when the platform has no data dir.
pub fn default_report_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("octane").join("reports"),
        None => PathBuf::from("octane-reports"),
    }
}

/// Validate config path (.json extension required).
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => {}
        Some(ext) => {
            return Err(ConfigError::ValidationFailed(format!(
                "Configuration file must have .json extension, got .{}",
                ext.to_string_lossy()
            )))
        }
        None => {
            return Err(ConfigError::ValidationFailed(
                "Configuration file must have .json extension".to_string(),
            ))
        }
    }

    if path.to_str().is_none() {
        return Err(ConfigError::ValidationFailed(
            "Configuration path contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

/// Load and validate config from a JSON file.
pub fn load_config_from_file(path: &Path) -> Result<OctaneConfig, ConfigError> {
    validate_config_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!(
                "Configuration file not found at: {}",
                path.display()
            ))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let config: OctaneConfig = serde_json::from_str(&content).map_err(ConfigError::InvalidJson)?;
    config.validate()?;

    log::debug!("[Config] Loaded {}", path.display());
    Ok(config)
}

/// Save config to a JSON file, creating parent directories.
pub fn save_config_to_file(config: &OctaneConfig, path: &Path) -> Result<(), ConfigError> {
    validate_config_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ConfigError::IoError)?;
        }
    }

    let json_content = serde_json::to_string_pretty(config).map_err(ConfigError::InvalidJson)?;
    fs::write(path, json_content).map_err(ConfigError::IoError)?;

    log::debug!("[Config] Saved {}", path.display());
    Ok(())
}

/// Resolve the effective configuration.
///
/// An explicit path must exist and parse. Without one, the global settings
/// file is used when present and defaults otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<OctaneConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from_file(path);
    }

    let global = match get_global_settings_path() {
        Ok(path) => path,
        Err(e) => {
            log::debug!("[Config] {}; using defaults", e);
            return Ok(OctaneConfig::default());
        }
    };
    if global.exists() {
        load_config_from_file(&global)
    } else {
        log::debug!("[Config] No settings at {}, using defaults", global.display());
        Ok(OctaneConfig::default())
    }
}
