//! Configuration file parsing and discovery

use crate::config::schema::validate_settings;
use crate::config::types::Settings;
use crate::error::{CmdlexError, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["cmdlex.yml", "cmdlex.yaml"];

/// Find a configuration file by searching the current and parent directories,
/// then the per-user configuration directory
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    let current_dir = env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?;

    if let Some(path) = find_config_file_from(current_dir) {
        return Ok(Some(path));
    }

    Ok(user_config_file())
}

/// Find a configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> Option<PathBuf> {
    let mut current_dir = start_dir;

    loop {
        if let Some(path) = find_in(&current_dir) {
            return Some(path);
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Configuration file in the per-user config directory, if there is one
pub fn user_config_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cmdlex")?;
    find_in(dirs.config_dir())
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Settings, CmdlexError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    debug!(path = %path.display(), "loading settings");
    parse_config(&contents)
}

/// Parse settings from a string
pub fn parse_config(yaml: &str) -> Result<Settings, CmdlexError> {
    // an empty file means defaults
    if yaml.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(yaml)?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Load settings with automatic file discovery, falling back to defaults
pub fn parse_config_auto() -> Result<(Settings, Option<PathBuf>), CmdlexError> {
    match find_config_file()? {
        Some(path) => {
            let settings = parse_config_file(&path)?;
            Ok((settings, Some(path)))
        }
        None => Ok((Settings::default(), None)),
    }
}
