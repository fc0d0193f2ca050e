//! Config file loading.

use std::path::Path;

use super::{
    ConfigError,
    TranslationSettings,
};

/// Config file name, placed in the workspace root
pub const CONFIG_FILE_NAME: &str = ".form-translations.json";

/// Loads settings from the workspace
///
/// Looks for `.form-translations.json` and parses it.
///
/// # Arguments
/// * `workspace_root` - workspace root path
///
/// # Returns
/// - `Ok(Some(settings))`: config file found and parsed
/// - `Ok(None)`: no config file
/// - `Err(ConfigError)`: read or parse error
///
/// # Errors
/// - File read error
/// - JSON parse error
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<TranslationSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: TranslationSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
