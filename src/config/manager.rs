//! Settings management for a workspace.

use std::path::PathBuf;

use super::{
    ConfigError,
    TranslationSettings,
    loader,
};

/// Holds the validated settings of the current workspace.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    current_settings: TranslationSettings,

    /// Workspace root the settings were loaded from
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// Creates a manager holding the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranslationSettings::default(), workspace_root: None }
    }

    /// Loads settings from the workspace's config file.
    ///
    /// Without a workspace root, or without a config file, the defaults are used.
    /// On error the previous settings are kept.
    ///
    /// # Errors
    /// - Config file cannot be read
    /// - JSON parse error
    /// - Validation errors
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(TranslationSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            TranslationSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// Current settings.
    #[must_use]
    pub const fn get_settings(&self) -> &TranslationSettings {
        &self.current_settings
    }

    /// Directory holding stored translations.
    ///
    /// Relative paths resolve against the workspace root (the current directory when unset).
    #[must_use]
    pub fn storage_directory(&self) -> PathBuf {
        let directory = PathBuf::from(&self.current_settings.storage.directory);
        match &self.workspace_root {
            Some(root) if directory.is_relative() => root.join(directory),
            _ => directory,
        }
    }
}
