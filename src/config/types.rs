use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "retry.maxAttempts")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Renders validation errors as a numbered list.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Placeholder replaced by the language code in `descriptionTemplate`.
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationSettings {
    pub storage: StorageConfig,

    /// Persist after every change. When off, changes are written on flush
    /// and when the store is dropped.
    pub autosave: bool,

    /// Description given to newly created records.
    pub description_template: String,

    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Directory holding persisted translations, relative to the workspace root.
    pub directory: String,
    /// Storage key all records are persisted under.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { directory: ".form-translations".to_string(), key: "formTranslations".to_string() }
    }
}

/// Bounded retry with exponential backoff for persistence writes.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    /// Attempts including the first one.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, initial_delay_ms: 100, max_delay_ms: 2000 }
    }
}

impl RetryConfig {
    /// No waiting between attempts.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self { max_attempts, initial_delay_ms: 0, max_delay_ms: 0 }
    }

    /// Delay before retry number `retry` (1-based), doubling each time and capped at `max_delay_ms`.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 1_u64.checked_shl(retry.saturating_sub(1)).unwrap_or(u64::MAX);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

impl TranslationSettings {
    /// Description for a newly created record of `language_code`.
    #[must_use]
    pub fn describe(&self, language_code: &str) -> String {
        self.description_template.replace(LANGUAGE_PLACEHOLDER, language_code)
    }

    /// # Errors
    /// - Required field is empty
    /// - Storage key is not a plain file name
    /// - Retry bounds are inconsistent
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.storage.directory.trim().is_empty() {
            errors.push(ValidationError::new(
                "storage.directory",
                "The directory cannot be empty. Example: \".form-translations\"",
            ));
        }

        let key = &self.storage.key;
        if key.trim().is_empty() {
            errors.push(ValidationError::new(
                "storage.key",
                "The key cannot be empty. Example: \"formTranslations\"",
            ));
        } else if key.contains(['/', '\\']) || key.starts_with('.') {
            errors.push(ValidationError::new(
                "storage.key",
                format!("Invalid key '{key}': must not contain path separators or start with '.'"),
            ));
        }

        if self.retry.max_attempts == 0 {
            errors.push(ValidationError::new(
                "retry.maxAttempts",
                "At least one attempt is required",
            ));
        }

        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            errors.push(ValidationError::new(
                "retry.initialDelayMs",
                format!(
                    "Initial delay ({}ms) cannot exceed maxDelayMs ({}ms)",
                    self.retry.initial_delay_ms, self.retry.max_delay_ms
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            autosave: true,
            description_template: format!("Translations for {LANGUAGE_PLACEHOLDER}"),
            retry: RetryConfig::default(),
        }
    }
}
