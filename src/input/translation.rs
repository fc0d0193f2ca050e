//! Translation record definitions and translation file import/export.

use std::collections::BTreeMap;
use std::path::Path;

use jsonc_parser::ParseOptions;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::labels::translation_key;

/// Errors raised while reading or writing a single-record translation file.
#[derive(Error, Debug)]
pub enum TranslationFileError {
    #[error("Failed to access translation file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not parseable JSON (comments and trailing commas are accepted).
    #[error("Failed to parse translation file: {0}")]
    Parse(String),
    #[error("Translation file is empty")]
    Empty,
    /// The JSON parsed but does not have the translation record shape.
    #[error("Invalid translation record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}

/// Per-language translations of one form.
///
/// Serialized as `{ id, form, description, language, translations }`.
/// Older documents used `uuid` for the record identifier; it is accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    #[serde(alias = "uuid", default = "new_record_id")]
    pub id: String,

    /// Identifier of the owning form schema.
    #[serde(default)]
    pub form: String,

    #[serde(default)]
    pub description: String,

    /// Language code (e.g. "fr").
    pub language: String,

    /// Translation key → translated text.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

/// Generates a fresh record identifier.
fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl TranslationRecord {
    /// Creates an empty record with a freshly generated identifier.
    #[must_use]
    pub fn new(
        form: impl Into<String>,
        language: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            form: form.into(),
            description: description.into(),
            language: language.into(),
            translations: BTreeMap::new(),
        }
    }

    /// Looks up the translation of `label`.
    ///
    /// Both the query and the stored keys are compared in their canonical
    /// form, so keys persisted with different case or spacing still match.
    /// Blank stored values count as missing.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&str> {
        let key = translation_key(label);
        let equivalent = self
            .translations
            .iter()
            .filter(|(stored, _)| **stored != key && translation_key(stored) == key)
            .map(|(_, value)| value);

        self.translations
            .get(&key)
            .into_iter()
            .chain(equivalent)
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
    }

    /// Sets the translation of `label`, replacing any entry that resolves to the same key.
    pub fn set_entry(&mut self, label: &str, value: impl Into<String>) {
        let key = translation_key(label);
        self.translations.retain(|stored, _| *stored == key || translation_key(stored) != key);
        self.translations.insert(key, value.into());
    }
}

/// Default file name for an exported record.
#[must_use]
pub fn export_file_name(language_code: &str) -> String {
    format!("translations_{language_code}.json")
}

/// Reads a single translation record from a file.
///
/// Hand-edited files are common, so comments and trailing commas are accepted.
///
/// # Errors
/// Returns error if the file cannot be read, parsed, or is not a translation record.
pub fn read_translation_file(file_path: &Path) -> Result<TranslationRecord, TranslationFileError> {
    let content = std::fs::read_to_string(file_path)?;
    parse_translation_record(&content)
}

/// Parses a single translation record from JSON (or JSONC) text.
///
/// # Errors
/// Returns error if the text is not a translation record.
pub fn parse_translation_record(text: &str) -> Result<TranslationRecord, TranslationFileError> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|e| TranslationFileError::Parse(e.to_string()))?
        .ok_or(TranslationFileError::Empty)?;

    Ok(serde_json::from_value(value)?)
}

/// Writes a translation record as pretty-printed JSON.
///
/// # Errors
/// Returns error if serialization or the file write fails.
pub fn write_translation_file(
    file_path: &Path,
    record: &TranslationRecord,
) -> Result<(), TranslationFileError> {
    let mut content = serde_json::to_string_pretty(record)?;
    content.push('\n');
    std::fs::write(file_path, content)?;
    tracing::debug!(
        path = %file_path.display(),
        language = %record.language,
        "Wrote translation file"
    );
    Ok(())
}
