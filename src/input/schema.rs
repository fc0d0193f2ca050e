//! Form schema input definitions.
//!
//! The schema tree is consumed read-only: only the fields needed to find
//! translatable labels are modelled, everything else in the document is ignored.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading a schema document from disk.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Error when failing to read the schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    /// Error when the schema is not valid JSON of the expected shape
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A hierarchical form definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    /// Schema identifier.
    pub uuid: Option<String>,
    /// Human-readable form name.
    pub name: Option<String>,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub label: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub label: Option<String>,
    pub questions: Vec<Question>,
}

/// A question, possibly grouping further questions of the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Question {
    pub label: Option<String>,
    pub question_options: Option<QuestionOptions>,
    /// Nested questions (obs groups, repeating groups). Unbounded depth.
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionOptions {
    pub answers: Vec<AnswerOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerOption {
    pub label: Option<String>,
}

/// Salsa input holding the schema currently being edited.
#[salsa::input]
pub struct SchemaDocument {
    /// Identifier the schema's translations are stored under.
    #[returns(ref)]
    pub form_id: String,

    #[returns(ref)]
    pub schema: Schema,
}

impl Schema {
    /// Identifier under which translations of this schema are stored.
    ///
    /// Prefers `uuid`, then `name`. Blank values are treated as absent.
    #[must_use]
    pub fn form_id(&self) -> Option<&str> {
        [self.uuid.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

impl Question {
    /// Answer options of this question, empty when it has none.
    #[must_use]
    pub fn answers(&self) -> &[AnswerOption] {
        self.question_options
            .as_ref()
            .map(|options| options.answers.as_slice())
            .unwrap_or_default()
    }
}

/// Parses a schema from JSON text.
///
/// # Errors
/// Returns error if the text is not a JSON object of the schema shape.
pub fn parse_schema(text: &str) -> Result<Schema, SchemaError> {
    Ok(serde_json::from_str(text)?)
}

/// Loads a schema document from a file.
///
/// # Errors
/// Returns error if file read or JSON parse fails.
pub fn load_schema_file(file_path: &Path) -> Result<Schema, SchemaError> {
    tracing::debug!(path = %file_path.display(), "Loading schema");
    let content = std::fs::read_to_string(file_path)?;
    parse_schema(&content)
}
