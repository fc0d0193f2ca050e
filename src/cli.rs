//! Command line front end.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::catalog;
use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::input::schema::{
    Schema,
    SchemaError,
    load_schema_file,
};
use crate::input::translation::{
    TranslationFileError,
    export_file_name,
    read_translation_file,
    write_translation_file,
};
use crate::labels::extract_labels;
use crate::session::FormSession;
use crate::storage::FileStorage;
use crate::store::{
    NO_TRANSLATION,
    StoreError,
};

/// Form translations - label extraction and translation store for form schemas
#[derive(Debug, Parser)]
#[command(name = "form-translations")]
#[command(about = "Extract form labels and manage their translations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root directory (holds the config file and stored translations)
    #[arg(short = 'C', long, global = true)]
    pub workspace_root: Option<PathBuf>,

    /// Commands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the unique labels of a schema
    Labels {
        /// Schema file
        schema: PathBuf,
    },
    /// Print the supported languages
    Languages,
    /// Print the translation of a label
    Get {
        /// Schema file
        schema: PathBuf,
        /// Language code or name
        language: String,
        /// Label to look up
        label: String,
    },
    /// Add or update the translation of a label
    Set {
        /// Schema file
        schema: PathBuf,
        /// Language code or name
        language: String,
        /// Label to translate
        label: String,
        /// Translated text
        value: String,
    },
    /// Print every label of a schema with its translation
    Show {
        /// Schema file
        schema: PathBuf,
        /// Language code or name
        language: String,
        /// Only print labels without a translation
        #[arg(short, long)]
        missing: bool,
    },
    /// Write the translations of one language to a file
    Export {
        /// Schema file
        schema: PathBuf,
        /// Language code or name
        language: String,
        /// Output file (defaults to translations_<code>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge translations from a file
    Import {
        /// Schema file
        schema: PathBuf,
        /// Translation file
        file: PathBuf,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load schema: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    TranslationFile(#[from] TranslationFileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unknown language: '{0}'")]
    UnknownLanguage(String),

    #[error("No translations for language '{0}'")]
    NoTranslations(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Whether this is a user input warning rather than a failure.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Store(StoreError::MissingSelection) | Self::UnknownLanguage(_))
    }
}

/// Runs a parsed command, writing its output to `out`.
///
/// # Errors
/// Returns error if loading, validation or persistence fails.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let workspace_root = match cli.workspace_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    tracing::debug!(workspace_root = %workspace_root.display(), command = ?cli.command, "Running");

    match cli.command {
        Commands::Labels { schema } => {
            let schema = load_schema_file(&schema)?;
            for label in extract_labels(&schema) {
                writeln!(out, "{label}")?;
            }
        }
        Commands::Languages => {
            for language in catalog::languages() {
                writeln!(out, "{}\t{}", language.code, language.name)?;
            }
        }
        Commands::Get { schema, language, label } => {
            let code = resolve_language(&language)?;
            let session = open_session(&workspace_root, &schema)?;
            writeln!(out, "{}", session.store().get_translation(code, &label))?;
        }
        Commands::Set { schema, language, label, value } => {
            let code = resolve_language(&language)?;
            let mut session = open_session(&workspace_root, &schema)?;
            session.store_mut().add_or_update_translation(code, &label, &value)?;
            session.store_mut().flush()?;
            writeln!(out, "Saved translation of '{}' for {}", label.trim(), display_name(code))?;
        }
        Commands::Show { schema, language, missing } => {
            let code = resolve_language(&language)?;
            let session = open_session(&workspace_root, &schema)?;
            for row in session.translation_rows(code) {
                match row.translation {
                    Some(_) if missing => {}
                    Some(translation) => writeln!(out, "{}\t{translation}", row.label)?,
                    None => writeln!(out, "{}\t{NO_TRANSLATION}", row.label)?,
                }
            }
        }
        Commands::Export { schema, language, output } => {
            let code = resolve_language(&language)?;
            let session = open_session(&workspace_root, &schema)?;
            let record = session
                .store()
                .export_record(code)
                .ok_or_else(|| CliError::NoTranslations(code.to_string()))?;
            let output = output.unwrap_or_else(|| PathBuf::from(export_file_name(code)));
            write_translation_file(&output, &record)?;
            writeln!(
                out,
                "Exported {} translation(s) to {}",
                record.translations.len(),
                output.display()
            )?;
        }
        Commands::Import { schema, file } => {
            let record = read_translation_file(&file)?;
            let mut session = open_session(&workspace_root, &schema)?;
            let applied = session.store_mut().import_record(&record)?;
            session.store_mut().flush()?;
            writeln!(
                out,
                "Imported {applied} translation(s) for {}",
                display_name(record.language.trim())
            )?;
        }
    }

    Ok(())
}

/// Loads the workspace settings and opens a session for `schema_path`.
fn open_session(
    workspace_root: &Path,
    schema_path: &Path,
) -> Result<FormSession<FileStorage>, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(workspace_root.to_path_buf()))?;

    let schema = load_schema_file(schema_path)?;
    let form_id = form_id_for(&schema, schema_path);
    let storage = FileStorage::new(config_manager.storage_directory());

    Ok(FormSession::open(schema, form_id, storage, config_manager.get_settings()))
}

/// Form identifier of a schema, falling back to its file name.
fn form_id_for(schema: &Schema, schema_path: &Path) -> String {
    schema.form_id().map(ToString::to_string).unwrap_or_else(|| {
        schema_path.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().into_owned())
    })
}

/// Resolves a language given by code or name to its catalog code.
fn resolve_language(input: &str) -> Result<&'static str, CliError> {
    if input.trim().is_empty() {
        return Err(StoreError::MissingSelection.into());
    }
    catalog::resolve(input)
        .map(|language| language.code)
        .ok_or_else(|| CliError::UnknownLanguage(input.to_string()))
}

/// "Name (code)" for catalog languages, the bare code otherwise.
fn display_name(code: &str) -> String {
    catalog::name_for_code(code).map_or_else(|| code.to_string(), |name| format!("{name} ({code})"))
}
