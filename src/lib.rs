//! form-translations
//!
//! Extracts labels from form schemas and manages their translations per language.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod input;
pub mod labels;
pub mod session;
pub mod storage;
pub mod store;

pub use session::{
    FormSession,
    TranslationRow,
    TranslationSource,
};
pub use store::{
    NO_TRANSLATION,
    StoreError,
    TranslationStore,
};
