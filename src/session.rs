//! Form session: one schema document and the translation store of its form.

use salsa::Setter;

use crate::config::TranslationSettings;
use crate::db::FormDatabaseImpl;
use crate::input::schema::{
    Schema,
    SchemaDocument,
};
use crate::labels::schema_labels;
use crate::storage::KeyValueStorage;
use crate::store::{
    StoreError,
    TranslationStore,
};

/// One row of the per-language translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRow {
    /// Label as extracted from the schema.
    pub label: String,
    /// Stored translation, `None` when missing.
    pub translation: Option<String>,
}

/// Produces translations for labels that have none yet.
pub trait TranslationSource {
    /// Translation of `label` into `language_code`, `None` when unavailable.
    fn translate(&self, language_code: &str, label: &str) -> Option<String>;
}

impl<F> TranslationSource for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn translate(&self, language_code: &str, label: &str) -> Option<String> {
        self(language_code, label)
    }
}

/// An open form.
///
/// The schema is a salsa input, so extracted labels are cached until the schema changes.
pub struct FormSession<S: KeyValueStorage> {
    /// Salsa database
    db: FormDatabaseImpl,
    /// Current schema
    document: SchemaDocument,
    /// Translations of the current form
    store: TranslationStore<S>,
}

impl<S: KeyValueStorage> FormSession<S> {
    /// Opens `schema` as form `form_id`, loading its translations from `storage`.
    pub fn open(
        schema: Schema,
        form_id: impl Into<String>,
        storage: S,
        settings: &TranslationSettings,
    ) -> Self {
        let form_id = form_id.into();
        let db = FormDatabaseImpl::default();
        let document = SchemaDocument::new(&db, form_id.clone(), schema);
        let store = TranslationStore::open(storage, form_id, settings.clone());

        tracing::info!(form_id = %store.form_id(), "Opened form session");
        Self { db, document, store }
    }

    #[must_use]
    pub fn form_id(&self) -> &str {
        self.document.form_id(&self.db)
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        self.document.schema(&self.db)
    }

    /// Unique normalized labels of the current schema, in dictionary order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        schema_labels(&self.db, self.document)
    }

    /// Replaces the schema of the current form.
    pub fn update_schema(&mut self, schema: Schema) {
        self.document.set_schema(&mut self.db).to(schema);
    }

    /// Switches to another form, activating its translations.
    ///
    /// # Errors
    /// Returns error if pending changes of the previous form cannot be
    /// persisted; the session stays on the previous form in that case.
    pub fn update_form(
        &mut self,
        form_id: impl Into<String>,
        schema: Schema,
    ) -> Result<(), StoreError> {
        let form_id = form_id.into();
        self.store.activate(form_id.clone())?;
        self.document.set_form_id(&mut self.db).to(form_id);
        self.document.set_schema(&mut self.db).to(schema);
        Ok(())
    }

    #[must_use]
    pub const fn store(&self) -> &TranslationStore<S> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut TranslationStore<S> {
        &mut self.store
    }

    /// Every label of the schema alongside its translation in `language_code`.
    #[must_use]
    pub fn translation_rows(&self, language_code: &str) -> Vec<TranslationRow> {
        self.labels()
            .into_iter()
            .map(|label| {
                let translation =
                    self.store.find_translation(language_code, &label).map(ToString::to_string);
                TranslationRow { label, translation }
            })
            .collect()
    }

    /// Labels with no translation in `language_code`.
    #[must_use]
    pub fn missing_labels(&self, language_code: &str) -> Vec<String> {
        self.labels()
            .into_iter()
            .filter(|label| self.store.find_translation(language_code, label).is_none())
            .collect()
    }

    /// Asks `source` for every missing label and stores what it returns.
    ///
    /// Returns the number of translations added. Blank suggestions are skipped.
    ///
    /// # Errors
    /// [`StoreError::MissingSelection`] when `language_code` is blank.
    pub fn fill_missing(
        &mut self,
        language_code: &str,
        source: &impl TranslationSource,
    ) -> Result<usize, StoreError> {
        if language_code.trim().is_empty() {
            return Err(StoreError::MissingSelection);
        }

        let mut added = 0;
        for label in self.missing_labels(language_code) {
            let Some(value) = source.translate(language_code, &label) else {
                tracing::debug!(language_code, label = %label, "No suggestion");
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            self.store.add_or_update_translation(language_code, &label, &value)?;
            added += 1;
        }

        tracing::info!(
            form_id = %self.form_id(),
            language_code,
            added,
            "Filled missing translations"
        );
        Ok(added)
    }
}

impl<S: KeyValueStorage> std::fmt::Debug for FormSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("form_id", &self.form_id())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
