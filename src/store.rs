//! Per-form translation store.
//!
//! Owns the translation records of the active form, one per language, and
//! keeps them in sync with a [`KeyValueStorage`]. All forms share a single
//! storage key holding a JSON array of records; each store only ever reads
//! and replaces the records of its own form.

mod error;
pub mod retry;

use std::sync::Arc;

pub use error::StoreError;

use crate::catalog::{
    self,
    Language,
};
use crate::config::TranslationSettings;
use crate::input::translation::TranslationRecord;
use crate::storage::KeyValueStorage;

/// Returned by [`TranslationStore::get_translation`] when no translation exists.
pub const NO_TRANSLATION: &str = "No Available translation";

/// Translation records of one form, backed by durable storage.
///
/// Snapshots handed out by [`TranslationStore::translations`] are immutable:
/// later updates copy the record set instead of changing it in place while
/// a snapshot is alive.
pub struct TranslationStore<S: KeyValueStorage> {
    /// Durable storage the records are persisted to.
    storage: S,
    /// Identifier of the active form.
    form_id: String,
    /// Persistence settings.
    settings: TranslationSettings,
    /// `None` when the active form has no translations yet.
    translations: Option<Arc<Vec<TranslationRecord>>>,
    /// Set when in-memory state has not been persisted yet.
    dirty: bool,
}

impl<S: KeyValueStorage> TranslationStore<S> {
    /// Opens the store for `form_id`, loading its persisted records.
    pub fn open(storage: S, form_id: impl Into<String>, settings: TranslationSettings) -> Self {
        let mut store = Self {
            storage,
            form_id: form_id.into(),
            settings,
            translations: None,
            dirty: false,
        };
        store.load();
        store
    }

    /// Identifier of the active form.
    #[must_use]
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    #[must_use]
    pub const fn settings(&self) -> &TranslationSettings {
        &self.settings
    }

    /// Whether changes are waiting to be persisted.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Switches to another form: pending changes are flushed, then its records loaded.
    ///
    /// # Errors
    /// Returns error if pending changes of the current form cannot be persisted;
    /// the store stays on the current form in that case.
    pub fn activate(&mut self, form_id: impl Into<String>) -> Result<(), StoreError> {
        let form_id = form_id.into();
        if form_id == self.form_id {
            return Ok(());
        }
        self.flush()?;
        tracing::debug!(from = %self.form_id, to = %form_id, "Switching form");
        self.form_id = form_id;
        self.load();
        Ok(())
    }

    /// The full language catalog.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn list_languages(&self) -> &'static [Language] {
        catalog::languages()
    }

    /// Snapshot of the active form's records, `None` if it has none.
    #[must_use]
    pub fn translations(&self) -> Option<Arc<Vec<TranslationRecord>>> {
        self.translations.clone()
    }

    /// Record for `language_code`, if one exists.
    #[must_use]
    pub fn record(&self, language_code: &str) -> Option<&TranslationRecord> {
        let language_code = language_code.trim();
        self.translations.as_deref()?.iter().find(|record| record.language == language_code)
    }

    /// Translation of `label` in `language_code`, if any.
    ///
    /// Labels are matched on their canonical key, so case and spacing differences are ignored.
    #[must_use]
    pub fn find_translation(&self, language_code: &str, label: &str) -> Option<&str> {
        self.record(language_code)?.lookup(label)
    }

    /// Translation of `label` in `language_code`, or [`NO_TRANSLATION`].
    #[must_use]
    pub fn get_translation(&self, language_code: &str, label: &str) -> &str {
        self.find_translation(language_code, label).unwrap_or(NO_TRANSLATION)
    }

    /// Sets the translation of `label` in `language_code`.
    ///
    /// The language's record is created on first use. Existing entries of the
    /// record are kept; only the entry for `label` is replaced.
    ///
    /// # Errors
    /// [`StoreError::MissingSelection`] when the language code or the value is
    /// blank; nothing is changed in that case. Persistence failures with
    /// autosave on are logged and keep the change pending instead of failing.
    pub fn add_or_update_translation(
        &mut self,
        language_code: &str,
        label: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let language_code = language_code.trim();
        if language_code.is_empty() || value.trim().is_empty() {
            tracing::warn!(language_code, label, "Missing language or translation text");
            return Err(StoreError::MissingSelection);
        }

        self.upsert(language_code, label, value);
        tracing::debug!(form_id = %self.form_id, language_code, label, "Updated translation");
        self.autosave();
        Ok(())
    }

    /// Merges an imported record into the record of its language.
    ///
    /// Returns the number of entries applied. Entries with blank text are skipped.
    ///
    /// # Errors
    /// [`StoreError::MissingSelection`] when the record has no language.
    pub fn import_record(&mut self, record: &TranslationRecord) -> Result<usize, StoreError> {
        let language_code = record.language.trim();
        if language_code.is_empty() {
            tracing::warn!(record_id = %record.id, "Imported record has no language");
            return Err(StoreError::MissingSelection);
        }

        let mut applied = 0;
        for (label, value) in &record.translations {
            if value.trim().is_empty() {
                continue;
            }
            self.upsert(language_code, label, value);
            applied += 1;
        }

        tracing::info!(
            form_id = %self.form_id,
            language_code,
            applied,
            "Imported translations"
        );
        if applied > 0 {
            self.autosave();
        }
        Ok(applied)
    }

    /// Copy of the record for `language_code`, suitable for export.
    #[must_use]
    pub fn export_record(&self, language_code: &str) -> Option<TranslationRecord> {
        self.record(language_code).cloned()
    }

    /// Makes `records` the active form's translations and persists them.
    ///
    /// Each record is assigned to the active form. Records of other forms in
    /// storage are preserved.
    ///
    /// # Errors
    /// [`StoreError::PersistenceWriteFailure`] once all retry attempts failed;
    /// the new records remain the in-memory state and stay pending.
    pub fn save_translations(&mut self, records: &[TranslationRecord]) -> Result<(), StoreError> {
        let records: Vec<TranslationRecord> = records
            .iter()
            .cloned()
            .map(|mut record| {
                record.form.clone_from(&self.form_id);
                record
            })
            .collect();

        self.translations = if records.is_empty() { None } else { Some(Arc::new(records)) };
        self.dirty = true;
        self.persist()
    }

    /// Persists pending changes, if any.
    ///
    /// # Errors
    /// [`StoreError::PersistenceWriteFailure`] once all retry attempts failed.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if self.dirty { self.persist() } else { Ok(()) }
    }

    /// Sets one entry, creating the language's record if needed.
    fn upsert(&mut self, language_code: &str, label: &str, value: &str) {
        let records = Arc::make_mut(self.translations.get_or_insert_with(Arc::default));

        let index = match records.iter().position(|record| record.language == language_code) {
            Some(index) => index,
            None => {
                let record = TranslationRecord::new(
                    self.form_id.clone(),
                    language_code,
                    self.settings.describe(language_code),
                );
                tracing::debug!(
                    form_id = %self.form_id,
                    language_code,
                    record_id = %record.id,
                    "Created translation record"
                );
                records.push(record);
                records.len() - 1
            }
        };
        let Some(record) = records.get_mut(index) else {
            return;
        };

        record.set_entry(label, value);
        self.dirty = true;
    }

    /// Persists right away when autosave is on. Failures are logged and kept pending.
    fn autosave(&mut self) {
        if !self.settings.autosave {
            return;
        }
        if let Err(e) = self.persist() {
            tracing::error!(form_id = %self.form_id, "Failed to save translations: {e}");
        }
    }

    /// Replaces in-memory state with the persisted records of the active form.
    ///
    /// Unreadable or malformed storage is logged and treated as no translations.
    /// Records that fail to parse are skipped.
    fn load(&mut self) {
        let key = &self.settings.storage.key;
        let stored = match self.storage.get_item(key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(key = %key, "Failed to read stored translations: {e}");
                None
            }
        };

        let records: Vec<TranslationRecord> = stored
            .and_then(|stored| parse_stored(key, &stored))
            .unwrap_or_default()
            .into_iter()
            .filter(|value| record_form(value) == Some(self.form_id.as_str()))
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(form_id = %self.form_id, "Skipping invalid stored record: {e}");
                    None
                }
            })
            .collect();

        self.translations = if records.is_empty() {
            tracing::debug!(form_id = %self.form_id, "No translations for form");
            None
        } else {
            tracing::debug!(
                form_id = %self.form_id,
                languages = records.len(),
                "Loaded translations"
            );
            Some(Arc::new(records))
        };
        self.dirty = false;
    }

    /// Writes the active form's records, keeping other forms' stored entries untouched.
    ///
    /// Nothing is written when the stored value cannot be read.
    fn persist(&mut self) -> Result<(), StoreError> {
        let key = self.settings.storage.key.clone();
        let storage = &mut self.storage;

        let (stored, _) =
            retry::with_retry(&self.settings.retry, "Read translations", || storage.get_item(&key));
        let stored = stored.map_err(|source| StoreError::PersistenceReadFailure { source })?;

        let mut all = stored.and_then(|stored| parse_stored(&key, &stored)).unwrap_or_default();
        all.retain(|value| record_form(value) != Some(self.form_id.as_str()));
        if let Some(records) = &self.translations {
            let records: Vec<serde_json::Value> =
                records.iter().map(serde_json::to_value).collect::<Result<_, _>>()?;
            all.extend(records);
        }
        let serialized = serde_json::to_string(&all)?;

        let (result, attempts) = retry::with_retry(&self.settings.retry, "Save translations", || {
            storage.set_item(&key, &serialized)
        });

        match result {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!(form_id = %self.form_id, records = all.len(), "Saved translations");
                Ok(())
            }
            Err(source) => Err(StoreError::PersistenceWriteFailure { attempts, source }),
        }
    }
}

/// Parses the stored collection as raw entries, `None` if it is not a JSON array.
fn parse_stored(key: &str, stored: &str) -> Option<Vec<serde_json::Value>> {
    match serde_json::from_str(stored) {
        Ok(entries) => Some(entries),
        Err(e) => {
            tracing::error!(key = %key, "Failed to parse stored translations: {e}");
            None
        }
    }
}

/// Owning form of a stored entry.
fn record_form(value: &serde_json::Value) -> Option<&str> {
    value.get("form").and_then(serde_json::Value::as_str)
}

impl<S: KeyValueStorage> Drop for TranslationStore<S> {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        if let Err(e) = self.persist() {
            tracing::error!(form_id = %self.form_id, "Unsaved translations were lost: {e}");
        }
    }
}

impl<S: KeyValueStorage> std::fmt::Debug for TranslationStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationStore")
            .field("form_id", &self.form_id)
            .field("languages", &self.translations.as_ref().map_or(0, |records| records.len()))
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;

    use googletest::prelude::*;
    use rstest::{
        fixture,
        rstest,
    };

    use super::*;
    use crate::config::RetryConfig;
    use crate::storage::{
        MemoryStorage,
        StorageError,
    };

    /// Storage whose reads and writes fail a configurable number of times.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        /// Backing values.
        inner: MemoryStorage,
        /// Remaining reads that will fail.
        failing_reads: Cell<u32>,
        /// Remaining writes that will fail.
        failing_writes: u32,
        /// Total `set_item` calls.
        write_calls: u32,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            let remaining = self.failing_reads.get();
            if remaining > 0 {
                self.failing_reads.set(remaining - 1);
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("input/output error"),
                });
            }
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            self.write_calls += 1;
            if self.failing_writes > 0 {
                self.failing_writes -= 1;
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set_item(key, value)
        }
    }

    #[fixture]
    fn settings() -> TranslationSettings {
        TranslationSettings { retry: RetryConfig::immediate(3), ..TranslationSettings::default() }
    }

    fn entries(record: &TranslationRecord) -> BTreeMap<&str, &str> {
        record.translations.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    fn stored(storage: &MemoryStorage) -> Vec<TranslationRecord> {
        serde_json::from_str(&storage.get_item("formTranslations").unwrap().unwrap()).unwrap()
    }

    #[rstest]
    fn upsert_merges_entries(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        store.add_or_update_translation("fr", "Age", "Âge").unwrap();

        let records = store.translations().unwrap();
        assert_that!(records.len(), eq(1));
        assert_eq!(entries(&records[0]), BTreeMap::from([("age", "Âge"), ("name", "Nom")]));
        assert_that!(records[0].form, eq("form-a"));
        assert_that!(records[0].description, eq("Translations for fr"));
    }

    #[rstest]
    fn upsert_overwrites_entry(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        store.add_or_update_translation("fr", "Name", "Prénom").unwrap();

        let record = store.record("fr").unwrap();
        assert_that!(record.translations.len(), eq(1));
        assert_that!(store.get_translation("fr", "Name"), eq("Prénom"));
    }

    #[rstest]
    fn upsert_keeps_record_identity(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        let id = store.record("fr").unwrap().id.clone();
        store.add_or_update_translation("fr", "Age", "Âge").unwrap();

        assert_that!(store.record("fr").unwrap().id, eq(id.as_str()));
    }

    #[rstest]
    fn one_record_per_language(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        store.add_or_update_translation("de", "Name", "Name").unwrap();
        store.add_or_update_translation("fr", "Age", "Âge").unwrap();

        let records = store.translations().unwrap();
        let languages: Vec<&str> = records.iter().map(|r| r.language.as_str()).collect();
        assert_eq!(languages, vec!["fr", "de"]);
        assert_that!(store.get_translation("de", "name"), eq("Name"));
    }

    #[rstest]
    #[case::no_record("de", "Unknown Label")]
    #[case::absent_label("fr", "Unknown Label")]
    fn lookup_miss_returns_sentinel(
        settings: TranslationSettings,
        #[case] language_code: &str,
        #[case] label: &str,
    ) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        assert_that!(store.get_translation(language_code, label), eq(NO_TRANSLATION));
        assert_that!(store.find_translation(language_code, label), none());
    }

    #[rstest]
    fn lookup_on_empty_store_returns_sentinel(settings: TranslationSettings) {
        let store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        assert_that!(store.translations(), none());
        assert_that!(store.get_translation("fr", "Name"), eq(NO_TRANSLATION));
    }

    #[rstest]
    fn lookup_ignores_case_and_whitespace(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        store.add_or_update_translation("fr", "First  Name", "Prénom").unwrap();

        assert_that!(store.get_translation("fr", "first name"), eq("Prénom"));
        assert_that!(store.get_translation("fr", " FIRST NAME "), eq("Prénom"));
    }

    #[rstest]
    #[case::blank_language("  ", "Nom")]
    #[case::empty_language("", "Nom")]
    #[case::blank_value("fr", "   ")]
    fn missing_selection_changes_nothing(
        settings: TranslationSettings,
        #[case] language_code: &str,
        #[case] value: &str,
    ) {
        let mut storage = MemoryStorage::new();
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);

        let result = store.add_or_update_translation(language_code, "Name", value);

        assert!(matches!(result, Err(StoreError::MissingSelection)));
        assert_that!(store.translations(), none());
        assert_that!(store.is_dirty(), eq(false));
        drop(store);
        assert_that!(storage.get_item("formTranslations").unwrap(), none());
    }

    #[rstest]
    fn snapshots_are_not_mutated_by_updates(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        let snapshot = store.translations().unwrap();
        store.add_or_update_translation("fr", "Name", "Prénom").unwrap();
        store.add_or_update_translation("de", "Name", "Name").unwrap();

        assert_that!(snapshot.len(), eq(1));
        assert_that!(snapshot[0].lookup("Name"), some(eq("Nom")));
        assert_that!(store.get_translation("fr", "Name"), eq("Prénom"));
    }

    #[rstest]
    fn autosave_persists_every_change(settings: TranslationSettings) {
        let mut storage = MemoryStorage::new();
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        assert_that!(store.is_dirty(), eq(false));
        drop(store);

        let records = stored(&storage);
        assert_that!(records.len(), eq(1));
        assert_that!(records[0].lookup("name"), some(eq("Nom")));
    }

    #[rstest]
    fn without_autosave_changes_persist_on_flush(settings: TranslationSettings) {
        let settings = TranslationSettings { autosave: false, ..settings };
        let mut storage = MemoryStorage::new();
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        assert_that!(store.is_dirty(), eq(true));
        assert_that!(store.storage().get_item("formTranslations").unwrap(), none());

        store.flush().unwrap();
        assert_that!(store.is_dirty(), eq(false));
        drop(store);
        assert_that!(stored(&storage).len(), eq(1));
    }

    #[rstest]
    fn without_autosave_changes_persist_on_drop(settings: TranslationSettings) {
        let settings = TranslationSettings { autosave: false, ..settings };
        let mut storage = MemoryStorage::new();
        {
            let mut store = TranslationStore::open(&mut storage, "form-a", settings);
            store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        }

        assert_that!(stored(&storage)[0].lookup("Name"), some(eq("Nom")));
    }

    #[rstest]
    fn save_then_reload_round_trips(settings: TranslationSettings) {
        let mut storage = MemoryStorage::new();
        let mut store = TranslationStore::open(&mut storage, "form-a", settings.clone());
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        store.add_or_update_translation("de", "Age", "Alter").unwrap();
        let saved = store.translations().unwrap();
        drop(store);

        let reopened = TranslationStore::open(&mut storage, "form-a", settings);

        assert_eq!(reopened.translations().unwrap(), saved);
    }

    #[rstest]
    fn save_translations_preserves_other_forms(settings: TranslationSettings) {
        let mut storage = MemoryStorage::new();
        {
            let mut form_b = TranslationStore::open(&mut storage, "form-b", settings.clone());
            form_b.add_or_update_translation("fr", "Weight", "Poids").unwrap();
        }

        let mut form_a = TranslationStore::open(&mut storage, "form-a", settings.clone());
        assert_that!(form_a.translations(), none());
        let mut record = TranslationRecord::new("someone-else", "es", "Spanish");
        record.set_entry("Name", "Nombre");
        form_a.save_translations(&[record]).unwrap();
        assert_that!(form_a.record("es").unwrap().form, eq("form-a"));
        drop(form_a);

        let form_b = TranslationStore::open(&mut storage, "form-b", settings.clone());
        let records = form_b.translations().unwrap();
        assert_that!(records.len(), eq(1));
        assert_that!(form_b.get_translation("fr", "Weight"), eq("Poids"));
        assert_that!(form_b.find_translation("es", "Name"), none());
        drop(form_b);

        let form_a = TranslationStore::open(&mut storage, "form-a", settings);
        assert_that!(form_a.get_translation("es", "name"), eq("Nombre"));
        drop(form_a);
        assert_that!(stored(&storage).len(), eq(2));
    }

    #[rstest]
    #[case::not_json("{not json")]
    #[case::wrong_shape(r#"{"language": "fr"}"#)]
    #[case::missing_field(r#"[{"translations": {}}]"#)]
    fn malformed_storage_is_empty_state(settings: TranslationSettings, #[case] contents: &str) {
        let mut storage = MemoryStorage::new();
        storage.set_item("formTranslations", contents).unwrap();

        let mut store = TranslationStore::open(storage, "form-a", settings);

        assert_that!(store.translations(), none());
        assert_that!(store.get_translation("fr", "Name"), eq(NO_TRANSLATION));
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        assert_that!(store.get_translation("fr", "Name"), eq("Nom"));
    }

    #[rstest]
    fn loads_legacy_records_with_non_canonical_keys(settings: TranslationSettings) {
        let mut storage = MemoryStorage::new();
        let legacy = r#"[{
            "uuid": "1",
            "form": "form-a",
            "description": "Translations for fr",
            "language": "fr",
            "translations": { "First  Name": "Prénom" }
        }]"#;
        storage.set_item("formTranslations", legacy).unwrap();

        let mut store = TranslationStore::open(storage, "form-a", settings);

        assert_that!(store.get_translation("fr", "first name"), eq("Prénom"));
        store.add_or_update_translation("fr", "FIRST NAME", "Prénom usuel").unwrap();
        let record = store.record("fr").unwrap();
        assert_that!(record.id, eq("1"));
        assert_eq!(entries(record), BTreeMap::from([("first name", "Prénom usuel")]));
    }

    #[rstest]
    fn transient_write_failures_are_retried(settings: TranslationSettings) {
        let mut storage = FlakyStorage { failing_writes: 2, ..FlakyStorage::default() };
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        assert_that!(store.is_dirty(), eq(false));
        drop(store);
        assert_that!(storage.write_calls, eq(3));
    }

    #[rstest]
    fn exhausted_retries_keep_state_pending(settings: TranslationSettings) {
        let mut storage = FlakyStorage { failing_writes: 3, ..FlakyStorage::default() };
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);

        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        assert_that!(store.is_dirty(), eq(true));
        assert_that!(store.get_translation("fr", "Name"), eq("Nom"));
        store.flush().unwrap();
        assert_that!(store.is_dirty(), eq(false));
    }

    #[rstest]
    fn save_failure_is_reported(settings: TranslationSettings) {
        let storage = FlakyStorage { failing_writes: 10, ..FlakyStorage::default() };
        let mut store = TranslationStore::open(storage, "form-a", settings);

        let result = store.save_translations(&[TranslationRecord::new("form-a", "fr", "")]);

        assert!(matches!(result, Err(StoreError::PersistenceWriteFailure { attempts: 3, .. })));
        assert_that!(store.record("fr"), some(anything()));
    }

    #[rstest]
    fn import_record_merges_into_existing(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();
        let id = store.record("fr").unwrap().id.clone();

        let mut upload = TranslationRecord::new("other-form", "fr", "uploaded");
        upload.translations.insert("Age".to_string(), "Âge".to_string());
        upload.translations.insert("NAME".to_string(), "Nom de famille".to_string());
        upload.translations.insert("Sex".to_string(), String::new());

        let applied = store.import_record(&upload).unwrap();

        assert_that!(applied, eq(2));
        let record = store.record("fr").unwrap();
        assert_that!(record.id, eq(id.as_str()));
        assert_eq!(entries(record), BTreeMap::from([("age", "Âge"), ("name", "Nom de famille")]));
    }

    #[rstest]
    fn import_record_without_language_is_rejected(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        let result = store.import_record(&TranslationRecord::new("form-a", " ", ""));

        assert!(matches!(result, Err(StoreError::MissingSelection)));
        assert_that!(store.translations(), none());
    }

    #[rstest]
    fn export_record_returns_copy(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        let exported = store.export_record("fr").unwrap();

        assert_that!(exported.language, eq("fr"));
        assert_that!(exported.lookup("Name"), some(eq("Nom")));
        assert_that!(store.export_record("de"), none());
    }

    #[rstest]
    fn activate_switches_forms(settings: TranslationSettings) {
        let mut storage = MemoryStorage::new();
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        store.activate("form-b").unwrap();
        assert_that!(store.form_id(), eq("form-b"));
        assert_that!(store.translations(), none());

        store.activate("form-a").unwrap();
        assert_that!(store.get_translation("fr", "Name"), eq("Nom"));
    }

    #[rstest]
    fn list_languages_returns_catalog(settings: TranslationSettings) {
        let store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        let languages = store.list_languages();

        assert_that!(languages.len(), eq(catalog::languages().len()));
        assert_that!(
            languages.iter().find(|language| language.name == "French").map(|l| l.code),
            some(eq("fr"))
        );
    }

    #[rstest]
    fn read_failure_before_save_keeps_other_forms(settings: TranslationSettings) {
        let mut storage = FlakyStorage::default();
        {
            let mut form_b = TranslationStore::open(&mut storage, "form-b", settings.clone());
            form_b.add_or_update_translation("fr", "Weight", "Poids").unwrap();
        }

        let mut form_a = TranslationStore::open(&mut storage, "form-a", settings.clone());
        form_a.storage().failing_reads.set(6);
        form_a.add_or_update_translation("fr", "Name", "Nom").unwrap();

        assert_that!(form_a.is_dirty(), eq(true));
        assert!(matches!(form_a.flush(), Err(StoreError::PersistenceReadFailure { .. })));
        assert_that!(form_a.is_dirty(), eq(true));
        form_a.flush().unwrap();
        drop(form_a);

        let form_b = TranslationStore::open(&mut storage, "form-b", settings.clone());
        assert_that!(form_b.get_translation("fr", "Weight"), eq("Poids"));
        drop(form_b);
        let form_a = TranslationStore::open(&mut storage, "form-a", settings);
        assert_that!(form_a.get_translation("fr", "Name"), eq("Nom"));
    }

    #[rstest]
    fn invalid_entries_of_other_forms_survive_saves(settings: TranslationSettings) {
        let mut storage = MemoryStorage::new();
        let mixed = r#"[
            {"form": "form-b", "translations": {}},
            {"form": "form-a", "language": "fr", "translations": {"name": "Nom"}},
            {"form": "form-c", "language": "es", "translations": {"name": "Nombre"}}
        ]"#;
        storage.set_item("formTranslations", mixed).unwrap();

        let mut store = TranslationStore::open(&mut storage, "form-a", settings);
        assert_that!(store.get_translation("fr", "Name"), eq("Nom"));
        store.add_or_update_translation("fr", "Age", "Âge").unwrap();
        drop(store);

        let raw = storage.get_item("formTranslations").unwrap().unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        let forms: Vec<&str> = entries.iter().filter_map(|e| e["form"].as_str()).collect();
        assert_eq!(forms, vec!["form-b", "form-c", "form-a"]);
        assert_eq!(entries[0], serde_json::json!({"form": "form-b", "translations": {}}));
    }

    #[rstest]
    fn language_code_is_trimmed_on_read(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);

        store.add_or_update_translation(" fr ", "Name", "Nom").unwrap();

        assert_that!(store.get_translation(" fr", "Name"), eq("Nom"));
        assert_that!(store.record("fr ").map(|r| r.language.as_str()), some(eq("fr")));
        assert_that!(store.export_record(" fr"), some(anything()));
    }

    #[rstest]
    fn blank_stored_value_returns_sentinel(settings: TranslationSettings) {
        let mut store = TranslationStore::open(MemoryStorage::new(), "form-a", settings);
        let mut record = TranslationRecord::new("form-a", "fr", "");
        record.translations.insert("name".to_string(), String::new());

        store.save_translations(&[record]).unwrap();

        assert_that!(store.get_translation("fr", "Name"), eq(NO_TRANSLATION));
        assert_that!(store.find_translation("fr", "Name"), none());
    }

    #[rstest]
    fn activate_flushes_pending_changes(settings: TranslationSettings) {
        let settings = TranslationSettings { autosave: false, ..settings };
        let mut storage = MemoryStorage::new();
        let mut store = TranslationStore::open(&mut storage, "form-a", settings);
        store.add_or_update_translation("fr", "Name", "Nom").unwrap();

        store.activate("form-b").unwrap();
        assert_that!(store.is_dirty(), eq(false));
        store.activate("form-a").unwrap();

        assert_that!(store.get_translation("fr", "Name"), eq("Nom"));
    }
}
