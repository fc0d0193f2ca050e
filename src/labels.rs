//! Label extraction from form schemas.

pub mod collation;

use std::collections::HashSet;

use crate::db::FormDatabase;
use crate::input::schema::{
    Question,
    Schema,
    SchemaDocument,
};

/// Normalizes a raw label: trims it and collapses inner whitespace runs to one space.
///
/// Two labels that normalize identically are the same translatable unit.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical translation store key for a label (normalized, then lowercased).
#[must_use]
pub fn translation_key(label: &str) -> String {
    normalize_label(label).to_lowercase()
}

/// Collects every unique normalized label of a schema in dictionary order.
///
/// Page, section, question and answer labels are included; nested questions
/// are visited at any depth. Absent or blank labels are skipped.
#[must_use]
pub fn extract_labels(schema: &Schema) -> Vec<String> {
    let mut labels = HashSet::new();

    for page in &schema.pages {
        insert_label(&mut labels, page.label.as_deref());

        for section in &page.sections {
            insert_label(&mut labels, section.label.as_deref());
            collect_question_labels(&section.questions, &mut labels);
        }
    }

    let mut labels: Vec<String> = labels.into_iter().collect();
    labels.sort_by(|a, b| collation::collate(a, b));
    labels
}

/// Labels of the document's current schema.
///
/// Memoized: recomputed only after the document's schema input changes.
#[salsa::tracked]
pub fn schema_labels(db: &dyn FormDatabase, document: SchemaDocument) -> Vec<String> {
    let labels = extract_labels(document.schema(db));
    tracing::debug!(form_id = %document.form_id(db), count = labels.len(), "Extracted labels");
    labels
}

/// Visits questions depth-first, collecting their own and their answers' labels.
fn collect_question_labels(questions: &[Question], labels: &mut HashSet<String>) {
    for question in questions {
        insert_label(labels, question.label.as_deref());

        for answer in question.answers() {
            insert_label(labels, answer.label.as_deref());
        }

        collect_question_labels(&question.questions, labels);
    }
}

/// Inserts the normalized label unless it is absent or blank.
fn insert_label(labels: &mut HashSet<String>, label: Option<&str>) {
    let Some(label) = label else {
        return;
    };
    let normalized = normalize_label(label);
    if !normalized.is_empty() {
        labels.insert(normalized);
    }
}
