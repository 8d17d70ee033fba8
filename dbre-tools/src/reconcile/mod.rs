//! Brings a persisted document in line with the live schema.
//!
//! A run is a pipeline of three steps: the desired state is the [`TableMap`] read from the live
//! schema, [`diff`] turns it into an explicit list of [`DocumentChange`]s against the existing
//! document, and [`apply_changes`] performs them. Content of the document that does not describe
//! a table, column, key or index is left alone.

mod apply;
mod diff;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use crate::persisted_format::PACKAGE_ATTRIBUTE;
use crate::storage::{load_template, read_document, write_document};
use crate::{parse_document, Document, Result, TableMap};

pub use apply::apply_changes;
pub use diff::{diff, ChangeSet, DocumentChange};

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Always wins when set.
    pub package_override: Option<String>,
    /// Used when neither an override nor an existing package is available.
    pub project_default_package: String,
    /// The document to start from when there is no existing one. The built in template is used when `None`.
    pub template: Option<PathBuf>,
}

impl ReconcileOptions {
    /// `package_override`, then the existing document's package, then the project default.
    pub fn resolve_package(&self, existing: Option<&str>) -> String {
        self.package_override.as_deref()
            .filter(|p| !p.is_empty())
            .or(existing.filter(|p| !p.is_empty()))
            .unwrap_or(&self.project_default_package)
            .to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub document: Document,
    pub package: String,
    pub changes: Vec<DocumentChange>,
    /// Canonical ids of every element that was created or updated.
    pub known_ids: BTreeSet<String>,
}

impl ReconcileOutcome {
    pub fn created(&self) -> usize {
        self.changes.iter().filter(|c| c.is_create()).count()
    }

    pub fn updated(&self) -> usize {
        self.changes.iter().filter(|c| c.is_update()).count()
    }

    pub fn deleted(&self) -> usize {
        self.changes.iter().filter(|c| c.is_delete()).count()
    }
}

/// Reconciles the live tables against an existing document, or against the template when
/// there is no document yet. The existing document must describe a valid model, otherwise
/// the run fails before anything is changed.
#[instrument(skip_all)]
pub async fn reconcile(live: &TableMap, existing: Option<Document>, options: &ReconcileOptions) -> Result<ReconcileOutcome> {
    let mut document = match existing {
        Some(document) => document,
        None => load_template(options.template.as_deref()).await?,
    };

    let persisted = parse_document(&document)?;
    let package = options.resolve_package(persisted.package.as_deref());

    let ChangeSet { changes, known_ids } = diff(live, document.root());

    document.normalize_whitespace();
    document.root_mut().set_attribute(PACKAGE_ATTRIBUTE, &package);
    apply_changes(&mut document, &changes)?;

    let outcome = ReconcileOutcome {
        document,
        package,
        changes,
        known_ids,
    };

    info!(
        tables = live.len(),
        created = outcome.created(),
        updated = outcome.updated(),
        deleted = outcome.deleted(),
        package = outcome.package.as_str(),
        "Reconciled document"
    );

    Ok(outcome)
}

/// Reconciles the document stored at `path` and writes the result back. Nothing is written when
/// reading, reconciling or rendering fails.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn reconcile_file(live: &TableMap, path: &Path, options: &ReconcileOptions) -> Result<ReconcileOutcome> {
    let existing = read_document(path).await?;

    let outcome = reconcile(live, existing, options).await?;

    write_document(path, &outcome.document).await?;

    Ok(outcome)
}
