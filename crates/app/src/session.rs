use anyhow::{Context, Result};
use saldo_core::CategoryTable;
use saldo_import::{IngestError, IngestOutcome, ReadOptions};
use saldo_storage::{CategoryStore, CategoryStoreError};
use std::path::Path;

/// One user session: the category store, the table loaded from it, and the
/// read options every ingestion uses.
///
/// Ingestion borrows the table; `add_category` needs `&mut self`, so a table
/// can never change under a running ingestion.
pub struct Session {
    store: CategoryStore,
    categories: CategoryTable,
    read_options: ReadOptions,
    load_diagnostic: Option<CategoryStoreError>,
}

impl Session {
    pub fn open(store: CategoryStore, read_options: ReadOptions) -> Self {
        let loaded = store.load();
        Self {
            store,
            categories: loaded.table,
            read_options,
            load_diagnostic: loaded.diagnostic,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    /// Why the default table is in use, if it is.
    pub fn load_diagnostic(&self) -> Option<&CategoryStoreError> {
        self.load_diagnostic.as_ref()
    }

    pub fn ingest(&self, path: &Path) -> Result<IngestOutcome, IngestError> {
        saldo_import::ingest_path(path, &self.categories, &self.read_options)
    }

    /// Adds a category and persists the table. On any failure the in-memory
    /// table is left as it was.
    pub fn add_category<S: AsRef<str>>(
        &mut self,
        name: &str,
        keywords: impl IntoIterator<Item = S>,
    ) -> Result<()> {
        let mut updated = self.categories.clone();
        updated.add_category(name, keywords)?;
        self.store
            .save(&updated)
            .with_context(|| format!("Failed to save categories to {}", self.store.path().display()))?;

        tracing::info!(category = name.trim(), "category added");
        self.categories = updated;
        self.load_diagnostic = None;
        Ok(())
    }
}
