use saldo_core::CategoryTable;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a load fell back to the default table. Never fatal.
#[derive(Error, Debug)]
pub enum CategoryStoreError {
    #[error("Category file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Category file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Could not read category file: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Could not replace {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug)]
pub struct LoadedCategories {
    pub table: CategoryTable,
    /// Set when the table is the default because the file was unusable.
    pub diagnostic: Option<CategoryStoreError>,
}

/// The category table persisted as a JSON object of name to keyword list.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table. A missing or unreadable file yields the default
    /// table with a diagnostic instead of an error.
    pub fn load(&self) -> LoadedCategories {
        match self.read() {
            Ok(table) => {
                debug!(path = %self.path.display(), categories = table.len(), "loaded categories");
                LoadedCategories {
                    table,
                    diagnostic: None,
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "using default categories");
                LoadedCategories {
                    table: CategoryTable::new(),
                    diagnostic: Some(e),
                }
            }
        }
    }

    fn read(&self) -> Result<CategoryTable, CategoryStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CategoryStoreError::Missing(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Writes the table pretty-printed, replacing the file atomically.
    pub fn save(&self, table: &CategoryTable) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut json = serde_json::to_vec_pretty(table)?;
        json.push(b'\n');

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        info!(path = %self.path.display(), categories = table.len(), "saved categories");
        Ok(())
    }
}
