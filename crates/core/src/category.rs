use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Fallback category. Always present in a table and never matched by keyword.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Category already exists: {0}")]
    Duplicate(String),
    #[error("Category name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total_categories: usize,
    pub total_keywords: usize,
}

/// Category name → keyword list, kept in insertion order.
///
/// Order matters: when a keyword appears under two categories, the category
/// that comes later wins during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTable {
    /// A table holding only the fallback category.
    pub fn new() -> Self {
        Self {
            entries: vec![(UNCATEGORIZED.to_string(), Vec::new())],
        }
    }

    /// Builds a table from ordered entries. A repeated name keeps its first
    /// position and takes the last keyword list.
    pub fn from_entries<N, K, I>(entries: I) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (N, Vec<K>)>,
    {
        let mut table = Self { entries: Vec::new() };
        for (name, keywords) in entries {
            let name = name.into();
            let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
            match table.position(&name) {
                Some(ix) => table.entries[ix].1 = keywords,
                None => table.entries.push((name, keywords)),
            }
        }
        if table.position(UNCATEGORIZED).is_none() {
            table
                .entries
                .insert(0, (UNCATEGORIZED.to_string(), Vec::new()));
        }
        table
    }

    /// Adds a new category. Keywords are trimmed and blank ones dropped.
    ///
    /// Leaves the table untouched and returns an error if `name` already exists.
    pub fn add_category<S: AsRef<str>>(
        &mut self,
        name: &str,
        keywords: impl IntoIterator<Item = S>,
    ) -> Result<(), CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        if self.contains(name) {
            return Err(CategoryError::Duplicate(name.to_string()));
        }
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        self.entries.push((name.to_string(), keywords));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn keywords(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|ix| self.entries[ix].1.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CategoryStats {
        CategoryStats {
            total_categories: self.entries.len(),
            total_keywords: self.entries.iter().map(|(_, k)| k.len()).sum(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl Serialize for CategoryTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, keywords) in &self.entries {
            map.serialize_entry(name, keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CategoryTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category names to keyword arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Vec<String>)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    entries.push((name, keywords));
                }
                Ok(CategoryTable::from_entries(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
