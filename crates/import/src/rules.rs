use saldo_core::{CategoryTable, UNCATEGORIZED};
use std::collections::HashSet;

/// Lowercases and trims a description or keyword for comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A category with its keywords normalized once up front.
struct KeywordRule {
    category: String,
    keywords: HashSet<String>,
}

/// Assigns categories by exact, case- and whitespace-insensitive equality
/// between a description and a category's keywords.
///
/// Rules apply in table order and a later match overwrites an earlier one, so
/// a keyword listed under two categories ends up in the one listed last.
pub struct CategoryMatcher {
    rules: Vec<KeywordRule>,
}

impl CategoryMatcher {
    pub fn new(table: &CategoryTable) -> Self {
        let rules = table
            .iter()
            .filter(|(name, keywords)| *name != UNCATEGORIZED && !keywords.is_empty())
            .map(|(name, keywords)| KeywordRule {
                category: name.to_string(),
                keywords: keywords
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Categories for `descriptions`, in the same order.
    pub fn categorize<S: AsRef<str>>(&self, descriptions: &[S]) -> Vec<String> {
        let normalized: Vec<String> = descriptions.iter().map(|d| normalize(d.as_ref())).collect();
        let mut assigned = vec![UNCATEGORIZED; descriptions.len()];

        for rule in &self.rules {
            for (slot, description) in assigned.iter_mut().zip(&normalized) {
                if rule.keywords.contains(description) {
                    *slot = rule.category.as_str();
                }
            }
        }

        assigned.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: Vec<(&str, Vec<&str>)>) -> CategoryTable {
        CategoryTable::from_entries(entries)
    }

    #[test]
    fn exact_match_case_and_whitespace_insensitive() {
        let matcher = CategoryMatcher::new(&table(vec![("Subscriptions", vec!["NETFLIX"])]));
        assert_eq!(
            matcher.categorize(&[" netflix ", "NetFlix"]),
            vec!["Subscriptions", "Subscriptions"]
        );
    }

    #[test]
    fn substring_does_not_match() {
        let matcher = CategoryMatcher::new(&table(vec![("Subscriptions", vec!["NETFLIX"])]));
        assert_eq!(matcher.categorize(&["NETFLIX.COM BOGOTA"]), vec![UNCATEGORIZED]);
    }

    #[test]
    fn keywords_are_trimmed() {
        let matcher = CategoryMatcher::new(&table(vec![("Groceries", vec!["  Supermarket XYZ "])]));
        assert_eq!(matcher.categorize(&["SUPERMARKET XYZ"]), vec!["Groceries"]);
    }

    #[test]
    fn unmatched_rows_default_to_uncategorized() {
        let matcher = CategoryMatcher::new(&table(vec![("Food", vec!["EXITO"])]));
        let out = matcher.categorize(&["EXITO", "UNKNOWN", ""]);
        assert_eq!(out, vec!["Food", UNCATEGORIZED, UNCATEGORIZED]);
    }

    #[test]
    fn later_category_wins_on_duplicate_keyword() {
        let matcher = CategoryMatcher::new(&table(vec![
            ("Food", vec!["RAPPI"]),
            ("Delivery", vec!["rappi"]),
        ]));
        assert_eq!(matcher.categorize(&["RAPPI"]), vec!["Delivery"]);
    }

    #[test]
    fn uncategorized_keywords_are_ignored() {
        let matcher = CategoryMatcher::new(&table(vec![
            (UNCATEGORIZED, vec!["EXITO"]),
            ("Food", vec!["EXITO"]),
        ]));
        assert_eq!(matcher.categorize(&["EXITO"]), vec!["Food"]);

        let only_fallback = CategoryMatcher::new(&table(vec![(UNCATEGORIZED, vec!["EXITO"])]));
        assert_eq!(only_fallback.categorize(&["EXITO"]), vec![UNCATEGORIZED]);
    }

    #[test]
    fn blank_keywords_never_match_blank_descriptions() {
        let matcher = CategoryMatcher::new(&table(vec![("Ghost", vec!["", "  "])]));
        assert_eq!(matcher.categorize(&["", "  "]), vec![UNCATEGORIZED, UNCATEGORIZED]);
    }

    #[test]
    fn categorize_is_idempotent() {
        let matcher = CategoryMatcher::new(&table(vec![("Food", vec!["EXITO"]), ("Fun", vec!["CINE"])]));
        let descriptions = ["exito", "cine", "bus"];
        assert_eq!(matcher.categorize(&descriptions), matcher.categorize(&descriptions));
    }
}
