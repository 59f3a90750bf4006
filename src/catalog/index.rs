//! Title lookup for the loaded catalog.

use serde::Serialize;
use std::collections::HashMap;

/// Default maximum number of titles returned by `search`.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMeta<'a> {
    pub title: &'a str,
    pub id: u64,
}

/// Bidirectional mapping between titles and matrix rows.
///
/// Rows follow catalog order. A title that appears more than once resolves
/// to its first row.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    titles: Vec<String>,
    ids: Vec<u64>,
    rows: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn new<I: IntoIterator<Item = (String, u64)>>(items: I) -> Self {
        let mut index = Self::default();
        for (title, id) in items {
            let row = index.titles.len();
            index.rows.entry(title.clone()).or_insert(row);
            index.titles.push(title);
            index.ids.push(id);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Exact, case-sensitive lookup.
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.rows.get(title).copied()
    }

    pub fn metadata_of(&self, row: usize) -> Option<ItemMeta<'_>> {
        Some(ItemMeta {
            title: self.titles.get(row)?,
            id: *self.ids.get(row)?,
        })
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Titles containing `query`, ignoring case, in catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&str> {
        if query.is_empty() {
            return vec![];
        }

        let query = query.to_lowercase();
        self.titles
            .iter()
            .filter(|title| title.to_lowercase().contains(&query))
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(titles: &[&str]) -> CatalogIndex {
        CatalogIndex::new(
            titles
                .iter()
                .enumerate()
                .map(|(i, title)| (title.to_string(), 100 + i as u64)),
        )
    }

    #[test]
    fn test_index_of_exact() {
        let index = index(&["Avatar", "Titanic"]);
        assert_eq!(index.index_of("Titanic"), Some(1));
        assert_eq!(index.index_of("titanic"), None);
        assert_eq!(index.index_of("Nope"), None);
    }

    #[test]
    fn test_duplicate_title_resolves_to_first_row() {
        let index = index(&["The Host", "Avatar", "The Host"]);
        assert_eq!(index.index_of("The Host"), Some(0));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_metadata_of() {
        let index = index(&["Avatar", "Titanic"]);
        assert_eq!(
            index.metadata_of(1),
            Some(ItemMeta {
                title: "Titanic",
                id: 101
            })
        );
        assert_eq!(index.metadata_of(2), None);
    }

    #[test]
    fn test_search_case_insensitive_in_order() {
        let index = index(&["Spider-Man", "Avatar", "Batman", "Iron Man"]);
        assert_eq!(
            index.search("MAN", DEFAULT_SEARCH_LIMIT),
            vec!["Spider-Man", "Batman", "Iron Man"]
        );
    }

    #[test]
    fn test_search_limit() {
        let index = index(&[
            "Spider-Man",
            "Batman",
            "Iron Man",
            "Aquaman",
            "Superman",
            "Ant-Man",
            "He-Man",
            "Pac-Man",
            "Man of Steel",
            "Manhattan",
            "Mandy",
        ]);
        let found = index.search("man", DEFAULT_SEARCH_LIMIT);
        assert_eq!(found.len(), 10);
        assert_eq!(found[0], "Spider-Man");
        assert_eq!(found[9], "Manhattan");
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let index = index(&["Avatar"]);
        assert!(index.search("", DEFAULT_SEARCH_LIMIT).is_empty());
    }
}
