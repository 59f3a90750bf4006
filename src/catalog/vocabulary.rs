//! Corpus vocabulary selection.

use crate::text::ExclusionSet;
use std::collections::HashMap;

/// Default number of vocabulary terms.
pub const DEFAULT_VOCABULARY_SIZE: usize = 5000;

/// Ordered set of terms; a term's position is its vector column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    columns: HashMap<String, usize>,
}

impl Vocabulary {
    /// Select the `max_terms` most frequent tokens across all tag strings.
    ///
    /// Frequency is the total number of occurrences in the corpus. Equal
    /// frequencies keep the order in which tokens were first seen. Excluded
    /// tokens never qualify.
    pub fn build<S: AsRef<str>>(
        documents: &[S],
        max_terms: usize,
        exclusions: &dyn ExclusionSet,
    ) -> Self {
        let mut counts: Vec<(&str, usize)> = vec![];
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for token in documents.iter().flat_map(|doc| doc.as_ref().split_whitespace()) {
            if let Some(&slot) = seen.get(token) {
                counts[slot].1 += 1;
            } else if !exclusions.excludes(token) {
                seen.insert(token, counts.len());
                counts.push((token, 1));
            }
        }

        // stable: ties stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(max_terms);

        Self::from_terms(counts.into_iter().map(|(term, _)| term.to_string()))
    }

    pub fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Self {
        let terms: Vec<String> = terms.into_iter().collect();
        let columns = terms
            .iter()
            .enumerate()
            .map(|(column, term)| (term.clone(), column))
            .collect();
        Self { terms, columns }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.columns.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StopWords;

    #[test]
    fn test_orders_by_frequency() {
        let docs = ["war space war", "space war future"];
        let vocab = Vocabulary::build(&docs, 10, &StopWords::english());
        assert_eq!(vocab.terms(), ["war", "space", "future"]);
        assert_eq!(vocab.column("war"), Some(0));
        assert_eq!(vocab.column("future"), Some(2));
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let docs = ["zeta alpha", "mid", "alpha zeta mid"];
        let vocab = Vocabulary::build(&docs, 10, &StopWords::english());
        assert_eq!(vocab.terms(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_excludes_stop_words() {
        let docs = ["the war of the worlds"];
        let vocab = Vocabulary::build(&docs, 10, &StopWords::english());
        assert_eq!(vocab.terms(), ["war", "worlds"]);
        assert_eq!(vocab.column("the"), None);
    }

    #[test]
    fn test_truncates_to_max_terms() {
        let docs = ["a1 a1 a1 b2 b2 c3"];
        let vocab = Vocabulary::build(&docs, 2, &StopWords::english());
        assert_eq!(vocab.terms(), ["a1", "b2"]);
    }

    #[test]
    fn test_never_padded() {
        let docs = ["space war"];
        let vocab = Vocabulary::build(&docs, 5000, &StopWords::english());
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_empty_corpus() {
        let docs: [&str; 0] = [];
        let vocab = Vocabulary::build(&docs, 5000, &StopWords::english());
        assert!(vocab.is_empty());
    }
}
