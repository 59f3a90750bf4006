//! Movie catalog and similarity model.
//!
//! A `Catalog` is one immutable snapshot of everything derived from the raw
//! dataset. It is always built as a whole by `CatalogBuilder`.
//!
//! # Architecture
//!
//! - `vocabulary`: top-K term selection over all tag strings
//! - `vectorize`: per-movie term count vectors
//! - `similarity`: dense cosine similarity matrix and top-N ranking
//! - `index`: title/row lookup and title search

mod index;
mod similarity;
mod vectorize;
mod vocabulary;

pub use index::{CatalogIndex, ItemMeta, DEFAULT_SEARCH_LIMIT};
pub use similarity::{IndexError, Neighbor, SimilarityMatrix, DEFAULT_TOP_N};
pub use vectorize::{vectorize, TermVector};
pub use vocabulary::{Vocabulary, DEFAULT_VOCABULARY_SIZE};

use crate::{
    dataset::MovieRecord,
    text::{ExclusionSet, PorterStemmer, StopWords, TagNormalizer, TokenReducer},
};
use rayon::prelude::*;
use serde::Serialize;
use std::{sync::Arc, time::Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub tags: String,
}

/// A recommended movie with its similarity to the query movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub id: u64,
    pub score: f64,
}

#[derive(Debug)]
pub struct Catalog {
    items: Vec<Item>,
    vocabulary: Vocabulary,
    vectors: Vec<TermVector>,
    similarity: SimilarityMatrix,
    index: CatalogIndex,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn titles(&self) -> &[String] {
        self.index.titles()
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Movies most similar to `title`. `None` if the title is unknown.
    pub fn recommend(&self, title: &str, n: usize) -> Option<Vec<Recommendation>> {
        let row = self.index.index_of(title)?;
        let neighbors = self.similarity.top_n(row, n).ok()?;

        neighbors
            .into_iter()
            .map(|neighbor| {
                let meta = self.index.metadata_of(neighbor.row)?;
                Some(Recommendation {
                    title: meta.title.to_string(),
                    id: meta.id,
                    score: neighbor.score,
                })
            })
            .collect()
    }
}

/// Builds a `Catalog` from dataset records.
pub struct CatalogBuilder {
    vocabulary_size: usize,
    reducer: Arc<dyn TokenReducer>,
    exclusions: Arc<dyn ExclusionSet>,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            vocabulary_size: DEFAULT_VOCABULARY_SIZE,
            reducer: Arc::new(PorterStemmer::new()),
            exclusions: Arc::new(StopWords::english()),
        }
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vocabulary_size(mut self, size: usize) -> Self {
        self.vocabulary_size = size;
        self
    }

    pub fn reducer(mut self, reducer: Arc<dyn TokenReducer>) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn exclusions(mut self, exclusions: Arc<dyn ExclusionSet>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn build(&self, records: Vec<MovieRecord>) -> Catalog {
        let now = Instant::now();

        let normalizer = TagNormalizer::new(self.reducer.as_ref());
        let items: Vec<Item> = records
            .par_iter()
            .map(|movie| Item {
                id: movie.id,
                title: movie.title.clone(),
                tags: normalizer.tag_string(movie),
            })
            .collect();

        let tags: Vec<&str> = items.iter().map(|item| item.tags.as_str()).collect();
        let vocabulary =
            Vocabulary::build(&tags, self.vocabulary_size, self.exclusions.as_ref());

        let vectors: Vec<TermVector> = tags
            .par_iter()
            .map(|tags| vectorize(&vocabulary, tags))
            .collect();

        let similarity = SimilarityMatrix::build(&vectors);
        let index = CatalogIndex::new(items.iter().map(|item| (item.title.clone(), item.id)));

        log::info!(
            "built catalog: {} movies, {} terms in {}ms",
            items.len(),
            vocabulary.len(),
            now.elapsed().as_millis()
        );

        Catalog {
            items,
            vocabulary,
            vectors,
            similarity,
            index,
        }
    }
}
