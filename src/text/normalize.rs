//! Tag string construction.
//!
//! Flattens a movie record into one token sequence:
//! 1. Overview split on whitespace
//! 2. Every genre and keyword name
//! 3. The first three cast names
//! 4. The first director
//!
//! Multi-word names are collapsed into single tokens ("Science Fiction" ->
//! "ScienceFiction"), then the whole string is lowercased and every token is
//! passed through the token reducer.

use super::stem::TokenReducer;
use crate::dataset::MovieRecord;

/// Number of leading cast members included in the tags.
pub const CAST_LIMIT: usize = 3;

const DIRECTOR_JOB: &str = "Director";

pub struct TagNormalizer<'a> {
    reducer: &'a dyn TokenReducer,
}

impl<'a> TagNormalizer<'a> {
    pub fn new(reducer: &'a dyn TokenReducer) -> Self {
        Self { reducer }
    }

    pub fn tag_string(&self, movie: &MovieRecord) -> String {
        let names = movie
            .genres
            .iter()
            .chain(movie.keywords.iter())
            .chain(movie.cast.iter().take(CAST_LIMIT))
            .map(|entity| entity.name.as_str())
            .chain(director(movie));

        let raw = movie
            .overview
            .split_whitespace()
            .map(str::to_string)
            .chain(names.map(collapse))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        raw.split_whitespace()
            .map(|token| self.reducer.reduce(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn director(movie: &MovieRecord) -> Option<&str> {
    movie
        .crew
        .iter()
        .find(|member| member.job == DIRECTOR_JOB)
        .map(|member| member.name.as_str())
}

fn collapse(name: &str) -> String {
    name.replace(' ', "")
}
