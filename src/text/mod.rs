//! Text processing for tag construction.
//!
//! - `normalize`: flattens a movie record into a stemmed tag string
//! - `stem`: token reducers (Porter stemmer)
//! - `stopwords`: exclusion sets (English stop words)

mod normalize;
mod stem;
mod stopwords;

pub use normalize::{TagNormalizer, CAST_LIMIT};
pub use stem::{PorterStemmer, TokenReducer};
pub use stopwords::{ExclusionSet, StopWords};
