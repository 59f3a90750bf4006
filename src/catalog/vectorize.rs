use super::vocabulary::Vocabulary;

/// Term counts of one document, one column per vocabulary term.
pub type TermVector = Vec<u32>;

/// Count vocabulary terms in a tag string; unknown tokens are ignored.
pub fn vectorize(vocabulary: &Vocabulary, tags: &str) -> TermVector {
    let mut vector = vec![0; vocabulary.len()];
    for token in tags.split_whitespace() {
        if let Some(column) = vocabulary.column(token) {
            vector[column] += 1;
        }
    }
    vector
}
