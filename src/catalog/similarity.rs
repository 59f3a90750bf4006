//! Dense pairwise cosine similarity.
//!
//! The full N×N matrix is computed once from the term vectors and kept in
//! memory. Rows are filled in parallel; every entry only depends on its two
//! input vectors, so the result does not depend on scheduling.

use super::vectorize::TermVector;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Default number of neighbours returned by `top_n`.
pub const DEFAULT_TOP_N: usize = 5;

/// A ranked neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    /// row-major, `size * size` entries
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute cosine similarity between every pair of vectors.
    ///
    /// Vectors with zero norm are similar to nothing, themselves included.
    pub fn build(vectors: &[TermVector]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.par_iter().map(|v| norm(v)).collect();

        let mut scores = vec![0.0f64; size * size];
        if size == 0 {
            return Self { size, scores };
        }

        scores
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(i, row)| {
                if norms[i] == 0.0 {
                    return;
                }
                for (j, score) in row.iter_mut().enumerate() {
                    *score = if i == j {
                        1.0
                    } else {
                        cosine(&vectors[i], &vectors[j], norms[i], norms[j])
                    };
                }
            });

        Self { size, scores }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        Some(self.scores[i * self.size + j])
    }

    pub fn row(&self, i: usize) -> Result<&[f64], IndexError> {
        if i >= self.size {
            return Err(IndexError::OutOfRange {
                row: i,
                size: self.size,
            });
        }
        Ok(&self.scores[i * self.size..(i + 1) * self.size])
    }

    /// The `n` rows most similar to `row`, excluding `row` itself.
    ///
    /// Ordered by descending score; equal scores by ascending row index.
    pub fn top_n(&self, row: usize, n: usize) -> Result<Vec<Neighbor>, IndexError> {
        let scores = self.row(row)?;

        let mut neighbors: Vec<Neighbor> = scores
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != row)
            .map(|(j, score)| Neighbor { row: j, score: *score })
            .collect();

        let n = n.min(neighbors.len());
        if n == 0 {
            return Ok(vec![]);
        }

        if n < neighbors.len() {
            neighbors.select_nth_unstable_by(n - 1, rank);
            neighbors.truncate(n);
        }
        neighbors.sort_unstable_by(rank);

        Ok(neighbors)
    }
}

fn rank(a: &Neighbor, b: &Neighbor) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.row.cmp(&b.row))
}

fn norm(v: &[u32]) -> f64 {
    let sum: u64 = v.iter().map(|&x| x as u64 * x as u64).sum();
    (sum as f64).sqrt()
}

fn cosine(a: &[u32], b: &[u32], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: u64 = a.iter().zip(b.iter()).map(|(&x, &y)| x as u64 * y as u64).sum();
    (dot as f64 / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("row {row} is out of range for {size} items")]
    OutOfRange { row: usize, size: usize },
}
