//! Content Engine - metadata similarity
//!
//! Scores candidates by how much metadata they share with the seeds:
//! "If you liked these, here are movies that look like them"
//!
//! ## Algorithm
//! 1. Turn each movie's genres, top-billed cast, directors and plot keywords
//!    into tokens, namespaced by field so a genre never matches a keyword
//! 2. Weight tokens by smoothed IDF times a per-field weight, L2-normalise
//!    each movie row (the feature matrix)
//! 3. For each seed, walk its tokens through the inverted index and add
//!    `seed_weight * candidate_weight` to every candidate sharing the token;
//!    that sum is exactly the cosine similarity of the two rows
//! 4. Sum the per-seed similarities
//!
//! The feature matrix and its inverted index are built once; a query only
//! touches the postings of the seeds' tokens.

use crate::config::ContentConfig;
use crate::error::{EngineError, Result};
use crate::types::{CandidateScores, InsufficientData, InsufficientDataKind, ScoringEngine};
use data_loader::{Movie, MovieIdx, TitleIndex};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Which metadata field a token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Field {
    Genre,
    Cast,
    Director,
    Keyword,
}

impl Field {
    fn weight(self, config: &ContentConfig) -> f32 {
        match self {
            Field::Genre => config.genre_weight,
            Field::Cast => config.cast_weight,
            Field::Director => config.director_weight,
            Field::Keyword => config.keyword_weight,
        }
    }
}

/// Lowercase and drop whitespace, so "Tom Hanks" and "tom hanks" are one
/// token and never split into "tom" + "hanks".
fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Distinct (field, token) pairs for one movie, sorted
fn movie_tokens(movie: &Movie, config: &ContentConfig) -> Vec<(Field, String)> {
    let cast = &movie.cast[..movie.cast.len().min(config.max_cast)];
    let fields = [
        (Field::Genre, movie.genres.as_slice()),
        (Field::Cast, cast),
        (Field::Director, movie.directors.as_slice()),
        (Field::Keyword, movie.keywords.as_slice()),
    ];

    let mut tokens = Vec::new();
    for (field, values) in fields {
        for value in values {
            let token = normalize_token(value);
            if !token.is_empty() {
                tokens.push((field, token));
            }
        }
    }
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Sparse movie x token matrix stored twice: by row (CSR) for reading a
/// seed's tokens and by column (CSC) as the inverted index.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    row_ptr: Vec<usize>,
    cols: Vec<u32>,
    vals: Vec<f32>,
    col_ptr: Vec<usize>,
    col_rows: Vec<MovieIdx>,
    col_vals: Vec<f32>,
}

impl FeatureMatrix {
    /// Build the matrix over every catalog movie, in dense-index order.
    ///
    /// Movies without tokens still get an (empty) row.
    pub fn build(index: &TitleIndex, config: &ContentConfig) -> Self {
        let tokenized: Vec<Vec<(Field, String)>> = index
            .movies()
            .par_iter()
            .map(|movie| movie_tokens(movie, config))
            .collect();

        // Column ids are handed out in catalog order so the layout is
        // reproducible from run to run.
        let mut vocabulary: HashMap<(Field, String), u32> = HashMap::new();
        let mut col_fields: Vec<Field> = Vec::new();
        let mut rows: Vec<Vec<u32>> = Vec::with_capacity(tokenized.len());
        for tokens in tokenized {
            let mut row = Vec::with_capacity(tokens.len());
            for (field, token) in tokens {
                let col = match vocabulary.get(&(field, token.clone())) {
                    Some(&col) => col,
                    None => {
                        let col = col_fields.len() as u32;
                        vocabulary.insert((field, token), col);
                        col_fields.push(field);
                        col
                    }
                };
                row.push(col);
            }
            row.sort_unstable();
            rows.push(row);
        }

        let n_rows = rows.len();
        let n_cols = col_fields.len();

        let mut doc_freq = vec![0u32; n_cols];
        for row in &rows {
            for &col in row {
                doc_freq[col as usize] += 1;
            }
        }
        let col_weights: Vec<f32> = doc_freq
            .iter()
            .zip(&col_fields)
            .map(|(&df, &field)| {
                let idf = ((1.0 + n_rows as f32) / (1.0 + df as f32)).ln() + 1.0;
                idf * field.weight(config)
            })
            .collect();

        // CSR with L2-normalised rows
        let mut row_ptr = Vec::with_capacity(n_rows + 1);
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        row_ptr.push(0);
        for row in &rows {
            let norm = row
                .iter()
                .map(|&col| col_weights[col as usize].powi(2))
                .sum::<f32>()
                .sqrt();
            if norm > 0.0 {
                for &col in row {
                    let weight = col_weights[col as usize];
                    if weight > 0.0 {
                        cols.push(col);
                        vals.push(weight / norm);
                    }
                }
            }
            row_ptr.push(cols.len());
        }

        // CSC (inverted index) by counting sort over columns
        let mut col_ptr = vec![0usize; n_cols + 1];
        for &col in &cols {
            col_ptr[col as usize + 1] += 1;
        }
        for c in 0..n_cols {
            col_ptr[c + 1] += col_ptr[c];
        }
        let mut cursor = col_ptr.clone();
        let mut col_rows = vec![0 as MovieIdx; cols.len()];
        let mut col_vals = vec![0.0f32; cols.len()];
        for r in 0..n_rows {
            for p in row_ptr[r]..row_ptr[r + 1] {
                let c = cols[p] as usize;
                col_rows[cursor[c]] = r as MovieIdx;
                col_vals[cursor[c]] = vals[p];
                cursor[c] += 1;
            }
        }

        Self {
            row_ptr,
            cols,
            vals,
            col_ptr,
            col_rows,
            col_vals,
        }
    }

    /// Token columns and normalised weights of one movie.
    ///
    /// Panics if `idx` is out of range; callers check first.
    pub fn row(&self, idx: MovieIdx) -> (&[u32], &[f32]) {
        let (start, end) = (self.row_ptr[idx as usize], self.row_ptr[idx as usize + 1]);
        (&self.cols[start..end], &self.vals[start..end])
    }

    /// Movies carrying a token and their normalised weights for it
    pub fn postings(&self, col: u32) -> (&[MovieIdx], &[f32]) {
        let (start, end) = (self.col_ptr[col as usize], self.col_ptr[col as usize + 1]);
        (&self.col_rows[start..end], &self.col_vals[start..end])
    }

    /// Cosine similarity of two movie rows (merge join over sorted columns)
    pub fn cosine(&self, a: MovieIdx, b: MovieIdx) -> f32 {
        let (a_cols, a_vals) = self.row(a);
        let (b_cols, b_vals) = self.row(b);
        let (mut i, mut j, mut sum) = (0, 0, 0.0f32);
        while i < a_cols.len() && j < b_cols.len() {
            match a_cols[i].cmp(&b_cols[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_vals[i] * b_vals[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn n_rows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    pub fn n_cols(&self) -> usize {
        self.col_ptr.len() - 1
    }

    /// Stored non-zero weights
    pub fn nnz(&self) -> usize {
        self.vals.len()
    }
}

/// Content-based scoring engine over a prebuilt feature matrix.
#[derive(Debug, Clone)]
pub struct ContentEngine {
    features: FeatureMatrix,
}

impl ContentEngine {
    /// Build the feature matrix for the whole catalog
    pub fn build(index: &TitleIndex, config: &ContentConfig) -> Result<Self> {
        config.validate()?;
        let features = FeatureMatrix::build(index, config);
        info!(
            "Built content feature matrix: {} movies, {} tokens, {} non-zeros",
            features.n_rows(),
            features.n_cols(),
            features.nnz()
        );
        Ok(Self { features })
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    /// Cosine similarity between two catalog movies
    pub fn similarity(&self, a: MovieIdx, b: MovieIdx) -> Result<f32> {
        self.check_seed(a)?;
        self.check_seed(b)?;
        Ok(self.features.cosine(a, b))
    }

    fn check_seed(&self, idx: MovieIdx) -> Result<()> {
        let len = self.features.n_rows();
        if (idx as usize) < len {
            Ok(())
        } else {
            Err(EngineError::SeedOutOfRange { idx, len })
        }
    }
}

impl ScoringEngine for ContentEngine {
    fn name(&self) -> &str {
        "content"
    }

    #[instrument(skip(self), fields(engine = "content"))]
    fn score(&self, seeds: &[MovieIdx]) -> Result<CandidateScores> {
        for &seed in seeds {
            self.check_seed(seed)?;
        }

        let mut result = CandidateScores::zeros(self.features.n_rows());
        for &seed in seeds {
            let (seed_cols, seed_vals) = self.features.row(seed);
            if seed_cols.is_empty() {
                warn!(seed, "seed has no metadata tokens, contributing zero");
                result.warnings.push(InsufficientData {
                    seed,
                    kind: InsufficientDataKind::NoMetadata,
                });
                continue;
            }
            for (&col, &seed_weight) in seed_cols.iter().zip(seed_vals) {
                let (movies, weights) = self.features.postings(col);
                for (&movie, &weight) in movies.iter().zip(weights) {
                    result.scores[movie as usize] += seed_weight * weight;
                }
            }
        }

        debug!(
            "Scored {} movies against {} seeds ({} without metadata)",
            result.len(),
            seeds.len(),
            result.warnings.len()
        );
        Ok(result)
    }
}
