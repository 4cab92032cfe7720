//! Collaborative Engine - latent factors learned from ratings
//!
//! "People who rated your favorites the way you'd expect also liked these"
//!
//! The rating matrix is factorised with alternating least squares over
//! observed entries only:
//!
//! ```text
//! min  sum_(u,i observed) (r_ui - mu - p_u . q_i)^2
//!      + lambda * (sum_u n_u |p_u|^2 + sum_i n_i |q_i|^2)
//! ```
//!
//! Each half-step fixes one side and solves a k x k ridge system per row.
//! Rows are independent, so they are solved in parallel without changing
//! the result.
//!
//! At query time the seeds' item vectors are averaged into a centroid and
//! every movie is scored against it.

use crate::config::{FactorConfig, FactorScoring};
use crate::error::{EngineError, Result};
use crate::linalg::{cholesky_solve, cosine};
use crate::types::{CandidateScores, InsufficientData, InsufficientDataKind, ScoringEngine};
use data_loader::{MovieIdx, RatingLog, TitleIndex, UserId};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::cmp::Reverse;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Compressed sparse rows: `idx`/`vals` of row `r` live at `ptr[r]..ptr[r + 1]`
#[derive(Debug, Clone)]
struct SparseRows {
    ptr: Vec<usize>,
    idx: Vec<u32>,
    vals: Vec<f32>,
}

impl SparseRows {
    /// Build from `(row, col, value)` triples already sorted by row
    fn from_sorted(n_rows: usize, triples: &[(u32, u32, f32)]) -> Self {
        let mut ptr = vec![0usize; n_rows + 1];
        for &(row, _, _) in triples {
            ptr[row as usize + 1] += 1;
        }
        for r in 0..n_rows {
            ptr[r + 1] += ptr[r];
        }
        Self {
            ptr,
            idx: triples.iter().map(|&(_, col, _)| col).collect(),
            vals: triples.iter().map(|&(_, _, val)| val).collect(),
        }
    }

    fn row(&self, r: usize) -> (&[u32], &[f32]) {
        let (start, end) = (self.ptr[r], self.ptr[r + 1]);
        (&self.idx[start..end], &self.vals[start..end])
    }

    fn row_len(&self, r: usize) -> usize {
        self.ptr[r + 1] - self.ptr[r]
    }
}

/// Observed ratings, centred on their global mean, indexed both by user
/// and by movie.
///
/// Users are renumbered densely in ascending `UserId` order. Movies use the
/// catalog's `MovieIdx`, so unrated movies simply have empty columns.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    n_users: usize,
    n_items: usize,
    global_mean: f32,
    by_user: SparseRows,
    by_item: SparseRows,
}

impl RatingMatrix {
    /// Build from the raw log.
    ///
    /// When a user rated the same movie more than once, the last entry in
    /// the log wins. Ratings for movies outside the catalog are skipped.
    pub fn build(index: &TitleIndex, ratings: &RatingLog) -> Self {
        let mut skipped = 0usize;
        let mut entries: Vec<(UserId, MovieIdx, usize, f32)> = Vec::with_capacity(ratings.len());
        for (pos, rating) in ratings.ratings.iter().enumerate() {
            match index.idx_of(rating.movie_id) {
                Some(idx) => entries.push((rating.user_id, idx, pos, rating.rating)),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("Skipped {} ratings for movies outside the catalog", skipped);
        }

        entries.sort_unstable_by_key(|&(user, item, pos, _)| (user, item, Reverse(pos)));
        entries.dedup_by_key(|&mut (user, item, _, _)| (user, item));

        let global_mean = if entries.is_empty() {
            0.0
        } else {
            (entries.iter().map(|e| e.3 as f64).sum::<f64>() / entries.len() as f64) as f32
        };

        let mut triples = Vec::with_capacity(entries.len());
        let mut n_users = 0usize;
        let mut last_user = None;
        for &(user, item, _, rating) in &entries {
            if last_user != Some(user) {
                last_user = Some(user);
                n_users += 1;
            }
            triples.push(((n_users - 1) as u32, item, rating - global_mean));
        }

        let n_items = index.len();
        let by_user = SparseRows::from_sorted(n_users, &triples);
        let mut transposed: Vec<(u32, u32, f32)> =
            triples.iter().map(|&(u, i, r)| (i, u, r)).collect();
        transposed.sort_unstable_by_key(|&(i, u, _)| (i, u));
        let by_item = SparseRows::from_sorted(n_items, &transposed);

        debug!(
            "Rating matrix: {} users x {} movies, {} observed, mean {:.3}",
            n_users,
            n_items,
            triples.len(),
            global_mean
        );

        Self {
            n_users,
            n_items,
            global_mean,
            by_user,
            by_item,
        }
    }

    pub fn n_users(&self) -> usize {
        self.n_users
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of distinct observed (user, movie) pairs
    pub fn nnz(&self) -> usize {
        self.by_user.vals.len()
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    /// How many users rated a movie
    pub fn ratings_for(&self, item: MovieIdx) -> usize {
        self.by_item.row_len(item as usize)
    }
}

/// Learned user and item factors, one row per dense user or movie.
#[derive(Debug, Clone)]
pub struct FactorModel {
    global_mean: f32,
    user_factors: Array2<f32>,
    item_factors: Array2<f32>,
}

impl FactorModel {
    /// Run ALS on the centred ratings.
    ///
    /// Movies nobody rated keep all-zero factors.
    pub fn fit(matrix: &RatingMatrix, config: &FactorConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();
        let k = config.rank;
        let lambda = config.regularization as f64;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut user_factors: Array2<f32> =
            Array2::from_shape_simple_fn((matrix.n_users, k), || rng.random_range(-0.1..0.1));
        let mut item_factors: Array2<f32> =
            Array2::from_shape_simple_fn((matrix.n_items, k), || rng.random_range(-0.1..0.1));
        for (item, mut row) in item_factors.rows_mut().into_iter().enumerate() {
            if matrix.by_item.row_len(item) == 0 {
                row.fill(0.0);
            }
        }

        for iteration in 0..config.iterations {
            solve_rows(&mut user_factors, &item_factors, &matrix.by_user, lambda);
            solve_rows(&mut item_factors, &user_factors, &matrix.by_item, lambda);

            if tracing::enabled!(tracing::Level::DEBUG) {
                let rmse = training_rmse(matrix, &user_factors, &item_factors);
                debug!(iteration, rmse, "ALS sweep complete");
            }
        }

        let model = Self {
            global_mean: matrix.global_mean,
            user_factors,
            item_factors,
        };

        info!(
            "Factorised {} users x {} movies at rank {} in {:?} (train RMSE {:.4})",
            matrix.n_users,
            matrix.n_items,
            k,
            start.elapsed(),
            model.training_rmse(matrix)
        );
        Ok(model)
    }

    pub fn rank(&self) -> usize {
        self.item_factors.ncols()
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn item_vector(&self, item: MovieIdx) -> ArrayView1<'_, f32> {
        self.item_factors.row(item as usize)
    }

    pub fn user_vector(&self, user: usize) -> ArrayView1<'_, f32> {
        self.user_factors.row(user)
    }

    /// Reconstructed rating for a dense user and a movie
    pub fn predict(&self, user: usize, item: MovieIdx) -> f32 {
        self.global_mean + self.user_vector(user).dot(&self.item_vector(item))
    }

    /// Root mean squared error over the observed training entries
    pub fn training_rmse(&self, matrix: &RatingMatrix) -> f64 {
        training_rmse(matrix, &self.user_factors, &self.item_factors)
    }
}

/// Solve every row of `target` against the fixed opposite side:
/// `(F^T F + lambda * n * I) x = F^T r`.
fn solve_rows(target: &mut Array2<f32>, fixed: &Array2<f32>, rows: &SparseRows, lambda: f64) {
    let k = target.ncols();
    target
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(row, mut out)| {
            let (cols, vals) = rows.row(row);
            if cols.is_empty() {
                out.fill(0.0);
                return;
            }

            let mut a = Array2::<f64>::zeros((k, k));
            let mut b = Array1::<f64>::zeros(k);
            for (&col, &value) in cols.iter().zip(vals) {
                let f = fixed.row(col as usize).mapv(f64::from);
                b.scaled_add(value as f64, &f);
                for i in 0..k {
                    for j in 0..=i {
                        a[[i, j]] += f[i] * f[j];
                    }
                }
            }
            let penalty = lambda * cols.len() as f64;
            a.diag_mut().mapv_inplace(|v| v + penalty);

            match cholesky_solve(&a, &b) {
                Some(x) => out.assign(&x.mapv(|v| v as f32)),
                None => {
                    warn!(row, "normal equations not positive definite, keeping previous factors")
                }
            }
        });
}

fn training_rmse(matrix: &RatingMatrix, users: &Array2<f32>, items: &Array2<f32>) -> f64 {
    if matrix.nnz() == 0 {
        return 0.0;
    }
    let mut sse = 0.0f64;
    for (user, p) in users.outer_iter().enumerate() {
        let (cols, vals) = matrix.by_user.row(user);
        for (&item, &value) in cols.iter().zip(vals) {
            let err = (value - p.dot(&items.row(item as usize))) as f64;
            sse += err * err;
        }
    }
    (sse / matrix.nnz() as f64).sqrt()
}

/// Collaborative scoring engine over a fitted factor model.
#[derive(Debug, Clone)]
pub struct CollaborativeEngine {
    model: FactorModel,
    ratings_per_item: Vec<u32>,
    scoring: FactorScoring,
}

impl CollaborativeEngine {
    /// Build the rating matrix and factorise it
    pub fn build(index: &TitleIndex, ratings: &RatingLog, config: &FactorConfig) -> Result<Self> {
        let matrix = RatingMatrix::build(index, ratings);
        let model = FactorModel::fit(&matrix, config)?;
        let ratings_per_item = (0..matrix.n_items())
            .map(|item| matrix.ratings_for(item as MovieIdx) as u32)
            .collect();
        Ok(Self {
            model,
            ratings_per_item,
            scoring: config.scoring,
        })
    }

    pub fn model(&self) -> &FactorModel {
        &self.model
    }

    /// True when at least one user rated the movie
    pub fn is_rated(&self, item: MovieIdx) -> bool {
        self.ratings_per_item
            .get(item as usize)
            .is_some_and(|&count| count > 0)
    }
}

impl ScoringEngine for CollaborativeEngine {
    fn name(&self) -> &str {
        "collaborative"
    }

    #[instrument(skip(self), fields(engine = "collaborative"))]
    fn score(&self, seeds: &[MovieIdx]) -> Result<CandidateScores> {
        let len = self.ratings_per_item.len();
        if let Some(&idx) = seeds.iter().find(|&&s| s as usize >= len) {
            return Err(EngineError::SeedOutOfRange { idx, len });
        }

        let mut warnings = Vec::new();
        let mut centroid = Array1::<f32>::zeros(self.model.rank());
        for &seed in seeds {
            if !self.is_rated(seed) {
                warn!(seed, "seed has no ratings, contributing a zero vector");
                warnings.push(InsufficientData {
                    seed,
                    kind: InsufficientDataKind::NoRatings,
                });
                continue;
            }
            centroid += &self.model.item_vector(seed);
        }
        if !seeds.is_empty() {
            centroid /= seeds.len() as f32;
        }

        let scores: Vec<f32> = self
            .model
            .item_factors
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|item| match self.scoring {
                FactorScoring::Cosine => cosine(item, centroid.view()),
                FactorScoring::InnerProduct => item.dot(&centroid),
            })
            .collect();

        debug!(
            "Scored {} movies against {} seeds ({} without ratings)",
            scores.len(),
            seeds.len(),
            warnings.len()
        );
        Ok(CandidateScores { scores, warnings })
    }
}
