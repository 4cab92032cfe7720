//! # Recommender
//!
//! Coordinates one query end to end:
//! 1. Validate the request (fail fast, before any matrix work)
//! 2. Resolve favorite titles to identifiers through the title index
//! 3. Score every catalog movie with the selected engine
//! 4. Exclude the seeds, rank deterministically, truncate, map back to titles
//!
//! Each engine is built at most once, on first use or through `warm_up`.
//! The `OnceLock` around it is the single-writer barrier: concurrent first
//! queries block until the one build finishes, later reads take no lock.
//! `refresh` swaps in new data and requires `&mut self`, so it can never
//! race a query.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use data_loader::{Catalog, DataLoadError, DataSet, MovieId, MovieIdx, RatingLog, TitleIndex};
use engines::{
    CollaborativeEngine, ContentEngine, EngineError, InsufficientDataKind, ScoringEngine,
};
use ranking::{RankedMovie, assemble_ranked};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::strategy::Strategy;

/// A seed that could not contribute to its query's scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedWarning {
    pub movie_id: MovieId,
    pub title: String,
    pub kind: InsufficientDataKind,
}

/// Full result of one query
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub movies: Vec<RankedMovie>,
    pub warnings: Vec<SeedWarning>,
    pub elapsed: Duration,
}

/// The recommendation core: title index, both engines and their config.
///
/// `Send + Sync`; share it through an `Arc` to serve queries from several
/// threads.
pub struct Recommender {
    index: TitleIndex,
    ratings: RatingLog,
    config: RecommenderConfig,
    content: OnceLock<std::result::Result<ContentEngine, EngineError>>,
    collaborative: OnceLock<std::result::Result<CollaborativeEngine, EngineError>>,
}

impl Recommender {
    /// Validate the config and data, then index the catalog.
    ///
    /// Engines are not built here; see `warm_up`.
    pub fn new(catalog: Catalog, ratings: RatingLog, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let (index, ratings) = Self::index_data(catalog, ratings)?;
        Ok(Self {
            index,
            ratings,
            config,
            content: OnceLock::new(),
            collaborative: OnceLock::new(),
        })
    }

    /// Load `movies.csv`, the optional `imdb_data.csv` and `ratings.csv`
    /// from a directory.
    pub fn load(data_dir: &Path, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let data = DataSet::load_from_dir(data_dir)?;
        Self::new(data.catalog, data.ratings, config)
    }

    fn index_data(catalog: Catalog, ratings: RatingLog) -> Result<(TitleIndex, RatingLog)> {
        let data = DataSet::new(catalog, ratings);
        data.validate()?;
        let index = TitleIndex::new(data.catalog)?;
        info!(
            "Indexed {} movies with {} ratings",
            index.len(),
            data.ratings.len()
        );
        Ok((index, data.ratings))
    }

    /// Build the engine for `strategy` now instead of on the first query
    #[instrument(skip(self))]
    pub fn warm_up(&self, strategy: Strategy) -> Result<()> {
        let start = Instant::now();
        self.engine(strategy)?;
        info!("{} engine ready after {:.2?}", strategy, start.elapsed());
        Ok(())
    }

    /// Replace the catalog and ratings, dropping both built engines.
    ///
    /// On error the previous state is kept untouched.
    pub fn refresh(&mut self, catalog: Catalog, ratings: RatingLog) -> Result<()> {
        let (index, ratings) = Self::index_data(catalog, ratings)?;
        self.index = index;
        self.ratings = ratings;
        self.content = OnceLock::new();
        self.collaborative = OnceLock::new();
        info!("Recommender refreshed, engines will rebuild on next use");
        Ok(())
    }

    /// Whether the engine for `strategy` has been built
    pub fn is_ready(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::ContentBased => self.content.get().is_some(),
            Strategy::Collaborative => self.collaborative.get().is_some(),
        }
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    /// Every title in catalog order, for selection widgets
    pub fn titles_for_display(&self) -> &[String] {
        self.index.titles_for_display()
    }

    /// Recommend `top_n` titles for a list of favorites.
    pub fn recommend<S: AsRef<str>>(
        &self,
        favorites: &[S],
        top_n: usize,
        strategy: Strategy,
    ) -> Result<Vec<String>> {
        let report = self.recommend_detailed(favorites, top_n, strategy)?;
        Ok(report.movies.into_iter().map(|m| m.title).collect())
    }

    /// Like `recommend`, but also returns scores and per-seed warnings.
    #[instrument(skip(self, favorites), fields(favorites = favorites.len()))]
    pub fn recommend_detailed<S: AsRef<str>>(
        &self,
        favorites: &[S],
        top_n: usize,
        strategy: Strategy,
    ) -> Result<Recommendation> {
        let result = self.run_query(favorites, top_n, strategy);
        if let Err(err @ RecommendError::Invariant(_)) = &result {
            error!("Recommendation failed: {}", err);
        }
        result
    }

    fn run_query<S: AsRef<str>>(
        &self,
        favorites: &[S],
        top_n: usize,
        strategy: Strategy,
    ) -> Result<Recommendation> {
        let start = Instant::now();

        if top_n == 0 {
            return Err(RecommendError::InvalidRequest(
                "top_n must be a positive integer".into(),
            ));
        }
        if favorites.is_empty() {
            return Err(RecommendError::InvalidRequest(
                "at least one favorite title is required".into(),
            ));
        }

        let (seed_ids, seed_idxs) = self.resolve_seeds(favorites)?;
        debug!("Resolved {} distinct seeds", seed_ids.len());

        let engine = self.engine(strategy)?;
        let scores = engine.score(&seed_idxs)?;

        let warnings = scores
            .warnings
            .iter()
            .map(|w| {
                let movie = self.index.movie_at(w.seed).ok_or_else(|| {
                    RecommendError::Invariant(format!("warning for unknown seed index {}", w.seed))
                })?;
                Ok(SeedWarning {
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    kind: w.kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        for warning in &warnings {
            warn!(
                "{:?} contributed nothing to the {} scores ({:?})",
                warning.title, strategy, warning.kind
            );
        }

        let movies = assemble_ranked(&scores, top_n, &seed_ids, &self.index)?;

        let elapsed = start.elapsed();
        info!(
            "Recommended {} movies with {} in {:.2?}",
            movies.len(),
            strategy,
            elapsed
        );
        Ok(Recommendation {
            strategy,
            movies,
            warnings,
            elapsed,
        })
    }

    /// Exact-match every favorite; repeated favorites count once.
    fn resolve_seeds<S: AsRef<str>>(
        &self,
        favorites: &[S],
    ) -> Result<(Vec<MovieId>, Vec<MovieIdx>)> {
        let mut ids = Vec::with_capacity(favorites.len());
        let mut idxs = Vec::with_capacity(favorites.len());
        for title in favorites {
            let id = self.index.resolve(title.as_ref()).map_err(|err| match err {
                DataLoadError::UnknownTitle(title) => RecommendError::UnknownTitle(title),
                DataLoadError::AmbiguousTitle { title, candidates } => {
                    RecommendError::AmbiguousTitle { title, candidates }
                }
                other => RecommendError::Data(other),
            })?;
            if ids.contains(&id) {
                continue;
            }
            let idx = self.index.idx_of(id).ok_or_else(|| {
                RecommendError::Invariant(format!("resolved movie {id} has no dense index"))
            })?;
            ids.push(id);
            idxs.push(idx);
        }
        Ok((ids, idxs))
    }

    /// The engine for `strategy`, building it on first use
    fn engine(&self, strategy: Strategy) -> Result<&dyn ScoringEngine> {
        let engine: &dyn ScoringEngine = match strategy {
            Strategy::ContentBased => self
                .content
                .get_or_init(|| ContentEngine::build(&self.index, &self.config.content))
                .as_ref()
                .map_err(|err| RecommendError::from(err.clone()))?,
            Strategy::Collaborative => self
                .collaborative
                .get_or_init(|| {
                    CollaborativeEngine::build(
                        &self.index,
                        &self.ratings,
                        &self.config.collaborative,
                    )
                })
                .as_ref()
                .map_err(|err| RecommendError::from(err.clone()))?,
        };
        Ok(engine)
    }
}
