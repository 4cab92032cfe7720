//! Loading the whole data directory and checking it for consistency.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Catalog file name inside a data directory
pub const MOVIES_FILE: &str = "movies.csv";
/// Optional cast/director/keyword side file
pub const METADATA_FILE: &str = "imdb_data.csv";
/// Rating log file name
pub const RATINGS_FILE: &str = "ratings.csv";

/// Everything read from a data directory, validated but not yet indexed.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub catalog: Catalog,
    pub ratings: RatingLog,
}

impl DataSet {
    pub fn new(catalog: Catalog, ratings: RatingLog) -> Self {
        Self { catalog, ratings }
    }

    /// Load the catalog, its optional metadata and the rating log.
    ///
    /// The three files are parsed in parallel; the metadata file may be
    /// absent, in which case movies only carry their genres.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading dataset from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let metadata_path = data_dir.join(METADATA_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);

        let ((movies, metadata), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || {
                        if metadata_path.exists() {
                            parser::parse_metadata(&metadata_path)
                        } else {
                            warn!(
                                "{} not found, content model will use genres only",
                                METADATA_FILE
                            );
                            Ok(Vec::new())
                        }
                    },
                )
            },
            || parser::parse_ratings(&ratings_path),
        );

        let mut catalog = Catalog::new(movies?);
        catalog.attach_metadata(metadata?);
        let ratings = RatingLog::new(ratings?);

        info!(
            "Loaded {} movies and {} ratings",
            catalog.len(),
            ratings.len()
        );

        let dataset = Self { catalog, ratings };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Checks that:
    /// - catalog identifiers are unique
    /// - every rating references a catalog movie
    /// - every rating lies within 0.5 - 5.0
    pub fn validate(&self) -> Result<()> {
        let mut movie_ids = HashSet::with_capacity(self.catalog.len());
        for movie in &self.catalog.movies {
            if !movie_ids.insert(movie.id) {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate movie id {} in catalog",
                    movie.id
                )));
            }
        }

        for rating in &self.ratings.ratings {
            if !movie_ids.contains(&rating.movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: rating.movie_id,
                });
            }
            if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Catalog {
    /// Merge side-file metadata into catalog movies by identifier.
    ///
    /// Rows for unknown movies are skipped. Returns how many rows were merged.
    pub fn attach_metadata(&mut self, metadata: Vec<MovieMetadata>) -> usize {
        let positions: HashMap<MovieId, usize> = self
            .movies
            .iter()
            .enumerate()
            .map(|(pos, movie)| (movie.id, pos))
            .collect();

        let mut merged = 0;
        let mut skipped = 0;
        for row in metadata {
            match positions.get(&row.movie_id) {
                Some(&pos) => {
                    let movie = &mut self.movies[pos];
                    movie.cast = row.cast;
                    movie.directors = row.directors;
                    movie.keywords = row.keywords;
                    merged += 1;
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!("Skipped {} metadata rows for movies missing from the catalog", skipped);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &Path, with_metadata: bool) {
        fs::write(
            dir.join(MOVIES_FILE),
            "movieId,title,genres\n1,Alien (1979),Horror|Sci-Fi\n2,Aliens (1986),Action|Sci-Fi\n",
        )
        .unwrap();
        fs::write(
            dir.join(RATINGS_FILE),
            "userId,movieId,rating,timestamp\n1,1,5.0,100\n1,2,4.0,101\n2,2,3.5,102\n",
        )
        .unwrap();
        if with_metadata {
            fs::write(
                dir.join(METADATA_FILE),
                "movieId,title_cast,director,runtime,budget,plot_keywords\n\
                 1,Sigourney Weaver|Tom Skerritt,Ridley Scott,117,,alien|spaceship\n\
                 99,Nobody,Nobody,1,,nothing\n",
            )
            .unwrap();
        }
    }

    #[test]
    fn test_load_from_dir_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), true);

        let dataset = DataSet::load_from_dir(dir.path()).unwrap();

        assert_eq!(dataset.catalog.len(), 2);
        assert_eq!(dataset.ratings.len(), 3);
        let alien = &dataset.catalog.movies[0];
        assert_eq!(alien.directors, vec!["Ridley Scott"]);
        assert_eq!(alien.cast.len(), 2);
        assert!(dataset.catalog.movies[1].cast.is_empty());
    }

    #[test]
    fn test_load_from_dir_without_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), false);

        let dataset = DataSet::load_from_dir(dir.path()).unwrap();
        assert_eq!(dataset.catalog.movies[0].genres, vec!["Horror", "Sci-Fi"]);
        assert!(dataset.catalog.movies[0].cast.is_empty());
    }

    #[test]
    fn test_validate_rejects_unknown_movie() {
        let dataset = DataSet::new(
            Catalog::new(vec![Movie::new(1, "A")]),
            RatingLog::new(vec![Rating::new(1, 2, 4.0)]),
        );
        assert!(matches!(
            dataset.validate(),
            Err(DataLoadError::MissingReference { id: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let dataset = DataSet::new(
            Catalog::new(vec![Movie::new(1, "A")]),
            RatingLog::new(vec![Rating::new(1, 1, 0.0)]),
        );
        assert!(matches!(
            dataset.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_attach_metadata_counts_merged_rows() {
        let mut catalog = Catalog::new(vec![Movie::new(1, "A"), Movie::new(2, "B")]);
        let merged = catalog.attach_metadata(vec![
            MovieMetadata {
                movie_id: 2,
                keywords: vec!["heist".to_string()],
                ..Default::default()
            },
            MovieMetadata {
                movie_id: 3,
                ..Default::default()
            },
        ]);
        assert_eq!(merged, 1);
        assert_eq!(catalog.movies[1].keywords, vec!["heist"]);
    }
}
