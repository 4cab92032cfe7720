//! Core domain types for the movie catalog and the rating log.
//!
//! Two identifier spaces exist side by side:
//! - `MovieId` / `UserId` are the external keys found in the data files
//! - `MovieIdx` is the dense position of a movie in catalog load order, used
//!   to index every numeric array downstream

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// External movie identifier (the `movieId` column)
pub type MovieId = u32;

/// External user identifier (the `userId` column)
pub type UserId = u32;

/// Dense movie position in catalog load order (0..catalog.len())
pub type MovieIdx = u32;

/// Lowest rating accepted in the rating log
pub const MIN_RATING: f32 = 0.5;

/// Highest rating accepted in the rating log
pub const MAX_RATING: f32 = 5.0;

// =============================================================================
// Movie
// =============================================================================

/// A catalog entry with the metadata used for content similarity.
///
/// Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    pub year: Option<u16>,
    pub genres: Vec<String>,
    /// Cast in billing order
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub keywords: Vec<String>,
}

impl Movie {
    /// Create a movie with a title and no metadata.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            year: crate::parser::extract_year_from_title(&title),
            title,
            genres: Vec::new(),
            cast: Vec::new(),
            directors: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Builder-style genre setter, mostly for fixtures.
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_directors<I, S>(mut self, directors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directors = directors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// True when the movie carries no metadata tokens at all
    pub fn has_no_metadata(&self) -> bool {
        self.genres.is_empty()
            && self.cast.is_empty()
            && self.directors.is_empty()
            && self.keywords.is_empty()
    }
}

/// Extra metadata for one movie, as found in the IMDB side file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieMetadata {
    pub movie_id: MovieId,
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub keywords: Vec<String>,
}

// =============================================================================
// Rating
// =============================================================================

/// A single observed rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0
    pub rating: f32,
    /// Unix timestamp when the rating was made, if recorded
    pub timestamp: Option<i64>,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: None,
        }
    }
}

// =============================================================================
// Load results
// =============================================================================

/// The movie catalog in load order, before it is indexed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// The raw rating log, one entry per observed (user, movie) rating.
#[derive(Debug, Clone, Default)]
pub struct RatingLog {
    pub ratings: Vec<Rating>,
}

impl RatingLog {
    pub fn new(ratings: Vec<Rating>) -> Self {
        Self { ratings }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
