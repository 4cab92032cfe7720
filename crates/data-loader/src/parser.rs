//! Parsers for the catalog and rating CSV files.
//!
//! - movies.csv: movieId,title,genres
//! - imdb_data.csv: movieId,title_cast,director,runtime,budget,plot_keywords
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Multi-valued fields are `|`-separated. Every parser has a reader-based
//! variant so fixtures can be fed from memory.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Genre placeholder used by the catalog for movies without genres
const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    #[serde(default)]
    genres: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    #[serde(default)]
    title_cast: Option<String>,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    plot_keywords: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    #[serde(default)]
    timestamp: Option<i64>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: err.to_string(),
    }
}

/// Split a `|`-separated field into trimmed, non-empty values
fn split_pipes(field: Option<String>) -> Vec<String> {
    field
        .as_deref()
        .unwrap_or("")
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the movies file
///
/// The title often includes the year in parentheses: "Toy Story (1995)".
/// Genres are pipe-separated: "Adventure|Animation|Children".
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    parse_movies_from_reader(open(path)?, &file_label(path))
}

pub fn parse_movies_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();
    for result in csv_reader(reader).deserialize::<MovieRecord>() {
        let record = result.map_err(|e| csv_error(file, e))?;
        let genres = split_pipes(record.genres)
            .into_iter()
            .filter(|g| g != NO_GENRES)
            .collect();
        movies.push(Movie {
            id: record.movie_id,
            year: extract_year_from_title(&record.title),
            title: record.title,
            genres,
            cast: Vec::new(),
            directors: Vec::new(),
            keywords: Vec::new(),
        });
    }
    Ok(movies)
}

/// Parse the IMDB metadata side file
///
/// Columns other than cast, director and plot keywords are ignored.
pub fn parse_metadata(path: &Path) -> Result<Vec<MovieMetadata>> {
    parse_metadata_from_reader(open(path)?, &file_label(path))
}

pub fn parse_metadata_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<MovieMetadata>> {
    let mut metadata = Vec::new();
    for result in csv_reader(reader).deserialize::<MetadataRecord>() {
        let record = result.map_err(|e| csv_error(file, e))?;
        metadata.push(MovieMetadata {
            movie_id: record.movie_id,
            cast: split_pipes(record.title_cast),
            directors: split_pipes(record.director),
            keywords: split_pipes(record.plot_keywords),
        });
    }
    Ok(metadata)
}

/// Parse the ratings file
///
/// Format: userId,movieId,rating[,timestamp]
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings_from_reader(open(path)?, &file_label(path))
}

pub fn parse_ratings_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();
    for result in csv_reader(reader).deserialize::<RatingRecord>() {
        let record = result.map_err(|e| csv_error(file, e))?;
        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        });
    }
    Ok(ratings)
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub(crate) fn extract_year_from_title(title: &str) -> Option<u16> {
    let title = title.trim_end();
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        let year_str = &title[start + 1..end];
        if let Ok(year) = year_str.parse::<u16>() {
            return Some(year);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("Ben-Hur (1959) "), Some(1959));
        assert_eq!(extract_year_from_title("Movie Title"), None);
        assert_eq!(extract_year_from_title("Se7en (a.k.a. Seven)"), None);
    }

    #[test]
    fn test_parse_movies() {
        let data = "movieId,title,genres\n\
                    1,Toy Story (1995),Adventure|Animation|Children\n\
                    2,\"Godfather, The (1972)\",Crime|Drama\n\
                    3,Unknown Film,(no genres listed)\n";
        let movies = parse_movies_from_reader(data.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].genres, vec!["Adventure", "Animation", "Children"]);
        assert_eq!(movies[0].year, Some(1995));
        assert_eq!(movies[1].title, "Godfather, The (1972)");
        assert!(movies[2].genres.is_empty());
        assert!(movies[2].has_no_metadata());
    }

    #[test]
    fn test_parse_metadata_ignores_extra_columns() {
        let data = "movieId,title_cast,director,runtime,budget,plot_keywords\n\
                    1,Tom Hanks|Tim Allen,John Lasseter,81.0,\"$30,000,000\",toy|rivalry\n\
                    2,,,,,\n";
        let metadata = parse_metadata_from_reader(data.as_bytes(), "imdb_data.csv").unwrap();

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata[0].cast, vec!["Tom Hanks", "Tim Allen"]);
        assert_eq!(metadata[0].directors, vec!["John Lasseter"]);
        assert_eq!(metadata[0].keywords, vec!["toy", "rivalry"]);
        assert_eq!(metadata[1], MovieMetadata { movie_id: 2, ..Default::default() });
    }

    #[test]
    fn test_parse_ratings_without_timestamp() {
        let data = "userId,movieId,rating\n1,10,4.5\n2,10,0.5\n";
        let ratings = parse_ratings_from_reader(data.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], Rating::new(1, 10, 4.5));
        assert_eq!(ratings[1].timestamp, None);
    }

    #[test]
    fn test_parse_ratings_reports_bad_row() {
        let data = "userId,movieId,rating,timestamp\n1,10,4.5,1000\n2,ten,3.0,1000\n";
        let err = parse_ratings_from_reader(data.as_bytes(), "ratings.csv").unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "ratings.csv");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("does/not/exist/movies.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
