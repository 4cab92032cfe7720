//! The title index: the single owner of catalog movies.
//!
//! Built once from a `Catalog`, read-only afterwards. Besides the
//! title <-> identifier mappings it hands out the dense `MovieIdx` space that
//! the engines index their arrays with.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::HashMap;

/// Bidirectional title/identifier index over the loaded catalog.
#[derive(Debug, Clone)]
pub struct TitleIndex {
    /// Movies in catalog load order; position == `MovieIdx`
    movies: Vec<Movie>,
    /// Display titles in catalog load order
    titles: Vec<String>,
    id_to_idx: HashMap<MovieId, MovieIdx>,
    /// Exact title -> every id carrying it, in catalog order
    title_to_ids: HashMap<String, Vec<MovieId>>,
}

impl TitleIndex {
    /// Index a catalog.
    ///
    /// Fails when two catalog rows share an identifier, since that would
    /// break the one-title-per-identifier invariant.
    pub fn new(catalog: Catalog) -> Result<Self> {
        let movies = catalog.movies;
        let mut id_to_idx = HashMap::with_capacity(movies.len());
        let mut title_to_ids: HashMap<String, Vec<MovieId>> =
            HashMap::with_capacity(movies.len());

        for (idx, movie) in movies.iter().enumerate() {
            if id_to_idx.insert(movie.id, idx as MovieIdx).is_some() {
                return Err(DataLoadError::ValidationError(format!(
                    "duplicate movie id {} in catalog",
                    movie.id
                )));
            }
            title_to_ids
                .entry(movie.title.clone())
                .or_default()
                .push(movie.id);
        }

        let titles = movies.iter().map(|m| m.title.clone()).collect();

        Ok(Self {
            movies,
            titles,
            id_to_idx,
            title_to_ids,
        })
    }

    /// Resolve an exact display title to its identifier.
    pub fn resolve(&self, title: &str) -> Result<MovieId> {
        match self.title_to_ids.get(title).map(Vec::as_slice) {
            None | Some([]) => Err(DataLoadError::UnknownTitle(title.to_string())),
            Some([id]) => Ok(*id),
            Some(ids) => {
                let mut candidates = ids.to_vec();
                candidates.sort_unstable();
                Err(DataLoadError::AmbiguousTitle {
                    title: title.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Canonical display title for an identifier.
    pub fn lookup(&self, id: MovieId) -> Result<&str> {
        self.get_movie(id)
            .map(|m| m.title.as_str())
            .ok_or(DataLoadError::UnknownIdentifier(id))
    }

    /// Every title in catalog load order, for selection widgets.
    pub fn titles_for_display(&self) -> &[String] {
        &self.titles
    }

    /// Case-insensitive substring search.
    ///
    /// Exact (case-insensitive) matches come first, then substring matches,
    /// each group in catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Movie> {
        let needle = query.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for movie in &self.movies {
            let title = movie.title.to_lowercase();
            if title == needle {
                exact.push(movie);
            } else if title.contains(&needle) {
                partial.push(movie);
            }
        }
        exact.extend(partial);
        exact.truncate(limit);
        exact
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.idx_of(id).and_then(|idx| self.movie_at(idx))
    }

    /// Dense index of an identifier
    pub fn idx_of(&self, id: MovieId) -> Option<MovieIdx> {
        self.id_to_idx.get(&id).copied()
    }

    pub fn movie_at(&self, idx: MovieIdx) -> Option<&Movie> {
        self.movies.get(idx as usize)
    }

    /// All movies in dense-index order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_index() -> TitleIndex {
        TitleIndex::new(Catalog::new(vec![
            Movie::new(30, "Heat (1995)"),
            Movie::new(10, "Toy Story (1995)"),
            Movie::new(20, "Jumanji (1995)"),
            Movie::new(40, "Hamlet (1990)"),
            Movie::new(50, "Hamlet (1990)"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolve_and_lookup() {
        let index = create_test_index();

        assert_eq!(index.resolve("Toy Story (1995)").unwrap(), 10);
        assert_eq!(index.lookup(20).unwrap(), "Jumanji (1995)");
        assert_eq!(index.idx_of(30), Some(0));
        assert_eq!(index.movie_at(1).unwrap().id, 10);
    }

    #[test]
    fn test_resolve_is_exact_match_only() {
        let index = create_test_index();

        assert!(matches!(
            index.resolve("toy story (1995)"),
            Err(DataLoadError::UnknownTitle(_))
        ));
        assert!(matches!(
            index.resolve("Toy Story"),
            Err(DataLoadError::UnknownTitle(_))
        ));
    }

    #[test]
    fn test_duplicate_titles_are_ambiguous() {
        let index = create_test_index();

        match index.resolve("Hamlet (1990)") {
            Err(DataLoadError::AmbiguousTitle { candidates, .. }) => {
                assert_eq!(candidates, vec![40, 50]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
        // Both ids still map back to the shared display string
        assert_eq!(index.lookup(40).unwrap(), index.lookup(50).unwrap());
    }

    #[test]
    fn test_unknown_identifier() {
        let index = create_test_index();
        assert!(matches!(
            index.lookup(999),
            Err(DataLoadError::UnknownIdentifier(999))
        ));
    }

    #[test]
    fn test_titles_for_display_keeps_load_order() {
        let index = create_test_index();
        assert_eq!(
            index.titles_for_display(),
            &[
                "Heat (1995)",
                "Toy Story (1995)",
                "Jumanji (1995)",
                "Hamlet (1990)",
                "Hamlet (1990)",
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = TitleIndex::new(Catalog::new(vec![
            Movie::new(1, "A"),
            Movie::new(1, "B"),
        ]));
        assert!(matches!(result, Err(DataLoadError::ValidationError(_))));
    }

    #[test]
    fn test_search_exact_first() {
        let index = create_test_index();
        let results = index.search("HEAT (1995)", 10);
        assert_eq!(results.len(), 1);

        let results = index.search("(1995)", 2);
        let ids: Vec<MovieId> = results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![30, 10]);
    }
}
