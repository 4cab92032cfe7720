//! Filter implementations.

use crate::candidate::Candidate;
use crate::traits::Filter;
use data_loader::MovieId;
use std::collections::HashSet;

/// Removes candidates by identifier, typically the query's seeds.
///
/// Matching is on `MovieId`, never on title, so a different movie that
/// happens to share a seed's title survives.
#[derive(Debug, Clone, Default)]
pub struct ExcludeIdsFilter {
    excluded: HashSet<MovieId>,
}

impl ExcludeIdsFilter {
    pub fn new(ids: impl IntoIterator<Item = MovieId>) -> Self {
        Self {
            excluded: ids.into_iter().collect(),
        }
    }
}

impl Filter for ExcludeIdsFilter {
    fn name(&self) -> &str {
        "ExcludeIdsFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        if self.excluded.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|candidate| !self.excluded.contains(&candidate.movie_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_ids_filter() {
        let candidates = vec![
            Candidate::new(100, 0.9),
            Candidate::new(101, 0.8),
            Candidate::new(200, 0.7),
            Candidate::new(300, 0.6),
        ];

        let filter = ExcludeIdsFilter::new([100, 200]);
        let filtered = filter.apply(candidates);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].movie_id, 101);
        assert_eq!(filtered[1].movie_id, 300);
    }
}
