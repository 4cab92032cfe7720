//! Turns a raw score set into the final ordered list.
//!
//! ## Algorithm
//! 1. Pair every score slot with its movie identifier
//! 2. Drop excluded identifiers (the seeds)
//! 3. Order by score descending, identifier ascending on ties; non-finite
//!    scores go after every finite one
//! 4. Keep the first `top_n`, then resolve titles through the index
//!
//! The score set is dense over the catalog, so every identifier appears at
//! most once and no title-based deduplication is needed.

use crate::candidate::{Candidate, RankedMovie};
use crate::error::{RankingError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::ExcludeIdsFilter;
use data_loader::{MovieId, TitleIndex};
use engines::CandidateScores;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Total order used for ranking.
///
/// Finite scores compare numerically (so `-0.0` ties with `0.0`), NaN and
/// infinities sort last, and the identifier breaks every tie.
pub fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    let by_score = match (a.score.is_finite(), b.score.is_finite()) {
        (true, true) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    };
    by_score.then_with(|| a.movie_id.cmp(&b.movie_id))
}

/// Rank and return display titles only.
pub fn assemble(
    scores: &CandidateScores,
    top_n: usize,
    exclude_ids: &[MovieId],
    index: &TitleIndex,
) -> Result<Vec<String>> {
    Ok(assemble_ranked(scores, top_n, exclude_ids, index)?
        .into_iter()
        .map(|ranked| ranked.title)
        .collect())
}

/// Rank and return identifiers, titles and scores.
///
/// The result holds exactly `top_n` entries unless fewer movies survive
/// the exclusion.
#[instrument(skip(scores, exclude_ids, index), fields(candidates = scores.len()))]
pub fn assemble_ranked(
    scores: &CandidateScores,
    top_n: usize,
    exclude_ids: &[MovieId],
    index: &TitleIndex,
) -> Result<Vec<RankedMovie>> {
    if scores.len() != index.len() {
        return Err(RankingError::ScoreLengthMismatch {
            scores: scores.len(),
            catalog: index.len(),
        });
    }

    let candidates: Vec<Candidate> = index
        .movies()
        .iter()
        .zip(&scores.scores)
        .map(|(movie, &score)| Candidate::new(movie.id, score))
        .collect();

    let pipeline =
        FilterPipeline::new().add_filter(ExcludeIdsFilter::new(exclude_ids.iter().copied()));
    let mut survivors = pipeline.apply(candidates);

    // Partition first so only the head needs a full sort
    if top_n < survivors.len() {
        if top_n > 0 {
            survivors.select_nth_unstable_by(top_n - 1, rank_order);
        }
        survivors.truncate(top_n);
    }
    survivors.sort_unstable_by(rank_order);

    let ranked = survivors
        .into_iter()
        .map(|candidate| {
            let title = index
                .lookup(candidate.movie_id)
                .map_err(|source| RankingError::Lookup {
                    movie_id: candidate.movie_id,
                    source,
                })?;
            Ok(RankedMovie {
                movie_id: candidate.movie_id,
                title: title.to_string(),
                score: candidate.score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Assembled {} of {} requested results", ranked.len(), top_n);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Catalog, Movie};

    fn create_test_index() -> TitleIndex {
        TitleIndex::new(Catalog::new(vec![
            Movie::new(40, "Forty"),
            Movie::new(10, "Ten"),
            Movie::new(30, "Thirty"),
            Movie::new(20, "Twenty"),
        ]))
        .unwrap()
    }

    fn scores(values: &[f32]) -> CandidateScores {
        CandidateScores {
            scores: values.to_vec(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_sorts_by_score_then_id() {
        let index = create_test_index();
        // Forty and Twenty tie, Ten and Thirty tie
        let result = assemble(&scores(&[0.5, 0.9, 0.9, 0.5]), 4, &[], &index).unwrap();
        assert_eq!(result, vec!["Ten", "Thirty", "Twenty", "Forty"]);
    }

    #[test]
    fn test_excludes_and_truncates() {
        let index = create_test_index();
        let result = assemble(&scores(&[0.1, 0.9, 0.8, 0.7]), 2, &[10], &index).unwrap();
        assert_eq!(result, vec!["Thirty", "Twenty"]);
    }

    #[test]
    fn test_short_when_too_few_eligible() {
        let index = create_test_index();
        let result = assemble(&scores(&[0.1, 0.2, 0.3, 0.4]), 10, &[10, 20], &index).unwrap();
        assert_eq!(result, vec!["Thirty", "Forty"]);
    }

    #[test]
    fn test_zero_top_n_is_empty() {
        let index = create_test_index();
        let result = assemble(&scores(&[0.1, 0.2, 0.3, 0.4]), 0, &[], &index).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_non_finite_scores_sort_last() {
        let index = create_test_index();
        let result =
            assemble_ranked(&scores(&[f32::NAN, -1.0, f32::INFINITY, 0.0]), 4, &[], &index)
                .unwrap();
        let ids: Vec<MovieId> = result.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![20, 10, 30, 40]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let index = create_test_index();
        let result = assemble(&scores(&[0.0, -0.0, 0.0, -0.0]), 4, &[], &index).unwrap();
        assert_eq!(result, vec!["Ten", "Twenty", "Thirty", "Forty"]);
    }

    #[test]
    fn test_partial_select_matches_full_sort() {
        let index = create_test_index();
        let values = [0.3, 0.3, 0.9, 0.1];
        let full = assemble_ranked(&scores(&values), 4, &[], &index).unwrap();
        for top_n in 1..=4 {
            let head = assemble_ranked(&scores(&values), top_n, &[], &index).unwrap();
            assert_eq!(head[..], full[..top_n]);
        }
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let index = create_test_index();
        assert!(matches!(
            assemble(&scores(&[1.0]), 1, &[], &index),
            Err(RankingError::ScoreLengthMismatch {
                scores: 1,
                catalog: 4
            })
        ));
    }
}
