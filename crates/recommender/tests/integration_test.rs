//! End-to-end tests: CSV files on disk through to ranked titles.

use recommender::{RecommendError, Recommender, RecommenderConfig, Strategy};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MOVIES: &str = "\
movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,Heat (1995),Action|Crime|Thriller
4,Casino (1995),Crime|Drama
5,GoldenEye (1995),Action|Adventure|Thriller
6,Balto (1995),Adventure|Animation|Children
7,Nixon (1995),Drama
8,Hamlet (1990),Drama
9,Hamlet (1990),Drama
10,Shorts (1990),(no genres listed)
11,Ronin (1998),(no genres listed)
";

const METADATA: &str = "\
movieId,title_cast,director,runtime,budget,plot_keywords
1,Tom Hanks|Tim Allen|Don Rickles,John Lasseter,81,30000000,toy|rivalry|friendship
3,Al Pacino|Robert De Niro|Val Kilmer,Michael Mann,170,60000000,heist|detective|obsession
4,Robert De Niro|Sharon Stone|Joe Pesci,Martin Scorsese,178,52000000,casino|mafia|las vegas
6,Kevin Bacon|Bob Hoskins,Simon Wells,78,31000000,dog|sled|alaska
11,Robert De Niro|Jean Reno,John Frankenheimer,122,55000000,heist|mercenary
";

fn ratings_csv() -> String {
    // Users 1-4 like crime films, users 5-8 like family films
    let mut out = String::from("userId,movieId,rating,timestamp\n");
    let crime = [(3, 5.0), (4, 4.5), (5, 4.0), (7, 3.5), (1, 1.5), (2, 1.0), (6, 1.5)];
    let family = [(1, 5.0), (2, 4.5), (6, 4.5), (3, 1.0), (4, 1.5), (5, 2.0), (7, 2.5)];
    for user in 1..=4 {
        for (movie, rating) in crime {
            out.push_str(&format!("{user},{movie},{rating},964982703\n"));
        }
    }
    for user in 5..=8 {
        for (movie, rating) in family {
            out.push_str(&format!("{user},{movie},{rating},964982703\n"));
        }
    }
    out
}

fn create_data_dir(with_metadata: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("movies.csv"), MOVIES).unwrap();
    fs::write(dir.path().join("ratings.csv"), ratings_csv()).unwrap();
    if with_metadata {
        fs::write(dir.path().join("imdb_data.csv"), METADATA).unwrap();
    }
    dir
}

fn load(dir: &Path) -> Recommender {
    let config = RecommenderConfig::from_toml_str("[collaborative]\nrank = 4\niterations = 10")
        .unwrap();
    Recommender::load(dir, config).unwrap()
}

const FAVORITES: [&str; 3] = ["Heat (1995)", "Casino (1995)", "GoldenEye (1995)"];

#[test]
fn test_both_strategies_return_exactly_top_n() {
    let dir = create_data_dir(true);
    let recommender = load(dir.path());

    for strategy in Strategy::ALL {
        let titles = recommender.recommend(&FAVORITES, 5, strategy).unwrap();
        assert_eq!(titles.len(), 5, "{strategy}");
        for favorite in FAVORITES {
            assert!(!titles.iter().any(|t| t == favorite), "{strategy} returned a seed");
        }
    }
}

#[test]
fn test_content_uses_imdb_metadata() {
    let dir = create_data_dir(true);
    let recommender = load(dir.path());

    let heat = recommender.index().get_movie(3).unwrap();
    assert_eq!(heat.cast, vec!["Al Pacino", "Robert De Niro", "Val Kilmer"]);

    // Ronin has no genres; only the shared actor and keyword can link it to Heat
    let report = recommender
        .recommend_detailed(&["Heat (1995)"], 10, Strategy::ContentBased)
        .unwrap();
    let score_of = |id| {
        report
            .movies
            .iter()
            .find(|m| m.movie_id == id)
            .map(|m| m.score)
            .unwrap()
    };
    assert!(score_of(11) > 0.0);
    assert_eq!(score_of(10), 0.0);
}

#[test]
fn test_collaborative_follows_taste_groups() {
    let dir = create_data_dir(true);
    let recommender = load(dir.path());

    let titles = recommender
        .recommend(&["Toy Story (1995)", "Jumanji (1995)"], 1, Strategy::Collaborative)
        .unwrap();
    assert_eq!(titles, vec!["Balto (1995)"]);
}

#[test]
fn test_results_are_deterministic() {
    let dir = create_data_dir(true);
    let first = load(dir.path());
    let second = load(dir.path());

    for strategy in Strategy::ALL {
        let a = first.recommend(&FAVORITES, 7, strategy).unwrap();
        let b = second.recommend(&FAVORITES, 7, strategy).unwrap();
        let c = first.recommend(&FAVORITES, 7, strategy).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}

#[test]
fn test_missing_metadata_file_falls_back_to_genres() {
    let dir = create_data_dir(false);
    let recommender = load(dir.path());
    assert!(recommender.index().get_movie(3).unwrap().cast.is_empty());

    // Jumanji and Balto each share three genres with Toy Story
    let mut titles = recommender
        .recommend(&["Toy Story (1995)"], 2, Strategy::ContentBased)
        .unwrap();
    titles.sort();
    assert_eq!(titles, vec!["Balto (1995)", "Jumanji (1995)"]);
}

#[test]
fn test_caller_errors() {
    let dir = create_data_dir(true);
    let recommender = load(dir.path());

    assert!(matches!(
        recommender.recommend(&["Heat"], 5, Strategy::ContentBased),
        Err(RecommendError::UnknownTitle(_))
    ));
    match recommender.recommend(&["Hamlet (1990)"], 5, Strategy::ContentBased) {
        Err(RecommendError::AmbiguousTitle { candidates, .. }) => {
            assert_eq!(candidates, vec![8, 9])
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert!(matches!(
        recommender.recommend(&FAVORITES, 0, Strategy::Collaborative),
        Err(RecommendError::InvalidRequest(_))
    ));
}

#[test]
fn test_seed_without_genres_warns() {
    let dir = create_data_dir(true);
    let recommender = load(dir.path());

    let report = recommender
        .recommend_detailed(&["Shorts (1990)", "Nixon (1995)"], 3, Strategy::ContentBased)
        .unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].movie_id, 10);
    assert_eq!(report.movies.len(), 3);
}

#[test]
fn test_bad_rating_file_fails_load() {
    let dir = create_data_dir(true);
    fs::write(
        dir.path().join("ratings.csv"),
        "userId,movieId,rating,timestamp\n1,42,4.0,1\n",
    )
    .unwrap();

    assert!(matches!(
        Recommender::load(dir.path(), RecommenderConfig::default()),
        Err(RecommendError::Data(_))
    ));
}
