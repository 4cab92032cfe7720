use data_loader::{DataSet, TitleIndex};
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = Path::new("data");

    println!("Loading movie dataset...\n");

    let start = Instant::now();
    let dataset = DataSet::load_from_dir(data_dir)?;
    let load_elapsed = start.elapsed();

    let ratings = dataset.ratings.len();
    let start = Instant::now();
    let index = TitleIndex::new(dataset.catalog)?;
    let index_elapsed = start.elapsed();

    println!("=== Load Complete ===");
    println!("Load time: {:?}", load_elapsed);
    println!("Index time: {:?}", index_elapsed);
    println!("Movies: {}", index.len());
    println!("Ratings: {}", ratings);
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / load_elapsed.as_secs_f64()
    );
    Ok(())
}
