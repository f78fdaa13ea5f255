use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::Serialize;
use spatial_grid_core::{Grid, GridConfig, ObjectHandle, ObjectSet};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compare uniform-grid radius queries against an R*-tree built over the same points.
#[derive(Parser, Debug)]
#[command(name = "benchmark-queries")]
struct Args {
    #[arg(long, default_value_t = 50_000)]
    objects: u64,
    #[arg(long, default_value_t = 10_000)]
    queries: usize,
    #[arg(long, default_value_t = 15.0)]
    radius: f64,
    #[arg(long, default_value_t = 10.0)]
    cell_size: f64,
    #[arg(long, default_value_t = 1000.0)]
    extent: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct Report {
    objects: u64,
    queries: usize,
    radius: f64,
    dimension: usize,
    grid_insert_us: u64,
    grid_query_us: u64,
    rtree_build_us: u64,
    rtree_query_us: u64,
    mean_candidates: f64,
    mean_exact_hits: f64,
    missed_hits: usize,
}

/// Exact hits absent from the grid's candidates, re-running each query
/// outside the timed section.
fn count_missed_hits(grid: &Grid, centers: &[[f64; 2]], radius: f64, exact: &[Vec<u64>]) -> Result<usize> {
    let mut found = ObjectSet::new();
    let mut missed = 0usize;
    for (c, hits) in centers.iter().zip(exact) {
        grid.query_into([c[0], 0.0, c[1]], radius, &mut found)?;
        missed += hits
            .iter()
            .filter(|&&id| !found.contains(ObjectHandle(id)))
            .count();
    }
    Ok(missed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    ensure!(args.radius >= 0.0, "radius must be non-negative");

    let mut grid = Grid::try_new(GridConfig::new(args.cell_size, args.extent))
        .context("building spatial grid")?;
    info!(dimension = grid.dimension(), objects = args.objects, "benchmarking");

    let mut rng = ChaCha12Rng::seed_from_u64(args.seed);
    let half = args.extent * 0.5;
    let points: Vec<[f64; 2]> = (0..args.objects)
        .map(|_| [rng.random_range(-half..half), rng.random_range(-half..half)])
        .collect();
    let centers: Vec<[f64; 2]> = (0..args.queries)
        .map(|_| [rng.random_range(-half..half), rng.random_range(-half..half)])
        .collect();

    let t0 = Instant::now();
    for (id, p) in points.iter().enumerate() {
        grid.insert(ObjectHandle(id as u64), [p[0], 0.0, p[1]])?;
    }
    let grid_insert_us = t0.elapsed().as_micros() as u64;

    let t1 = Instant::now();
    let tree = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(id, p)| GeomWithData::new(*p, id as u64))
            .collect::<Vec<_>>(),
    );
    let rtree_build_us = t1.elapsed().as_micros() as u64;

    let t2 = Instant::now();
    let mut candidate_total = 0usize;
    for c in &centers {
        candidate_total += grid.objects_in_radius([c[0], 0.0, c[1]], args.radius)?.len();
    }
    let grid_query_us = t2.elapsed().as_micros() as u64;

    let r_sq = args.radius * args.radius;
    let t3 = Instant::now();
    let exact: Vec<Vec<u64>> = centers
        .iter()
        .map(|c| tree.locate_within_distance(*c, r_sq).map(|e| e.data).collect())
        .collect();
    let rtree_query_us = t3.elapsed().as_micros() as u64;

    let exact_total: usize = exact.iter().map(Vec::len).sum();
    let missed_hits = count_missed_hits(&grid, &centers, args.radius, &exact)?;

    let queries = args.queries.max(1) as f64;
    let report = Report {
        objects: args.objects,
        queries: args.queries,
        radius: args.radius,
        dimension: grid.dimension(),
        grid_insert_us,
        grid_query_us,
        rtree_build_us,
        rtree_query_us,
        mean_candidates: candidate_total as f64 / queries,
        mean_exact_hits: exact_total as f64 / queries,
        missed_hits,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:#?}", report);
    }
    ensure!(missed_hits == 0, "grid missed {missed_hits} exact hits");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missed_hits_counts_only_absent_exact_hits() {
        let mut grid = Grid::new(GridConfig::new(10.0, 100.0));
        grid.insert(ObjectHandle(0), [1.0, 0.0, 1.0]).unwrap();
        grid.insert(ObjectHandle(1), [40.0, 0.0, 40.0]).unwrap();
        let centers = [[0.0, 0.0], [40.0, 40.0]];
        let exact = vec![vec![0], vec![1]];
        assert_eq!(count_missed_hits(&grid, &centers, 3.0, &exact).unwrap(), 0);

        // Handle 7 was never inserted, so the grid cannot return it.
        let bogus = vec![vec![0, 7], vec![1]];
        assert_eq!(count_missed_hits(&grid, &centers, 3.0, &bogus).unwrap(), 1);
    }

    #[test]
    fn missed_hits_leaves_shared_query_buffer_untouched() {
        let mut grid = Grid::new(GridConfig::new(10.0, 100.0));
        grid.insert(ObjectHandle(3), [-20.0, 0.0, 5.0]).unwrap();
        let before = grid.objects_in_radius([-20.0, 0.0, 5.0], 1.0).unwrap().to_vec();
        count_missed_hits(&grid, &[[30.0, 30.0]], 1.0, &[vec![]]).unwrap();
        assert_eq!(grid.objects_in_radius([-20.0, 0.0, 5.0], 1.0).unwrap().to_vec(), before);
    }
}
