use std::time::Instant;
use cvscale_core::{ScaleSearch, SearchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    let n = 2_000; // Roughly eight years of daily closes
    let iterations = 20;

    let mut rng = StdRng::seed_from_u64(42);
    let series: Vec<f64> = (0..n).map(|_| rng.gen_range(5.0..80.0)).collect();

    // 1. Default grid (3800 points), tolerance that is rarely met early
    let strict = ScaleSearch::new(SearchConfig {
        target_cv_error: 1e-6,
        ..SearchConfig::default()
    });

    println!("Benchmarking full-grid search (n={}, {} iterations)...", n, iterations);
    let start_full = Instant::now();
    let mut examined_full = 0;
    for _ in 0..iterations {
        let result = strict.run(&series).expect("benchmark series is valid");
        examined_full += result.candidates_examined;
    }
    let duration_full = start_full.elapsed();
    println!("Full grid: {:?} ({} candidates)", duration_full, examined_full);

    // 2. Default tolerance, typically exits within a few candidates
    let greedy = ScaleSearch::new(SearchConfig::default());

    println!("\nBenchmarking early-exit search...");
    let start_greedy = Instant::now();
    let mut examined_greedy = 0;
    for _ in 0..iterations {
        let result = greedy.run(&series).expect("benchmark series is valid");
        examined_greedy += result.candidates_examined;
    }
    let duration_greedy = start_greedy.elapsed();
    println!("Early exit: {:?} ({} candidates)", duration_greedy, examined_greedy);

    let per_candidate_ns = duration_full.as_nanos() as f64 / examined_full.max(1) as f64;
    println!("\nCost per candidate: {:.0} ns ({:.2} ns per element)",
        per_candidate_ns, per_candidate_ns / n as f64);
}
