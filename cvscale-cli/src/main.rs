use anyhow::{bail, Context, Result};
use clap::Parser;
use cvscale_core::ScaleSearch;
use cvscale_io::Table;
use log::{info, warn};

mod config;
mod report;

use config::Args;
use report::Report;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    // 1. Load the source column
    info!("Loading data from {}", args.input.display());
    let mut table = Table::read_csv(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let original = table
        .column_f64(&args.column)
        .with_context(|| format!("Failed to read column `{}`", args.column))?;

    // 2. Search
    let config = args.search_config();
    let engine = ScaleSearch::new(config);
    let (result, trace) = if args.trace {
        let (result, trace) = engine.run_traced(&original).context("Scale search failed")?;
        info!("Search trace captured {} events ({} improvements)", trace.events().len(), trace.improvements());
        (result, Some(trace))
    } else {
        (engine.run(&original).context("Scale search failed")?, None)
    };

    if result.met_target {
        info!(
            "Found solution within target error ({:.6}% <= {:.6}%)",
            result.cv_error() * 100.0,
            config.target_cv_error * 100.0
        );
    } else if args.require_target {
        bail!(
            "No scale in [{}, {}) met the CV tolerance {} (best error {:.6} after {} candidates)",
            config.min_multiplier,
            config.max_multiplier,
            config.target_cv_error,
            result.cv_error(),
            result.candidates_examined
        );
    } else {
        warn!(
            "CV tolerance {} not met; keeping best effort (error {:.6}, scale {:.6})",
            config.target_cv_error,
            result.cv_error(),
            result.best_scale
        );
    }

    // 3. Persist the augmented table
    let exact = result.exact_series(&original);
    table.set_column(&args.exact_column, &exact)?;
    table.set_column(&args.integer_column, result.integer_series())?;
    table
        .write_csv(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Precision-scaled data saved to {}", args.output.display());

    // 4. Report
    let report = Report::build(&args.column, &original, &config, &result, trace)?;
    println!("{}", report.render());
    if let Some(path) = &args.diagnostics_json {
        report.write_json(path)?;
    }

    Ok(())
}
