use std::path::PathBuf;

use clap::Parser;

use patience_bench::analytics::HISTOGRAM_ROWS;
use patience_bench::config::{ResolvedOutputs, StatsConfig};
use patience_bench::logging::init_logging;
use patience_bench::runner::StatsRunner;

/// Batch statistics for the patience simulator.
#[derive(Debug, Parser)]
#[command(
    name = "patience-stats",
    author,
    version,
    about = "Play many games of patience and report how many cards were left"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/stats.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(short = 'n', long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for deck shuffling.
    #[arg(long, value_name = "SEED", conflicts_with = "entropy")]
    seed: Option<u64>,

    /// Ignore any configured seed and shuffle from OS entropy.
    #[arg(long)]
    entropy: bool,

    /// Override the number of worker threads.
    #[arg(short, long, value_name = "COUNT")]
    workers: Option<usize>,

    /// Override the histogram width in stars.
    #[arg(long, value_name = "STARS")]
    width: Option<usize>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = StatsConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.simulation.games = games;
    }

    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }

    if cli.entropy {
        config.simulation.seed = None;
    }

    if let Some(workers) = cli.workers {
        config.simulation.workers = workers;
    }

    if let Some(width) = cli.width {
        config.histogram.width = width;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let _logging_guard = init_logging(&config.logging, &outputs)?;

    if cli.validate_only {
        println!(
            "Configuration '{}' is valid; statistics run skipped.",
            config.run_id
        );
        return Ok(());
    }

    let width = config.histogram.width;
    println!("Running {} games of patience...", config.simulation.games);
    println!("Maximum cards left: {HISTOGRAM_ROWS}");

    let runner = StatsRunner::new(config, outputs);
    let summary = runner.run()?;

    println!("Win probability: {:.2}%", summary.stats.win_probability);
    println!("\nHistogram of cards remaining:");
    print!("{}", summary.stats.render_console_histogram(width));

    println!(
        "\nHistogram data saved to {}",
        summary.histogram_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    println!("Summary JSON: {}", summary.json_path.display());
    if let Some(plot_path) = summary.plot_path.as_ref() {
        println!("Histogram plot: {}", plot_path.display());
    }

    Ok(())
}
