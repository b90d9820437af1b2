use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use patience_core::{BatchPlan, OutcomeTally, run_batch};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{Level, event, info};

use crate::analytics::{AnalyticsError, StatsSummary};
use crate::config::{ResolvedOutputs, StatsConfig};

/// Primary entry point for statistics runs.
pub struct StatsRunner {
    config: StatsConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub tally: OutcomeTally,
    pub stats: StatsSummary,
    pub histogram_path: PathBuf,
    pub summary_path: PathBuf,
    pub json_path: PathBuf,
    pub plot_path: Option<PathBuf>,
}

impl StatsRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: StatsConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Play every configured game without touching the filesystem.
    pub fn simulate(&self) -> OutcomeTally {
        let sim = &self.config.simulation;
        let mut rng = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let plan = BatchPlan::with_workers(sim.games, sim.workers);

        let started = Instant::now();
        let tally = run_batch(&mut rng, plan);
        let elapsed = started.elapsed();

        info!(
            run_id = %self.config.run_id,
            games = sim.games,
            workers = sim.workers,
            seed = ?sim.seed,
            wins = tally.wins(),
            elapsed_ms = elapsed.as_millis() as u64,
            "simulation finished"
        );
        for (remaining, games) in tally.iter().filter(|&(_, games)| games > 0) {
            event!(Level::DEBUG, remaining, games, "outcome bucket");
        }

        tally
    }

    /// Run the simulation and write every configured output.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.histogram_txt.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        ensure_parent(self.outputs.summary_json.parent())?;

        let tally = self.simulate();
        let stats = StatsSummary::from_tally(
            &self.config.run_id,
            self.config.simulation.seed,
            self.config.simulation.workers,
            self.config.histogram.confidence,
            &tally,
        )?;

        stats.write_histogram(&self.outputs.histogram_txt, self.config.histogram.width)?;
        stats.write_markdown(&self.outputs.summary_md)?;
        stats.write_json(&self.outputs.summary_json)?;

        let plot_path = match stats.render_plot(&self.outputs.plots_dir) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(error = %err, "histogram plot skipped");
                eprintln!("WARN: {}", err);
                None
            }
        };

        Ok(RunSummary {
            tally,
            stats,
            histogram_path: self.outputs.histogram_txt.clone(),
            summary_path: self.outputs.summary_md.clone(),
            json_path: self.outputs.summary_json.clone(),
            plot_path,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
