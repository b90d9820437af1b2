use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use patience_core::{AppInfo, DECK_SIZE, MAX_PILES, OutcomeTally};
use plotters::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

/// Rows shown in the histogram: a loss always leaves at most
/// `DECK_SIZE - MAX_PILES` cards, plus the row for wins.
pub const HISTOGRAM_ROWS: usize = DECK_SIZE - MAX_PILES + 1;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid statistics parameter: {0}")]
    Stats(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}

/// One histogram bar: games that ended with `remaining` cards undealt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramRow {
    pub remaining: usize,
    pub games: u64,
    pub percentage: f64,
}

/// Aggregate results of a statistics run.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    /// Simulator name and version that produced the run.
    pub generator: String,
    pub run_id: String,
    pub seed: Option<u64>,
    pub workers: usize,
    pub games: u64,
    pub wins: u64,
    /// Percentage of games won.
    pub win_probability: f64,
    pub confidence: f64,
    /// Wilson score interval for the win percentage.
    pub win_interval: (f64, f64),
    pub mean_remaining: f64,
    pub max_remaining: Option<usize>,
    pub rows: Vec<HistogramRow>,
}

impl StatsSummary {
    pub fn from_tally(
        run_id: &str,
        seed: Option<u64>,
        workers: usize,
        confidence: f64,
        tally: &OutcomeTally,
    ) -> Result<Self, AnalyticsError> {
        let percentages = tally.percentages();
        let rows = (0..HISTOGRAM_ROWS)
            .map(|remaining| HistogramRow {
                remaining,
                games: tally.count(remaining),
                percentage: percentages[remaining],
            })
            .collect();

        let (low, high) = wilson_interval(tally.wins(), tally.total(), confidence)?;

        Ok(Self {
            generator: format!("{} {}", AppInfo::name(), AppInfo::version()),
            run_id: run_id.to_string(),
            seed,
            workers,
            games: tally.total(),
            wins: tally.wins(),
            win_probability: tally.win_rate() * 100.0,
            confidence,
            win_interval: (low * 100.0, high * 100.0),
            mean_remaining: tally.mean_remaining(),
            max_remaining: tally.max_remaining(),
            rows,
        })
    }

    fn max_percentage(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| row.percentage)
            .fold(0.0, f64::max)
    }

    /// Every row, as printed on the console.
    pub fn render_console_histogram(&self, width: usize) -> String {
        let max = self.max_percentage();
        let mut out = String::new();
        for row in &self.rows {
            push_bar(&mut out, row, width, max);
        }
        out
    }

    /// Non-empty rows under a header, as written to the histogram file.
    pub fn render_histogram_file(&self, width: usize) -> String {
        let max = self.max_percentage();
        let mut out = String::from("Cards Remaining | Percentage\n");
        for row in self.rows.iter().filter(|row| row.games > 0) {
            push_bar(&mut out, row, width, max);
        }
        out
    }

    pub fn write_histogram(&self, path: impl AsRef<Path>, width: usize) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.render_histogram_file(width)).map_err(|e| {
            AnalyticsError::Io {
                context: "writing histogram file",
                source: e,
            }
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).map_err(|e| AnalyticsError::Io {
            context: "writing summary json",
            source: e,
        })
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Patience Statistics\n\n");
        let _ = writeln!(rows, "Generated by {}.\n", self.generator);
        rows.push_str("| Run | Seed | Workers | Games | Wins | Win % | CI | Mean left | Max left |\n");
        rows.push_str("|-----|------|---------|-------|------|-------|----|-----------|----------|\n");
        let _ = writeln!(
            rows,
            "| {run} | {seed} | {workers} | {games} | {wins} | {win:.2}% | {conf:.0}%: [{low:.2}, {high:.2}] | {mean:.2} | {max} |",
            run = self.run_id,
            seed = self
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "entropy".to_string()),
            workers = self.workers,
            games = self.games,
            wins = self.wins,
            win = self.win_probability,
            conf = self.confidence * 100.0,
            low = self.win_interval.0,
            high = self.win_interval.1,
            mean = self.mean_remaining,
            max = self
                .max_remaining
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );

        rows.push_str("\n## Cards remaining\n\n");
        rows.push_str("| Cards left | Games | Percentage |\n");
        rows.push_str("|------------|-------|------------|\n");
        for row in self.rows.iter().filter(|row| row.games > 0) {
            let _ = writeln!(
                rows,
                "| {} | {} | {:.3}% |",
                row.remaining, row.games, row.percentage
            );
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }

    pub fn render_plot(&self, dir: impl AsRef<Path>) -> Result<PathBuf, AnalyticsError> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| AnalyticsError::Io {
                context: "creating plots directory",
                source: e,
            })?;
        }

        let output_path = dir.join("histogram.png");
        let rows = self.rows.clone();
        let y_max = (self.max_percentage() * 1.1).max(1.0);

        let prev_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let plot_attempt = std::panic::catch_unwind(move || {
            let root = BitMapBackend::new(&output_path, (960, 480)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption("Cards remaining at end of game", ("sans-serif", 22))
                .set_label_area_size(LabelAreaPosition::Left, 50)
                .set_label_area_size(LabelAreaPosition::Bottom, 40)
                .build_cartesian_2d(0..rows.len(), 0.0..y_max)
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            chart
                .configure_mesh()
                .disable_mesh()
                .y_desc("% of games")
                .x_desc("Cards remaining")
                .draw()
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            chart
                .draw_series(rows.iter().map(|row| {
                    let color = if row.remaining == 0 { &GREEN } else { &BLUE };
                    Rectangle::new(
                        [(row.remaining, 0.0), (row.remaining + 1, row.percentage)],
                        color.filled(),
                    )
                }))
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            drop(chart);

            root.present()
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            drop(root);

            Ok(output_path)
        });

        std::panic::set_hook(prev_hook);

        match plot_attempt {
            Ok(result) => result,
            Err(_) => Err(AnalyticsError::Plot(
                "plotters panicked while rendering (missing font support?)".into(),
            )),
        }
    }
}

/// Bar length for `percentage`, scaled so the tallest bar is `width` stars.
pub fn star_count(percentage: f64, width: usize, max_percentage: f64) -> usize {
    if max_percentage <= 0.0 {
        return 0;
    }
    (percentage / max_percentage * width as f64).ceil() as usize
}

fn push_bar(out: &mut String, row: &HistogramRow, width: usize, max: f64) {
    let stars = star_count(row.percentage, width, max);
    let _ = writeln!(
        out,
        "{} {} {:.3} ({} stars)",
        row.remaining,
        "*".repeat(stars),
        row.percentage,
        stars
    );
}

/// Wilson score interval for `successes` out of `trials` at `confidence`.
pub fn wilson_interval(
    successes: u64,
    trials: u64,
    confidence: f64,
) -> Result<(f64, f64), AnalyticsError> {
    if trials == 0 {
        return Ok((0.0, 0.0));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| AnalyticsError::Stats(e.to_string()))?;
    let z = normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);

    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let centre = (p + z2 / (2.0 * n)) / denom;
    let margin = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
    Ok(((centre - margin).max(0.0), (centre + margin).min(1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patience_core::GameOutcome;

    fn tally() -> OutcomeTally {
        let mut outcomes = vec![GameOutcome::Win; 2];
        outcomes.extend([GameOutcome::Loss { remaining: 39 }; 4]);
        outcomes.extend([GameOutcome::Loss { remaining: 43 }; 2]);
        outcomes.into_iter().collect()
    }

    fn summary() -> StatsSummary {
        StatsSummary::from_tally("t", Some(1), 1, 0.95, &tally()).unwrap()
    }

    #[test]
    fn summary_covers_every_possible_row() {
        let summary = summary();
        assert_eq!(HISTOGRAM_ROWS, 44);
        assert_eq!(summary.rows.len(), HISTOGRAM_ROWS);
        assert_eq!(summary.games, 8);
        assert_eq!(summary.win_probability, 25.0);
        assert_eq!(summary.rows[39].percentage, 50.0);
        assert_eq!(summary.max_remaining, Some(43));
    }

    #[test]
    fn stars_scale_to_tallest_bar() {
        assert_eq!(star_count(50.0, 100, 50.0), 100);
        assert_eq!(star_count(25.0, 100, 50.0), 50);
        assert_eq!(star_count(0.001, 100, 50.0), 1);
        assert_eq!(star_count(0.0, 100, 50.0), 0);
        assert_eq!(star_count(10.0, 100, 0.0), 0);
        let inexact = 116.0 / 1000.0 * 100.0;
        assert_eq!(star_count(inexact, 50, inexact), 50);
        // Ratio first: half the tallest bar is exactly half the width.
        let half = 58.0 / 1000.0 * 100.0;
        assert_eq!(star_count(half, 50, inexact), 25);
    }

    #[test]
    fn file_histogram_lists_only_observed_rows() {
        let text = summary().render_histogram_file(10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Cards Remaining | Percentage",
                "0 ***** 25.000 (5 stars)",
                "39 ********** 50.000 (10 stars)",
                "43 ***** 25.000 (5 stars)",
            ]
        );
    }

    #[test]
    fn console_histogram_prints_empty_rows() {
        let text = summary().render_console_histogram(10);
        assert_eq!(text.lines().count(), HISTOGRAM_ROWS);
        assert_eq!(text.lines().nth(1), Some("1  0.000 (0 stars)"));
    }

    #[test]
    fn wilson_interval_brackets_estimate() {
        let (low, high) = wilson_interval(116, 1000, 0.95).unwrap();
        assert!(low < 0.116 && 0.116 < high);
        assert!((low - 0.0975).abs() < 0.002, "low {low}");
        assert!((high - 0.1375).abs() < 0.002, "high {high}");
        assert_eq!(wilson_interval(0, 0, 0.95).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn writes_markdown_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summary();
        let md = dir.path().join("summary.md");
        let json = dir.path().join("summary.json");
        summary.write_markdown(&md).unwrap();
        summary.write_json(&json).unwrap();

        let md = fs::read_to_string(md).unwrap();
        assert!(md.contains("| 39 | 4 | 50.000% |"));
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(value["wins"], 2);
        assert!(value["generator"].as_str().is_some_and(|g| g.starts_with("patience ")));
        assert!(md.contains("Generated by patience "));
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(HISTOGRAM_ROWS));
    }
}
