use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use patience_core::model::rank::Rank;
use patience_core::{GameOutcome, GameTrace};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How card values are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardStyle {
    /// Raw values, 1 through 13.
    #[default]
    Numbers,
    /// A, 2..10, J, Q, K; emptied slots as `-`.
    Faces,
}

/// One line of visible cards, each followed by a space.
pub fn format_visible(visible: &[u8], style: CardStyle) -> String {
    let mut line = String::with_capacity(visible.len() * 3);
    for &card in visible {
        match style {
            CardStyle::Numbers => {
                let _ = write!(line, "{card} ");
            }
            CardStyle::Faces => {
                let _ = write!(line, "{} ", Rank::label(card));
            }
        }
    }
    line
}

pub fn format_trace(trace: &GameTrace, style: CardStyle) -> String {
    let mut out = String::new();
    for visible in trace.lines() {
        out.push_str(&format_visible(visible, style));
        out.push('\n');
    }
    out
}

pub fn outcome_line(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Win => "Player wins".to_string(),
        GameOutcome::Loss { remaining } => {
            format!("Player loses with {remaining} cards left in the deck")
        }
    }
}

/// `win.txt` or `lose.txt`, depending on the outcome.
pub fn outcome_file_name(outcome: GameOutcome) -> &'static str {
    if outcome.is_win() { "win.txt" } else { "lose.txt" }
}

/// Full text of the saved game: header, trace, result.
pub fn render_report(seed: u64, outcome: GameOutcome, trace: &GameTrace, style: CardStyle) -> String {
    format!(
        "Game of patience with seed {seed}\n\n{}\n{}\n",
        format_trace(trace, style),
        outcome_line(outcome)
    )
}

/// Write the saved game into `dir`, returning the file path.
pub fn write_report(
    dir: &Path,
    seed: u64,
    outcome: GameOutcome,
    trace: &GameTrace,
    style: CardStyle,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(outcome_file_name(outcome));
    fs::write(&path, render_report(seed, outcome, trace, style)).map_err(|source| {
        ReportError::Write {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
