use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use patience_core::{Deck, GameOutcome, GameRecord, TraceEvent, play_with_observer, shuffle_deck};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::report::{CardStyle, format_visible, outcome_line, write_report};

/// Everything needed to play and save one game.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub seed: u64,
    pub out_dir: PathBuf,
    pub style: CardStyle,
    pub record: Option<PathBuf>,
}

/// What a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub seed: u64,
    pub outcome: GameOutcome,
    pub report_path: PathBuf,
    pub record_path: Option<PathBuf>,
}

/// Seed used when none is given: seconds since the Unix epoch, never 0.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
        .max(1)
}

/// Play the game live onto `console`, then replay it from the seed into the
/// outcome file.
pub fn run_session<W: Write>(options: &SessionOptions, console: &mut W) -> Result<SessionResult> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let deck = shuffle_deck(&mut rng, options.seed);

    writeln!(console, "Playing a game of patience with seed {}", options.seed)?;
    let outcome = play_live(&deck, options.style, console)?;
    writeln!(console, "{}", outcome_line(outcome))?;
    info!(seed = options.seed, remaining = outcome.remaining(), "game finished");

    let record = replay(options.seed, outcome)?;

    let report_path = write_report(
        &options.out_dir,
        options.seed,
        outcome,
        &record.trace,
        options.style,
    )?;
    debug!(path = %report_path.display(), "game report written");

    let record_path = match options.record.as_deref() {
        Some(path) => {
            write_record(path, &record)?;
            Some(path.to_path_buf())
        }
        None => None,
    };

    Ok(SessionResult {
        seed: options.seed,
        outcome,
        report_path,
        record_path,
    })
}

/// Print each visible-card line as the game unfolds.
fn play_live<W: Write>(deck: &Deck, style: CardStyle, console: &mut W) -> io::Result<GameOutcome> {
    let mut failure = None;
    let outcome = play_with_observer(deck, &mut |_: TraceEvent, visible: &[u8]| {
        if failure.is_none() {
            if let Err(err) = writeln!(console, "{}", format_visible(visible, style)) {
                failure = Some(err);
            }
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(outcome),
    }
}

/// Reshuffle from the seed and check the replay lands on the live outcome.
fn replay(seed: u64, live: GameOutcome) -> Result<GameRecord> {
    let record = GameRecord::capture(seed);
    if record.outcome != live {
        anyhow::bail!(
            "replaying seed {seed} gave {:?}, live game gave {live:?}",
            record.outcome
        );
    }
    Ok(record)
}

fn write_record(path: &Path, record: &GameRecord) -> Result<()> {
    record
        .replay()
        .with_context(|| format!("verifying record for seed {}", record.seed))?;
    let json = record.to_json().context("serializing game record")?;
    std::fs::write(path, json).with_context(|| format!("writing game record to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(seed: u64, dir: &Path) -> SessionOptions {
        SessionOptions {
            seed,
            out_dir: dir.to_path_buf(),
            style: CardStyle::Numbers,
            record: None,
        }
    }

    #[test]
    fn losing_seed_writes_lose_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut console = Vec::new();
        let result = run_session(&options(42, dir.path()), &mut console).unwrap();

        assert_eq!(result.outcome, GameOutcome::Loss { remaining: 39 });
        assert_eq!(result.report_path, dir.path().join("lose.txt"));

        let console = String::from_utf8(console).unwrap();
        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(lines[0], "Playing a game of patience with seed 42");
        assert_eq!(lines[1], "5 12 ");
        assert_eq!(lines.last(), Some(&"Player loses with 39 cards left in the deck"));

        let saved = std::fs::read_to_string(&result.report_path).unwrap();
        assert!(saved.starts_with("Game of patience with seed 42\n\n5 12 \n"));
    }

    #[test]
    fn winning_seed_writes_win_file_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(2024, dir.path());
        opts.record = Some(dir.path().join("game.json"));
        let result = run_session(&opts, &mut Vec::new()).unwrap();

        assert_eq!(result.outcome, GameOutcome::Win);
        assert!(dir.path().join("win.txt").exists());
        let json = std::fs::read_to_string(result.record_path.unwrap()).unwrap();
        let record = GameRecord::from_json(&json).unwrap();
        assert_eq!(record.outcome, GameOutcome::Win);
        assert!(record.replay().is_ok());
    }

    #[test]
    fn clock_seed_is_never_zero() {
        assert!(clock_seed() > 0);
    }
}
