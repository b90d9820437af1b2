use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::{GameOutcome, play_traced};
use super::trace::GameTrace;
use crate::model::deck::Deck;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to decode game record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed {seed} replayed to {replayed:?}, record says {recorded:?}")]
    OutcomeMismatch {
        seed: u64,
        recorded: GameOutcome,
        replayed: GameOutcome,
    },
    #[error("seed {seed} replayed to a different trace at step {step}")]
    TraceMismatch { seed: u64, step: usize },
}

/// A seeded game together with everything it showed, enough to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecord {
    pub seed: u64,
    pub outcome: GameOutcome,
    pub trace: GameTrace,
}

impl GameRecord {
    /// Shuffle with `seed`, play the game, and capture it.
    pub fn capture(seed: u64) -> Self {
        let deck = Deck::shuffled_with_seed(seed);
        let (outcome, trace) = play_traced(&deck);
        Self {
            seed,
            outcome,
            trace,
        }
    }

    /// Reshuffle from the recorded seed and play again, checking that the
    /// replay matches the record step for step.
    pub fn replay(&self) -> Result<GameTrace, RecordError> {
        let deck = Deck::shuffled_with_seed(self.seed);
        let (outcome, trace) = play_traced(&deck);
        if outcome != self.outcome {
            return Err(RecordError::OutcomeMismatch {
                seed: self.seed,
                recorded: self.outcome,
                replayed: outcome,
            });
        }
        let diverged = trace
            .steps()
            .iter()
            .zip(self.trace.steps())
            .position(|(a, b)| a != b);
        if let Some(step) = diverged {
            return Err(RecordError::TraceMismatch {
                seed: self.seed,
                step,
            });
        }
        if trace.len() != self.trace.len() {
            return Err(RecordError::TraceMismatch {
                seed: self.seed,
                step: trace.len().min(self.trace.len()),
            });
        }
        Ok(trace)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_to_json() {
        let record = GameRecord::capture(42);
        let json = record.to_json().unwrap();
        assert!(json.contains("\"seed\": 42"));
        assert!(json.contains("\"result\": \"loss\""));
        assert!(json.contains("\"remaining\": 39"));
        assert!(json.contains("\"kind\": \"deal\""));
    }

    #[test]
    fn record_roundtrip_replays_cleanly() {
        let record = GameRecord::capture(2024);
        let restored = GameRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(restored, record);
        let trace = restored.replay().expect("replay matches");
        assert_eq!(trace, record.trace);
    }

    #[test]
    fn tampered_outcome_is_detected() {
        let mut record = GameRecord::capture(42);
        record.outcome = GameOutcome::Win;
        let err = record.replay().expect_err("mismatch");
        assert!(matches!(err, RecordError::OutcomeMismatch { seed: 42, .. }));
    }

    #[test]
    fn truncated_trace_is_detected() {
        let mut record = GameRecord::capture(42);
        let json = record.to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["trace"].as_array_mut().unwrap().pop();
        record = serde_json::from_value(value).unwrap();
        let err = record.replay().expect_err("short trace");
        assert!(matches!(err, RecordError::TraceMismatch { step: 9, .. }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            GameRecord::from_json("{\"seed\": 1}"),
            Err(RecordError::Json(_))
        ));
    }
}
