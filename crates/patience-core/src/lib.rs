#![deny(warnings)]
//! Patience: a one-player card game where pairs totalling 11 and Jack/Queen/King
//! triples are covered from the deck, and running out of piles loses.

pub mod game;
pub mod model;
pub mod sim;

pub use game::engine::{GameOutcome, play, play_traced, play_with_observer};
pub use game::serialization::{GameRecord, RecordError};
pub use game::trace::{GameObserver, GameTrace, TraceEvent};
pub use model::deck::{DECK_SIZE, Deck, DeckError, shuffle_deck};
pub use model::visible::MAX_PILES;
pub use sim::batch::{BatchPlan, DEFAULT_BATCH_GAMES, many_plays, run_batch};
pub use sim::tally::{OutcomeTally, TALLY_BUCKETS};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "patience"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "patience");
        assert!(!AppInfo::version().is_empty());
    }
}
