use core::iter::Sum;
use core::ops::{Add, AddAssign};

use crate::game::engine::GameOutcome;
use crate::model::deck::DECK_SIZE;

/// One bucket for every possible remaining-card count, 0 through 52.
pub const TALLY_BUCKETS: usize = DECK_SIZE + 1;

/// How many games ended with each number of cards left in the deck.
/// Bucket 0 counts wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: [u64; TALLY_BUCKETS],
}

impl OutcomeTally {
    pub const fn new() -> Self {
        Self {
            counts: [0; TALLY_BUCKETS],
        }
    }

    pub fn record(&mut self, outcome: GameOutcome) {
        self.counts[outcome.remaining()] += 1;
    }

    pub fn count(&self, remaining: usize) -> u64 {
        self.counts.get(remaining).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn wins(&self) -> u64 {
        self.counts[0]
    }

    pub fn losses(&self) -> u64 {
        self.total() - self.wins()
    }

    /// Fraction of games won; 0 for an empty tally.
    pub fn win_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.wins() as f64 / total as f64,
        }
    }

    /// Share of games in each bucket, as a percentage.
    pub fn percentages(&self) -> [f64; TALLY_BUCKETS] {
        let total = self.total();
        let mut out = [0.0; TALLY_BUCKETS];
        if total == 0 {
            return out;
        }
        for (pct, &count) in out.iter_mut().zip(self.counts.iter()) {
            *pct = count as f64 / total as f64 * 100.0;
        }
        out
    }

    /// Largest remaining count seen in any game.
    pub fn max_remaining(&self) -> Option<usize> {
        self.counts.iter().rposition(|&count| count > 0)
    }

    /// Mean cards remaining per game.
    pub fn mean_remaining(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(remaining, &count)| remaining as u64 * count)
            .sum();
        weighted as f64 / total as f64
    }

    pub fn merge(&mut self, other: &OutcomeTally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().copied().enumerate()
    }
}

impl Default for OutcomeTally {
    fn default() -> Self {
        Self::new()
    }
}

impl AddAssign<&OutcomeTally> for OutcomeTally {
    fn add_assign(&mut self, rhs: &OutcomeTally) {
        self.merge(rhs);
    }
}

impl AddAssign for OutcomeTally {
    fn add_assign(&mut self, rhs: OutcomeTally) {
        self.merge(&rhs);
    }
}

impl Add for OutcomeTally {
    type Output = OutcomeTally;

    fn add(mut self, rhs: OutcomeTally) -> Self::Output {
        self.merge(&rhs);
        self
    }
}

impl Sum for OutcomeTally {
    fn sum<I: Iterator<Item = OutcomeTally>>(iter: I) -> Self {
        iter.fold(OutcomeTally::new(), Add::add)
    }
}

impl Extend<GameOutcome> for OutcomeTally {
    fn extend<T: IntoIterator<Item = GameOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}

impl FromIterator<GameOutcome> for OutcomeTally {
    fn from_iter<T: IntoIterator<Item = GameOutcome>>(iter: T) -> Self {
        let mut tally = OutcomeTally::new();
        tally.extend(iter);
        tally
    }
}
