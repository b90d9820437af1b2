use std::num::NonZeroUsize;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::game::engine::play;
use crate::model::deck::shuffle_deck;
use crate::sim::tally::OutcomeTally;

/// Games per statistics run unless configured otherwise.
pub const DEFAULT_BATCH_GAMES: usize = 10_000;

/// Play `games` untraced games, each on a fresh deck drawn from `rng`.
///
/// `rng` is advanced, never reseeded, so every game sees an independent deck
/// and a later call continues where this one stopped.
pub fn many_plays(rng: &mut StdRng, games: usize) -> OutcomeTally {
    let mut tally = OutcomeTally::new();
    for _ in 0..games {
        let deck = shuffle_deck(rng, 0);
        tally.record(play(&deck));
    }
    tally
}

/// How a batch is split across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub games: usize,
    pub workers: NonZeroUsize,
}

impl BatchPlan {
    pub fn sequential(games: usize) -> Self {
        Self {
            games,
            workers: NonZeroUsize::MIN,
        }
    }

    pub fn with_workers(games: usize, workers: usize) -> Self {
        Self {
            games,
            workers: NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Contiguous game counts per worker; the first shares absorb the remainder.
    pub fn shares(&self) -> Vec<usize> {
        let workers = self.workers.get().min(self.games.max(1));
        let base = self.games / workers;
        let extra = self.games % workers;
        (0..workers)
            .map(|index| base + usize::from(index < extra))
            .collect()
    }
}

impl Default for BatchPlan {
    fn default() -> Self {
        Self::sequential(DEFAULT_BATCH_GAMES)
    }
}

/// Run `plan`, drawing from `rng`.
///
/// A single worker is exactly [`many_plays`]. With more, each worker gets its
/// own generator seeded from `rng` and the per-worker tallies are summed, so
/// the result depends only on `rng`'s state and the worker count.
pub fn run_batch(rng: &mut StdRng, plan: BatchPlan) -> OutcomeTally {
    let shares = plan.shares();
    if shares.len() <= 1 {
        return many_plays(rng, plan.games);
    }

    let seeds: Vec<u64> = shares.iter().map(|_| rng.next_u64()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = shares
            .iter()
            .zip(seeds)
            .map(|(&games, seed)| {
                scope.spawn(move || {
                    let mut worker_rng = StdRng::seed_from_u64(seed);
                    many_plays(&mut worker_rng, games)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(tally) => tally,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .sum()
    })
}
