use patience_core::{
    DECK_SIZE, Deck, GameOutcome, GameRecord, MAX_PILES, TraceEvent, many_plays, play,
    play_traced, shuffle_deck,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn every_seed_shuffles_a_full_deck() {
    let mut rng = StdRng::seed_from_u64(1);
    for seed in 1..=500u64 {
        let deck = shuffle_deck(&mut rng, seed);
        let mut sorted = *deck.cards();
        sorted.sort_unstable();
        let mut expected = *Deck::ordered().cards();
        expected.sort_unstable();
        assert_eq!(sorted, expected, "seed {seed}");
        assert_eq!(deck, shuffle_deck(&mut rng, seed), "seed {seed} not reproducible");
    }
}

#[test]
fn games_stay_within_pile_and_deck_bounds() {
    for seed in 1..=500u64 {
        let deck = Deck::shuffled_with_seed(seed);
        let (outcome, trace) = play_traced(&deck);

        assert!(trace.lines().all(|visible| visible.len() <= MAX_PILES));
        assert!(outcome.remaining() <= DECK_SIZE);

        // Cards dealt: two for the deal, one per new pile, up to two per pair
        // and up to three per court cover.
        let dealt: usize = 2 + trace.steps()[1..]
            .iter()
            .map(|step| match step.event {
                TraceEvent::PileOpened { .. } => 1,
                TraceEvent::PairCovered { .. } => 2,
                TraceEvent::CourtCovered { .. } => 3,
                TraceEvent::Deal => 0,
            })
            .sum::<usize>();
        match outcome {
            GameOutcome::Win => assert!(dealt >= DECK_SIZE, "seed {seed}"),
            GameOutcome::Loss { remaining } => {
                assert_eq!(dealt, DECK_SIZE - remaining, "seed {seed}");
                assert_eq!(trace.last_visible().map(<[u8]>::len), Some(MAX_PILES));
            }
        }
    }
}

#[test]
fn replaying_a_seed_gives_the_same_game() {
    for seed in [1u64, 42, 2024, 123_456_789] {
        let record = GameRecord::capture(seed);
        assert_eq!(record.replay().expect("replay"), record.trace);
        assert_eq!(play(&Deck::shuffled_with_seed(seed)), record.outcome);
    }
}

#[test]
fn unseeded_batches_sum_to_game_count() {
    let mut rng = StdRng::from_entropy();
    for games in [0usize, 1, 17, 500] {
        assert_eq!(many_plays(&mut rng, games).total(), games as u64);
    }
}
