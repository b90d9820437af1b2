use crate::model::rank::Rank;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DECK_SIZE: usize = 52;
const COPIES_PER_RANK: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("card value {value} at position {position} is outside 1..=13")]
    InvalidValue { position: usize, value: u8 },
    #[error("card value {value} appears {count} times, expected 4")]
    WrongCount { value: u8, count: usize },
    #[error("deck holds {len} cards, expected 52")]
    WrongLength { len: usize },
}

/// A 52-card patience deck: four copies of each value 1..=13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Deck {
    cards: [u8; DECK_SIZE],
}

impl Deck {
    /// Block order: 1..=13 repeated four times.
    pub fn ordered() -> Self {
        let mut cards = [0u8; DECK_SIZE];
        for (i, card) in cards.iter_mut().enumerate() {
            *card = (i % Rank::ORDERED.len()) as u8 + 1;
        }
        Self { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Build a deck from an explicit ordering, checking its composition.
    pub fn from_cards(cards: [u8; DECK_SIZE]) -> Result<Self, DeckError> {
        let mut counts = [0usize; 14];
        for (position, &value) in cards.iter().enumerate() {
            if Rank::from_value(value).is_none() {
                return Err(DeckError::InvalidValue { position, value });
            }
            counts[value as usize] += 1;
        }
        for rank in Rank::ORDERED {
            let count = counts[rank.value() as usize];
            if count != COPIES_PER_RANK {
                return Err(DeckError::WrongCount {
                    value: rank.value(),
                    count,
                });
            }
        }
        Ok(Self { cards })
    }

    /// Fisher-Yates from the last index down to 1.
    ///
    /// `j` is drawn as a `usize` over `0..=i` so a given seed maps to the same
    /// permutation on every 64-bit target.
    pub fn shuffle_in_place<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..DECK_SIZE).rev() {
            let j: usize = rng.gen_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    pub fn cards(&self) -> &[u8; DECK_SIZE] {
        &self.cards
    }

    pub fn cursor(&self) -> DeckCursor<'_> {
        DeckCursor {
            cards: &self.cards,
            position: 0,
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::ordered()
    }
}

impl TryFrom<Vec<u8>> for Deck {
    type Error = DeckError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let len = value.len();
        let cards: [u8; DECK_SIZE] = value
            .try_into()
            .map_err(|_| DeckError::WrongLength { len })?;
        Self::from_cards(cards)
    }
}

impl From<Deck> for Vec<u8> {
    fn from(deck: Deck) -> Self {
        deck.cards.to_vec()
    }
}

/// Shuffle a fresh deck with `rng`.
///
/// A nonzero `seed` reseeds `rng` first, so the same seed always yields the
/// same deck. A seed of 0 keeps the generator's current state, which lets
/// consecutive calls produce independent decks.
pub fn shuffle_deck(rng: &mut StdRng, seed: u64) -> Deck {
    if seed != 0 {
        *rng = StdRng::seed_from_u64(seed);
    }
    Deck::shuffled(rng)
}

/// Left-to-right reader over a deck; every card is handed out at most once.
#[derive(Debug, Clone)]
pub struct DeckCursor<'a> {
    cards: &'a [u8; DECK_SIZE],
    position: usize,
}

impl DeckCursor<'_> {
    pub fn draw(&mut self) -> Option<u8> {
        let card = *self.cards.get(self.position)?;
        self.position += 1;
        Some(card)
    }

    pub fn remaining(&self) -> usize {
        DECK_SIZE - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= DECK_SIZE
    }
}
