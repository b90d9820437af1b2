use crate::model::rank::Rank;

/// Most piles that may be showing at once; opening one more loses the game.
pub const MAX_PILES: usize = 9;

/// Two visible cards with this total are retired together.
pub const PAIR_TARGET: u8 = 11;

/// Slot value left behind when a court card could not be replaced.
pub const EMPTY_SLOT: u8 = 0;

/// The top card of every open pile, indexed by pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSet {
    slots: [u8; MAX_PILES],
    len: usize,
}

impl VisibleSet {
    pub const fn new() -> Self {
        Self {
            slots: [EMPTY_SLOT; MAX_PILES],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_PILES
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.slots[..self.len]
    }

    /// Open a new pile showing `card`. Returns `false` when the set is full.
    pub fn push(&mut self, card: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots[self.len] = card;
        self.len += 1;
        true
    }

    /// Overwrite the card showing on pile `slot`, which must be open.
    pub(crate) fn set(&mut self, slot: usize, card: u8) {
        debug_assert!(
            slot < self.len,
            "slot {slot} out of range for {} open piles",
            self.len
        );
        self.slots[slot] = card;
    }

    /// First pair in position order (`i` ascending, then `j > i` ascending)
    /// whose values total [`PAIR_TARGET`].
    pub fn find_pair(&self) -> Option<(usize, usize)> {
        let cards = self.as_slice();
        for (i, &first) in cards.iter().enumerate() {
            for (offset, &second) in cards[i + 1..].iter().enumerate() {
                if first + second == PAIR_TARGET {
                    return Some((i, i + 1 + offset));
                }
            }
        }
        None
    }

    /// Slots holding a Jack, Queen and King, in that order, when all three are
    /// showing. With duplicates the last slot of each value is reported.
    pub fn find_court(&self) -> Option<[usize; 3]> {
        let mut jack = None;
        let mut queen = None;
        let mut king = None;
        for (slot, &card) in self.as_slice().iter().enumerate() {
            let Some(rank) = Rank::from_value(card).filter(|rank| rank.is_court()) else {
                continue;
            };
            match rank {
                Rank::Jack => jack = Some(slot),
                Rank::Queen => queen = Some(slot),
                _ => king = Some(slot),
            }
        }
        Some([jack?, queen?, king?])
    }
}

impl Default for VisibleSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(cards: &[u8]) -> VisibleSet {
        let mut set = VisibleSet::new();
        for &card in cards {
            assert!(set.push(card));
        }
        set
    }

    #[test]
    fn push_stops_at_pile_limit() {
        let mut set = visible(&[1; MAX_PILES]);
        assert!(set.is_full());
        assert!(!set.push(2));
        assert_eq!(set.len(), MAX_PILES);
    }

    #[test]
    fn pair_search_prefers_lowest_outer_index() {
        // (1,3) sums to 11 but (0,2) is found first.
        let set = visible(&[4, 2, 7, 9]);
        assert_eq!(set.find_pair(), Some((0, 2)));

        let set = visible(&[1, 5, 6, 10]);
        assert_eq!(set.find_pair(), Some((0, 3)));
    }

    #[test]
    fn pair_search_ignores_single_cards() {
        assert_eq!(visible(&[11]).find_pair(), None);
        assert_eq!(visible(&[12, 13, 11, 2]).find_pair(), None);
    }

    #[test]
    fn court_search_reports_last_slot_of_each_face() {
        let set = visible(&[13, 11, 4, 12, 11]);
        assert_eq!(set.find_court(), Some([4, 3, 0]));
        assert_eq!(visible(&[11, 12, 5]).find_court(), None);
        assert_eq!(visible(&[EMPTY_SLOT, 12, 13, 1, 11]).find_court(), Some([4, 1, 2]));
    }

    #[test]
    fn emptied_slot_still_totals_with_a_jack() {
        let set = visible(&[EMPTY_SLOT, 11]);
        assert_eq!(set.find_pair(), Some((0, 1)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn set_rejects_unopened_slot() {
        let mut set = visible(&[3, 4]);
        set.set(2, 5);
    }
}
