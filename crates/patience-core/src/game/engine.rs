use serde::{Deserialize, Serialize};

use crate::game::trace::{GameObserver, GameTrace, NoTrace, TraceEvent};
use crate::model::deck::{Deck, DeckCursor};
use crate::model::visible::{EMPTY_SLOT, VisibleSet};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOutcome {
    /// Every card was dealt.
    Win,
    /// A pile had to be opened with every slot taken.
    Loss { remaining: usize },
}

impl GameOutcome {
    /// Cards still undealt when the game ended; 0 for a win.
    pub const fn remaining(self) -> usize {
        match self {
            GameOutcome::Win => 0,
            GameOutcome::Loss { remaining } => remaining,
        }
    }

    pub const fn is_win(self) -> bool {
        matches!(self, GameOutcome::Win)
    }
}

/// Play `deck` to completion without tracing.
pub fn play(deck: &Deck) -> GameOutcome {
    play_with_observer(deck, &mut NoTrace)
}

/// Play `deck` and collect every visible-card snapshot.
pub fn play_traced(deck: &Deck) -> (GameOutcome, GameTrace) {
    let mut trace = GameTrace::new();
    let outcome = play_with_observer(deck, &mut trace);
    (outcome, trace)
}

/// Play `deck`, reporting the visible cards to `observer` after the deal and
/// after every move.
pub fn play_with_observer<O: GameObserver + ?Sized>(deck: &Deck, observer: &mut O) -> GameOutcome {
    let mut game = Game::deal(deck);
    observer.on_visible(TraceEvent::Deal, game.visible.as_slice());

    loop {
        match game.turn() {
            Turn::Moved(event) => observer.on_visible(event, game.visible.as_slice()),
            Turn::Finished => return GameOutcome::Win,
            Turn::Blocked => {
                return GameOutcome::Loss {
                    remaining: game.cursor.remaining(),
                };
            }
        }
    }
}

enum Turn {
    Moved(TraceEvent),
    /// Every card has been dealt.
    Finished,
    /// A new pile was needed with every slot taken.
    Blocked,
}

struct Game<'a> {
    cursor: DeckCursor<'a>,
    visible: VisibleSet,
}

impl<'a> Game<'a> {
    fn deal(deck: &'a Deck) -> Self {
        let mut cursor = deck.cursor();
        let mut visible = VisibleSet::new();
        for _ in 0..2 {
            if let Some(card) = cursor.draw() {
                visible.push(card);
            }
        }
        Self { cursor, visible }
    }

    fn turn(&mut self) -> Turn {
        if self.cursor.is_exhausted() {
            return Turn::Finished;
        }

        if let Some((first, second)) = self.visible.find_pair() {
            // An exhausted deck leaves the old card showing.
            for slot in [first, second] {
                if let Some(card) = self.cursor.draw() {
                    self.visible.set(slot, card);
                }
            }
            return Turn::Moved(TraceEvent::PairCovered { first, second });
        }

        if let Some(slots) = self.visible.find_court() {
            // Unlike pairs, an exhausted deck empties the slot.
            for slot in slots {
                let card = self.cursor.draw().unwrap_or(EMPTY_SLOT);
                self.visible.set(slot, card);
            }
            return Turn::Moved(TraceEvent::CourtCovered { slots });
        }

        if self.visible.is_full() {
            return Turn::Blocked;
        }
        // No cover drew, so the card checked for at the top is still there.
        match self.cursor.draw() {
            Some(card) => {
                let slot = self.visible.len();
                self.visible.push(card);
                Turn::Moved(TraceEvent::PileOpened { slot })
            }
            None => Turn::Finished,
        }
    }
}
