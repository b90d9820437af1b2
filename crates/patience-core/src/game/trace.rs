use serde::{Deserialize, Serialize};

/// What changed the visible cards since the previous snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The opening two cards were laid out.
    Deal,
    /// Two cards totalling 11 were covered.
    PairCovered { first: usize, second: usize },
    /// A Jack, Queen and King were covered, in that slot order.
    CourtCovered { slots: [usize; 3] },
    /// A new pile was started at `slot`.
    PileOpened { slot: usize },
}

/// Receives the visible cards after every deal, cover, or new pile.
pub trait GameObserver {
    fn on_visible(&mut self, event: TraceEvent, visible: &[u8]);
}

/// Observer that discards everything; used for untraced games.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl GameObserver for NoTrace {
    #[inline]
    fn on_visible(&mut self, _event: TraceEvent, _visible: &[u8]) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub event: TraceEvent,
    pub visible: Vec<u8>,
}

/// Ordered record of every visible-card snapshot in a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameTrace {
    steps: Vec<TraceStep>,
}

impl GameTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_visible(&self) -> Option<&[u8]> {
        self.steps.last().map(|step| step.visible.as_slice())
    }

    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.steps.iter().map(|step| step.visible.as_slice())
    }
}

impl GameObserver for GameTrace {
    fn on_visible(&mut self, event: TraceEvent, visible: &[u8]) {
        self.steps.push(TraceStep {
            event,
            visible: visible.to_vec(),
        });
    }
}

impl<F> GameObserver for F
where
    F: FnMut(TraceEvent, &[u8]),
{
    fn on_visible(&mut self, event: TraceEvent, visible: &[u8]) {
        self(event, visible)
    }
}
