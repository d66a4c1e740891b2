//! Append-only record of committed operations.

use parking_lot::Mutex;

use crate::domain::LedgerEvent;

/// Thread-safe list of [`LedgerEvent`]s in commit order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<LedgerEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event`.
    pub fn record(&self, event: LedgerEvent) {
        self.events.lock().push(event);
    }

    /// Copy of every event recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns every recorded event.
    pub fn drain(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
