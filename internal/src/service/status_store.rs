use time::OffsetDateTime;
use tokio::sync::watch;

use crate::domain::status::StatusState;

/// Holds the latest telemetry value, nothing older.
///
/// Reads borrow the current value of a watch cell, so a reader always sees a
/// whole `StatusState` and a write is visible to the next `get`. Writes are
/// crate-private: the fan-out hub performs them on behalf of the telemetry
/// consumer, which keeps a single writer.
pub struct StatusStore {
    state: watch::Sender<StatusState>,
}

impl StatusStore {
    pub fn new() -> Self {
        StatusStore {
            state: watch::Sender::new(StatusState::loading()),
        }
    }

    pub fn get(&self) -> StatusState {
        self.state.borrow().clone()
    }

    pub(crate) fn set(&self, value: String, now: OffsetDateTime) -> StatusState {
        let state = StatusState::new(value, now);
        self.state.send_replace(state.clone());
        state
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}
