//! Single-slot handoff of the latest [`AggregateState`].
//!
//! The receive cycle owns the only [`StateWriter`]; the render cycle holds a
//! [`StateReader`]. Both sides sit on a `tokio::sync::watch` channel, so a
//! reader never observes a state mid-mutation and neither side waits on the
//! other beyond the short copy.

use tokio::sync::watch;

use super::event::Event;
use super::model::AggregateState;

/// Create a connected writer/reader pair around an empty state.
pub fn shared_state() -> (StateWriter, StateReader) {
    let (tx, rx) = watch::channel(AggregateState::new());
    (StateWriter { tx }, StateReader { rx })
}

/// The sole mutator of the shared state.
#[derive(Debug)]
pub struct StateWriter {
    tx: watch::Sender<AggregateState>,
}

impl StateWriter {
    /// Reduce one event into the shared state.
    ///
    /// Readers are only notified when the event could have changed the state.
    pub fn apply(&self, event: Event) -> bool {
        self.tx.send_if_modified(|state| state.apply(event))
    }
}

/// Read side of the shared state.
#[derive(Debug, Clone)]
pub struct StateReader {
    rx: watch::Receiver<AggregateState>,
}

impl StateReader {
    /// Whether a newer state is available than the last one taken.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Copy the latest state if it changed since the last call.
    ///
    /// Still yields the final state after the writer has gone away.
    pub fn latest(&mut self) -> Option<AggregateState> {
        let state = self.rx.borrow_and_update();
        if state.has_changed() {
            Some(state.clone())
        } else {
            None
        }
    }

    /// Copy the current state unconditionally.
    pub fn snapshot(&self) -> AggregateState {
        self.rx.borrow().clone()
    }
}
