//! Persistence hook fired after every confirmed state change.

use std::sync::Arc;

use crate::common::error::PersistError;
use crate::moderation::state::StateSnapshot;

/// Receives the full state after each successful mutation.
///
/// Called synchronously while the dispatcher still holds the state lock.
/// An error here is fatal to the process.
pub trait StateObserver: Send + Sync {
    fn on_state_changed(&self, snapshot: &StateSnapshot) -> Result<(), PersistError>;
}

impl<T: StateObserver + ?Sized> StateObserver for Arc<T> {
    fn on_state_changed(&self, snapshot: &StateSnapshot) -> Result<(), PersistError> {
        (**self).on_state_changed(snapshot)
    }
}
