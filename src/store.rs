//! Observable container for the quote being edited.

use std::fmt;

use tracing::{debug, trace};

use crate::error::QuoteError;
use crate::quote::{QuoteAction, QuoteState};

/// Notified after every change to a [`QuoteStore`].
///
/// Typical observers persist the state or refresh previews.
pub trait QuoteObserver {
    fn state_changed(&self, state: &QuoteState);
}

impl<F: Fn(&QuoteState)> QuoteObserver for F {
    fn state_changed(&self, state: &QuoteState) {
        self(state)
    }
}

/// Owns the current [`QuoteState`] and tells observers when it changes.
#[derive(Default)]
pub struct QuoteStore {
    state: QuoteState,
    observers: Vec<Box<dyn QuoteObserver>>,
}

impl fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: QuoteState) -> Self {
        Self {
            state,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> &QuoteState {
        &self.state
    }

    pub fn subscribe(&mut self, observer: impl QuoteObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Applies `action` and notifies observers if the state changed.
    ///
    /// Returns whether it changed. On error the state is left as it was and
    /// nobody is notified.
    pub fn dispatch(&mut self, action: QuoteAction) -> Result<bool, QuoteError> {
        trace!(?action, "dispatching quote action");
        let next = self.state.apply(action)?;
        if next == self.state {
            return Ok(false);
        }
        self.state = next;
        debug!(items = self.state.items.len(), observers = self.observers.len(), "quote changed");
        for observer in &self.observers {
            observer.state_changed(&self.state);
        }
        Ok(true)
    }

    /// Replaces the state with one loaded from JSON.
    ///
    /// Loading is not a change made by the user, so observers are not notified.
    /// On error the current state is kept.
    pub fn hydrate(&mut self, json: &str) -> Result<(), QuoteError> {
        self.state = QuoteState::from_json(json)?;
        debug!(items = self.state.items.len(), "hydrated quote");
        Ok(())
    }

    /// The current state as JSON.
    pub fn export(&self) -> Result<String, QuoteError> {
        self.state.to_json()
    }
}
