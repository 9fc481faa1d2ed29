//! Flat state machines
//!
//! A `(state, event) -> state` table with entry hooks. The blink cycle
//! (Open/Closed) runs on one: entering Closed is what closes the eyes.

use rustc_hash::FxHashMap;

/// Identifier for a state within a state machine
pub type StateId = u32;

/// Identifier for an event type
pub type EventId = u32;

/// Hook run each time the machine enters a state
pub type EntryHook = Box<dyn FnMut() + Send>;

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder {
    initial: StateId,
    table: FxHashMap<(StateId, EventId), StateId>,
    entry_hooks: FxHashMap<StateId, Vec<EntryHook>>,
}

impl StateMachineBuilder {
    pub fn new(initial: StateId) -> Self {
        Self {
            initial,
            table: FxHashMap::default(),
            entry_hooks: FxHashMap::default(),
        }
    }

    /// `event` moves the machine from `from` to `to`. A later rule for the
    /// same `(from, event)` pair replaces the earlier one.
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.table.insert((from, event), to);
        self
    }

    /// Run `hook` after every transition into `state`
    pub fn on_enter<F: FnMut() + Send + 'static>(mut self, state: StateId, hook: F) -> Self {
        self.entry_hooks
            .entry(state)
            .or_default()
            .push(Box::new(hook));
        self
    }

    pub fn build(self) -> StateMachine {
        StateMachine {
            current: self.initial,
            table: self.table,
            entry_hooks: self.entry_hooks,
        }
    }
}

/// A running state machine
pub struct StateMachine {
    current: StateId,
    table: FxHashMap<(StateId, EventId), StateId>,
    entry_hooks: FxHashMap<StateId, Vec<EntryHook>>,
}

impl StateMachine {
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder::new(initial)
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn is_in(&self, state: StateId) -> bool {
        self.current == state
    }

    /// Whether `event` has a rule in the current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.table.contains_key(&(self.current, event))
    }

    /// Apply `event`. Returns the new state, or `None` if the current state
    /// has no rule for it (the machine is left untouched).
    pub fn send(&mut self, event: EventId) -> Option<StateId> {
        let to = *self.table.get(&(self.current, event))?;
        let from = std::mem::replace(&mut self.current, to);

        if let Some(hooks) = self.entry_hooks.get_mut(&to) {
            for hook in hooks.iter_mut() {
                hook();
            }
        }

        tracing::trace!(from, event, to, "fsm transition");
        Some(to)
    }
}
