//! Deferred one-shot timers
//!
//! A "run this after N milliseconds" queue for hosts that have no native
//! timer facility (headless runs, tests). Time is supplied by the caller, so
//! firing is independent of how often frames are produced.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending deferred action
    pub struct TimerId;
}

/// A fire-and-forget action run once when its timer expires
pub type DeferredAction = Box<dyn FnOnce() + Send + 'static>;

struct PendingTimer {
    due_ms: u64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    action: DeferredAction,
}

/// Queue of deferred actions keyed by due time
pub struct TimerQueue {
    timers: SlotMap<TimerId, PendingTimer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Schedule `action` to run once `fire_due` is called with `now_ms >= due_ms`
    pub fn schedule(&mut self, due_ms: u64, action: DeferredAction) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(PendingTimer {
            due_ms,
            seq,
            action,
        })
    }

    /// Cancel a pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Run every action due at `now_ms`, earliest first. Returns how many ran.
    pub fn fire_due(&mut self, now_ms: u64) -> usize {
        let mut due: Vec<(u64, u64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .map(|(id, t)| (t.due_ms, t.seq, id))
            .collect();
        due.sort_unstable();

        let mut fired = 0;
        for (_, _, id) in due {
            if let Some(timer) = self.timers.remove(id) {
                (timer.action)();
                fired += 1;
            }
        }

        if fired > 0 {
            tracing::trace!(fired, now_ms, "fired deferred actions");
        }
        fired
    }

    /// Due time of the earliest pending action
    pub fn next_due(&self) -> Option<u64> {
        self.timers.values().map(|t| t.due_ms).min()
    }

    /// Number of pending actions
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Drop every pending action without running it
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}
