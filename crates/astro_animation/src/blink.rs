//! Blink scheduling
//!
//! An autonomous two-state cycle shared by both eyes:
//!
//! - **Open** (initial): time accumulates until it reaches a randomly drawn
//!   threshold, then the eyes close.
//! - **Closed** (transient): lasts a fixed dwell time measured by a deferred
//!   host timer, not by counting frames. No time accumulates while closed,
//!   so every open interval starts when the eyes reopen.
//!
//! Closing happens inside [`BlinkScheduler::update`], through the entry hook
//! of the cycle's Closed state. Reopening happens when
//! the [`RestoreToken`] handed out with the [`BlinkEvent`] is redeemed, usually
//! from a deferred action scheduled by the host. The token holds only a weak
//! reference to the scheduler's state plus the epoch of the blink it belongs
//! to, so it is a no-op once the scheduler is dropped, cancelled, or has
//! started a newer blink.

use astro_core::fsm::{EventId, StateId, StateMachine};
use astro_core::timer::DeferredAction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

const OPEN: StateId = 0;
const CLOSED: StateId = 1;

const BLINK_DUE: EventId = 1;
const BLINK_RESTORE: EventId = 2;

/// Observable blink state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlinkPhase {
    Open,
    Closed,
}

/// Interval range and dwell time of the blink cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlinkTiming {
    /// Shortest open interval, in time units (must be > 0)
    pub min_interval: f32,
    /// Longest open interval, in time units (exclusive unless equal to min)
    pub max_interval: f32,
    /// How long the eyes stay closed
    pub dwell: Duration,
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self {
            min_interval: 2.0,
            max_interval: 6.0,
            dwell: Duration::from_millis(120),
        }
    }
}

/// Emitted once per blink, when the eyes close
#[derive(Debug)]
pub struct BlinkEvent {
    /// Latch epoch of this blink (1 for the first; cancels skip numbers)
    pub epoch: u64,
    /// Delay after which `restore` should be redeemed
    pub dwell: Duration,
    /// Interval drawn for the next blink
    pub next_threshold: f32,
    pub restore: RestoreToken,
}

/// Packed `epoch << 1 | closed` so restore can compare and reopen atomically
#[derive(Debug, Default)]
struct EyeLatch(AtomicU64);

impl EyeLatch {
    fn pack(epoch: u64, closed: bool) -> u64 {
        (epoch << 1) | closed as u64
    }

    fn load(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    fn is_closed(&self) -> bool {
        self.load() & 1 == 1
    }

    fn epoch(&self) -> u64 {
        self.load() >> 1
    }

    /// Move to a fresh epoch, orphaning tokens of the previous one
    fn advance(&self, closed: bool) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                Some(Self::pack((v >> 1) + 1, closed))
            });
    }

    /// Reopen only if the latch still holds the closed state of `epoch`
    fn reopen(&self, epoch: u64) -> bool {
        self.0
            .compare_exchange(
                Self::pack(epoch, true),
                Self::pack(epoch, false),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Cancellable handle that reopens the eyes for one specific blink
#[derive(Debug, Clone)]
pub struct RestoreToken {
    latch: Weak<EyeLatch>,
    epoch: u64,
}

impl RestoreToken {
    /// Reopen the eyes. Returns false if the blink was superseded, cancelled,
    /// or the scheduler no longer exists.
    pub fn restore(&self) -> bool {
        match self.latch.upgrade() {
            Some(latch) => latch.reopen(self.epoch),
            None => false,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Wrap the restore as a fire-and-forget host action
    pub fn into_action(self) -> DeferredAction {
        Box::new(move || {
            if !self.restore() {
                tracing::trace!(epoch = self.epoch, "stale blink restore ignored");
            }
        })
    }
}

/// Autonomous blink timer for one figure
pub struct BlinkScheduler<R: Rng = StdRng> {
    timing: BlinkTiming,
    elapsed: f32,
    threshold: f32,
    fixed_threshold: Option<f32>,
    blinks: u64,
    latch: Arc<EyeLatch>,
    machine: StateMachine,
    rng: R,
}

impl BlinkScheduler<StdRng> {
    /// Scheduler with an entropy-seeded generator
    pub fn from_entropy(timing: BlinkTiming) -> Self {
        Self::new(timing, StdRng::from_entropy())
    }

    /// Scheduler with a reproducible interval sequence
    pub fn with_seed(timing: BlinkTiming, seed: u64) -> Self {
        Self::new(timing, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BlinkScheduler<R> {
    pub fn new(timing: BlinkTiming, rng: R) -> Self {
        debug_assert!(timing.min_interval > 0.0, "blink interval must be positive");

        let latch = Arc::new(EyeLatch::default());
        let closer = Arc::clone(&latch);
        let machine = StateMachine::builder(OPEN)
            .on(OPEN, BLINK_DUE, CLOSED)
            .on(CLOSED, BLINK_RESTORE, OPEN)
            .on_enter(CLOSED, move || closer.advance(true))
            .build();

        let mut scheduler = Self {
            timing,
            elapsed: 0.0,
            threshold: timing.min_interval,
            fixed_threshold: None,
            blinks: 0,
            latch,
            machine,
            rng,
        };
        scheduler.threshold = scheduler.draw_threshold();
        scheduler
    }

    /// Pin every interval to `threshold` (deterministic tests)
    pub fn with_fixed_threshold(mut self, threshold: f32) -> Self {
        self.set_fixed_threshold(threshold);
        self
    }

    /// Pin the current and every following interval to `threshold`
    pub fn set_fixed_threshold(&mut self, threshold: f32) {
        self.fixed_threshold = Some(threshold);
        self.threshold = threshold;
    }

    pub fn timing(&self) -> BlinkTiming {
        self.timing
    }

    /// Open time since the last blink
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Interval that must elapse before the next blink
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Number of blinks fired so far
    pub fn blink_count(&self) -> u64 {
        self.blinks
    }

    pub fn is_closed(&self) -> bool {
        self.latch.is_closed()
    }

    pub fn state(&self) -> BlinkPhase {
        if self.is_closed() {
            BlinkPhase::Closed
        } else {
            BlinkPhase::Open
        }
    }

    /// Advance by `step` time units. Returns an event when a blink fires.
    pub fn update(&mut self, step: f32) -> Option<BlinkEvent> {
        self.sync_machine();
        // Closed frames are not counted toward the next interval
        if !self.machine.can_send(BLINK_DUE) {
            return None;
        }

        self.elapsed += step;
        if self.elapsed < self.threshold {
            return None;
        }

        self.machine.send(BLINK_DUE);
        let epoch = self.latch.epoch();
        self.blinks += 1;
        self.elapsed = 0.0;
        self.threshold = self.draw_threshold();

        tracing::debug!(epoch, next_threshold = self.threshold, "blink");

        Some(BlinkEvent {
            epoch,
            dwell: self.timing.dwell,
            next_threshold: self.threshold,
            restore: RestoreToken {
                latch: Arc::downgrade(&self.latch),
                epoch,
            },
        })
    }

    /// Invalidate every outstanding restore token and reopen the eyes
    pub fn cancel_pending(&mut self) {
        // Tokens compare against the epoch, so bumping it orphans them
        self.latch.advance(false);
        self.sync_machine();
    }

    /// Follow a reopen performed through a restore token
    fn sync_machine(&mut self) {
        if self.machine.is_in(CLOSED) && !self.latch.is_closed() {
            self.machine.send(BLINK_RESTORE);
        }
    }

    fn draw_threshold(&mut self) -> f32 {
        if let Some(fixed) = self.fixed_threshold {
            return fixed;
        }
        let BlinkTiming {
            min_interval,
            max_interval,
            ..
        } = self.timing;
        if max_interval > min_interval {
            self.rng.gen_range(min_interval..max_interval)
        } else {
            min_interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 0.015;

    fn fixed_scheduler() -> BlinkScheduler {
        BlinkScheduler::with_seed(BlinkTiming::default(), 7).with_fixed_threshold(2.0)
    }

    #[test]
    fn test_first_blink_on_frame_134() {
        let mut blink = fixed_scheduler();

        for frame in 1..=133 {
            assert!(blink.update(STEP).is_none(), "fired early at frame {frame}");
        }
        assert!(blink.elapsed() < 2.0);

        let event = blink.update(STEP).expect("blink on frame 134");
        assert_eq!(event.epoch, 1);
        assert!(blink.is_closed());
        assert_eq!(blink.state(), BlinkPhase::Closed);
        assert_eq!(blink.elapsed(), 0.0);

        assert!(event.restore.restore());
        assert!(!blink.is_closed());
    }

    #[test]
    fn test_restore_is_single_use() {
        let mut blink = fixed_scheduler();
        let event = (0..200).find_map(|_| blink.update(STEP)).unwrap();

        let token = event.restore.clone();
        assert!(event.restore.restore());
        assert!(!token.restore());
    }

    #[test]
    fn test_no_second_blink_while_closed() {
        let timing = BlinkTiming {
            min_interval: 0.03,
            max_interval: 0.03,
            dwell: Duration::from_millis(120),
        };
        let mut blink = BlinkScheduler::with_seed(timing, 1);

        blink.update(STEP);
        let first = blink.update(STEP).expect("blink after two frames");

        for _ in 0..10 {
            assert!(blink.update(STEP).is_none());
        }
        assert!(blink.is_closed());

        first.restore.restore();
        assert!(blink.update(STEP).is_none(), "fired on the reopen frame");
        let second = blink.update(STEP).expect("blink after a full interval");
        assert_eq!(second.epoch, 2);
        assert_eq!(blink.blink_count(), 2);
    }

    #[test]
    fn test_closed_time_does_not_count() {
        let mut blink = fixed_scheduler();
        let event = (0..200).find_map(|_| blink.update(STEP)).unwrap();

        // Far longer than the threshold while closed
        for _ in 0..500 {
            assert!(blink.update(STEP).is_none());
        }
        assert_eq!(blink.elapsed(), 0.0);

        event.restore.restore();
        for frame in 1..=133 {
            assert!(blink.update(STEP).is_none(), "fired early at frame {frame}");
        }
        assert!(blink.update(STEP).is_some());
    }

    #[test]
    fn test_stale_token_after_cancel() {
        let mut blink = fixed_scheduler();
        let event = (0..200).find_map(|_| blink.update(STEP)).unwrap();

        blink.cancel_pending();
        assert!(!blink.is_closed());
        assert_eq!(blink.state(), BlinkPhase::Open);
        assert!(!event.restore.restore());

        // Cycle keeps running after a cancel
        let next = (0..200).find_map(|_| blink.update(STEP)).unwrap();
        assert!(next.epoch > event.epoch);
        assert!(next.restore.restore());
        assert_eq!(blink.blink_count(), 2);
    }

    #[test]
    fn test_token_after_drop_is_noop() {
        let mut blink = fixed_scheduler();
        let event = (0..200).find_map(|_| blink.update(STEP)).unwrap();
        drop(blink);

        let action = event.restore.into_action();
        action();
    }

    #[test]
    fn test_intervals_within_range() {
        let timing = BlinkTiming::default();
        let mut blink = BlinkScheduler::with_seed(timing, 42);

        let mut thresholds = vec![blink.threshold()];
        for _ in 0..20 {
            let event = (0..1000).find_map(|_| blink.update(STEP)).unwrap();
            thresholds.push(event.next_threshold);
            event.restore.restore();
        }

        for t in &thresholds {
            assert!(*t >= timing.min_interval && *t < timing.max_interval);
        }
        assert!(thresholds.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_seeded_sequence_is_reproducible() {
        let a = BlinkScheduler::with_seed(BlinkTiming::default(), 9);
        let b = BlinkScheduler::with_seed(BlinkTiming::default(), 9);
        assert_eq!(a.threshold(), b.threshold());
    }
}
