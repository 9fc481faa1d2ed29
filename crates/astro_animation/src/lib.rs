//! Astro Animation System
//!
//! The independently-timed sources that feed the figure's pose every frame.
//!
//! # Features
//!
//! - **Frame Clock**: fixed nominal step per frame, or measured delta-time
//! - **Damping**: exponential smoothing toward targets, no overshoot
//! - **Hover**: sinusoidal idle bob
//! - **Blink**: autonomous Open/Closed cycle with randomized intervals
//! - **Pointer Tracking**: pointer position mapped to head and eye targets

pub mod blink;
pub mod clock;
pub mod damping;
pub mod hover;
pub mod pointer;

pub use blink::{BlinkEvent, BlinkPhase, BlinkScheduler, BlinkTiming, RestoreToken};
pub use clock::{ClockMode, FrameClock, FrameStep};
pub use damping::{frame_blend, half_life_frames};
pub use hover::Hover;
pub use pointer::{PointerTarget, PointerTracker, TrackingGains};
