//! Astro Core Runtime
//!
//! Foundational primitives for the Astro figure animation stack:
//!
//! - **Pose Store**: current/target pairs for every animated attribute
//! - **State Machines**: small flat state machines (the blink cycle uses one)
//! - **Pointer Events**: host pointer input in viewport coordinates
//! - **Timers**: a deferred one-shot action queue for hosts without native timers
//!
//! # Example
//!
//! ```rust
//! use astro_core::pose::Tracked;
//!
//! let mut yaw = Tracked::new(0.0);
//! yaw.set_target(0.28);
//! yaw.approach(0.12);
//! assert!(yaw.current() > 0.0 && yaw.current() < 0.28);
//! ```

pub mod events;
pub mod fsm;
pub mod math;
pub mod pose;
pub mod timer;

pub use events::{PointerEvent, PointerPosition};
pub use fsm::{EventId, StateId, StateMachine};
pub use math::{Axis, Vec3};
pub use pose::{EyeOffset, Pose, Tracked};
pub use timer::{DeferredAction, TimerId, TimerQueue};
