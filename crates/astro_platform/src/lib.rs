//! Astro Platform Abstraction
//!
//! The interfaces the figure's frame loop consumes from its host, plus the
//! two pieces of host-adjacent logic that belong with them:
//!
//! - [`SceneGraph`]: write-only transform surface of the figure's nodes
//! - [`Renderer`]: backing-store sizing and the opaque `draw` call
//! - [`HostScheduler`] / [`MetricsSource`]: frame requests, deferred actions,
//!   and display size polling
//! - [`Camera`]: perspective projection kept in sync with the aspect ratio
//! - [`ViewportSync`]: reconciles backing-store size with the displayed size

pub mod camera;
pub mod error;
pub mod host;
pub mod renderer;
pub mod scene;
pub mod viewport;

pub use camera::Camera;
pub use error::{PlatformError, Result};
pub use host::{DisplayMetrics, Host, HostScheduler, MetricsSource, TimerHandle};
pub use renderer::{PhysicalSize, Renderer};
pub use scene::{FigureNode, SceneGraph};
pub use viewport::{ViewportDescriptor, ViewportSync};
