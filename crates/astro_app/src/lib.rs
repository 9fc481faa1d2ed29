//! Astro Figure Controller
//!
//! Ties the animation sources together into a per-frame loop driving one
//! animated figure on a host-provided scene.
//!
//! # Example
//!
//! ```rust
//! use astro_app::prelude::*;
//!
//! let config = FigureConfig::default();
//! let mut figure = Figure::with_seed(&config, 7).unwrap();
//! let mut renderer = HeadlessRenderer::new();
//! let mut host = HeadlessHost::new(DisplayMetrics::new(800.0, 600.0, 1.0));
//!
//! figure.start(&mut host);
//! figure.pointer_moved(0.0, 0.0, &host);
//! let report = figure.tick(&mut renderer, &mut host, None).unwrap();
//! assert_eq!(report.frame, 1);
//! assert!(figure.pose().head_yaw.current() < 0.0);
//! ```
//!
//! # Modules
//!
//! - [`config`]: TOML figure configuration and validation
//! - [`figure`]: the per-frame controller
//! - [`chat`]: chat panel visibility toggle
//! - [`headless`]: deterministic host, recording renderer, and run loop

pub mod chat;
pub mod config;
pub mod error;
pub mod figure;
pub mod headless;

pub use chat::{ChatToggle, PanelSurface};
pub use config::FigureConfig;
pub use error::{ConfigError, Result};
pub use figure::{BasePose, Figure, FrameReport};
pub use headless::{
    HeadlessContext, HeadlessHost, HeadlessRenderer, HeadlessRunConfig, HeadlessRuntime,
    RecordingScene,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chat::{ChatToggle, PanelSurface};
    pub use crate::config::FigureConfig;
    pub use crate::error::ConfigError;
    pub use crate::figure::{Figure, FrameReport};
    pub use crate::headless::{HeadlessHost, HeadlessRenderer, HeadlessRunConfig, HeadlessRuntime};

    pub use astro_core::{Axis, PointerEvent, PointerPosition, Vec3};
    pub use astro_platform::{DisplayMetrics, FigureNode, HostScheduler, Renderer, SceneGraph};
}
