//! Host scheduling and display metrics

use astro_core::timer::DeferredAction;
use std::time::Duration;

/// Opaque handle to a deferred action scheduled with the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Displayed size of the drawing surface, polled once per frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMetrics {
    /// Displayed width in logical pixels (0 when not laid out yet)
    pub width: f32,
    /// Displayed height in logical pixels
    pub height: f32,
    /// Device pixels per logical pixel
    pub device_pixel_ratio: f64,
}

impl DisplayMetrics {
    pub const fn new(width: f32, height: f32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Frame and timer primitives provided by the host event loop
pub trait HostScheduler {
    /// Ask for the frame callback to run again before the next display refresh
    fn request_frame(&mut self);

    /// Run `action` once after `delay`, independent of frame cadence
    fn schedule_after(&mut self, delay: Duration, action: DeferredAction) -> TimerHandle;

    /// Cancel a pending action. Returns false if it already ran.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Pollable display size query
pub trait MetricsSource {
    fn display_metrics(&self) -> DisplayMetrics;
}

/// Everything a figure needs from its host
pub trait Host: HostScheduler + MetricsSource {}

impl<T: HostScheduler + MetricsSource> Host for T {}
