//! Headless host, renderer, and runtime loop
//!
//! A deterministic stand-in for a real event loop: virtual milliseconds,
//! deferred actions queued in a [`TimerQueue`], and a renderer that records
//! what the figure wrote instead of drawing it. Used by tests and the CLI.

use crate::figure::{Figure, FrameReport};
use anyhow::Result;
use astro_core::math::Axis;
use astro_core::timer::{DeferredAction, TimerId, TimerQueue};
use astro_platform::{
    Camera, DisplayMetrics, FigureNode, HostScheduler, MetricsSource, PhysicalSize, PlatformError,
    Renderer, SceneGraph, TimerHandle,
};
use rustc_hash::FxHashMap;
use slotmap::{Key, KeyData};
use std::time::Duration;

/// Host with a virtual millisecond clock
pub struct HeadlessHost {
    now_ms: u64,
    timers: TimerQueue,
    metrics: DisplayMetrics,
    frame_requests: u64,
    frame_pending: bool,
}

impl HeadlessHost {
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            now_ms: 0,
            timers: TimerQueue::new(),
            metrics,
            frame_requests: 0,
            frame_pending: false,
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward to `now_ms` and run every action that came due.
    /// Time never goes backwards.
    pub fn advance_to(&mut self, now_ms: u64) -> usize {
        self.now_ms = self.now_ms.max(now_ms);
        self.timers.fire_due(self.now_ms)
    }

    pub fn advance_by(&mut self, delta_ms: u64) -> usize {
        self.advance_to(self.now_ms.saturating_add(delta_ms))
    }

    pub fn set_metrics(&mut self, metrics: DisplayMetrics) {
        self.metrics = metrics;
    }

    /// Total frame requests received
    pub fn frame_requests(&self) -> u64 {
        self.frame_requests
    }

    /// Consume an outstanding frame request, as a display refresh would
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    /// Deferred actions that have not run yet
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    fn timer_id(handle: TimerHandle) -> TimerId {
        TimerId::from(KeyData::from_ffi(handle.0))
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(DisplayMetrics::default())
    }
}

impl HostScheduler for HeadlessHost {
    fn request_frame(&mut self) {
        self.frame_requests += 1;
        self.frame_pending = true;
    }

    fn schedule_after(&mut self, delay: Duration, action: DeferredAction) -> TimerHandle {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let id = self.timers.schedule(due_ms, action);
        tracing::trace!(due_ms, "deferred action scheduled");
        TimerHandle(id.data().as_ffi())
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.cancel(Self::timer_id(handle))
    }
}

impl MetricsSource for HeadlessHost {
    fn display_metrics(&self) -> DisplayMetrics {
        self.metrics
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Channel {
    Translation,
    Rotation,
    Scale,
}

/// Scene that remembers the last value written per node, channel, and axis
#[derive(Debug, Default)]
pub struct RecordingScene {
    values: FxHashMap<(FigureNode, Channel, Axis), f32>,
    writes: u64,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translation(&self, node: FigureNode, axis: Axis) -> Option<f32> {
        self.get(node, Channel::Translation, axis)
    }

    pub fn rotation(&self, node: FigureNode, axis: Axis) -> Option<f32> {
        self.get(node, Channel::Rotation, axis)
    }

    pub fn scale(&self, node: FigureNode, axis: Axis) -> Option<f32> {
        self.get(node, Channel::Scale, axis)
    }

    /// Total transform writes received
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn get(&self, node: FigureNode, channel: Channel, axis: Axis) -> Option<f32> {
        self.values.get(&(node, channel, axis)).copied()
    }

    fn put(&mut self, node: FigureNode, channel: Channel, axis: Axis, value: f32) {
        self.values.insert((node, channel, axis), value);
        self.writes += 1;
    }
}

impl SceneGraph for RecordingScene {
    fn set_translation(&mut self, node: FigureNode, axis: Axis, value: f32) {
        self.put(node, Channel::Translation, axis, value);
    }

    fn set_rotation(&mut self, node: FigureNode, axis: Axis, radians: f32) {
        self.put(node, Channel::Rotation, axis, radians);
    }

    fn set_scale(&mut self, node: FigureNode, axis: Axis, value: f32) {
        self.put(node, Channel::Scale, axis, value);
    }
}

/// Renderer that counts draws and backing-store resizes
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    scene: RecordingScene,
    backing: PhysicalSize,
    draws: u64,
    resizes: u64,
    last_aspect: Option<f32>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &RecordingScene {
        &self.scene
    }

    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn resize_count(&self) -> u64 {
        self.resizes
    }

    /// Camera aspect seen by the most recent draw
    pub fn last_aspect(&self) -> Option<f32> {
        self.last_aspect
    }
}

impl Renderer for HeadlessRenderer {
    type Scene = RecordingScene;

    fn scene_mut(&mut self) -> &mut RecordingScene {
        &mut self.scene
    }

    fn backing_size(&self) -> PhysicalSize {
        self.backing
    }

    fn set_backing_size(&mut self, size: PhysicalSize) {
        self.backing = size;
        self.resizes += 1;
    }

    fn draw(&mut self, camera: &Camera) {
        self.draws += 1;
        self.last_aspect = Some(camera.aspect());
    }
}

/// Configuration for a deterministic headless run
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Displayed width in logical pixels
    pub width: u32,
    /// Displayed height in logical pixels
    pub height: u32,
    pub device_pixel_ratio: f64,
    /// Frame budget
    pub max_frames: u32,
    /// Virtual milliseconds between frames
    pub tick_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            device_pixel_ratio: 1.0,
            max_frames: 600,
            tick_ms: 16,
        }
    }
}

impl HeadlessRunConfig {
    /// Reject budgets and surfaces no run can produce frames with
    pub fn validate(&self) -> astro_platform::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlatformError::InvalidConfig(
                "headless dimensions must be non-zero".to_string(),
            ));
        }
        if self.max_frames == 0 {
            return Err(PlatformError::InvalidConfig(
                "headless max_frames must be > 0".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(PlatformError::InvalidConfig(
                "headless tick_ms must be > 0".to_string(),
            ));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(PlatformError::InvalidConfig(format!(
                "headless device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        Ok(())
    }
}

/// Frame context passed to headless frame callbacks
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    /// 0-based index within the run
    pub frame_index: u32,
    pub width: u32,
    pub height: u32,
    pub elapsed_ms: u64,
}

/// Deterministic headless frame loop
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Drive `figure` for up to `cfg.max_frames` frames.
    ///
    /// Before each frame the virtual clock moves to the frame's start time and
    /// due deferred actions run. A frame only runs if one was requested, so
    /// the loop ends early once the figure stops. Returns the frames produced.
    pub fn run<R, F>(
        cfg: HeadlessRunConfig,
        figure: &mut Figure,
        renderer: &mut R,
        host: &mut HeadlessHost,
        mut on_frame: F,
    ) -> Result<u32>
    where
        R: Renderer,
        F: FnMut(&HeadlessContext, &FrameReport, &Figure, &R),
    {
        cfg.validate()?;

        host.set_metrics(DisplayMetrics::new(
            cfg.width as f32,
            cfg.height as f32,
            cfg.device_pixel_ratio,
        ));
        figure.start(host);

        let start_ms = host.now_ms();
        let frame_delta = Duration::from_millis(cfg.tick_ms);
        let mut produced = 0;

        for frame in 0..cfg.max_frames {
            let elapsed_ms = cfg.tick_ms.saturating_mul(frame as u64);
            host.advance_to(start_ms.saturating_add(elapsed_ms));

            if !host.take_frame_request() {
                tracing::debug!(frame, "no frame requested, ending run");
                break;
            }
            let delta = (frame > 0).then_some(frame_delta);
            let Some(report) = figure.tick(renderer, host, delta) else {
                break;
            };
            produced += 1;

            on_frame(
                &HeadlessContext {
                    frame_index: frame,
                    width: cfg.width,
                    height: cfg.height,
                    elapsed_ms,
                },
                &report,
                figure,
                renderer,
            );
        }

        tracing::debug!(frames = produced, "headless run finished");
        Ok(produced)
    }
}
