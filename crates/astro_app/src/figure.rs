//! Animation loop controller
//!
//! [`Figure`] owns all animation state of one character and turns it into a
//! pose every frame. Per tick it:
//!
//! 1. reconciles the viewport with the displayed size,
//! 2. advances the frame clock,
//! 3. lets the blink scheduler fire (closing both eyes and arming a deferred
//!    restore with the host),
//! 4. reads the pointer tracker's latest targets,
//! 5. writes the hover bob and damps head and eyes toward their targets,
//! 6. writes the pose onto the scene and draws,
//! 7. asks the host for the next frame unless stopped.
//!
//! Pointer input only writes targets; `tick` is the only writer of current
//! values.

use crate::config::FigureConfig;
use crate::error::Result;
use astro_animation::damping::frame_blend;
use astro_animation::{BlinkScheduler, FrameClock, Hover, PointerTracker};
use astro_core::math::{Axis, Vec3};
use astro_core::pose::{EyeOffset, Pose};
use astro_core::{PointerEvent, PointerPosition};
use astro_platform::viewport::ViewportDescriptor;
use astro_platform::{
    Camera, DisplayMetrics, FigureNode, Host, HostScheduler, MetricsSource, Renderer, SceneGraph,
    TimerHandle, ViewportSync,
};
use std::time::Duration;

/// Rest positions the eye offsets are relative to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasePose {
    pub left_eye: Vec3,
    pub right_eye: Vec3,
}

impl Default for BasePose {
    fn default() -> Self {
        Self {
            left_eye: Vec3::new(-0.18, 0.22, 0.9),
            right_eye: Vec3::new(0.18, 0.22, 0.9),
        }
    }
}

/// What happened during one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// 1-based index of the frame just produced
    pub frame: u64,
    /// Clock time after this frame, in time units
    pub time: f64,
    /// A blink fired this frame
    pub blinked: bool,
    /// Eyes were drawn closed this frame
    pub eyes_closed: bool,
    /// The backing store was resized this frame
    pub resized: bool,
}

/// One animated figure and its per-frame controller
pub struct Figure {
    pose: Pose,
    base: BasePose,
    clock: FrameClock,
    hover: Hover,
    blink: BlinkScheduler,
    tracker: PointerTracker,
    viewport: ViewportSync,
    camera: Camera,
    head_blend: f32,
    eye_blend: f32,
    closed_scale: f32,
    pending_restore: Option<TimerHandle>,
    running: bool,
    stopped: bool,
}

impl Figure {
    /// Create a figure with an entropy-seeded blink schedule
    pub fn new(config: &FigureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            config,
            BlinkScheduler::from_entropy(config.blink_timing()),
        ))
    }

    /// Create a figure with a reproducible blink schedule
    pub fn with_seed(config: &FigureConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            config,
            BlinkScheduler::with_seed(config.blink_timing(), seed),
        ))
    }

    fn build(config: &FigureConfig, blink: BlinkScheduler) -> Self {
        Self {
            pose: Pose::neutral(),
            base: BasePose::default(),
            clock: FrameClock::new(config.clock_mode()),
            hover: config.hover(),
            blink,
            tracker: PointerTracker::new(config.tracking_gains()),
            viewport: config.viewport_sync(),
            camera: config.camera(),
            head_blend: config.motion.head_blend,
            eye_blend: config.motion.eye_blend,
            closed_scale: config.blink.closed_scale,
            pending_restore: None,
            running: false,
            stopped: false,
        }
    }

    /// Use custom eye rest positions
    pub fn with_base_pose(mut self, base: BasePose) -> Self {
        self.base = base;
        self
    }

    /// Pin every blink interval (deterministic runs)
    pub fn with_blink_threshold(mut self, threshold: f32) -> Self {
        self.blink.set_fixed_threshold(threshold);
        self
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn base_pose(&self) -> BasePose {
        self.base
    }

    pub fn blink(&self) -> &BlinkScheduler {
        &self.blink
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> &ViewportSync {
        &self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Request the first frame
    pub fn start<H: HostScheduler + ?Sized>(&mut self, host: &mut H) {
        if self.stopped || self.running {
            return;
        }
        self.running = true;
        host.request_frame();
        tracing::info!("figure animation started");
    }

    /// Produce one frame. Returns `None` once the figure has been stopped.
    pub fn tick<R, H>(
        &mut self,
        renderer: &mut R,
        host: &mut H,
        frame_delta: Option<Duration>,
    ) -> Option<FrameReport>
    where
        R: Renderer,
        H: Host + ?Sized,
    {
        if self.stopped {
            return None;
        }

        let resized = self
            .viewport
            .sync(host.display_metrics(), renderer, &mut self.camera);

        let step = self.clock.advance(frame_delta);

        let blinked = match self.blink.update(step.units as f32) {
            Some(event) => {
                if let Some(previous) = self.pending_restore.take() {
                    host.cancel(previous);
                }
                let handle = host.schedule_after(event.dwell, event.restore.into_action());
                self.pending_restore = Some(handle);
                true
            }
            None => false,
        };
        let eyes_closed = self.blink.is_closed();
        if !eyes_closed {
            self.pending_restore = None;
        }

        self.tracker.apply_to(&mut self.pose);

        self.pose.bob = self.hover.offset(self.clock.time());
        self.pose
            .approach_head(frame_blend(self.head_blend, step.frames));
        self.pose
            .approach_eyes(frame_blend(self.eye_blend, step.frames));

        self.write_scene(renderer.scene_mut(), eyes_closed);
        renderer.draw(&self.camera);

        if self.running {
            host.request_frame();
        }

        let report = FrameReport {
            frame: self.clock.frame_index(),
            time: self.clock.time(),
            blinked,
            eyes_closed,
            resized,
        };
        tracing::trace!(?report, "frame");
        Some(report)
    }

    fn write_scene<S: SceneGraph + ?Sized>(&self, scene: &mut S, eyes_closed: bool) {
        scene.set_translation(FigureNode::Root, Axis::Y, self.pose.bob);
        scene.set_rotation(FigureNode::Head, Axis::Y, self.pose.head_yaw.current());
        scene.set_rotation(FigureNode::Head, Axis::X, self.pose.head_pitch.current());

        let eye_scale = if eyes_closed { self.closed_scale } else { 1.0 };
        let eyes: [(FigureNode, Vec3, &EyeOffset); 2] = [
            (FigureNode::LeftEye, self.base.left_eye, &self.pose.left_eye),
            (FigureNode::RightEye, self.base.right_eye, &self.pose.right_eye),
        ];
        for (node, rest, offset) in eyes {
            let position = rest + offset.current();
            for axis in Axis::ALL {
                scene.set_translation(node, axis, position.get(axis));
            }
            scene.set_scale(node, Axis::Y, eye_scale);
        }
    }

    /// Pointer moved to `(x, y)` logical pixels within the host's viewport
    pub fn pointer_moved<M: MetricsSource + ?Sized>(&mut self, x: f32, y: f32, host: &M) {
        self.pointer_moved_in(PointerPosition::new(x, y), host.display_metrics());
    }

    fn pointer_moved_in(&mut self, position: PointerPosition, metrics: DisplayMetrics) {
        let viewport = ViewportDescriptor::resolve(metrics, self.viewport.fallback());
        self.tracker
            .pointer_moved(position, viewport.width, viewport.height);
    }

    /// Pointer left the viewport; the pose eases back to rest
    pub fn pointer_left(&mut self) {
        self.tracker.pointer_left();
    }

    /// Route a pointer event. Returns true if the figure consumed it.
    pub fn handle_event<M: MetricsSource + ?Sized>(
        &mut self,
        event: &PointerEvent,
        metrics: &M,
    ) -> bool {
        match *event {
            PointerEvent::Move(position) => {
                self.pointer_moved_in(position, metrics.display_metrics());
                true
            }
            PointerEvent::Leave => {
                self.pointer_left();
                true
            }
            PointerEvent::Click(_) => false,
        }
    }

    /// Halt the loop and cancel any pending blink restore
    pub fn stop<H: HostScheduler + ?Sized>(&mut self, host: &mut H) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.running = false;

        if let Some(handle) = self.pending_restore.take() {
            host.cancel(handle);
        }
        self.blink.cancel_pending();

        tracing::info!(frames = self.clock.frame_index(), "figure animation stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessHost, HeadlessRenderer};

    fn figure() -> Figure {
        Figure::with_seed(&FigureConfig::default(), 3).unwrap()
    }

    #[test]
    fn test_tick_writes_pose_and_draws() {
        let mut figure = figure();
        let mut renderer = HeadlessRenderer::new();
        let mut host = HeadlessHost::new(DisplayMetrics::new(160.0, 160.0, 2.0));

        figure.start(&mut host);
        let report = figure.tick(&mut renderer, &mut host, None).unwrap();

        assert_eq!(report.frame, 1);
        assert!(report.resized);
        assert!(!report.blinked);
        assert_eq!(renderer.draw_count(), 1);
        assert_eq!(host.frame_requests(), 2);

        let scene = renderer.scene();
        let bob = scene.translation(FigureNode::Root, Axis::Y).unwrap();
        assert!((bob - (0.015f64.sin() as f32) * 0.09).abs() < 1e-6);
        assert_eq!(scene.translation(FigureNode::LeftEye, Axis::X), Some(-0.18));
        assert_eq!(scene.scale(FigureNode::RightEye, Axis::Y), Some(1.0));
    }

    #[test]
    fn test_pointer_only_moves_targets() {
        let mut figure = figure();
        let host = HeadlessHost::new(DisplayMetrics::new(800.0, 600.0, 1.0));

        figure.handle_event(&PointerEvent::moved(0.0, 0.0), &host);
        assert!((figure.pose().head_yaw.target() - 0.0).abs() < 1e-6);
        assert!((figure.tracker().target().yaw + 0.28).abs() < 1e-6);
        assert_eq!(figure.pose().head_yaw.current(), 0.0);
    }

    #[test]
    fn test_stop_halts_frames() {
        let mut figure = figure();
        let mut renderer = HeadlessRenderer::new();
        let mut host = HeadlessHost::new(DisplayMetrics::new(100.0, 100.0, 1.0));

        figure.start(&mut host);
        figure.tick(&mut renderer, &mut host, None);
        figure.stop(&mut host);
        let requests = host.frame_requests();

        assert!(figure.tick(&mut renderer, &mut host, None).is_none());
        assert_eq!(host.frame_requests(), requests);
        assert_eq!(renderer.draw_count(), 1);
        assert!(!figure.is_running());

        // Cannot be restarted
        figure.start(&mut host);
        assert!(!figure.is_running());
    }

    #[test]
    fn test_click_not_consumed() {
        let mut figure = figure();
        let host = HeadlessHost::new(DisplayMetrics::new(100.0, 100.0, 1.0));
        assert!(!figure.handle_event(&PointerEvent::Click(PointerPosition::new(1.0, 1.0)), &host));
        assert!(figure.handle_event(&PointerEvent::Leave, &host));
    }
}
