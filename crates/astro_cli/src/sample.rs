//! Per-frame JSON samples printed by `astro simulate`

use astro_app::headless::{HeadlessContext, HeadlessRenderer};
use astro_app::{Figure, FrameReport};
use astro_core::Vec3;
use astro_platform::Renderer;
use serde::Serialize;

/// One sampled frame
#[derive(Debug, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub elapsed_ms: u64,
    pub time: f64,
    pub head: HeadSample,
    pub eyes: EyesSample,
    pub bob: f32,
    pub blink: BlinkSample,
    pub backing: [u32; 2],
    pub resized: bool,
}

#[derive(Debug, Serialize)]
pub struct HeadSample {
    pub yaw: f32,
    pub pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
}

#[derive(Debug, Serialize)]
pub struct EyesSample {
    /// Offsets from the rest position
    pub left: [f32; 3],
    pub right: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct BlinkSample {
    pub fired: bool,
    pub closed: bool,
    pub count: u64,
    pub elapsed: f32,
    pub threshold: f32,
}

fn components(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

impl FrameSample {
    pub fn capture(
        ctx: &HeadlessContext,
        report: &FrameReport,
        figure: &Figure,
        renderer: &HeadlessRenderer,
    ) -> Self {
        let pose = figure.pose();
        let blink = figure.blink();
        let backing = renderer.backing_size();

        Self {
            frame: report.frame,
            elapsed_ms: ctx.elapsed_ms,
            time: report.time,
            head: HeadSample {
                yaw: pose.head_yaw.current(),
                pitch: pose.head_pitch.current(),
                target_yaw: pose.head_yaw.target(),
                target_pitch: pose.head_pitch.target(),
            },
            eyes: EyesSample {
                left: components(pose.left_eye.current()),
                right: components(pose.right_eye.current()),
            },
            bob: pose.bob,
            blink: BlinkSample {
                fired: report.blinked,
                closed: report.eyes_closed,
                count: blink.blink_count(),
                elapsed: blink.elapsed(),
                threshold: blink.threshold(),
            },
            backing: [backing.width, backing.height],
            resized: report.resized,
        }
    }
}
