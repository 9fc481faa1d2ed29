//! Pointer tracking
//!
//! Maps absolute pointer coordinates to head and eye targets. This module
//! never smooths anything: it only writes targets, and the frame loop damps
//! the pose toward them. Gains and blend constants can therefore be tuned
//! independently.

use astro_core::math::Vec3;
use astro_core::pose::Pose;
use astro_core::PointerPosition;

/// Scale factors from normalized pointer coordinates to pose targets
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingGains {
    /// Radians of head yaw at the viewport's horizontal edge
    pub head_yaw: f32,
    /// Radians of head pitch at the viewport's vertical edge
    pub head_pitch: f32,
    /// Horizontal eye offset at the edge (scene units)
    pub eye_x: f32,
    /// Vertical eye offset at the edge; also drives the depth axis
    pub eye_y: f32,
}

impl Default for TrackingGains {
    fn default() -> Self {
        Self {
            head_yaw: 0.28,
            head_pitch: 0.18,
            eye_x: 0.32,
            eye_y: 0.20,
        }
    }
}

/// Targets derived from the latest pointer position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTarget {
    pub yaw: f32,
    pub pitch: f32,
    pub eye_offset_x: f32,
    pub eye_offset_y: f32,
    pub eye_offset_z: f32,
}

impl PointerTarget {
    pub const NEUTRAL: PointerTarget = PointerTarget {
        yaw: 0.0,
        pitch: 0.0,
        eye_offset_x: 0.0,
        eye_offset_y: 0.0,
        eye_offset_z: 0.0,
    };

    pub fn eye_offset(&self) -> Vec3 {
        Vec3::new(self.eye_offset_x, self.eye_offset_y, self.eye_offset_z)
    }
}

/// Map a pointer position to screen-space coordinates in [-1, 1].
///
/// `x` grows to the right and `y` grows downward, matching the host's pixel
/// coordinates. Positions outside the viewport are clamped to the edge; a
/// degenerate viewport maps everything to the center.
pub fn normalize(position: PointerPosition, width: f32, height: f32) -> (f32, f32) {
    let axis = |value: f32, extent: f32| {
        if !(extent.is_finite() && extent > 0.0) || !value.is_finite() {
            return 0.0;
        }
        ((value / extent - 0.5) * 2.0).clamp(-1.0, 1.0)
    };
    (axis(position.x, width), axis(position.y, height))
}

/// Converts pointer input into pose targets
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    gains: TrackingGains,
    target: PointerTarget,
}

impl PointerTracker {
    pub fn new(gains: TrackingGains) -> Self {
        Self {
            gains,
            target: PointerTarget::NEUTRAL,
        }
    }

    pub fn gains(&self) -> TrackingGains {
        self.gains
    }

    /// Latest targets
    pub fn target(&self) -> PointerTarget {
        self.target
    }

    /// Recompute targets for a pointer position within a `width` x `height` viewport
    pub fn pointer_moved(
        &mut self,
        position: PointerPosition,
        width: f32,
        height: f32,
    ) -> PointerTarget {
        let (nx, ny) = normalize(position, width, height);
        // Screen y grows downward; pointer above center should tilt up
        let up = -ny;
        let eye_y = up * self.gains.eye_y;

        self.target = PointerTarget {
            yaw: nx * self.gains.head_yaw,
            pitch: up * self.gains.head_pitch,
            eye_offset_x: nx * self.gains.eye_x,
            eye_offset_y: eye_y,
            eye_offset_z: eye_y,
        };
        self.target
    }

    /// Pointer left the viewport: every target returns to neutral
    pub fn pointer_left(&mut self) {
        self.target = PointerTarget::NEUTRAL;
    }

    /// Write the latest targets into the pose; current values are untouched
    pub fn apply_to(&self, pose: &mut Pose) {
        pose.set_head_target(self.target.yaw, self.target.pitch);
        pose.set_eye_target(self.target.eye_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    #[test]
    fn test_normalize_corners_and_center() {
        assert_eq!(normalize(PointerPosition::new(0.0, 0.0), W, H), (-1.0, -1.0));
        assert_eq!(normalize(PointerPosition::new(W, H), W, H), (1.0, 1.0));
        assert_eq!(normalize(PointerPosition::new(400.0, 300.0), W, H), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_clamps_and_degenerate() {
        assert_eq!(
            normalize(PointerPosition::new(-200.0, 1200.0), W, H),
            (-1.0, 1.0)
        );
        assert_eq!(normalize(PointerPosition::new(10.0, 10.0), 0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_top_left_corner_targets() {
        let mut tracker = PointerTracker::default();
        let target = tracker.pointer_moved(PointerPosition::new(0.0, 0.0), W, H);

        assert!((target.yaw + 0.28).abs() < 1e-6);
        assert!((target.pitch - 0.18).abs() < 1e-6);
        assert!((target.eye_offset_x + 0.32).abs() < 1e-6);
        assert!((target.eye_offset_y - 0.20).abs() < 1e-6);
        assert_eq!(target.eye_offset_z, target.eye_offset_y);
    }

    #[test]
    fn test_targets_linear_and_bounded() {
        let gains = TrackingGains::default();
        let mut tracker = PointerTracker::new(gains);

        for step in 0..=16 {
            let x = W * step as f32 / 16.0;
            let y = H * (16 - step) as f32 / 16.0;
            let target = tracker.pointer_moved(PointerPosition::new(x, y), W, H);
            let (nx, ny) = normalize(PointerPosition::new(x, y), W, H);

            assert!(target.yaw.abs() <= gains.head_yaw + 1e-6);
            assert!(target.pitch.abs() <= gains.head_pitch + 1e-6);
            assert!((target.yaw - nx * gains.head_yaw).abs() < 1e-6);
            assert!((target.pitch + ny * gains.head_pitch).abs() < 1e-6);
        }
    }

    #[test]
    fn test_leave_resets_to_neutral() {
        let mut tracker = PointerTracker::default();
        tracker.pointer_moved(PointerPosition::new(700.0, 50.0), W, H);
        assert_ne!(tracker.target(), PointerTarget::NEUTRAL);

        tracker.pointer_left();
        assert_eq!(tracker.target(), PointerTarget::NEUTRAL);
    }

    #[test]
    fn test_apply_writes_only_targets() {
        let mut tracker = PointerTracker::default();
        let mut pose = Pose::neutral();
        tracker.pointer_moved(PointerPosition::new(W, 0.0), W, H);
        tracker.apply_to(&mut pose);

        assert!((pose.head_yaw.target() - 0.28).abs() < 1e-6);
        assert_eq!(pose.head_yaw.current(), 0.0);
        assert_eq!(pose.left_eye.target(), pose.right_eye.target());
        assert_eq!(pose.left_eye.current().x, 0.0);
    }
}
