//! Pose store
//!
//! Holds the current and target value of every animated attribute of the
//! figure. Field ownership is split between two writers:
//!
//! - `target` values are written by input mapping (the pointer tracker), and
//!   reset to neutral when the pointer leaves.
//! - `current` values are written only by the frame loop, through
//!   [`Tracked::approach`].
//!
//! Neither writer reads-modifies-writes the other's field, so pointer events
//! may interleave with frames at any point.

use crate::math::{Axis, Vec3};

/// A single animated value with a smoothed `current` and a desired `target`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tracked {
    current: f32,
    target: f32,
}

impl Tracked {
    /// Create a value at rest (current == target)
    pub const fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Close `blend` of the remaining distance to the target.
    ///
    /// `blend` must lie in (0, 1); values there never overshoot.
    /// Returns the change applied to `current`.
    pub fn approach(&mut self, blend: f32) -> f32 {
        let delta = (self.target - self.current) * blend;
        self.current += delta;
        delta
    }

    /// Distance still to cover
    pub fn remaining(&self) -> f32 {
        self.target - self.current
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.remaining().abs() <= epsilon
    }
}

/// Per-axis offset of one eye relative to its rest position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EyeOffset {
    pub x: Tracked,
    pub y: Tracked,
    pub z: Tracked,
}

impl EyeOffset {
    pub fn axis(&self, axis: Axis) -> &Tracked {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut Tracked {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    pub fn set_target(&mut self, target: Vec3) {
        for axis in Axis::ALL {
            self.axis_mut(axis).set_target(target.get(axis));
        }
    }

    pub fn approach(&mut self, blend: f32) {
        for axis in Axis::ALL {
            self.axis_mut(axis).approach(blend);
        }
    }

    pub fn current(&self) -> Vec3 {
        Vec3::new(self.x.current(), self.y.current(), self.z.current())
    }

    pub fn target(&self) -> Vec3 {
        Vec3::new(self.x.target(), self.y.target(), self.z.target())
    }
}

/// The complete animated state of one figure
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// Head rotation around the vertical axis (radians)
    pub head_yaw: Tracked,
    /// Head rotation around the horizontal axis (radians)
    pub head_pitch: Tracked,
    pub left_eye: EyeOffset,
    pub right_eye: EyeOffset,
    /// Idle hover offset of the whole figure; written directly each frame
    pub bob: f32,
}

impl Pose {
    /// Pose at rest with every target neutral
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn set_head_target(&mut self, yaw: f32, pitch: f32) {
        self.head_yaw.set_target(yaw);
        self.head_pitch.set_target(pitch);
    }

    /// Both eyes always follow the same offset target
    pub fn set_eye_target(&mut self, offset: Vec3) {
        self.left_eye.set_target(offset);
        self.right_eye.set_target(offset);
    }

    /// Reset every target to neutral; current values are left to settle
    pub fn reset_targets(&mut self) {
        self.set_head_target(0.0, 0.0);
        self.set_eye_target(Vec3::ZERO);
    }

    pub fn approach_head(&mut self, blend: f32) {
        self.head_yaw.approach(blend);
        self.head_pitch.approach(blend);
    }

    pub fn approach_eyes(&mut self, blend: f32) {
        self.left_eye.approach(blend);
        self.right_eye.approach(blend);
    }

    /// Check whether all tracked values are within `epsilon` of their targets
    pub fn is_settled(&self, epsilon: f32) -> bool {
        let eyes = [&self.left_eye, &self.right_eye];
        self.head_yaw.is_settled(epsilon)
            && self.head_pitch.is_settled(epsilon)
            && eyes
                .iter()
                .all(|eye| Axis::ALL.iter().all(|a| eye.axis(*a).is_settled(epsilon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_starts_at_rest() {
        let value = Tracked::new(1.5);
        assert_eq!(value.current(), 1.5);
        assert_eq!(value.target(), 1.5);
        assert!(value.is_settled(0.0));
    }

    #[test]
    fn test_approach_closes_fraction() {
        let mut value = Tracked::new(0.0);
        value.set_target(1.0);

        let delta = value.approach(0.25);
        assert!((delta - 0.25).abs() < 1e-6);
        assert!((value.current() - 0.25).abs() < 1e-6);

        value.approach(0.25);
        assert!((value.current() - 0.4375).abs() < 1e-6);
    }

    #[test]
    fn test_eye_target_applies_to_both_eyes() {
        let mut pose = Pose::neutral();
        pose.set_eye_target(Vec3::new(0.3, -0.2, -0.2));

        assert_eq!(pose.left_eye.target(), pose.right_eye.target());
        assert_eq!(pose.left_eye.target().z, -0.2);
        assert_eq!(pose.left_eye.current(), Vec3::ZERO);
    }

    #[test]
    fn test_reset_targets_leaves_current() {
        let mut pose = Pose::neutral();
        pose.set_head_target(0.2, 0.1);
        pose.approach_head(0.5);
        let yaw = pose.head_yaw.current();

        pose.reset_targets();
        assert_eq!(pose.head_yaw.target(), 0.0);
        assert_eq!(pose.head_pitch.target(), 0.0);
        assert_eq!(pose.head_yaw.current(), yaw);
        assert!(!pose.is_settled(1e-4));
    }
}
