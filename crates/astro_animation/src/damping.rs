//! Exponential damping
//!
//! Every tracked attribute moves toward its target with
//! `current += (target - current) * k`, closing the fraction `k` of the
//! remaining distance each frame. For `k` in (0, 1) this converges
//! monotonically and never overshoots.

/// Check that a blend constant lies strictly inside (0, 1)
pub fn is_valid_blend(blend: f32) -> bool {
    blend.is_finite() && blend > 0.0 && blend < 1.0
}

/// Blend constant to use for a step worth `frames` nominal frames.
///
/// Closing `k` per frame for `n` frames leaves `(1 - k)^n` of the distance,
/// so the equivalent single-step blend is `1 - (1 - k)^n`. With one frame this
/// is exactly `k`.
pub fn frame_blend(blend: f32, frames: f32) -> f32 {
    if frames == 1.0 {
        return blend;
    }
    if frames <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - blend).powf(frames)
}

/// Frames needed to halve the remaining distance
pub fn half_life_frames(blend: f32) -> f32 {
    std::f32::consts::LN_2 / -(1.0 - blend).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use astro_core::pose::Tracked;

    #[test]
    fn test_converges_without_overshoot() {
        for blend in [0.01, 0.12, 0.2, 0.5, 0.9, 0.99] {
            let mut value = Tracked::new(0.0);
            value.set_target(-0.28);

            let mut previous_gap = value.remaining().abs();
            for _ in 0..2000 {
                value.approach(blend);
                let gap = value.remaining().abs();
                assert!(gap <= previous_gap, "gap grew for blend {blend}");
                assert!(value.current() >= -0.28 - 1e-6, "overshoot for blend {blend}");
                previous_gap = gap;
            }
            assert!(value.is_settled(1e-4), "blend {blend} did not settle");
        }
    }

    #[test]
    fn test_half_life() {
        let blend = 0.12;
        let frames = half_life_frames(blend).ceil() as usize;

        let mut value = Tracked::new(0.0);
        value.set_target(1.0);
        for _ in 0..frames {
            value.approach(blend);
        }
        assert!(value.current() >= 0.5);
        assert!(value.current() < 0.6);
    }

    #[test]
    fn test_frame_blend_matches_repeated_steps() {
        let blend = 0.2;
        let mut stepped = Tracked::new(0.0);
        stepped.set_target(1.0);
        stepped.approach(blend);
        stepped.approach(blend);

        let mut combined = Tracked::new(0.0);
        combined.set_target(1.0);
        combined.approach(frame_blend(blend, 2.0));

        assert!((stepped.current() - combined.current()).abs() < 1e-5);
        assert_eq!(frame_blend(blend, 1.0), blend);
        assert_eq!(frame_blend(blend, 0.0), 0.0);
    }

    #[test]
    fn test_valid_blend_range() {
        assert!(is_valid_blend(0.12));
        assert!(!is_valid_blend(0.0));
        assert!(!is_valid_blend(1.0));
        assert!(!is_valid_blend(f32::NAN));
    }
}
