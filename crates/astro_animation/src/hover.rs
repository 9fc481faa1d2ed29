//! Idle hover motion

/// Sinusoidal vertical bob of the whole figure
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hover {
    /// Peak offset in scene units
    pub amplitude: f32,
    /// Angular frequency in radians per time unit
    pub frequency: f32,
}

impl Default for Hover {
    fn default() -> Self {
        Self {
            amplitude: 0.09,
            frequency: 1.0,
        }
    }
}

impl Hover {
    /// Vertical offset at time `t`; continuous, so it is written without damping
    pub fn offset(&self, t: f64) -> f32 {
        ((t * self.frequency as f64).sin() as f32) * self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_by_amplitude() {
        let hover = Hover::default();
        let mut t = 0.0;
        for _ in 0..1000 {
            assert!(hover.offset(t).abs() <= hover.amplitude + 1e-6);
            t += 0.015;
        }
        assert_eq!(hover.offset(0.0), 0.0);
        assert!((hover.offset(std::f64::consts::FRAC_PI_2) - 0.09).abs() < 1e-6);
    }
}
