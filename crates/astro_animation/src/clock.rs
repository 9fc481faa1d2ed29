//! Frame clock
//!
//! Advances the figure's time accumulator once per frame. The default mode
//! adds a fixed nominal step per call regardless of wall-clock time, so the
//! animation speed follows the display refresh rate. `Measured` mode scales
//! the step by the real frame delta instead.

use std::time::Duration;

/// Time units added per frame in fixed mode
pub const DEFAULT_STEP: f64 = 0.015;

/// Refresh rate the fixed step was tuned for
pub const NOMINAL_FRAME_RATE: f64 = 60.0;

/// How the clock advances per frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockMode {
    /// Constant increment per frame
    Fixed { step: f64 },
    /// Increment proportional to the measured frame delta, capped at `max_step`
    Measured { units_per_second: f64, max_step: f64 },
}

impl Default for ClockMode {
    fn default() -> Self {
        ClockMode::Fixed { step: DEFAULT_STEP }
    }
}

impl ClockMode {
    /// Time units that elapse per second at the nominal frame rate
    pub fn units_per_second(&self) -> f64 {
        match *self {
            ClockMode::Fixed { step } => step * NOMINAL_FRAME_RATE,
            ClockMode::Measured {
                units_per_second, ..
            } => units_per_second,
        }
    }

    /// Time units covered by one nominal frame
    pub fn nominal_step(&self) -> f64 {
        self.units_per_second() / NOMINAL_FRAME_RATE
    }

    /// Wall-clock duration of `units` at the nominal rate.
    ///
    /// `None` when the result does not fit in a `Duration` (a vanishingly
    /// small step makes even short intervals last longer than `u64` seconds).
    pub fn units_to_duration(&self, units: f64) -> Option<Duration> {
        let ups = self.units_per_second();
        if ups <= 0.0 || !units.is_finite() || units <= 0.0 {
            return Some(Duration::ZERO);
        }
        Duration::try_from_secs_f64(units / ups).ok()
    }
}

/// Result of advancing the clock by one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStep {
    /// Time units added this frame
    pub units: f64,
    /// Equivalent number of nominal frames (1.0 in fixed mode)
    pub frames: f32,
}

/// Monotonic per-figure time accumulator
#[derive(Clone, Debug)]
pub struct FrameClock {
    mode: ClockMode,
    time: f64,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            time: 0.0,
            frame_index: 0,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Accumulated time in time units
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of frames advanced so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advance by one frame.
    ///
    /// `frame_delta` is the measured wall-clock time since the previous frame;
    /// it is ignored in fixed mode. Measured mode without a delta advances by
    /// one nominal frame.
    pub fn advance(&mut self, frame_delta: Option<Duration>) -> FrameStep {
        let step = match self.mode {
            ClockMode::Fixed { step } => FrameStep {
                units: step,
                frames: 1.0,
            },
            ClockMode::Measured {
                units_per_second,
                max_step,
            } => {
                let nominal = self.mode.nominal_step();
                let units = match frame_delta {
                    Some(delta) => (delta.as_secs_f64() * units_per_second).min(max_step),
                    None => nominal,
                };
                let frames = if nominal > 0.0 { units / nominal } else { 0.0 };
                FrameStep {
                    units,
                    frames: frames as f32,
                }
            }
        };

        self.time += step.units;
        self.frame_index += 1;
        step
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(ClockMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_mode_ignores_delta() {
        let mut clock = FrameClock::default();
        let step = clock.advance(Some(Duration::from_millis(250)));

        assert_eq!(step.units, DEFAULT_STEP);
        assert_eq!(step.frames, 1.0);
        assert_eq!(clock.frame_index(), 1);

        for _ in 0..99 {
            clock.advance(None);
        }
        assert!((clock.time() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_measured_mode_scales_and_caps() {
        let mut clock = FrameClock::new(ClockMode::Measured {
            units_per_second: 0.9,
            max_step: 0.045,
        });

        let half = clock.advance(Some(Duration::from_secs_f64(1.0 / 120.0)));
        assert!((half.units - 0.0075).abs() < 1e-9);
        assert!((half.frames - 0.5).abs() < 1e-4);

        // A long stall is capped to three nominal frames
        let stalled = clock.advance(Some(Duration::from_secs(2)));
        assert!((stalled.units - 0.045).abs() < 1e-9);
        assert!((stalled.frames - 3.0).abs() < 1e-4);

        let nominal = clock.advance(None);
        assert!((nominal.units - 0.015).abs() < 1e-9);
    }

    #[test]
    fn test_units_to_duration() {
        let mode = ClockMode::default();
        // 0.9 units per second at 60 Hz
        let d = mode.units_to_duration(0.9).unwrap();
        assert!((d.as_secs_f64() - 1.0).abs() < 1e-9);
        assert_eq!(mode.units_to_duration(-1.0), Some(Duration::ZERO));
    }

    #[test]
    fn test_units_to_duration_overflow() {
        let mode = ClockMode::Fixed { step: 1e-300 };
        assert_eq!(mode.units_to_duration(2.0), None);
    }
}
