//! Figure configuration file handling
//!
//! Every tunable of the frame loop lives here, grouped by the component that
//! consumes it. All sections are optional in TOML and fall back to the values
//! the figure was designed with.
//!
//! ```toml
//! [motion]
//! head_blend = 0.12
//! eye_blend = 0.2
//!
//! [blink]
//! min_interval = 2.0
//! max_interval = 6.0
//! dwell_ms = 120
//! ```

use crate::error::{ConfigError, Result};
use astro_animation::clock::{ClockMode, DEFAULT_STEP, NOMINAL_FRAME_RATE};
use astro_animation::damping::is_valid_blend;
use astro_animation::{BlinkTiming, Hover, TrackingGains};
use astro_platform::{Camera, ViewportSync};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level figure configuration (astro.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FigureConfig {
    pub clock: ClockConfig,
    pub motion: MotionConfig,
    pub tracking: TrackingConfig,
    pub blink: BlinkConfig,
    pub viewport: ViewportConfig,
}

/// How the time accumulator advances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Constant step per frame
    #[default]
    Fixed,
    /// Step scaled by measured frame delta
    Measured,
}

/// Frame clock configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    pub mode: ClockKind,
    /// Time units per nominal (60 Hz) frame
    pub step: f64,
    /// Largest step a single measured frame may take
    pub max_step: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            mode: ClockKind::Fixed,
            step: DEFAULT_STEP,
            max_step: DEFAULT_STEP * 3.0,
        }
    }
}

/// Damping and idle motion
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of remaining head rotation closed per frame
    pub head_blend: f32,
    /// Fraction of remaining eye offset closed per frame
    pub eye_blend: f32,
    pub hover_amplitude: f32,
    pub hover_frequency: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        let hover = Hover::default();
        Self {
            head_blend: 0.12,
            eye_blend: 0.20,
            hover_amplitude: hover.amplitude,
            hover_frequency: hover.frequency,
        }
    }
}

/// Pointer-to-target gains
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub head_yaw_gain: f32,
    pub head_pitch_gain: f32,
    pub eye_x_gain: f32,
    pub eye_y_gain: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let gains = TrackingGains::default();
        Self {
            head_yaw_gain: gains.head_yaw,
            head_pitch_gain: gains.head_pitch,
            eye_x_gain: gains.eye_x,
            eye_y_gain: gains.eye_y,
        }
    }
}

/// Blink cycle
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Shortest open interval in time units
    pub min_interval: f32,
    /// Longest open interval in time units
    pub max_interval: f32,
    /// How long the eyes stay closed
    pub dwell_ms: u64,
    /// Vertical eye scale while closed
    pub closed_scale: f32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        let timing = BlinkTiming::default();
        Self {
            min_interval: timing.min_interval,
            max_interval: timing.max_interval,
            dwell_ms: timing.dwell.as_millis() as u64,
            closed_scale: 0.08,
        }
    }
}

/// Viewport fallback and camera
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Displayed width assumed while the surface has no layout
    pub fallback_width: f32,
    /// Displayed height assumed while the surface has no layout
    pub fallback_height: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fallback_width: 320.0,
            fallback_height: 320.0,
            fov_degrees: 38.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl FigureConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded figure config");
        Ok(config)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FigureConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to a file as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every invariant the frame loop relies on
    pub fn validate(&self) -> Result<()> {
        let step = self.clock.step;
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::InvalidClockStep(step));
        }
        if self.clock.mode == ClockKind::Measured
            && !(self.clock.max_step.is_finite() && self.clock.max_step >= step)
        {
            return Err(ConfigError::InvalidClockStep(self.clock.max_step));
        }

        for (name, value) in [
            ("motion.head_blend", self.motion.head_blend),
            ("motion.eye_blend", self.motion.eye_blend),
        ] {
            if !is_valid_blend(value) {
                return Err(ConfigError::InvalidBlend { name, value });
            }
        }

        for (name, value) in [
            ("motion.hover_amplitude", self.motion.hover_amplitude),
            ("motion.hover_frequency", self.motion.hover_frequency),
            ("tracking.head_yaw_gain", self.tracking.head_yaw_gain),
            ("tracking.head_pitch_gain", self.tracking.head_pitch_gain),
            ("tracking.eye_x_gain", self.tracking.eye_x_gain),
            ("tracking.eye_y_gain", self.tracking.eye_y_gain),
            ("blink.closed_scale", self.blink.closed_scale),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        let BlinkConfig {
            min_interval,
            max_interval,
            dwell_ms,
            ..
        } = self.blink;
        if !(min_interval.is_finite() && max_interval.is_finite())
            || min_interval <= 0.0
            || max_interval < min_interval
        {
            return Err(ConfigError::InvalidInterval {
                min: min_interval,
                max: max_interval,
            });
        }

        // Dwell must fit inside the shortest interval at the nominal rate.
        // Faster displays are covered by the scheduler not counting closed time.
        let min_interval_time = self
            .clock_mode()
            .units_to_duration(min_interval as f64)
            .ok_or(ConfigError::InvalidClockStep(step))?;
        if Duration::from_millis(dwell_ms) >= min_interval_time {
            return Err(ConfigError::DwellTooLong {
                dwell_ms,
                min_interval_ms: min_interval_time.as_millis() as u64,
            });
        }

        let vp = &self.viewport;
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !(positive(vp.fallback_width) && positive(vp.fallback_height)) {
            return Err(ConfigError::InvalidFallback {
                width: vp.fallback_width,
                height: vp.fallback_height,
            });
        }
        if !(positive(vp.fov_degrees) && vp.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidCamera(format!(
                "fov {} must be in (0, 180)",
                vp.fov_degrees
            )));
        }
        if !(positive(vp.near) && vp.far.is_finite() && vp.far > vp.near) {
            return Err(ConfigError::InvalidCamera(format!(
                "clip range {}..{} is invalid",
                vp.near, vp.far
            )));
        }

        Ok(())
    }

    pub fn clock_mode(&self) -> ClockMode {
        match self.clock.mode {
            ClockKind::Fixed => ClockMode::Fixed {
                step: self.clock.step,
            },
            ClockKind::Measured => ClockMode::Measured {
                units_per_second: self.clock.step * NOMINAL_FRAME_RATE,
                max_step: self.clock.max_step,
            },
        }
    }

    pub fn hover(&self) -> Hover {
        Hover {
            amplitude: self.motion.hover_amplitude,
            frequency: self.motion.hover_frequency,
        }
    }

    pub fn tracking_gains(&self) -> TrackingGains {
        TrackingGains {
            head_yaw: self.tracking.head_yaw_gain,
            head_pitch: self.tracking.head_pitch_gain,
            eye_x: self.tracking.eye_x_gain,
            eye_y: self.tracking.eye_y_gain,
        }
    }

    pub fn blink_timing(&self) -> BlinkTiming {
        BlinkTiming {
            min_interval: self.blink.min_interval,
            max_interval: self.blink.max_interval,
            dwell: Duration::from_millis(self.blink.dwell_ms),
        }
    }

    pub fn camera(&self) -> Camera {
        let vp = &self.viewport;
        Camera::new(vp.fov_degrees, 1.0, vp.near, vp.far)
    }

    pub fn viewport_sync(&self) -> ViewportSync {
        ViewportSync::new(self.viewport.fallback_width, self.viewport.fallback_height)
    }
}
