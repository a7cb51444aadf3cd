//! Hand-tilt gesture to octave shifts.
//!
//! [`OctaveTracker`] is a rate-limited, hysteretic gesture classifier, not an
//! orientation filter. Each update:
//!
//! 1. normalizes the raw gyro X reading, `(raw - bias) / scale`;
//! 2. smooths it with a trapezoidal average against the previous sample in a
//!    circular history, then subtracts a drift term proportional to uptime;
//! 3. integrates the smoothed rate into an angle with the trapezoid rule;
//! 4. lets the angle and the raw accelerometer X reading each vote for a
//!    direction; opposite votes cancel;
//! 5. applies at most one step per cooldown window, clamped to the octave range.
//!
//! Tilting right lowers the octave, tilting left raises it.

use crate::config::OctaveConfig;
use crate::constants::GYRO_HISTORY_SIZE;

/// Direction a tilt votes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tilt {
    Left,
    Right,
}

/// Integrates inertial readings into the current octave.
#[derive(Debug, Clone)]
pub struct OctaveTracker {
    config: OctaveConfig,
    octave: u8,
    history: [f32; GYRO_HISTORY_SIZE],
    cursor: usize,
    prev_filtered: f32,
    angle: f32,
    last_change: u32,
}

impl OctaveTracker {
    pub fn new(config: OctaveConfig) -> Self {
        OctaveTracker {
            octave: config.start,
            config,
            history: [0.0; GYRO_HISTORY_SIZE],
            cursor: 0,
            prev_filtered: 0.0,
            angle: 0.0,
            last_change: 0,
        }
    }

    /// Current octave, always within `[config.min, config.max]`.
    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Integrated gyro angle estimate.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Timestamp of the most recent octave change. Boot (`0`) counts as a
    /// change, so the first shift waits out one cooldown.
    pub fn last_change(&self) -> u32 {
        self.last_change
    }

    /// Fold one gyro/accel sample pair taken at `now` (ms) into the estimate
    /// and return the resulting octave.
    pub fn update(&mut self, gyro_raw: i16, accel_raw: i16, now: u32) -> u8 {
        let rate = (gyro_raw as f32 - self.config.gyro_bias) / self.config.gyro_scale;
        let filtered = self.trapezoidal_average(rate) - self.config.drift_per_ms * now as f32;
        self.angle += (filtered + self.prev_filtered) * 0.5 * self.config.dt;
        self.prev_filtered = filtered;

        let tilt = match self.votes(accel_raw) {
            (true, false) => Some(Tilt::Right),
            (false, true) => Some(Tilt::Left),
            _ => None,
        };

        if let Some(tilt) = tilt {
            if self.cooled_down(now) {
                self.step(tilt, now);
            }
        }
        self.octave
    }

    /// `(right, left)` votes from the angle and accelerometer thresholds.
    fn votes(&self, accel_raw: i16) -> (bool, bool) {
        let g = self.config.gyro_threshold;
        let a = self.config.accel_threshold;
        let right = self.angle > g || accel_raw > a;
        let left = self.angle < -g || accel_raw < a.saturating_neg();
        (right, left)
    }

    fn cooled_down(&self, now: u32) -> bool {
        now.wrapping_sub(self.last_change) > self.config.cooldown_ms
    }

    fn step(&mut self, tilt: Tilt, now: u32) {
        let next = match tilt {
            Tilt::Right if self.octave > self.config.min => self.octave - 1,
            Tilt::Left if self.octave < self.config.max => self.octave + 1,
            _ => return,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(from = self.octave, to = next, ?tilt, "octave change");

        self.octave = next;
        self.last_change = now;
    }

    fn trapezoidal_average(&mut self, value: f32) -> f32 {
        let prev = self.history[(self.cursor + GYRO_HISTORY_SIZE - 1) % GYRO_HISTORY_SIZE];
        self.history[self.cursor] = value;
        self.cursor = (self.cursor + 1) % GYRO_HISTORY_SIZE;
        (prev + value) * 0.5
    }
}

impl Default for OctaveTracker {
    fn default() -> Self {
        Self::new(OctaveConfig::default())
    }
}
