//! Runtime configuration: per-finger calibration and gesture tuning.
//!
//! Every type here has a `Default` that reproduces the production firmware.
//! Configuration is fixed once the [`Pipeline`](crate::pipeline::Pipeline)
//! is built; nothing in the real-time path mutates it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    ADC_MAX, DRIFT_CORRECTION_X, GYRO_BIAS, GYRO_DT, GYRO_SCALE, NOISE_THRESHOLD, NOTE_AMPLITUDE,
    NUM_OCTAVES, OCTAVE_CHANGE_COOLDOWN_MS, OCTAVE_MAX, OCTAVE_MIN, OCTAVE_THRESHOLD_ACCEL,
    OCTAVE_THRESHOLD_GYRO, PRESS_DEBOUNCE_MS, SOUND_DURATION_MS, STARTING_OCTAVE,
};
use crate::error::ConfigError;
use crate::finger::{Finger, FingerMap};

/// Peak thresholds for one finger.
///
/// Peaks above `white` are firm presses, peaks in `(black, white]` gentle ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds {
    pub black: u16,
    pub white: u16,
}

impl Thresholds {
    pub const fn new(black: u16, white: u16) -> Self {
        Thresholds { black, white }
    }

    /// Derive thresholds from recorded press peaks: the mean of the gentle
    /// presses becomes the black threshold, the mean of the firm ones the white.
    pub fn from_presses(soft: &[u16], hard: &[u16]) -> Result<Self, ConfigError> {
        let black = mean(soft).ok_or(ConfigError::NoPresses)?;
        let white = mean(hard).ok_or(ConfigError::NoPresses)?;
        let thresholds = Thresholds { black, white };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.white > ADC_MAX {
            return Err(ConfigError::ThresholdRange { value: self.white });
        }
        if self.black >= self.white {
            return Err(ConfigError::ThresholdOrder {
                black: self.black,
                white: self.white,
            });
        }
        Ok(())
    }
}

fn mean(peaks: &[u16]) -> Option<u16> {
    if peaks.is_empty() {
        return None;
    }
    let sum: u32 = peaks.iter().map(|&p| p as u32).sum();
    Some((sum / peaks.len() as u32) as u16)
}

/// Per-finger thresholds, immutable once the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationProfile {
    thresholds: FingerMap<Thresholds>,
}

impl CalibrationProfile {
    /// Build a profile, rejecting any finger whose thresholds overlap or
    /// exceed the ADC range.
    pub fn new(thresholds: FingerMap<Thresholds>) -> Result<Self, ConfigError> {
        for (_, t) in thresholds.iter() {
            t.validate()?;
        }
        Ok(CalibrationProfile { thresholds })
    }

    pub fn thresholds(&self, finger: Finger) -> Thresholds {
        self.thresholds[finger]
    }
}

impl Default for CalibrationProfile {
    /// Thresholds measured on the prototype glove.
    fn default() -> Self {
        CalibrationProfile {
            thresholds: FingerMap::new([
                Thresholds::new(50, 110),
                Thresholds::new(60, 130),
                Thresholds::new(50, 60),
                Thresholds::new(70, 300),
                Thresholds::new(50, 170),
                Thresholds::new(55, 80),
                Thresholds::new(55, 100),
            ]),
        }
    }
}

/// Tuning of the tilt gesture that shifts octaves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OctaveConfig {
    pub gyro_bias: f32,
    pub gyro_scale: f32,
    /// Drift subtracted per millisecond of uptime.
    pub drift_per_ms: f32,
    /// Integration step in seconds.
    pub dt: f32,
    pub gyro_threshold: f32,
    pub accel_threshold: i16,
    pub cooldown_ms: u32,
    pub min: u8,
    pub max: u8,
    pub start: u8,
}

impl OctaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.min <= self.start
            && self.start <= self.max
            && (self.max as usize) < NUM_OCTAVES;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::OctaveRange {
                min: self.min,
                max: self.max,
                start: self.start,
            })
        }
    }
}

impl Default for OctaveConfig {
    fn default() -> Self {
        OctaveConfig {
            gyro_bias: GYRO_BIAS,
            gyro_scale: GYRO_SCALE,
            drift_per_ms: DRIFT_CORRECTION_X,
            dt: GYRO_DT,
            gyro_threshold: OCTAVE_THRESHOLD_GYRO,
            accel_threshold: OCTAVE_THRESHOLD_ACCEL,
            cooldown_ms: OCTAVE_CHANGE_COOLDOWN_MS,
            min: OCTAVE_MIN,
            max: OCTAVE_MAX,
            start: STARTING_OCTAVE,
        }
    }
}

/// Everything the sensor-to-sound pipeline needs to know up front.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    pub calibration: CalibrationProfile,
    pub octave: OctaveConfig,
    pub noise_threshold: u16,
    pub press_debounce_ms: u32,
    pub note_amplitude: f32,
    pub sound_duration_ms: u32,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for finger in Finger::ALL {
            self.calibration.thresholds(finger).validate()?;
        }
        if !(0.0..=1.0).contains(&self.note_amplitude) {
            return Err(ConfigError::Amplitude);
        }
        self.octave.validate()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            calibration: CalibrationProfile::default(),
            octave: OctaveConfig::default(),
            noise_threshold: NOISE_THRESHOLD,
            press_debounce_ms: PRESS_DEBOUNCE_MS,
            note_amplitude: NOTE_AMPLITUDE,
            sound_duration_ms: SOUND_DURATION_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        let profile = CalibrationProfile::default();
        assert!(CalibrationProfile::new(profile.thresholds).is_ok());
        assert_eq!(profile.thresholds(Finger::Index), Thresholds::new(50, 60));
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn overlapping_thresholds_rejected() {
        let mut map = FingerMap::splat(Thresholds::new(50, 100));
        map[Finger::Middle] = Thresholds::new(120, 100);
        assert_eq!(
            CalibrationProfile::new(map),
            Err(ConfigError::ThresholdOrder { black: 120, white: 100 })
        );
    }

    #[test]
    fn threshold_above_adc_range_rejected() {
        let t = Thresholds::new(10, 5000);
        assert_eq!(t.validate(), Err(ConfigError::ThresholdRange { value: 5000 }));
    }

    #[test]
    fn thresholds_from_presses_average() {
        let t = Thresholds::from_presses(&[60, 70, 80], &[150, 160, 170]).unwrap();
        assert_eq!(t, Thresholds::new(70, 160));
    }

    #[test]
    fn thresholds_from_presses_needs_data() {
        assert_eq!(
            Thresholds::from_presses(&[], &[100]),
            Err(ConfigError::NoPresses)
        );
    }

    #[test]
    fn octave_range_outside_table_rejected() {
        let cfg = OctaveConfig {
            max: 8,
            ..OctaveConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = OctaveConfig {
            start: 2,
            ..OctaveConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn note_amplitude_must_be_a_level() {
        for amplitude in [f32::NAN, -0.1, 1.5, f32::INFINITY] {
            let cfg = PipelineConfig {
                note_amplitude: amplitude,
                ..PipelineConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::Amplitude), "{amplitude}");
        }

        let cfg = PipelineConfig {
            note_amplitude: 1.0,
            ..PipelineConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
