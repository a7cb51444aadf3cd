//! Peak magnitude to key color.

use crate::config::CalibrationProfile;
use crate::finger::{Finger, KeyColor};

/// Maps a finalized peak to [`KeyColor`] using the finger's calibrated thresholds.
///
/// The two thresholds partition the ADC range with no gap and no overlap:
///
/// ```text
/// 0 ........ black ........ white ........ 4095
///   Invalid        Black          White
///            (excl.)  (incl.)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyClassifier {
    calibration: CalibrationProfile,
}

impl KeyClassifier {
    pub const fn new(calibration: CalibrationProfile) -> Self {
        KeyClassifier { calibration }
    }

    pub fn classify(&self, peak: u16, finger: Finger) -> KeyColor {
        let t = self.calibration.thresholds(finger);
        if peak > t.white {
            KeyColor::White
        } else if peak > t.black {
            KeyColor::Black
        } else {
            KeyColor::Invalid
        }
    }

    pub fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }
}
