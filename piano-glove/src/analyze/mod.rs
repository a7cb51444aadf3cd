//! Sensor analysis: turning raw readings into musical events.
//!
//! | Stage | Type | Input | Output |
//! |-------|------|-------|--------|
//! | Peak detection | [`PeakDetector`] | raw ADC sample per finger | apex magnitude, once per tap |
//! | Classification | [`KeyClassifier`] | apex magnitude | [`KeyColor`](crate::finger::KeyColor) |
//! | Octave gesture | [`OctaveTracker`] | raw gyro X + accel X | current octave |

mod classify;
mod octave;
mod peak;

pub use classify::KeyClassifier;
pub use octave::{OctaveTracker, Tilt};
pub use peak::PeakDetector;
