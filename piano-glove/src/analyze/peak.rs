//! Per-finger rising/falling edge tracker for piezo taps.
//!
//! A tap on a piezo produces a short burst: the reading climbs to an apex
//! and falls away. [`PeakDetector`] follows each finger's signal sample by
//! sample and reports the apex once, on the first falling sample.
//!
//! The detector compares consecutive samples rather than timestamps, so it
//! must be polled at a fixed cadence fast enough to see at least one sample
//! on each side of the apex.

use crate::constants::NOISE_THRESHOLD;
use crate::finger::{Finger, FingerMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct EdgeState {
    last_sample: u16,
    running_max: u16,
    rising: bool,
    last_press: Option<u32>,
}

/// Peak detector for all fingers.
///
/// # Example
/// ```
/// use piano_glove::analyze::PeakDetector;
/// use piano_glove::finger::Finger;
///
/// let mut detector = PeakDetector::new();
/// for (t, sample) in [100u16, 180, 250, 120].into_iter().enumerate() {
///     let peak = detector.detect(sample, Finger::Index, t as u32);
///     if peak != 0 {
///         assert_eq!(peak, 250);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PeakDetector {
    noise_threshold: u16,
    state: FingerMap<EdgeState>,
}

impl PeakDetector {
    /// Detector with the default [`NOISE_THRESHOLD`].
    pub fn new() -> Self {
        Self::with_noise_threshold(NOISE_THRESHOLD)
    }

    pub fn with_noise_threshold(noise_threshold: u16) -> Self {
        PeakDetector {
            noise_threshold,
            state: FingerMap::splat(EdgeState::default()),
        }
    }

    /// Feed one raw ADC sample for `finger`.
    ///
    /// Returns the finalized peak magnitude when this sample is the first
    /// fall after a rise, otherwise 0. Samples below the noise threshold are
    /// ignored entirely and leave the edge state untouched.
    pub fn detect(&mut self, sample: u16, finger: Finger, now: u32) -> u16 {
        if sample < self.noise_threshold {
            return 0;
        }

        let state = &mut self.state[finger];
        if sample > state.last_sample {
            state.running_max = sample;
            state.rising = true;
        } else if state.rising && sample < state.last_sample {
            let peak = state.running_max;
            state.running_max = 0;
            state.rising = false;
            state.last_sample = sample;
            state.last_press = Some(now);
            return peak;
        }

        state.last_sample = sample;
        0
    }

    /// Timestamp of the last finalized peak on `finger`.
    pub fn last_press(&self, finger: Finger) -> Option<u32> {
        self.state[finger].last_press
    }

    /// `true` while `finger`'s signal is climbing towards an apex.
    pub fn is_rising(&self, finger: Finger) -> bool {
        self.state[finger].rising
    }

    /// Forget all edge state.
    pub fn reset(&mut self) {
        for (_, state) in self.state.iter_mut() {
            *state = EdgeState::default();
        }
    }
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new()
    }
}
