//! One wavetable voice.

use crate::constants::{SAMPLE_RATE, WAVE_TABLE_SIZE};
use crate::dsp::SineTable;

const TABLE_LEN: f32 = WAVE_TABLE_SIZE as f32;

/// Phase advance per output frame for a tone at `frequency` Hz.
///
/// ```
/// use piano_glove::synth::phase_increment;
///
/// let inc = phase_increment(440.0);
/// assert!((inc - 2.346_667).abs() < 1e-4);
/// ```
#[inline]
pub fn phase_increment(frequency: f32) -> f32 {
    frequency * TABLE_LEN / SAMPLE_RATE as f32
}

/// A sine oscillator reading [`SineTable`] at a variable phase increment.
///
/// Phase is kept in `[0, WAVE_TABLE_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    phase: f32,
    increment: f32,
    amplitude: f32,
    active: bool,
}

impl Oscillator {
    pub const fn new() -> Self {
        Oscillator {
            phase: 0.0,
            increment: 0.0,
            amplitude: 0.0,
            active: false,
        }
    }

    /// Restart at phase 0 with a new pitch and level. The level is clamped
    /// to `0.0..=1.0`; NaN is silence.
    pub fn start(&mut self, frequency: f32, amplitude: f32) {
        self.phase = 0.0;
        self.increment = phase_increment(frequency);
        self.amplitude = if amplitude.is_nan() {
            0.0
        } else {
            amplitude.clamp(0.0, 1.0)
        };
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Jump to `phase`, wrapped into the table.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap(phase);
    }

    /// Current sample scaled by amplitude, widened for accumulation.
    #[inline(always)]
    pub fn sample(&self, table: &SineTable) -> i32 {
        (table.lookup(self.phase) as f32 * self.amplitude) as i32
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.phase += self.increment;
        if self.phase >= TABLE_LEN {
            self.phase -= TABLE_LEN;
            // Increments above one table length only happen far above audio rate
            if self.phase >= TABLE_LEN {
                self.phase = wrap(self.phase);
            }
        }
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap(phase: f32) -> f32 {
    let wrapped = libm::fmodf(phase, TABLE_LEN);
    if wrapped < 0.0 {
        wrapped + TABLE_LEN
    } else {
        wrapped
    }
}
