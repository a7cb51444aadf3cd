//! Wavetable synthesizer: voice allocation, expiry and mixing.
//!
//! The synthesizer is split along the interrupt boundary:
//!
//! ```text
//!  polling loop                          audio interrupt
//! ┌────────────────┐   VoiceCommand    ┌──────────────────────┐
//! │ VoiceAllocator ├──────────────────►│ Mixer                │
//! │ slots + stamps │  (any VoiceSink)  │ oscillators + table  │
//! └────────────────┘                   └──────────────────────┘
//! ```
//!
//! [`VoiceAllocator`] decides which slot a note gets and when it ends;
//! [`Mixer`] only renders. Between them sits a [`VoiceSink`], which is the
//! lock-free [`CommandSender`](crate::io::CommandSender) in firmware, or the
//! mixer itself when everything runs in one context ([`VoiceMixer`]).

mod allocator;
mod mixer;
mod oscillator;

pub use allocator::VoiceAllocator;
pub use mixer::Mixer;
pub use oscillator::{phase_increment, Oscillator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::SOUND_DURATION_MS;

/// Index of a voice slot and of the oscillator it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoiceId(u8);

impl VoiceId {
    pub const fn new(index: u8) -> Self {
        VoiceId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Instruction from the allocator to the oscillator bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceCommand {
    Start {
        voice: VoiceId,
        frequency: f32,
        amplitude: f32,
    },
    Stop {
        voice: VoiceId,
    },
}

/// Destination for voice commands.
///
/// `send` hands the command back if it could not be delivered.
pub trait VoiceSink {
    fn send(&mut self, cmd: VoiceCommand) -> Result<(), VoiceCommand>;
}

impl<S: VoiceSink + ?Sized> VoiceSink for &mut S {
    fn send(&mut self, cmd: VoiceCommand) -> Result<(), VoiceCommand> {
        (**self).send(cmd)
    }
}

/// Allocator and mixer in one object, for single-context use.
///
/// # Example
///
/// ```
/// use piano_glove::synth::VoiceMixer;
///
/// let mut synth = VoiceMixer::new(500);
/// let voice = synth.allocate_voice(440.0, 0.1, 0).unwrap();
///
/// let mut half = [0i16; 512];
/// synth.mix(&mut half);
/// assert!(synth.is_active(voice, 499));
///
/// synth.retire_expired_voices(500);
/// assert!(!synth.is_active(voice, 500));
/// ```
#[derive(Debug, Clone)]
pub struct VoiceMixer {
    allocator: VoiceAllocator,
    mixer: Mixer,
}

impl VoiceMixer {
    pub fn new(duration_ms: u32) -> Self {
        VoiceMixer {
            allocator: VoiceAllocator::new(duration_ms),
            mixer: Mixer::new(),
        }
    }

    pub fn allocate_voice(&mut self, frequency: f32, amplitude: f32, now: u32) -> Option<VoiceId> {
        self.allocator
            .allocate(frequency, amplitude, now, &mut self.mixer)
    }

    pub fn retire_expired_voices(&mut self, now: u32) -> usize {
        self.allocator.retire_expired(now, &mut self.mixer)
    }

    pub fn mix(&mut self, out: &mut [i16]) {
        self.mixer.mix(out);
    }

    pub fn is_active(&self, voice: VoiceId, now: u32) -> bool {
        self.allocator.is_active(voice, now)
    }

    pub fn allocator(&self) -> &VoiceAllocator {
        &self.allocator
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}

impl Default for VoiceMixer {
    fn default() -> Self {
        Self::new(SOUND_DURATION_MS)
    }
}
