//! Oscillator bank and the per-frame mixing loop.

use crate::constants::{NUM_CHANNELS, NUM_VOICES};
use crate::dsp::intrinsics::saturate16;
use crate::dsp::SineTable;

use super::oscillator::Oscillator;
use super::{VoiceCommand, VoiceId, VoiceSink};

/// Owns the oscillators and renders them into interleaved stereo.
///
/// In firmware the mixer lives in the audio interrupt. It only changes
/// state through [`apply`](Self::apply), so the allocation table can stay
/// with the polling loop.
#[derive(Debug, Clone)]
pub struct Mixer {
    table: SineTable,
    voices: [Oscillator; NUM_VOICES],
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            table: SineTable::new(),
            voices: [Oscillator::new(); NUM_VOICES],
        }
    }

    /// Apply one start/stop command. Commands for voices outside the bank
    /// are ignored.
    pub fn apply(&mut self, cmd: VoiceCommand) {
        match cmd {
            VoiceCommand::Start {
                voice,
                frequency,
                amplitude,
            } => {
                if let Some(osc) = self.voices.get_mut(voice.index()) {
                    osc.start(frequency, amplitude);
                }
            }
            VoiceCommand::Stop { voice } => {
                if let Some(osc) = self.voices.get_mut(voice.index()) {
                    osc.stop();
                }
            }
        }
    }

    /// Render `out.len() / NUM_CHANNELS` frames into `out`.
    ///
    /// Each frame is the saturated sum of every active voice, written to
    /// both channels. Voices advance one phase step per frame. A trailing
    /// partial frame is left untouched.
    pub fn mix(&mut self, out: &mut [i16]) {
        for frame in out.chunks_exact_mut(NUM_CHANNELS) {
            let mut acc: i32 = 0;
            for osc in self.voices.iter_mut().filter(|o| o.is_active()) {
                acc += osc.sample(&self.table);
                osc.advance();
            }
            frame.fill(saturate16(acc));
        }
    }

    pub fn voice(&self, id: VoiceId) -> Option<&Oscillator> {
        self.voices.get(id.index())
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|o| o.is_active()).count()
    }

    pub fn table(&self) -> &SineTable {
        &self.table
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

/// Applying directly is the single-context path: no queue in between.
impl VoiceSink for Mixer {
    fn send(&mut self, cmd: VoiceCommand) -> Result<(), VoiceCommand> {
        self.apply(cmd);
        Ok(())
    }
}
