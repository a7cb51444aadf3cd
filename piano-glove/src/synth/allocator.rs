//! Active-sound bookkeeping: which slots are sounding and since when.

use crate::constants::{MAX_VOICES, SOUND_DURATION_MS};

use super::{VoiceCommand, VoiceId, VoiceSink};

/// Fixed pool of `MAX_VOICES` sound slots with start stamps.
///
/// Slot `i` drives oscillator `i`. A full pool drops new notes; nothing is
/// stolen. Expiry is time based: a voice started at `t0` counts as active
/// for `now` in `[t0, t0 + duration)`, whether or not the sweep has run.
#[derive(Debug, Clone)]
pub struct VoiceAllocator {
    started: [Option<u32>; MAX_VOICES],
    duration_ms: u32,
}

impl VoiceAllocator {
    pub const fn new(duration_ms: u32) -> Self {
        VoiceAllocator {
            started: [None; MAX_VOICES],
            duration_ms,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Claim the first free slot and send it a start command.
    ///
    /// Returns `None` when every slot is taken, when `frequency` is not a
    /// positive pitch, or when `sink` refuses the command. A refused command
    /// leaves the slot free.
    pub fn allocate<S: VoiceSink>(
        &mut self,
        frequency: f32,
        amplitude: f32,
        now: u32,
        sink: &mut S,
    ) -> Option<VoiceId> {
        if frequency.is_nan() || frequency <= 0.0 {
            return None;
        }
        let index = self.started.iter().position(Option::is_none)?;
        let voice = VoiceId::new(index as u8);

        if sink
            .send(VoiceCommand::Start {
                voice,
                frequency,
                amplitude,
            })
            .is_err()
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(voice = index, "voice command queue full");
            return None;
        }

        self.started[index] = Some(now);

        #[cfg(feature = "tracing")]
        tracing::debug!(voice = index, frequency, now, "voice allocated");

        Some(voice)
    }

    /// Release every slot whose sound has run its course and stop its
    /// oscillator. Returns the number of slots released.
    ///
    /// A slot whose stop command is refused stays claimed and is retried on
    /// the next sweep.
    pub fn retire_expired<S: VoiceSink>(&mut self, now: u32, sink: &mut S) -> usize {
        let mut retired = 0;
        for (index, slot) in self.started.iter_mut().enumerate() {
            let Some(t0) = *slot else { continue };
            if now.wrapping_sub(t0) < self.duration_ms {
                continue;
            }
            let voice = VoiceId::new(index as u8);
            if sink.send(VoiceCommand::Stop { voice }).is_ok() {
                *slot = None;
                retired += 1;

                #[cfg(feature = "tracing")]
                tracing::debug!(voice = index, now, "voice retired");
            }
        }
        retired
    }

    /// Whether `voice` is still sounding at `now`.
    pub fn is_active(&self, voice: VoiceId, now: u32) -> bool {
        match self.started.get(voice.index()) {
            Some(Some(t0)) => now.wrapping_sub(*t0) < self.duration_ms,
            _ => false,
        }
    }

    /// Slots currently claimed, expired or not.
    pub fn claimed(&self) -> usize {
        self.started.iter().filter(|s| s.is_some()).count()
    }

    pub fn started_at(&self, voice: VoiceId) -> Option<u32> {
        self.started.get(voice.index()).copied().flatten()
    }
}

impl Default for VoiceAllocator {
    fn default() -> Self {
        Self::new(SOUND_DURATION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Mixer;

    /// Sink that refuses everything.
    struct Jammed;

    impl VoiceSink for Jammed {
        fn send(&mut self, cmd: VoiceCommand) -> Result<(), VoiceCommand> {
            Err(cmd)
        }
    }

    #[test]
    fn fills_slots_in_order() {
        let mut alloc = VoiceAllocator::default();
        let mut mixer = Mixer::new();
        for i in 0..MAX_VOICES as u8 {
            assert_eq!(
                alloc.allocate(440.0, 0.1, 0, &mut mixer),
                Some(VoiceId::new(i))
            );
        }
        assert_eq!(mixer.active_voices(), MAX_VOICES);
    }

    #[test]
    fn full_pool_drops_without_stealing() {
        let mut alloc = VoiceAllocator::default();
        let mut mixer = Mixer::new();
        for _ in 0..MAX_VOICES {
            alloc.allocate(440.0, 0.1, 0, &mut mixer);
        }
        assert_eq!(alloc.allocate(261.63, 0.1, 10, &mut mixer), None);
        for i in 0..MAX_VOICES as u8 {
            assert_eq!(alloc.started_at(VoiceId::new(i)), Some(0));
        }
    }

    #[test]
    fn expiry_boundary() {
        let mut alloc = VoiceAllocator::new(500);
        let mut mixer = Mixer::new();
        let v = alloc.allocate(440.0, 0.1, 1000, &mut mixer).unwrap();

        assert!(alloc.is_active(v, 1000));
        assert!(alloc.is_active(v, 1499));
        assert!(!alloc.is_active(v, 1500));

        assert_eq!(alloc.retire_expired(1499, &mut mixer), 0);
        assert!(mixer.voice(v).unwrap().is_active());
        assert_eq!(alloc.retire_expired(1500, &mut mixer), 1);
        assert!(!mixer.voice(v).unwrap().is_active());
        assert_eq!(alloc.claimed(), 0);
    }

    #[test]
    fn retired_slot_is_reused() {
        let mut alloc = VoiceAllocator::new(500);
        let mut mixer = Mixer::new();
        for _ in 0..MAX_VOICES {
            alloc.allocate(440.0, 0.1, 0, &mut mixer);
        }
        alloc.retire_expired(600, &mut mixer);
        assert_eq!(
            alloc.allocate(523.25, 0.1, 600, &mut mixer),
            Some(VoiceId::new(0))
        );
    }

    #[test]
    fn refused_start_releases_slot() {
        let mut alloc = VoiceAllocator::default();
        assert_eq!(alloc.allocate(440.0, 0.1, 0, &mut Jammed), None);
        assert_eq!(alloc.claimed(), 0);
    }

    #[test]
    fn refused_stop_is_retried() {
        let mut alloc = VoiceAllocator::new(500);
        let mut mixer = Mixer::new();
        let v = alloc.allocate(440.0, 0.1, 0, &mut mixer).unwrap();

        assert_eq!(alloc.retire_expired(700, &mut Jammed), 0);
        assert_eq!(alloc.claimed(), 1);
        assert!(!alloc.is_active(v, 700));

        assert_eq!(alloc.retire_expired(720, &mut mixer), 1);
        assert_eq!(alloc.claimed(), 0);
    }

    #[test]
    fn rejects_non_positive_pitch() {
        let mut alloc = VoiceAllocator::default();
        let mut mixer = Mixer::new();
        assert_eq!(alloc.allocate(0.0, 0.1, 0, &mut mixer), None);
        assert_eq!(alloc.allocate(f32::NAN, 0.1, 0, &mut mixer), None);
        assert_eq!(alloc.claimed(), 0);
    }
}
