//! Double-buffered audio output driven by DMA half-complete interrupts.
//!
//! ## Architecture
//!
//! ```text
//!  CommandReceiver          AudioOutput                 DMA buffer
//! ┌───────────────┐     ┌────────────────┐     ┌────────────┬────────────┐
//! │ Start / Stop  ├────►│ Mixer          ├────►│ first half │ second half│──► I2S
//! └───────────────┘     │ (oscillators)  │     │ 512 × i16  │ 512 × i16  │
//!                       └────────────────┘     └────────────┴────────────┘
//! ```
//!
//! The transport plays the buffer in a loop. When it finishes one half it
//! raises a notification, and that half belongs to the mixer until the
//! transport wraps around to it again. Every notification drains pending
//! voice commands and then refills exactly the half that was released.
//!
//! ## Usage
//!
//! ```ignore
//! static mut TX_BUFFER: [i16; AUDIO_BUFFER_SIZE] = [0; AUDIO_BUFFER_SIZE];
//!
//! // init: prime the buffer and start circular DMA
//! output.start_output(&mut sai_dma, unsafe { &mut TX_BUFFER })?;
//!
//! // DMA half-transfer ISR
//! output.on_first_half_consumed(unsafe { &mut TX_BUFFER });
//!
//! // DMA transfer-complete ISR
//! output.on_second_half_consumed(unsafe { &mut TX_BUFFER });
//! ```

use core::ops::Range;

use crate::constants::{AUDIO_BUFFER_SIZE, HALF_BUFFER_SIZE};
use crate::synth::Mixer;

use super::command_queue::CommandReceiver;

/// Which half of the output buffer the transport has just finished reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaHalf {
    First,
    Second,
}

impl DmaHalf {
    /// Sample range of this half within the full buffer.
    pub const fn range(self) -> Range<usize> {
        match self {
            DmaHalf::First => 0..HALF_BUFFER_SIZE,
            DmaHalf::Second => HALF_BUFFER_SIZE..AUDIO_BUFFER_SIZE,
        }
    }

    pub const fn other(self) -> DmaHalf {
        match self {
            DmaHalf::First => DmaHalf::Second,
            DmaHalf::Second => DmaHalf::First,
        }
    }
}

/// Hardware that plays a buffer in a loop and reports each consumed half.
///
/// The implementation records where `buffer` lives and keeps streaming it
/// until stopped; the caller keeps the buffer alive and in place for that
/// long, and writes to it only from the half-consumed notifications.
pub trait AudioTransport {
    type Error;

    fn start_continuous_output(&mut self, buffer: &[i16]) -> Result<(), Self::Error>;
}

/// Refills released buffer halves from the mixer.
pub struct AudioOutput<'q, const N: usize> {
    mixer: Mixer,
    commands: CommandReceiver<'q, N>,
    last_half: Option<DmaHalf>,
    refills: u32,
    out_of_order: u32,
}

impl<'q, const N: usize> AudioOutput<'q, N> {
    pub fn new(mixer: Mixer, commands: CommandReceiver<'q, N>) -> Self {
        AudioOutput {
            mixer,
            commands,
            last_half: None,
            refills: 0,
            out_of_order: 0,
        }
    }

    /// Mix the whole buffer once, then hand it to `transport`.
    ///
    /// The first half the hardware reads is already rendered, and the
    /// second half continues the same waveform.
    pub fn start_output<T: AudioTransport>(
        &mut self,
        transport: &mut T,
        buffer: &mut [i16; AUDIO_BUFFER_SIZE],
    ) -> Result<(), T::Error> {
        self.apply_pending();
        self.mixer.mix(buffer);
        self.last_half = None;
        transport.start_continuous_output(buffer)
    }

    /// Half-transfer notification.
    pub fn on_first_half_consumed(&mut self, buffer: &mut [i16; AUDIO_BUFFER_SIZE]) {
        self.isr(buffer, DmaHalf::First);
    }

    /// Transfer-complete notification.
    pub fn on_second_half_consumed(&mut self, buffer: &mut [i16; AUDIO_BUFFER_SIZE]) {
        self.isr(buffer, DmaHalf::Second);
    }

    /// Refill `half` of `buffer`. Must return before the transport wraps
    /// around to it.
    ///
    /// The other half is never touched: it is split off and dropped before
    /// mixing starts.
    pub fn isr(&mut self, buffer: &mut [i16; AUDIO_BUFFER_SIZE], half: DmaHalf) {
        if self.last_half == Some(half) {
            self.out_of_order = self.out_of_order.wrapping_add(1);

            #[cfg(feature = "tracing")]
            tracing::warn!(?half, "same DMA half signalled twice");
        }
        self.last_half = Some(half);

        self.apply_pending();

        let (first, second) = buffer.split_at_mut(HALF_BUFFER_SIZE);
        let target = match half {
            DmaHalf::First => first,
            DmaHalf::Second => second,
        };
        self.mixer.mix(target);
        self.refills = self.refills.wrapping_add(1);
    }

    fn apply_pending(&mut self) {
        for cmd in self.commands.drain() {
            self.mixer.apply(cmd);
        }
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Number of half refills since creation.
    pub fn refills(&self) -> u32 {
        self.refills
    }

    /// Notifications that repeated the previous half, i.e. missed interrupts.
    pub fn out_of_order(&self) -> u32 {
        self.out_of_order
    }
}
