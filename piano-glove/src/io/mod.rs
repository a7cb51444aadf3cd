//! Audio output plumbing between the polling loop and the DMA interrupt.
//!
//! ## Components
//!
//! | Type | Context | Description |
//! |------|---------|-------------|
//! | [`CommandSender`] | polling loop | Enqueues voice start/stop commands |
//! | [`CommandReceiver`] | audio ISR | Drains commands into the mixer |
//! | [`AudioOutput`] | audio ISR | Refills released DMA buffer halves |
//! | [`AudioTransport`] | hardware | Circular DMA playback of the buffer |
//!
//! ## DMA Buffer Layout
//!
//! - `[i16; AUDIO_BUFFER_SIZE]`, interleaved `L R L R ...`
//! - Split into two halves of `HALF_BUFFER_SIZE` samples
//! - The transport raises one notification per consumed half
//! - The ISR refills the released half while the other one plays

pub mod command_queue;
pub mod output;

pub use command_queue::{
    CommandQueue, CommandReceiver, CommandSender, Drain, COMMAND_QUEUE_SLOTS,
};
pub use output::{AudioOutput, AudioTransport, DmaHalf};
