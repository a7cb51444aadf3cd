//! # piano-glove
//!
//! A `no_std`, allocation-free firmware core for a wearable piano glove.
//! Piezo sensors on seven fingers are tapped like keys; tap strength picks
//! the natural or the sharp note, and tilting the hand shifts the octave.
//! Notes are rendered by a small wavetable synthesizer into a
//! double-buffered DMA stream.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Model | [`finger`] / [`note`] / [`config`] | Finger identities, note tables, calibration |
//! | Analysis | [`analyze`] | Peak detection, key classification, octave gesture |
//! | Context | [`pipeline`] | Explicit per-poll state threading sensors to voices |
//! | Synthesis | [`synth`] / [`dsp`] | Voice allocation, wavetable oscillators, mixing |
//! | I/O | [`io`] | Lock-free command hand-off, DMA half-buffer refills |
//! | Drivers | [`imu`] / [`feedback`] / [`sensor`] | BNO055, LEDs and display, collaborator traits |
//! | Utility | [`wav`] | RIFF/WAVE header parser (feature-gated) |
//!
//! ## Wiring
//!
//! ```ignore
//! use piano_glove::config::PipelineConfig;
//! use piano_glove::io::{AudioOutput, CommandQueue, COMMAND_QUEUE_SLOTS};
//! use piano_glove::pipeline::{Peripherals, Pipeline};
//! use piano_glove::synth::Mixer;
//!
//! let queue: &'static mut CommandQueue<COMMAND_QUEUE_SLOTS> = /* static storage */;
//! let (tx, rx) = queue.split();
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::default(), tx)?;
//! let mut output = AudioOutput::new(Mixer::new(), rx);
//! output.start_output(&mut dma, tx_buffer)?;
//!
//! // Every POLL_PERIOD_MS in the main loop:
//! let report = pipeline.tick(&mut peripherals, &mut clock);
//!
//! // DMA half-transfer / transfer-complete interrupts:
//! output.on_first_half_consumed(tx_buffer);
//! output.on_second_half_consumed(tx_buffer);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `bno055` | yes | BNO055 IMU driver over `embedded-hal` I2C |
//! | `wav` | yes | WAV header parser |
//! | `tracing` | no | Structured debug events via `tracing` |
//! | `serde` | no | `Serialize`/`Deserialize` on configuration types |
//!
//! ## Audio parameters
//!
//! - **Sample rate:** 48 000 Hz ([`constants::SAMPLE_RATE`])
//! - **Buffer:** 1024 interleaved `i16` samples, two halves of 256 frames
//!   ([`constants::AUDIO_BUFFER_SIZE`])
//! - **Wavetable:** 256-entry sine ([`constants::WAVE_TABLE_SIZE`])
//! - **Voices:** 4 oscillators, at most 3 sounding ([`constants::MAX_VOICES`])

#![no_std]

pub mod analyze;
pub mod config;
pub mod constants;
pub mod dsp;
pub mod error;
pub mod feedback;
pub mod finger;
pub mod io;
pub mod note;
pub mod pipeline;
pub mod sensor;
pub mod synth;

#[cfg(feature = "bno055")]
pub mod imu;

#[cfg(feature = "wav")]
pub mod wav;
