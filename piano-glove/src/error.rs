//! Error types.
//!
//! The real-time path never fails: noise, weak presses and a full voice pool
//! are ordinary "no event" outcomes. Errors only surface from configuration,
//! sensor bring-up, and the WAV parser.

use thiserror::Error;

/// Inertial sensor failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SensorError<E> {
    /// The underlying I2C transaction failed.
    #[error("i2c bus error: {0:?}")]
    Bus(E),
    /// The device answered with a chip id other than the expected one.
    #[error("unexpected chip id {found:#04x}")]
    UnexpectedChipId { found: u8 },
}

impl<E> From<E> for SensorError<E> {
    fn from(err: E) -> Self {
        SensorError::Bus(err)
    }
}

/// Rejected configuration.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A finger's black threshold is not below its white threshold.
    #[error("black threshold {black} must be below white threshold {white}")]
    ThresholdOrder { black: u16, white: u16 },
    /// A threshold exceeds the ADC range.
    #[error("threshold {value} exceeds the 12-bit ADC range")]
    ThresholdRange { value: u16 },
    /// The octave range is empty or leaves the frequency table.
    #[error("octave range {min}..={max} (start {start}) is invalid")]
    OctaveRange { min: u8, max: u8, start: u8 },
    /// Note level is NaN or outside `0.0..=1.0`.
    #[error("note amplitude must lie within 0.0..=1.0")]
    Amplitude,
    /// Calibration needs at least one recorded press of each kind.
    #[error("no presses recorded")]
    NoPresses,
}

/// Reasons the WAV parser rejects a buffer.
#[cfg(feature = "wav")]
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("buffer shorter than a canonical 44-byte header")]
    TooShort,
    #[error("missing RIFF tag")]
    MissingRiff,
    #[error("missing WAVE tag")]
    MissingWave,
    #[error("fmt chunk of {0} bytes is smaller than 16")]
    FmtTooSmall(u32),
    #[error("fmt chunk runs past the end of the buffer")]
    FmtOutOfRange,
    #[error("data chunk appears before fmt chunk")]
    DataBeforeFmt,
    #[error("data chunk runs past the end of the buffer")]
    DataOutOfRange,
    #[error("fmt or data chunk not found")]
    MissingChunk,
    #[error("audio format {0} is not PCM")]
    NotPcm(u16),
}
