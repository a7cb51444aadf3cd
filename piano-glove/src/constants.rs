//! Firmware-wide constants: audio format, voice pools, sensor tuning.

/// Output sample rate in Hz (I2S master clocked at 48 kHz).
pub const SAMPLE_RATE: u32 = 48_000;

/// Total interleaved `i16` samples in the circular DMA buffer (512 stereo frames).
pub const AUDIO_BUFFER_SIZE: usize = 1024;

/// Samples in one half of the DMA buffer. Each interrupt refills exactly this many.
pub const HALF_BUFFER_SIZE: usize = AUDIO_BUFFER_SIZE / 2;

/// Output channels per frame. Content is mono, duplicated left and right.
pub const NUM_CHANNELS: usize = 2;

/// Entries in the single-cycle sine wavetable.
pub const WAVE_TABLE_SIZE: usize = 256;

/// Oscillators owned by the mixer.
pub const NUM_VOICES: usize = 4;

/// Active-sound slots tracked by the polling loop for duration bookkeeping.
pub const MAX_VOICES: usize = 3;

const _: () = assert!(MAX_VOICES <= NUM_VOICES, "every sound slot needs an oscillator");

/// How long a triggered note keeps sounding, in milliseconds.
pub const SOUND_DURATION_MS: u32 = 500;

/// Amplitude given to each triggered note (0.0 – 1.0).
pub const NOTE_AMPLITUDE: f32 = 0.1;

/// Piezo readings below this many ADC counts are treated as silence.
pub const NOISE_THRESHOLD: u16 = 45;

/// Largest value the 12-bit ADC can report.
pub const ADC_MAX: u16 = 4095;

/// A finger that just triggered a voice is ignored for this many milliseconds.
pub const PRESS_DEBOUNCE_MS: u32 = 150;

/// Nominal polling period of the sensor loop in milliseconds.
pub const POLL_PERIOD_MS: u32 = 20;

/// Octaves in the frequency table.
pub const NUM_OCTAVES: usize = 8;

/// Pitch classes per octave.
pub const NUM_NOTES: usize = 12;

pub const OCTAVE_MIN: u8 = 3;
pub const STARTING_OCTAVE: u8 = 4;
pub const OCTAVE_MAX: u8 = 7;

/// Minimum time between two octave changes, in milliseconds.
pub const OCTAVE_CHANGE_COOLDOWN_MS: u32 = 300;

/// Integrated gyro angle beyond which a tilt counts as a directional vote.
pub const OCTAVE_THRESHOLD_GYRO: f32 = 90.0;

/// Raw accelerometer reading beyond which a tilt counts as a directional vote.
pub const OCTAVE_THRESHOLD_ACCEL: i16 = 800;

/// Zero-rate offset of the raw gyro X reading.
pub const GYRO_BIAS: f32 = 18.19;

/// Raw gyro counts per normalized unit.
pub const GYRO_SCALE: f32 = 2.98;

/// Linear drift removed per millisecond of device uptime.
pub const DRIFT_CORRECTION_X: f32 = 0.0001;

/// Length of the circular gyro history used by the trapezoidal smoother.
pub const GYRO_HISTORY_SIZE: usize = 10;

/// Integration time step in seconds.
pub const GYRO_DT: f32 = 0.00001;
