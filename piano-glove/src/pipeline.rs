//! The sensor-to-sound polling cycle.
//!
//! [`Pipeline`] holds every piece of state the glove needs between polls:
//! edge trackers, calibration, octave estimate, the active-sound table and
//! per-finger retrigger stamps. Call [`poll`](Pipeline::poll) once per
//! polling period; it never blocks and never fails. Hardware trouble is
//! counted in [`PipelineStats`] and the affected input is skipped for that
//! cycle.
//!
//! ```text
//! IMU ──► OctaveTracker ────────────────┐
//!                                       ▼
//! ADC ──► PeakDetector ──► KeyClassifier ──► note::resolve ──► VoiceAllocator ──► VoiceSink
//!                               │
//!                               └──► LEDs / status display
//! ```

use heapless::Vec;

use crate::analyze::{KeyClassifier, OctaveTracker, PeakDetector};
use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::feedback::{self, Indicators, StatusDisplay, NOTE_ROW, OCTAVE_ROW};
use crate::finger::{Finger, FingerMap, KeyEvent};
use crate::note;
use crate::sensor::{AnalogSampler, Axis, Clock, InertialSensor, Sensor};
use crate::synth::{VoiceAllocator, VoiceSink};

/// The hardware a poll touches.
pub struct Peripherals<A, I, L, D> {
    pub adc: A,
    pub imu: I,
    pub leds: L,
    pub display: D,
}

/// Running counters, wrapping on overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Playable presses that found no free voice.
    pub dropped_notes: u32,
    /// Failed ADC or IMU reads.
    pub sensor_faults: u32,
    /// Failed LED or display writes.
    pub feedback_faults: u32,
    /// Presses ignored because the finger triggered too recently.
    pub debounced: u32,
    pub voices_started: u32,
    pub voices_retired: u32,
}

/// What happened during one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    /// Valid presses, in finger order. At most one per finger.
    pub events: Vec<KeyEvent, { Finger::COUNT }>,
    pub octave: u8,
    pub octave_changed: bool,
}

/// Sensor-to-sound pipeline context.
pub struct Pipeline<S> {
    config: PipelineConfig,
    peaks: PeakDetector,
    classifier: KeyClassifier,
    octave: OctaveTracker,
    voices: VoiceAllocator,
    sink: S,
    last_trigger: FingerMap<Option<u32>>,
    stats: PipelineStats,
}

impl<S: VoiceSink> Pipeline<S> {
    /// Validate `config` and build a pipeline that sends voice commands to
    /// `sink`.
    pub fn new(config: PipelineConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Pipeline {
            peaks: PeakDetector::with_noise_threshold(config.noise_threshold),
            classifier: KeyClassifier::new(config.calibration),
            octave: OctaveTracker::new(config.octave),
            voices: VoiceAllocator::new(config.sound_duration_ms),
            sink,
            last_trigger: FingerMap::splat(None),
            stats: PipelineStats::default(),
            config,
        })
    }

    /// Run one polling cycle at time `now` (ms).
    pub fn poll<A, I, L, D>(&mut self, hw: &mut Peripherals<A, I, L, D>, now: u32) -> PollReport
    where
        A: AnalogSampler,
        I: InertialSensor,
        L: Indicators,
        D: StatusDisplay,
    {
        let octave_changed = self.update_octave(&mut hw.imu, &mut hw.display, now);

        let mut events = Vec::new();
        for finger in Finger::ALL {
            if let Some(event) = self.poll_finger(finger, hw, now) {
                // One slot per finger, cannot overflow
                let _ = events.push(event);
            }
        }

        let retired = self.voices.retire_expired(now, &mut self.sink);
        self.stats.voices_retired = self.stats.voices_retired.wrapping_add(retired as u32);

        PollReport {
            events,
            octave: self.octave.octave(),
            octave_changed,
        }
    }

    /// [`poll`](Self::poll) at the time reported by `clock`.
    pub fn tick<A, I, L, D, C>(&mut self, hw: &mut Peripherals<A, I, L, D>, clock: &mut C) -> PollReport
    where
        A: AnalogSampler,
        I: InertialSensor,
        L: Indicators,
        D: StatusDisplay,
        C: Clock,
    {
        let now = clock.now_millis();
        self.poll(hw, now)
    }

    /// Show the banner and current octave, and turn all LEDs off.
    pub fn show_startup<L, D>(&mut self, leds: &mut L, display: &mut D)
    where
        L: Indicators,
        D: StatusDisplay,
    {
        if leds.all_off().is_err() {
            self.feedback_fault();
        }
        if display.show_line(OCTAVE_ROW, feedback::BANNER).is_err() {
            self.feedback_fault();
        }
        let line = feedback::octave_line(self.octave.octave());
        if display.show_line(NOTE_ROW, &line).is_err() {
            self.feedback_fault();
        }
    }

    fn update_octave<I, D>(&mut self, imu: &mut I, display: &mut D, now: u32) -> bool
    where
        I: InertialSensor,
        D: StatusDisplay,
    {
        let (gyro, accel) = match read_tilt(imu) {
            Ok(r) => r,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = ?_e, "imu read failed");
                self.sensor_fault();
                return false;
            }
        };

        let before = self.octave.octave();
        let after = self.octave.update(gyro, accel, now);
        if after == before {
            return false;
        }

        if display
            .show_line(OCTAVE_ROW, &feedback::octave_line(after))
            .is_err()
        {
            self.feedback_fault();
        }
        true
    }

    fn poll_finger<A, I, L, D>(
        &mut self,
        finger: Finger,
        hw: &mut Peripherals<A, I, L, D>,
        now: u32,
    ) -> Option<KeyEvent>
    where
        A: AnalogSampler,
        L: Indicators,
        D: StatusDisplay,
    {
        let sample = match hw.adc.read_channel(finger.adc_channel()) {
            Ok(s) => s,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(?finger, error = ?_e, "adc read failed");
                self.sensor_fault();
                return None;
            }
        };

        let peak = self.peaks.detect(sample, finger, now);
        if peak == 0 {
            return None;
        }

        let color = self.classifier.classify(peak, finger);
        let note = note::note_for(finger, color)?;

        if self.debounced(finger, now) {
            self.stats.debounced = self.stats.debounced.wrapping_add(1);
            return None;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(?finger, ?color, peak, "key press");

        let frequency = note::frequency(note, self.octave.octave());
        if let Some(hz) = frequency {
            self.start_voice(finger, hz, now);
        }

        if hw.leds.light_only(finger).is_err() {
            self.feedback_fault();
        }
        if hw
            .display
            .show_line(NOTE_ROW, &feedback::note_line(note))
            .is_err()
        {
            self.feedback_fault();
        }

        Some(KeyEvent {
            finger,
            color,
            magnitude: peak,
            timestamp: now,
            frequency,
        })
    }

    fn debounced(&self, finger: Finger, now: u32) -> bool {
        match self.last_trigger[finger] {
            Some(t) => now.wrapping_sub(t) < self.config.press_debounce_ms,
            None => false,
        }
    }

    fn start_voice(&mut self, finger: Finger, frequency: f32, now: u32) {
        let amplitude = self.config.note_amplitude;
        match self.voices.allocate(frequency, amplitude, now, &mut self.sink) {
            Some(_) => {
                self.last_trigger[finger] = Some(now);
                self.stats.voices_started = self.stats.voices_started.wrapping_add(1);
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?finger, frequency, "note dropped");
                self.stats.dropped_notes = self.stats.dropped_notes.wrapping_add(1);
            }
        }
    }

    fn sensor_fault(&mut self) {
        self.stats.sensor_faults = self.stats.sensor_faults.wrapping_add(1);
    }

    fn feedback_fault(&mut self) {
        self.stats.feedback_faults = self.stats.feedback_faults.wrapping_add(1);
    }

    pub fn octave(&self) -> u8 {
        self.octave.octave()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn voices(&self) -> &VoiceAllocator {
        &self.voices
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Take the sink back, discarding the pipeline state.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Gyro X and accel X, the two axes the octave gesture uses.
fn read_tilt<I: InertialSensor>(imu: &mut I) -> Result<(i16, i16), I::Error> {
    let gyro = imu.read_axis(Sensor::Gyro, Axis::X)?;
    let accel = imu.read_axis(Sensor::Accel, Axis::X)?;
    Ok((gyro, accel))
}
