//! Property-based tests for the real-time path.
//!
//! Uses proptest to check the invariants the glove relies on: peaks are
//! reported once, thresholds partition the ADC range, the octave stays in
//! range and rate-limited, voices live exactly their duration, and mixing
//! does not depend on voice order.

use piano_glove::analyze::{KeyClassifier, OctaveTracker, PeakDetector};
use piano_glove::config::{CalibrationProfile, OctaveConfig, Thresholds};
use piano_glove::constants::{
    ADC_MAX, NOISE_THRESHOLD, NUM_VOICES, OCTAVE_CHANGE_COOLDOWN_MS, OCTAVE_MAX, OCTAVE_MIN,
    WAVE_TABLE_SIZE,
};
use piano_glove::finger::{Finger, FingerMap, KeyColor};
use piano_glove::note::{self, Note, NOTE_FREQUENCIES};
use piano_glove::synth::{phase_increment, Mixer, VoiceAllocator, VoiceCommand, VoiceId};
use proptest::prelude::*;

fn finger() -> impl Strategy<Value = Finger> {
    (0..Finger::COUNT).prop_map(|i| Finger::ALL[i])
}

fn start(voice: u8, frequency: f32, amplitude: f32) -> VoiceCommand {
    VoiceCommand::Start {
        voice: VoiceId::new(voice),
        frequency,
        amplitude,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A non-decreasing run followed by one lower sample yields the run's
    /// maximum exactly once, on the falling sample.
    #[test]
    fn peak_reported_once_at_first_fall(
        mut run in prop::collection::vec(NOISE_THRESHOLD + 1..=ADC_MAX, 1..40),
        fall_frac in 0.0f64..1.0,
        finger in finger(),
    ) {
        run.sort_unstable();
        let max = *run.last().unwrap();
        let fall = NOISE_THRESHOLD + ((max - NOISE_THRESHOLD) as f64 * fall_frac) as u16;
        prop_assume!(fall < max);

        let mut detector = PeakDetector::new();
        let mut now = 0;
        for &s in &run {
            prop_assert_eq!(detector.detect(s, finger, now), 0);
            now += 20;
        }
        prop_assert_eq!(detector.detect(fall, finger, now), max);
        prop_assert_eq!(detector.last_press(finger), Some(now));

        // Continuing to fall reports nothing more
        prop_assert_eq!(detector.detect(fall.saturating_sub(1).max(NOISE_THRESHOLD), finger, now + 20), 0);
    }

    /// Samples under the noise threshold never produce a peak and never
    /// disturb a rise in progress.
    #[test]
    fn noise_is_transparent(
        noise in prop::collection::vec(0..NOISE_THRESHOLD, 0..20),
        peak in NOISE_THRESHOLD + 2..=ADC_MAX,
    ) {
        let mut detector = PeakDetector::new();
        detector.detect(peak, Finger::Middle, 0);
        for &n in &noise {
            prop_assert_eq!(detector.detect(n, Finger::Middle, 1), 0);
        }
        prop_assert!(detector.is_rising(Finger::Middle));
        prop_assert_eq!(detector.detect(peak - 1, Finger::Middle, 2), peak);
    }

    /// White iff p > white, Black iff black < p <= white, Invalid otherwise.
    #[test]
    fn thresholds_partition_peaks(
        black in 0u16..ADC_MAX,
        gap in 1u16..=ADC_MAX,
        peak in 0u16..=ADC_MAX,
        finger in finger(),
    ) {
        let white = black.saturating_add(gap).min(ADC_MAX);
        prop_assume!(black < white);
        let profile = CalibrationProfile::new(FingerMap::splat(Thresholds::new(black, white))).unwrap();
        let classifier = KeyClassifier::new(profile);

        let expected = if peak > white {
            KeyColor::White
        } else if peak > black {
            KeyColor::Black
        } else {
            KeyColor::Invalid
        };
        prop_assert_eq!(classifier.classify(peak, finger), expected);
    }

    /// The octave stays in range whatever the gesture sequence.
    #[test]
    fn octave_stays_in_range(
        steps in prop::collection::vec((any::<i16>(), any::<i16>(), 0u32..1000), 1..200),
    ) {
        let mut tracker = OctaveTracker::default();
        let mut now = 0u32;
        for (gyro, accel, dt) in steps {
            now += dt;
            let octave = tracker.update(gyro, accel, now);
            prop_assert!((OCTAVE_MIN..=OCTAVE_MAX).contains(&octave));
        }
    }

    /// Consecutive octave changes are always more than one cooldown apart.
    #[test]
    fn octave_changes_respect_cooldown(
        steps in prop::collection::vec((-2000i16..2000, -2000i16..2000, 0u32..400), 1..200),
        fast_gyro in any::<bool>(),
    ) {
        let config = if fast_gyro {
            OctaveConfig { dt: 1.0, ..OctaveConfig::default() }
        } else {
            OctaveConfig::default()
        };
        let mut tracker = OctaveTracker::new(config);
        let mut now = 0u32;
        // Boot counts as the previous change
        let mut last_change = 0u32;
        let mut octave = tracker.octave();

        for (gyro, accel, dt) in steps {
            now += dt;
            let next = tracker.update(gyro, accel, now);
            if next != octave {
                prop_assert!(next.abs_diff(octave) == 1);
                prop_assert!(now - last_change > OCTAVE_CHANGE_COOLDOWN_MS);
                last_change = now;
                octave = next;
            }
        }
    }

    /// A voice started at t0 is active on [t0, t0 + D) and inactive from
    /// t0 + D on.
    #[test]
    fn voice_lifetime_is_exact(
        t0 in 0u32..1_000_000,
        duration in 1u32..5_000,
        elapsed in 0u32..10_000,
    ) {
        let mut alloc = VoiceAllocator::new(duration);
        let mut mixer = Mixer::new();
        let voice = alloc.allocate(440.0, 0.1, t0, &mut mixer).unwrap();

        let now = t0 + elapsed;
        prop_assert_eq!(alloc.is_active(voice, now), elapsed < duration);

        alloc.retire_expired(now, &mut mixer);
        prop_assert_eq!(alloc.is_active(voice, now), elapsed < duration);
        prop_assert_eq!(mixer.voice(voice).unwrap().is_active(), elapsed < duration);
    }

    /// The same tones produce the same samples no matter which oscillator
    /// slot each one lands in, so summation order does not matter.
    #[test]
    fn mixing_ignores_voice_order(
        freqs in prop::array::uniform4(20.0f32..4000.0),
        amps in prop::array::uniform4(0.0f32..1.0),
        slots in Just((0..NUM_VOICES).collect::<Vec<usize>>()).prop_shuffle(),
        frames in 1usize..300,
    ) {
        let mut in_order = Mixer::new();
        let mut permuted = Mixer::new();
        for tone in 0..NUM_VOICES {
            in_order.apply(start(tone as u8, freqs[tone], amps[tone]));
            permuted.apply(start(slots[tone] as u8, freqs[tone], amps[tone]));
        }

        let mut a = [0i16; 600];
        let mut b = [0i16; 600];
        in_order.mix(&mut a[..frames * 2]);
        permuted.mix(&mut b[..frames * 2]);
        prop_assert_eq!(&a[..], &b[..]);

        for tone in 0..NUM_VOICES {
            let phase = in_order.voice(VoiceId::new(tone as u8)).unwrap().phase();
            let moved = permuted.voice(VoiceId::new(slots[tone] as u8)).unwrap().phase();
            prop_assert_eq!(phase, moved);
            prop_assert!((0.0..WAVE_TABLE_SIZE as f32).contains(&phase));
        }
    }
}

#[test]
fn index_example_resolves_to_d5() {
    let profile = CalibrationProfile::default();
    assert_eq!(profile.thresholds(Finger::Index), Thresholds::new(50, 60));
    let color = KeyClassifier::new(profile).classify(250, Finger::Index);
    assert_eq!(color, KeyColor::White);
    assert_eq!(
        note::resolve(Finger::Index, color, 4),
        Some(NOTE_FREQUENCIES[4][Note::D.index()])
    );
    assert_eq!(note::resolve(Finger::Index, color, 4), Some(587.33));
}

#[test]
fn a440_phase_after_one_hundred_frames() {
    let inc = phase_increment(440.0);
    assert!((inc - 2.3467).abs() < 1e-3);

    let mut mixer = Mixer::new();
    mixer.apply(start(0, 440.0, 0.1));
    let mut out = [0i16; 200];
    mixer.mix(&mut out);
    let phase = mixer.voice(VoiceId::new(0)).unwrap().phase();
    let expected = (inc * 100.0) % WAVE_TABLE_SIZE as f32;
    assert!((phase - expected).abs() < 0.01, "phase {phase}, expected {expected}");
}
