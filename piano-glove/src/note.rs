//! Pitch lookup: finger + key color + octave to frequency.
//!
//! There is exactly one canonical path: [`Finger`] and [`KeyColor`] select a
//! [`Note`] from the finger map, and the note's discriminant indexes a column
//! of [`NOTE_FREQUENCIES`].
//!
//! ## Table layout
//!
//! Rows start at B rather than C. Row `n` holds B*n* followed by C*n+1*
//! through A#*n+1*, so octave 4 spans B4 (493.88 Hz) up to A#5
//! (932.33 Hz) and the thumb's white key in octave 4 is C5. Middle C is the
//! thumb in octave 3.

use crate::constants::{NUM_NOTES, NUM_OCTAVES};
use crate::finger::{Finger, FingerMap, KeyColor};

/// Pitch class, in table column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
}

impl Note {
    /// Column of this note in [`NOTE_FREQUENCIES`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Display name, e.g. `"C#"`.
    pub const fn name(self) -> &'static str {
        match self {
            Note::B => "B",
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
        }
    }
}

/// `(white, black)` note for each finger. The middle finger has no sharp,
/// so both of its colors play E.
pub const NOTE_MAP: FingerMap<(Note, Note)> = FingerMap::new([
    (Note::B, Note::B),
    (Note::C, Note::CSharp),
    (Note::D, Note::DSharp),
    (Note::E, Note::E),
    (Note::F, Note::FSharp),
    (Note::G, Note::GSharp),
    (Note::A, Note::ASharp),
]);

/// Equal-tempered frequencies in Hz, `[octave][note]`.
#[rustfmt::skip]
pub const NOTE_FREQUENCIES: [[f32; NUM_NOTES]; NUM_OCTAVES] = [
    [30.87, 32.70, 34.65, 36.71, 38.89, 41.20, 43.65, 46.25, 49.00, 51.91, 55.00, 58.27],
    [61.74, 65.41, 69.30, 73.42, 77.78, 82.41, 87.31, 92.50, 98.00, 103.83, 110.00, 116.54],
    [123.47, 130.81, 138.59, 146.83, 155.56, 164.81, 174.61, 184.99, 196.00, 207.65, 220.00, 233.08],
    [246.94, 261.63, 277.18, 293.66, 311.13, 329.63, 349.23, 369.99, 392.00, 415.30, 440.00, 466.16],
    [493.88, 523.25, 554.37, 587.33, 622.25, 659.25, 698.46, 739.99, 783.99, 830.61, 880.00, 932.33],
    [987.77, 1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91, 1479.98, 1567.98, 1661.22, 1760.00, 1864.66],
    [1975.53, 2093.00, 2217.46, 2349.32, 2489.02, 2637.02, 2793.83, 2959.96, 3135.96, 3322.44, 3520.00, 3729.31],
    [3951.07, 4186.01, 4434.92, 4698.63, 4978.03, 5274.04, 5587.65, 5919.91, 6271.93, 6644.88, 7040.00, 7458.62],
];

/// Note played by `finger` for a given key color, or `None` for an invalid press.
pub fn note_for(finger: Finger, color: KeyColor) -> Option<Note> {
    let (white, black) = NOTE_MAP[finger];
    match color {
        KeyColor::White => Some(white),
        KeyColor::Black => Some(black),
        KeyColor::Invalid => None,
    }
}

/// Frequency of `note` in `octave`, or `None` if the octave is off the table.
pub fn frequency(note: Note, octave: u8) -> Option<f32> {
    NOTE_FREQUENCIES
        .get(octave as usize)
        .map(|row| row[note.index()])
}

/// Resolve a classified press to a concrete pitch in Hz.
///
/// Returns `None` (no sound) for an invalid classification or an octave
/// outside the table.
pub fn resolve(finger: Finger, color: KeyColor, octave: u8) -> Option<f32> {
    note_for(finger, color).and_then(|note| frequency(note, octave))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_white_in_octave_four_is_d5() {
        let hz = resolve(Finger::Index, KeyColor::White, 4).unwrap();
        assert_eq!(hz, NOTE_FREQUENCIES[4][Note::D.index()]);
        assert_eq!(hz, 587.33);
    }

    #[test]
    fn thumb_white_in_octave_three_is_middle_c() {
        assert_eq!(resolve(Finger::Thumb, KeyColor::White, 3), Some(261.63));
        assert_eq!(resolve(Finger::Thumb, KeyColor::Black, 3), Some(277.18));
        assert_eq!(resolve(Finger::Thumb, KeyColor::White, 4), Some(523.25));
    }

    #[test]
    fn middle_finger_has_no_sharp() {
        assert_eq!(
            resolve(Finger::Middle, KeyColor::White, 5),
            resolve(Finger::Middle, KeyColor::Black, 5)
        );
    }

    #[test]
    fn thumb_flat_plays_b_below_c() {
        let b = resolve(Finger::ThumbFlat, KeyColor::White, 4).unwrap();
        let c = resolve(Finger::Thumb, KeyColor::White, 4).unwrap();
        assert!(b < c);
        assert_eq!(b, 493.88);
    }

    #[test]
    fn invalid_press_is_silent() {
        assert_eq!(resolve(Finger::Ring, KeyColor::Invalid, 4), None);
    }

    #[test]
    fn octave_off_table_is_silent() {
        assert_eq!(resolve(Finger::Ring, KeyColor::White, NUM_OCTAVES as u8), None);
        assert_eq!(frequency(Note::A, 200), None);
        assert_eq!(frequency(Note::ASharp, NUM_OCTAVES as u8 - 1), Some(7458.62));
    }

    #[test]
    fn rows_ascend_by_octave() {
        for octave in 1..NUM_OCTAVES {
            for note in 0..NUM_NOTES {
                let ratio = NOTE_FREQUENCIES[octave][note] / NOTE_FREQUENCIES[octave - 1][note];
                assert!((ratio - 2.0).abs() < 0.01, "octave {octave} note {note}: ratio {ratio}");
            }
        }
    }

    #[test]
    fn concert_a_sits_in_octave_three() {
        assert_eq!(frequency(Note::A, 3), Some(440.0));
    }

    #[test]
    fn names_round_out_the_chromatic_scale() {
        assert_eq!(Note::B.name(), "B");
        assert_eq!(Note::FSharp.name(), "F#");
        assert_eq!(Note::ASharp.name(), "A#");
    }
}
