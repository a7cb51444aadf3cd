//! Finger identities and per-finger storage.
//!
//! The glove has seven piezo sensors. Each [`Finger`] owns one ADC channel
//! and one LED, and per-finger state is kept in a [`FingerMap`] indexed by
//! the closed enum rather than by raw integers.

use core::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sensor position on the glove, ordered from the flat thumb to the flat pinky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Finger {
    /// Thumb shifted down a semitone; plays B.
    ThumbFlat,
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
    /// Pinky stretched up; plays A / A#.
    PinkyFlat,
}

impl Finger {
    /// Number of fingers with a sensor.
    pub const COUNT: usize = 7;

    /// All fingers in polling order.
    pub const ALL: [Finger; Finger::COUNT] = [
        Finger::ThumbFlat,
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
        Finger::PinkyFlat,
    ];

    /// Position of this finger in [`Finger::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// ADC channel wired to this finger's piezo sensor.
    pub const fn adc_channel(self) -> u8 {
        match self {
            Finger::ThumbFlat => 6,
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Pinky => 4,
            Finger::PinkyFlat => 5,
        }
    }

    /// GPIO index of this finger's LED.
    pub const fn led_index(self) -> u8 {
        self as u8
    }
}

/// Fixed-size storage with one `T` per finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerMap<T> {
    values: [T; Finger::COUNT],
}

impl<T> FingerMap<T> {
    /// Build a map from one value per finger, in [`Finger::ALL`] order.
    pub const fn new(values: [T; Finger::COUNT]) -> Self {
        FingerMap { values }
    }

    /// Build a map by evaluating `f` for every finger.
    pub fn from_fn(mut f: impl FnMut(Finger) -> T) -> Self {
        FingerMap {
            values: core::array::from_fn(|i| f(Finger::ALL[i])),
        }
    }

    /// Iterate `(finger, value)` pairs in polling order.
    pub fn iter(&self) -> impl Iterator<Item = (Finger, &T)> {
        Finger::ALL.iter().copied().zip(self.values.iter())
    }

    /// Iterate `(finger, value)` pairs mutably in polling order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Finger, &mut T)> {
        Finger::ALL.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T: Copy> FingerMap<T> {
    /// A map with the same value for every finger.
    pub const fn splat(value: T) -> Self {
        FingerMap {
            values: [value; Finger::COUNT],
        }
    }
}

impl<T> Index<Finger> for FingerMap<T> {
    type Output = T;

    fn index(&self, finger: Finger) -> &T {
        &self.values[finger.index()]
    }
}

impl<T> IndexMut<Finger> for FingerMap<T> {
    fn index_mut(&mut self, finger: Finger) -> &mut T {
        &mut self.values[finger.index()]
    }
}

/// Classification of a press by its strength.
///
/// A firm press plays the finger's natural (white) note, a gentle press its
/// sharp (black) note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyColor {
    White,
    Black,
    /// Too weak to be a press.
    Invalid,
}

impl KeyColor {
    /// `true` for [`KeyColor::White`] and [`KeyColor::Black`].
    pub const fn is_valid(self) -> bool {
        !matches!(self, KeyColor::Invalid)
    }
}

/// A completed press cycle (rise then fall) on one finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub finger: Finger,
    pub color: KeyColor,
    /// Peak ADC reading of the press.
    pub magnitude: u16,
    /// Millisecond timestamp of the falling edge that completed the press.
    pub timestamp: u32,
    /// Frequency the press resolved to, if it was playable.
    pub frequency: Option<f32>,
}
