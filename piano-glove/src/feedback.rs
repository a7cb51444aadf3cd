//! User feedback sinks: one LED per finger and a 16×2 status display.
//!
//! Both are fire-and-forget from the pipeline's point of view. Failures are
//! returned so the caller can count them, never retried.

use core::fmt::Write;

use embedded_hal::digital::OutputPin;
use heapless::String;

use crate::finger::Finger;
use crate::note::Note;

/// Display width in characters.
pub const STATUS_COLUMNS: usize = 16;

/// One display row of text.
pub type StatusLine = String<STATUS_COLUMNS>;

const BLANK_ROW: &str = "                ";

const _: () = assert!(BLANK_ROW.len() == STATUS_COLUMNS);

/// Start-up banner, exactly one row wide.
pub const BANNER: &str = "PIANO PROFESSOR!";

/// Row showing the current octave.
pub const OCTAVE_ROW: u8 = 0;

/// Row showing the last played note.
pub const NOTE_ROW: u8 = 1;

/// Bank of on/off indicators addressed by index.
pub trait Indicators {
    type Error: core::fmt::Debug;

    fn set_indicator(&mut self, index: u8, on: bool) -> Result<(), Self::Error>;

    /// Light `finger`'s indicator and turn every other one off.
    fn light_only(&mut self, finger: Finger) -> Result<(), Self::Error> {
        for f in Finger::ALL {
            self.set_indicator(f.led_index(), f == finger)?;
        }
        Ok(())
    }

    fn all_off(&mut self) -> Result<(), Self::Error> {
        for f in Finger::ALL {
            self.set_indicator(f.led_index(), false)?;
        }
        Ok(())
    }
}

/// Character display with a cursor.
pub trait StatusDisplay {
    type Error: core::fmt::Debug;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;
    fn print_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Overwrite `row` from column 0, blanking whatever the previous line
    /// left past the end of `text`. Text is ASCII.
    fn show_line(&mut self, row: u8, text: &str) -> Result<(), Self::Error> {
        self.set_cursor(0, row)?;
        self.print_text(text)?;
        let pad = STATUS_COLUMNS.saturating_sub(text.len());
        if pad > 0 {
            self.print_text(&BLANK_ROW[..pad])?;
        }
        Ok(())
    }
}

/// Per-finger LEDs on GPIO pins, in [`Finger::ALL`] order.
pub struct LedBank<P> {
    pins: [P; Finger::COUNT],
}

impl<P: OutputPin> LedBank<P> {
    pub fn new(pins: [P; Finger::COUNT]) -> Self {
        LedBank { pins }
    }

    pub fn release(self) -> [P; Finger::COUNT] {
        self.pins
    }
}

impl<P: OutputPin> Indicators for LedBank<P> {
    type Error = P::Error;

    /// Indices past the last finger are ignored.
    fn set_indicator(&mut self, index: u8, on: bool) -> Result<(), Self::Error> {
        match self.pins.get_mut(index as usize) {
            Some(pin) if on => pin.set_high(),
            Some(pin) => pin.set_low(),
            None => Ok(()),
        }
    }
}

/// `"Playing note C#"`
pub fn note_line(note: Note) -> StatusLine {
    let mut line = StatusLine::new();
    // 15 characters at most, always fits
    let _ = write!(line, "Playing note {}", note.name());
    line
}

/// `"Octave: 4"`
pub fn octave_line(octave: u8) -> StatusLine {
    let mut line = StatusLine::new();
    let _ = write!(line, "Octave: {}", octave);
    line
}
