//! DSP primitives shared by the synthesizer.

pub mod intrinsics;
pub mod wavetable;

pub use wavetable::SineTable;
