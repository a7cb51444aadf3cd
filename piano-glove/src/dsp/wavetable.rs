//! Single-cycle sine wavetable.

use crate::constants::WAVE_TABLE_SIZE;

const _: () = assert!(WAVE_TABLE_SIZE.is_power_of_two());

/// One full sine cycle scaled to the `i16` range.
///
/// Lookup is nearest-lower-index with no interpolation: a phase of `2.9`
/// reads entry 2.
#[derive(Clone)]
pub struct SineTable {
    samples: [i16; WAVE_TABLE_SIZE],
}

impl SineTable {
    pub fn new() -> Self {
        let mut samples = [0i16; WAVE_TABLE_SIZE];
        for (i, s) in samples.iter_mut().enumerate() {
            let theta = 2.0 * core::f32::consts::PI * i as f32 / WAVE_TABLE_SIZE as f32;
            *s = (libm::sinf(theta) * 32767.0) as i16;
        }
        SineTable { samples }
    }

    /// Sample at `phase`, where `phase` is in `[0, WAVE_TABLE_SIZE)`.
    #[inline(always)]
    pub fn lookup(&self, phase: f32) -> i16 {
        self.samples[(phase as usize) & (WAVE_TABLE_SIZE - 1)]
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SineTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SineTable")
            .field("len", &self.samples.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_points() {
        let t = SineTable::new();
        let q = WAVE_TABLE_SIZE / 4;
        assert_eq!(t.as_slice()[0], 0);
        assert!(t.as_slice()[q] >= 32766);
        assert!(t.as_slice()[2 * q].abs() <= 1);
        assert!(t.as_slice()[3 * q] <= -32766);
    }

    #[test]
    fn lookup_truncates_phase() {
        let t = SineTable::new();
        assert_eq!(t.lookup(10.0), t.as_slice()[10]);
        assert_eq!(t.lookup(10.99), t.as_slice()[10]);
    }

    #[test]
    fn odd_symmetry() {
        let t = SineTable::new();
        for i in 1..WAVE_TABLE_SIZE / 2 {
            let a = t.as_slice()[i] as i32;
            let b = t.as_slice()[WAVE_TABLE_SIZE - i] as i32;
            assert!((a + b).abs() <= 1, "index {i}: {a} vs {b}");
        }
    }
}
