//! ARM DSP instruction wrappers with pure-Rust fallbacks.
//!
//! On `thumbv7em` targets (Cortex-M4/M7 with the DSP extension) these compile
//! to single-cycle instructions; on the host the portable branch is used.

/// Saturate an `i32` to the `i16` range (`-32768..=32767`).
///
/// Maps to ARM `SSAT #16`.
#[inline(always)]
pub fn saturate16(val: i32) -> i16 {
    #[cfg(all(target_arch = "arm", target_feature = "dsp"))]
    {
        let out: i32;
        // SAFETY: `ssat` only reads and writes the named registers.
        unsafe {
            core::arch::asm!(
                "ssat {out}, #16, {val}",
                out = out(reg) out,
                val = in(reg) val,
                options(pure, nomem, nostack),
            );
        }
        out as i16
    }
    #[cfg(not(all(target_arch = "arm", target_feature = "dsp")))]
    {
        val.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_passes_through() {
        assert_eq!(saturate16(0), 0);
        assert_eq!(saturate16(1234), 1234);
        assert_eq!(saturate16(-32768), -32768);
        assert_eq!(saturate16(32767), 32767);
    }

    #[test]
    fn clips_both_rails() {
        assert_eq!(saturate16(32768), 32767);
        assert_eq!(saturate16(3 * 32767), 32767);
        assert_eq!(saturate16(-32769), -32768);
        assert_eq!(saturate16(i32::MIN), -32768);
    }
}
