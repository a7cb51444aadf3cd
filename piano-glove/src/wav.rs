//! Zero-copy RIFF/WAVE header parser.
//!
//! Locates the `fmt ` and `data` chunks in an in-memory file and borrows the
//! PCM payload without copying it. Chunks after the 12-byte RIFF header are
//! scanned in order; odd-sized chunks are followed by one pad byte, per RIFF.
//! Unknown chunks (`LIST`, `fact`, ...) are skipped. Scanning stops at the
//! first `data` chunk.
//!
//! ```
//! # fn main() -> Result<(), piano_glove::error::WavError> {
//! # let mut file = [0u8; 48];
//! # file[..4].copy_from_slice(b"RIFF");
//! # file[8..16].copy_from_slice(b"WAVEfmt ");
//! # file[16] = 16;
//! # file[20] = 1;
//! # file[22] = 2;
//! # file[24..28].copy_from_slice(&48_000u32.to_le_bytes());
//! # file[34] = 16;
//! # file[36..40].copy_from_slice(b"data");
//! # file[40] = 4;
//! let info = piano_glove::wav::parse(&file)?;
//! assert_eq!(info.sample_rate, 48_000);
//! assert_eq!(info.channels, 2);
//! assert_eq!(info.data.len(), 4);
//! # Ok(())
//! # }
//! ```

use crate::error::WavError;

/// Smallest file with a RIFF header, a 16-byte `fmt ` and a `data` header.
const MIN_FILE_LEN: usize = 44;
const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const PCM_FMT_LEN: usize = 16;
const FORMAT_PCM: u16 = 1;

/// Format and payload of a parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo<'a> {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Raw PCM bytes, borrowed from the input.
    pub data: &'a [u8],
}

impl WavInfo<'_> {
    /// Bytes per interleaved frame.
    pub fn block_align(&self) -> usize {
        self.channels as usize * (self.bits_per_sample as usize).div_ceil(8)
    }

    /// Whole frames in the payload.
    pub fn frames(&self) -> usize {
        match self.block_align() {
            0 => 0,
            align => self.data.len() / align,
        }
    }
}

struct Format {
    audio_format: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Parse `buf` as a PCM WAV file.
pub fn parse(buf: &[u8]) -> Result<WavInfo<'_>, WavError> {
    if buf.len() < MIN_FILE_LEN {
        return Err(WavError::TooShort);
    }
    if &buf[0..4] != b"RIFF" {
        return Err(WavError::MissingRiff);
    }
    if &buf[8..12] != b"WAVE" {
        return Err(WavError::MissingWave);
    }

    let mut offset = RIFF_HEADER_LEN;
    let mut format: Option<Format> = None;

    while offset + CHUNK_HEADER_LEN <= buf.len() {
        let id = &buf[offset..offset + 4];
        let size = read_u32(buf, offset + 4);
        let body = offset + CHUNK_HEADER_LEN;

        match id {
            b"fmt " => {
                if (size as usize) < PCM_FMT_LEN {
                    return Err(WavError::FmtTooSmall(size));
                }
                let end = chunk_end(body, size, buf.len()).ok_or(WavError::FmtOutOfRange)?;
                let fmt = &buf[body..end];
                format = Some(Format {
                    audio_format: read_u16(fmt, 0),
                    channels: read_u16(fmt, 2),
                    sample_rate: read_u32(fmt, 4),
                    bits_per_sample: read_u16(fmt, 14),
                });
            }
            b"data" => {
                let fmt = format.ok_or(WavError::DataBeforeFmt)?;
                let end = chunk_end(body, size, buf.len()).ok_or(WavError::DataOutOfRange)?;
                if fmt.audio_format != FORMAT_PCM {
                    return Err(WavError::NotPcm(fmt.audio_format));
                }
                return Ok(WavInfo {
                    audio_format: fmt.audio_format,
                    channels: fmt.channels,
                    sample_rate: fmt.sample_rate,
                    bits_per_sample: fmt.bits_per_sample,
                    data: &buf[body..end],
                });
            }
            _ => {}
        }

        let padded = size as usize + (size as usize & 1);
        offset = match body.checked_add(padded) {
            Some(next) => next,
            None => break,
        };
    }

    Err(WavError::MissingChunk)
}

/// End of a chunk body, if it fits in `len` bytes.
fn chunk_end(body: usize, size: u32, len: usize) -> Option<usize> {
    body.checked_add(size as usize).filter(|&end| end <= len)
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
