//! RIFF/WAVE PCM decoder
//!
//! Parses the Microsoft RIFF layout:
//! `"RIFF" | size | "WAVE" | "fmt " | fmt_len | tag | channels | fs |
//! avg_bps | block_align | bits_per_sample | <2 filler bytes> | "data" |
//! data_len | samples`.
//!
//! Only PCM is decoded; the mu-law, A-law and ADPCM tags are recognized
//! and rejected. Channel 1 lands in the real component; when the
//! destination list is complex, channel 2 lands in the imaginary
//! component. 8-bit samples are unsigned and get a range factor of 128
//! subtracted to remove the DC offset.
//!
//! The two filler bytes between the fmt chunk and the data chunk match
//! an 18-byte fmt chunk layout; parsers for arbitrary WAVE files would
//! have to honour `fmt_len` and skip unknown chunks instead.

use bytes::Buf;
use tracing::debug;

use crate::complex::{Complex, Real};
use crate::error::{Result, SignalError};
use crate::samples::{SampleKind, SampleList};

const FMT_NONE: u16 = 0x0000;
const FMT_PCM: u16 = 0x0001;
const FMT_MULAW: u16 = 0x0101;
const FMT_ALAW: u16 = 0x0102;
const FMT_ADPCM: u16 = 0x0103;

/// WAVE format tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveFormat {
    None,
    Pcm,
    MuLaw,
    ALaw,
    Adpcm,
    Unknown(u16),
}

impl WaveFormat {
    fn from_tag(tag: u16) -> Self {
        match tag {
            FMT_NONE => WaveFormat::None,
            FMT_PCM => WaveFormat::Pcm,
            FMT_MULAW => WaveFormat::MuLaw,
            FMT_ALAW => WaveFormat::ALaw,
            FMT_ADPCM => WaveFormat::Adpcm,
            other => WaveFormat::Unknown(other),
        }
    }

    fn describe(&self) -> String {
        match self {
            WaveFormat::None => "no format".into(),
            WaveFormat::Pcm => "PCM".into(),
            WaveFormat::MuLaw => "IBM mu-law".into(),
            WaveFormat::ALaw => "IBM A-law".into(),
            WaveFormat::Adpcm => "IBM ADPCM".into(),
            WaveFormat::Unknown(tag) => format!("unknown tag {tag:#06x}"),
        }
    }
}

/// Parsed description of a RIFF/WAVE file
#[derive(Debug, Clone)]
pub struct WaveInfo {
    /// RIFF chunk size
    pub riff_size: u32,
    /// WAVE format chunk length
    pub fmt_length: u32,
    pub format: WaveFormat,
    pub channels: u16,
    pub samples_per_second: u32,
    pub average_bytes_per_second: u32,
    /// Bytes used to store one sample across all channels (block align)
    pub bytes_per_sample: u16,
    pub bits_per_sample: u16,
    /// Data chunk length in bytes
    pub data_length: u32,
}

impl WaveInfo {
    /// Number of samples in the data chunk
    pub fn num_samples(&self) -> usize {
        if self.bytes_per_sample == 0 {
            0
        } else {
            self.data_length as usize / self.bytes_per_sample as usize
        }
    }
}

fn need(buf: &impl Buf, bytes: usize, what: &str) -> Result<()> {
    if buf.remaining() < bytes {
        return Err(SignalError::Io {
            reason: format!("unexpected end of WAVE data while reading {what}"),
        });
    }
    Ok(())
}

fn read_magic(buf: &mut impl Buf, expected: &[u8; 4], what: &str) -> Result<()> {
    need(buf, 4, what)?;
    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if &magic != expected {
        return Err(SignalError::UnsupportedFormat {
            details: format!(
                "bad {what} magic: {:?}",
                String::from_utf8_lossy(&magic)
            ),
        });
    }
    Ok(())
}

/// Checks whether the data starts with a plausible RIFF chunk
pub fn detect(data: &[u8]) -> bool {
    data.len() >= 8 && &data[0..4] == b"RIFF"
}

/// One little-endian PCM value of `bytes` width
///
/// Single-byte samples are unsigned; wider samples are signed with the
/// most significant byte carrying the sign.
fn read_pcm_value(buf: &mut impl Buf, bytes: usize) -> Result<i32> {
    need(buf, bytes, "PCM sample")?;
    match bytes {
        1 => Ok(buf.get_u8() as i32),
        2 => Ok(buf.get_i16_le() as i32),
        _ => {
            let mut value: i64 = 0;
            for i in 0..bytes {
                let byte = buf.get_u8() as i64;
                if i == bytes - 1 {
                    // Sign extension through the top byte
                    value += (byte as i8 as i64) << (8 * i);
                } else {
                    value += byte << (8 * i);
                }
            }
            Ok(value as i32)
        }
    }
}

/// Decodes a RIFF/WAVE PCM file into the given sample list
pub fn decode(data: &[u8], list: &mut SampleList) -> Result<WaveInfo> {
    let mut buf = data;

    read_magic(&mut buf, b"RIFF", "RIFF")?;
    need(&buf, 4, "RIFF size")?;
    let riff_size = buf.get_u32_le();
    read_magic(&mut buf, b"WAVE", "WAVE")?;
    read_magic(&mut buf, b"fmt ", "fmt")?;

    need(&buf, 20, "fmt chunk")?;
    let fmt_length = buf.get_u32_le();
    let format = WaveFormat::from_tag(buf.get_u16_le());
    let channels = buf.get_u16_le();
    let samples_per_second = buf.get_u32_le();
    let average_bytes_per_second = buf.get_u32_le();
    let bytes_per_sample = buf.get_u16_le();
    let bits_per_sample = buf.get_u16_le();

    if format != WaveFormat::Pcm {
        return Err(SignalError::UnsupportedFormat {
            details: format!("unsupported WAVE format: {}", format.describe()),
        });
    }
    if channels == 0 || bytes_per_sample == 0 {
        return Err(SignalError::UnsupportedFormat {
            details: "WAVE format chunk has no channels or zero block align".into(),
        });
    }

    // Filler word between the fmt and data chunks
    need(&buf, 2, "fmt filler")?;
    buf.advance(2);

    read_magic(&mut buf, b"data", "data")?;
    need(&buf, 4, "data length")?;
    let data_length = buf.get_u32_le();

    let info = WaveInfo {
        riff_size,
        fmt_length,
        format,
        channels,
        samples_per_second,
        average_bytes_per_second,
        bytes_per_sample,
        bits_per_sample,
        data_length,
    };

    debug!(
        channels,
        samples_per_second,
        bits_per_sample,
        samples = info.num_samples(),
        "decoding PCM WAVE data"
    );

    let samples = info.num_samples();
    let bytes_per_channel = (bytes_per_sample / channels) as usize;
    if bytes_per_channel == 0 {
        return Err(SignalError::UnsupportedFormat {
            details: "block align smaller than channel count".into(),
        });
    }

    // 8-bit PCM is unsigned with a DC offset of 128
    let range_factor: Real = if bytes_per_sample == 1 { 128.0 } else { 0.0 };

    if samples_per_second != 0 {
        let norm = list.ini_norm_time();
        list.set_time_scale(0.0, 1.0 / samples_per_second as Real, norm);
    }
    list.resize(samples);

    let complex_target = list.kind() == SampleKind::Complex;
    for cur_sample in 1..=samples {
        let mut z = Complex::new(0.0, 0.0);
        for cur_channel in 1..=channels {
            let value = read_pcm_value(&mut buf, bytes_per_channel)? as Real - range_factor;
            if cur_channel == 1 {
                z.re = value;
            } else if cur_channel == 2 && complex_target {
                z.im = value;
            }
        }
        list.set(cur_sample, z)?;
    }

    Ok(info)
}
