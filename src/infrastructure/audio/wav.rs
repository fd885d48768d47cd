use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::domain::{CANONICAL_CHANNELS, CANONICAL_SAMPLE_RATE};

const PCM_FORMAT_TAG: u16 = 1;

/// Parsed layout of a PCM WAV file.
#[derive(Debug, Clone, Copy)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Byte offset of the first sample in the file.
    pub data_offset: u64,
    /// Length of the sample data in bytes.
    pub data_len: u64,
}

impl WavInfo {
    pub fn bytes_per_frame(&self) -> u64 {
        self.channels as u64 * (self.bits_per_sample as u64 / 8)
    }

    pub fn frame_count(&self) -> u64 {
        self.data_len / self.bytes_per_frame()
    }

    pub fn duration_ms(&self) -> u64 {
        self.frame_count() * 1_000 / self.sample_rate as u64
    }

    pub fn is_canonical(&self) -> bool {
        self.sample_rate == CANONICAL_SAMPLE_RATE
            && self.channels == CANONICAL_CHANNELS
            && self.bits_per_sample == 16
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WavError {
    #[error("malformed wav: {0}")]
    Malformed(String),
    #[error("unsupported wav encoding: {0}")]
    Unsupported(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Parse the RIFF chunk layout of a WAV file without reading sample data.
pub fn read_info(path: &Path) -> Result<WavInfo, WavError> {
    let mut file = std::fs::File::open(path)?;
    read_info_from(&mut file)
}

pub fn read_info_from<R: Read + Seek>(reader: &mut R) -> Result<WavInfo, WavError> {
    let mut riff = [0u8; 12];
    reader
        .read_exact(&mut riff)
        .map_err(|_| WavError::Malformed("file shorter than RIFF header".to_string()))?;
    if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err(WavError::Malformed("missing RIFF/WAVE signature".to_string()));
    }

    let mut fmt: Option<(u16, u16, u32, u16)> = None;
    let mut data: Option<(u64, u64)> = None;

    // Walk chunks until both fmt and data are known.
    loop {
        let mut header = [0u8; 8];
        if reader.read_exact(&mut header).is_err() {
            break;
        }
        let chunk_id = [header[0], header[1], header[2], header[3]];
        let chunk_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as u64;

        match &chunk_id {
            b"fmt " => {
                let mut body = vec![0u8; chunk_len.min(16) as usize];
                reader.read_exact(&mut body)?;
                if body.len() < 16 {
                    return Err(WavError::Malformed("fmt chunk too short".to_string()));
                }
                let format_tag = u16::from_le_bytes([body[0], body[1]]);
                let channels = u16::from_le_bytes([body[2], body[3]]);
                let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                let bits_per_sample = u16::from_le_bytes([body[14], body[15]]);
                fmt = Some((format_tag, channels, sample_rate, bits_per_sample));
                // Skip any fmt extension plus pad byte.
                let consumed = body.len() as u64;
                let remaining = chunk_len - consumed + (chunk_len & 1);
                reader.seek(SeekFrom::Current(remaining as i64))?;
            }
            b"data" => {
                let offset = reader.stream_position()?;
                data = Some((offset, chunk_len));
                reader.seek(SeekFrom::Current((chunk_len + (chunk_len & 1)) as i64))?;
            }
            _ => {
                reader.seek(SeekFrom::Current((chunk_len + (chunk_len & 1)) as i64))?;
            }
        }

        if fmt.is_some() && data.is_some() {
            break;
        }
    }

    let (format_tag, channels, sample_rate, bits_per_sample) =
        fmt.ok_or_else(|| WavError::Malformed("no fmt chunk".to_string()))?;
    let (data_offset, data_len) =
        data.ok_or_else(|| WavError::Malformed("no data chunk".to_string()))?;

    if format_tag != PCM_FORMAT_TAG {
        return Err(WavError::Unsupported(format!(
            "format tag {} (only linear PCM supported)",
            format_tag
        )));
    }
    if bits_per_sample != 16 {
        return Err(WavError::Unsupported(format!(
            "{} bits per sample (only 16 supported)",
            bits_per_sample
        )));
    }
    if channels == 0 || sample_rate == 0 {
        return Err(WavError::Malformed("zero channels or sample rate".to_string()));
    }

    Ok(WavInfo {
        sample_rate,
        channels,
        bits_per_sample,
        data_offset,
        data_len,
    })
}

/// Build a complete PCM16 WAV file image in memory.
pub fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;
    let bits_per_sample = 16u16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * block_align as u32;

    let mut wav = Vec::with_capacity(44 + samples.len() * 2);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }
    wav
}

/// Convert float samples in `[-1.0, 1.0]` to PCM16.
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrips_header_through_parser() {
        let samples: Vec<i16> = (0..4410).map(|i| (i % 128) as i16).collect();
        let bytes = wav_bytes(44_100, 1, &samples);
        let info = read_info_from(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(info.sample_rate, 44_100);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frame_count(), 4410);
        assert_eq!(info.duration_ms(), 100);
        assert!(info.is_canonical());
    }

    #[test]
    fn rejects_non_riff_input() {
        let garbage = vec![0u8; 64];
        let err = read_info_from(&mut Cursor::new(garbage)).unwrap_err();
        assert!(matches!(err, WavError::Malformed(_)));
    }

    #[test]
    fn stereo_16khz_is_not_canonical() {
        let bytes = wav_bytes(16_000, 2, &[0i16; 64]);
        let info = read_info_from(&mut Cursor::new(bytes)).unwrap();
        assert!(!info.is_canonical());
        assert_eq!(info.frame_count(), 32);
    }
}
