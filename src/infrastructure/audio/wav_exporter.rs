use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{ExportError, SegmentExporter};
use crate::domain::{AudioHandle, ExportParams, SegmentRange};

use super::symphonia_converter;
use super::wav;

/// Exports time slices of the canonical WAV by byte offset, optionally
/// downmixing and resampling before writing the segment file.
pub struct WavSegmentExporter;

impl WavSegmentExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WavSegmentExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SegmentExporter for WavSegmentExporter {
    async fn export(
        &self,
        handle: &AudioHandle,
        range: SegmentRange,
        params: ExportParams,
        dest: &Path,
    ) -> Result<u64, ExportError> {
        let source = handle.path.clone();
        let dest = dest.to_path_buf();

        tokio::task::spawn_blocking(move || export_blocking(&source, range, params, &dest))
            .await
            .map_err(|e| ExportError::ExportFailed(format!("export task panicked: {}", e)))?
    }
}

fn export_blocking(
    source: &PathBuf,
    range: SegmentRange,
    params: ExportParams,
    dest: &Path,
) -> Result<u64, ExportError> {
    let info = wav::read_info(source)
        .map_err(|e| ExportError::ExportFailed(format!("canonical wav unreadable: {}", e)))?;

    // Frame-aligned byte window for the requested time range.
    let start_frame = (range.start_ms * info.sample_rate as u64) / 1_000;
    let end_frame = ((range.end_ms * info.sample_rate as u64) / 1_000).min(info.frame_count());
    if start_frame >= end_frame {
        return Err(ExportError::ExportFailed(format!(
            "range {} maps to an empty sample window",
            range
        )));
    }

    let bytes_per_frame = info.bytes_per_frame();
    let offset = info.data_offset + start_frame * bytes_per_frame;
    let len = (end_frame - start_frame) * bytes_per_frame;

    let mut file = File::open(source)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut raw = vec![0u8; len as usize];
    file.read_exact(&mut raw)?;

    let mut samples: Vec<i16> = raw
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    if params.channels == 1 && info.channels > 1 {
        samples = downmix(&samples, info.channels as usize);
    }

    if params.sample_rate != info.sample_rate {
        let floats: Vec<f32> = samples.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
        let resampled =
            symphonia_converter::resample(&floats, info.sample_rate, params.sample_rate)
                .map_err(|e| ExportError::ResamplingFailed(e.to_string()))?;
        samples = wav::f32_to_pcm16(&resampled);
    }

    let bytes = wav::wav_bytes(params.sample_rate, params.channels, &samples);
    std::fs::write(dest, &bytes)?;

    Ok(bytes.len() as u64)
}

fn downmix(samples: &[i16], channels: usize) -> Vec<i16> {
    samples
        .chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}
