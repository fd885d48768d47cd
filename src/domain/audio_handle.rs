use std::fmt;
use std::path::PathBuf;

/// Canonical working encoding: 44.1 kHz mono 16-bit linear PCM.
pub const CANONICAL_SAMPLE_RATE: u32 = 44_100;
pub const CANONICAL_CHANNELS: u16 = 1;

/// Container format the upload arrived in, as declared by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Mp3,
    Wav,
    M4a,
    Ogg,
    Flac,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "m4a" => Some(Self::M4a),
            "ogg" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to decoded canonical audio in the job workspace.
///
/// Produced by the format normalizer; read-only to every downstream stage.
/// The file it points at lives inside the job's temporary directory and is
/// removed with the rest of the workspace when the job ends.
#[derive(Debug, Clone)]
pub struct AudioHandle {
    pub path: PathBuf,
    pub duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub byte_size: u64,
    pub source_format: SourceFormat,
}

impl AudioHandle {
    /// Average encoded byte rate in bytes per millisecond.
    pub fn byte_rate(&self) -> f64 {
        self.byte_size as f64 / self.duration_ms as f64
    }
}
