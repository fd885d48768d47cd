mod ffmpeg_converter;
mod symphonia_converter;
pub mod wav;
mod wav_exporter;

pub use ffmpeg_converter::{check_ffmpeg_binary, FfmpegConverter};
pub use symphonia_converter::SymphoniaConverter;
pub use wav_exporter::WavSegmentExporter;
