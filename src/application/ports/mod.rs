mod audio_converter;
mod job_repository;
mod progress_sink;
mod segment_exporter;
mod transcription_client;

pub use audio_converter::{AudioConverter, ConversionError};
pub use job_repository::{JobRepository, RepositoryError};
pub use progress_sink::{NullProgressSink, ProgressSink};
pub use segment_exporter::{ExportError, SegmentExporter};
pub use transcription_client::{TranscriptionClient, TranscriptionError};
