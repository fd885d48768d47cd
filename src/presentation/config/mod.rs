mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DispatchSettings, SegmentationSettings, ServerSettings, Settings, TranscriptionSettings,
    UploadSettings,
};
