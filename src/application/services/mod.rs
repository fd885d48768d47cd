mod compliance;
mod dispatcher;
mod normalizer;
mod pipeline;
mod planner;
mod worker;

pub use compliance::{ComplianceConfig, SizeComplianceLoop};
pub use dispatcher::{DispatchError, DispatchMode, TranscriptionDispatcher};
pub use normalizer::FormatNormalizer;
pub use pipeline::{PipelineError, TranscriptOutput, TranscriptionPipeline};
pub use planner::{plan, PlannerConfig, PlanningError};
pub use worker::{TranscriptionJobMessage, TranscriptionWorker, WorkerError};
