mod health;
mod job_status;
mod transcribe;
mod transcript;

pub use health::health_handler;
pub use job_status::job_status_handler;
pub use transcribe::transcribe_handler;
pub use transcript::transcript_handler;
