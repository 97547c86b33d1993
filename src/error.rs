use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Synchronous, caller-facing failures of a submit call. None of these start a job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Not a YouTube video URL: {url}")]
    InvalidUrl { url: String },

    #[error("Unsupported transcript language: {code} (expected en, hi or te)")]
    UnsupportedLanguage { code: String },

    #[error("Job {job_id} is still in progress")]
    JobInFlight { job_id: String },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Video {video_id} not found")]
    NotFound { video_id: String },

    #[error("No transcript available for video {video_id} in language {language}")]
    TranscriptUnavailable { video_id: String, language: String },

    #[error("Comments are disabled for video {video_id}")]
    CommentsDisabled { video_id: String },

    #[error("YouTube rate limit or quota exceeded: {reason}")]
    RateLimited { reason: String },

    #[error("YouTube API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Missing API key: set youtube.api_key or the YOUTUBE_API_KEY environment variable")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response payload: {0}")]
    Decode(String),

    #[error("Fetch stage timed out after {secs}s")]
    Timeout { secs: u64 },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Inference failed: {reason}")]
    Inference { reason: String },

    #[error("Inference request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected inference payload: {0}")]
    Decode(String),

    #[error("Analyzer task failed: {0}")]
    Task(String),
}

/// Everything that can end a background job in the failed state.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Rendering failed: {0:#}")]
    Render(anyhow::Error),

    #[error("Pipeline task panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Fetch,
    Analysis,
    Render,
    Internal,
}

/// Serializable summary of a failed job, exposed through poll and results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&PipelineError> for ErrorInfo {
    fn from(err: &PipelineError) -> Self {
        let kind = match err {
            PipelineError::Fetch(_) => ErrorKind::Fetch,
            PipelineError::Analysis(_) => ErrorKind::Analysis,
            PipelineError::Render(_) => ErrorKind::Render,
            PipelineError::Panicked(_) => ErrorKind::Internal,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}
