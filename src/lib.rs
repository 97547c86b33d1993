pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod job;
pub mod render;

pub use analysis::{Analyzers, Emotion, Keyword, Sentiment};
pub use config::Config;
pub use error::{AnalysisError, ErrorInfo, ErrorKind, FetchError, PipelineError, SubmitError};
pub use fetch::{Comment, Language, TranscriptSegment, VideoMetadata, VideoSource, YouTubeClient};
pub use http::{create_router, AppState};
pub use job::{JobManager, JobState, Pipeline, Stage, StatusView};
pub use render::{AnalysisArtifacts, ArtifactRenderer, ArtifactStore, FileRenderer};
