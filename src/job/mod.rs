//! Job orchestration
//!
//! One job at a time: `JobManager::submit` validates the request, moves the
//! watch-channel state to pending and spawns the fetch → analyze → render
//! pipeline. Poll and results calls only read the current state.

mod manager;
mod pipeline;
mod request;
mod state;
mod view;

pub use manager::JobManager;
pub use pipeline::{Pipeline, DEFAULT_FETCH_TIMEOUT};
pub use request::{AnalysisRequest, ValidatedRequest};
pub use state::{JobInfo, JobState, JobTracker, Stage};
pub use view::{artifact_url, ChartLink, ResultsOutcome, ResultsView, StatusView};
