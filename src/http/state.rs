use crate::job::JobManager;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single-job orchestrator behind every endpoint
    pub jobs: Arc<JobManager>,
}

impl AppState {
    pub fn new(jobs: JobManager) -> Self {
        Self {
            jobs: Arc::new(jobs),
        }
    }
}
