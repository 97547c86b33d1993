use super::pipeline::Pipeline;
use super::request::AnalysisRequest;
use super::state::{JobInfo, JobState, JobTracker};
use super::view::{ResultsOutcome, ResultsView, StatusView};
use crate::error::{ErrorInfo, PipelineError, SubmitError};
use crate::render::EXPECTED_ARTIFACTS;
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

/// Single-job orchestrator: accepts submits, runs the pipeline in the
/// background and answers status and results queries.
pub struct JobManager {
    tracker: Arc<JobTracker>,
    pipeline: Arc<Pipeline>,
}

impl JobManager {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            tracker: Arc::new(JobTracker::new()),
            pipeline: Arc::new(pipeline),
        }
    }

    /// Validate and start a job. Must be called from within a Tokio runtime.
    pub fn submit(&self, video_url: &str, language: &str) -> Result<Uuid, SubmitError> {
        self.submit_request(AnalysisRequest::new(video_url, language))
    }

    pub fn submit_request(&self, request: AnalysisRequest) -> Result<Uuid, SubmitError> {
        let request = request.validate()?;
        let info = JobInfo::new(request.video_id.clone(), request.language);
        let job_id = info.job_id;
        self.tracker.begin(info)?;

        info!(
            "Accepted job {} for video {} ({})",
            job_id, request.video_id, request.language
        );

        let tracker = self.tracker.clone();
        let pipeline = self.pipeline.clone();
        tokio::spawn(async move {
            let worker_tracker = tracker.clone();
            let worker_pipeline = pipeline.clone();
            let worker = tokio::spawn(async move {
                worker_pipeline
                    .run(&worker_tracker, job_id, request)
                    .await
            });

            let outcome = match worker.await {
                Ok(result) => result,
                Err(e) => {
                    pipeline.store().discard(&job_id).await;
                    let message = if e.is_panic() {
                        panic_message(e.into_panic())
                    } else {
                        e.to_string()
                    };
                    Err(PipelineError::Panicked(message))
                }
            };

            match outcome {
                Ok(artifacts) => {
                    let files = artifacts.files.len();
                    if tracker.complete(job_id, artifacts) {
                        info!("Job {} done ({} artifacts)", job_id, files);
                    }
                }
                Err(e) => {
                    error!("Job {} failed: {}", job_id, e);
                    tracker.fail(job_id, ErrorInfo::from(&e));
                }
            }
        });

        Ok(job_id)
    }

    pub fn snapshot(&self) -> JobState {
        self.tracker.current()
    }

    pub fn poll(&self) -> StatusView {
        StatusView::from(&self.tracker.current())
    }

    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.tracker.subscribe()
    }

    /// Path of a committed artifact of the current job. Only files of a job in
    /// the done state resolve, so staging output is never reachable.
    pub fn artifact_path(&self, job_id: &Uuid, name: &str) -> Option<PathBuf> {
        if !EXPECTED_ARTIFACTS.contains(&name) {
            return None;
        }
        match self.tracker.current() {
            JobState::Done { artifacts, .. } if artifacts.job_id == *job_id => {
                artifacts.file(name).map(|f| f.path.clone())
            }
            _ => None,
        }
    }

    pub async fn results(&self) -> anyhow::Result<ResultsOutcome> {
        match self.tracker.current() {
            JobState::Done {
                artifacts,
                finished_at,
                ..
            } => {
                let view = ResultsView::load(&artifacts, finished_at).await?;
                Ok(ResultsOutcome::Ready(Box::new(view)))
            }
            JobState::Failed { info, error, .. } => Ok(ResultsOutcome::Failed {
                job_id: info.job_id,
                error,
            }),
            other => Ok(ResultsOutcome::NotReady {
                state: other.name(),
            }),
        }
    }

    /// Wait until the current job reaches a terminal state.
    pub async fn wait_until_finished(&self) -> JobState {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(JobState::is_terminal).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        state
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
