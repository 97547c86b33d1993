use crate::error::{ErrorInfo, SubmitError};
use crate::fetch::Language;
use crate::render::AnalysisArtifacts;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// Pipeline stage of a running job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetching,
    Analyzing,
    Rendering,
}

/// Identity of a submitted job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobInfo {
    pub job_id: Uuid,
    pub video_id: String,
    pub language: Language,
    pub submitted_at: DateTime<Utc>,
}

impl JobInfo {
    pub fn new(video_id: String, language: Language) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            video_id,
            language,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum JobState {
    Idle,
    Pending {
        info: JobInfo,
    },
    Running {
        info: JobInfo,
        stage: Stage,
    },
    Done {
        info: JobInfo,
        finished_at: DateTime<Utc>,
        artifacts: Arc<AnalysisArtifacts>,
    },
    Failed {
        info: JobInfo,
        finished_at: DateTime<Utc>,
        error: ErrorInfo,
    },
}

impl JobState {
    pub fn name(&self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::Pending { .. } => "pending",
            JobState::Running { .. } => "running",
            JobState::Done { .. } => "done",
            JobState::Failed { .. } => "failed",
        }
    }

    pub fn info(&self) -> Option<&JobInfo> {
        match self {
            JobState::Idle => None,
            JobState::Pending { info }
            | JobState::Running { info, .. }
            | JobState::Done { info, .. }
            | JobState::Failed { info, .. } => Some(info),
        }
    }

    pub fn job_id(&self) -> Option<Uuid> {
        self.info().map(|i| i.job_id)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done { .. } | JobState::Failed { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, JobState::Pending { .. } | JobState::Running { .. })
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            JobState::Running { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        match self {
            JobState::Done { finished_at, .. } | JobState::Failed { finished_at, .. } => {
                Some(*finished_at)
            }
            _ => None,
        }
    }
}

/// Owner of the job-state watch channel.
///
/// All writes go through `begin` (submit side) and `transition` (pipeline side).
/// A transition is dropped when it names a job that is not current or when the
/// current job already reached a terminal state.
#[derive(Debug)]
pub struct JobTracker {
    tx: watch::Sender<JobState>,
}

impl JobTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(JobState::Idle);
        Self { tx }
    }

    pub fn current(&self) -> JobState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.tx.subscribe()
    }

    /// Move to `Pending` for `info`, unless another job is in flight.
    pub fn begin(&self, info: JobInfo) -> Result<(), SubmitError> {
        let mut busy = None;
        self.tx.send_if_modified(|state| {
            if state.is_in_flight() {
                busy = state.job_id();
                return false;
            }
            *state = JobState::Pending { info };
            true
        });

        match busy {
            Some(job_id) => Err(SubmitError::JobInFlight {
                job_id: job_id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Apply `next` to the current job. Returns whether the state changed.
    pub fn transition(&self, job_id: Uuid, next: impl FnOnce(JobInfo) -> JobState) -> bool {
        let applied = self.tx.send_if_modified(|state| {
            if state.is_terminal() {
                return false;
            }
            let info = match state.info() {
                Some(info) if info.job_id == job_id => info.clone(),
                _ => return false,
            };
            *state = next(info);
            true
        });

        if applied {
            debug!("Job {} -> {}", job_id, self.tx.borrow().name());
        } else {
            warn!("Ignored state transition for job {}", job_id);
        }
        applied
    }

    pub fn set_stage(&self, job_id: Uuid, stage: Stage) -> bool {
        self.transition(job_id, |info| JobState::Running { info, stage })
    }

    pub fn complete(&self, job_id: Uuid, artifacts: AnalysisArtifacts) -> bool {
        let artifacts = Arc::new(artifacts);
        self.transition(job_id, |info| JobState::Done {
            info,
            finished_at: Utc::now(),
            artifacts,
        })
    }

    pub fn fail(&self, job_id: Uuid, error: ErrorInfo) -> bool {
        self.transition(job_id, |info| JobState::Failed {
            info,
            finished_at: Utc::now(),
            error,
        })
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}
