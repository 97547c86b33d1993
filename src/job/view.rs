use super::state::{JobState, Stage};
use crate::error::ErrorInfo;
use crate::fetch::Language;
use crate::render::{AnalysisArtifacts, ArtifactFile, ArtifactKind, Table, FULL_TEXT};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Decimal places for numeric cells in the results view
pub const RESULT_DECIMALS: i32 = 2;

/// Poll payload. `done` is true exactly for the done and failed states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub done: bool,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl From<&JobState> for StatusView {
    fn from(state: &JobState) -> Self {
        let info = state.info();
        Self {
            done: state.is_terminal(),
            state: state.name(),
            job_id: info.map(|i| i.job_id),
            video_id: info.map(|i| i.video_id.clone()),
            language: info.map(|i| i.language),
            stage: state.stage(),
            submitted_at: info.map(|i| i.submitted_at),
            finished_at: state.finished_at(),
            error: match state {
                JobState::Failed { error, .. } => Some(error.clone()),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLink {
    pub name: String,
    pub url: String,
}

/// Everything the results page shows for a finished job
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub status: &'static str,
    pub job_id: Uuid,
    pub video_id: String,
    pub language: Language,
    pub title: String,
    pub channel_name: String,
    pub full_text: String,
    pub tables: Vec<Table>,
    pub charts: Vec<ChartLink>,
    pub files: Vec<ArtifactFile>,
    pub finished_at: DateTime<Utc>,
}

impl ResultsView {
    /// Build the view from committed artifacts, reading the transcript text back from disk.
    pub async fn load(artifacts: &AnalysisArtifacts, finished_at: DateTime<Utc>) -> Result<Self> {
        let text_path = artifacts.dir.join(FULL_TEXT);
        let full_text = tokio::fs::read_to_string(&text_path)
            .await
            .with_context(|| format!("Failed to read {}", text_path.display()))?;

        let charts = artifacts
            .files
            .iter()
            .filter(|f| f.kind == ArtifactKind::Chart)
            .map(|f| ChartLink {
                name: f.name.clone(),
                url: artifact_url(&artifacts.job_id, &f.name),
            })
            .collect();

        Ok(Self {
            status: "done",
            job_id: artifacts.job_id,
            video_id: artifacts.metadata.video_id.clone(),
            language: artifacts.language,
            title: artifacts.metadata.title.clone(),
            channel_name: artifacts.metadata.channel_name.clone(),
            full_text,
            tables: artifacts
                .tables
                .iter()
                .map(|t| t.rounded(RESULT_DECIMALS))
                .collect(),
            charts,
            files: artifacts.files.clone(),
            finished_at,
        })
    }
}

/// Public URL of a committed artifact file
pub fn artifact_url(job_id: &Uuid, name: &str) -> String {
    format!("/artifacts/{}/{}", job_id, name)
}

/// Outcome of a results request
#[derive(Debug, Clone)]
pub enum ResultsOutcome {
    Ready(Box<ResultsView>),
    Failed { job_id: Uuid, error: ErrorInfo },
    NotReady { state: &'static str },
}
