use super::request::ValidatedRequest;
use super::state::{JobTracker, Stage};
use crate::analysis::{analyze_comments, analyze_transcript, extract_keywords, Analyzers};
use crate::error::{AnalysisError, FetchError, PipelineError};
use crate::fetch::youtube::MAX_COMMENTS;
use crate::fetch::{Comment, TranscriptSegment, VideoMetadata, VideoSource};
use crate::render::{
    AnalysisArtifacts, AnalysisBundle, ArtifactRenderer, ArtifactStore, EXPECTED_ARTIFACTS,
};
use anyhow::anyhow;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Default bound on the whole fetch stage
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(120);

struct FetchedVideo {
    metadata: VideoMetadata,
    transcript: Vec<TranscriptSegment>,
    comments: Vec<Comment>,
}

/// Fetch, analyze and render one video into committed artifacts
pub struct Pipeline {
    source: Arc<dyn VideoSource>,
    analyzers: Analyzers,
    renderer: Arc<dyn ArtifactRenderer>,
    store: ArtifactStore,
    max_comments: usize,
    fetch_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn VideoSource>,
        analyzers: Analyzers,
        renderer: Arc<dyn ArtifactRenderer>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            source,
            analyzers,
            renderer,
            store,
            max_comments: MAX_COMMENTS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Comment cap; never above `MAX_COMMENTS`
    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments.min(MAX_COMMENTS);
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run every stage for `job_id`, reporting stage changes to `tracker`.
    ///
    /// The returned artifacts exist only once the job directory is committed.
    /// Terminal transitions are left to the caller.
    pub async fn run(
        &self,
        tracker: &JobTracker,
        job_id: Uuid,
        request: ValidatedRequest,
    ) -> Result<AnalysisArtifacts, PipelineError> {
        let result = self.run_stages(tracker, job_id, request).await;
        if result.is_err() {
            self.store.discard(&job_id).await;
        }
        result
    }

    async fn run_stages(
        &self,
        tracker: &JobTracker,
        job_id: Uuid,
        request: ValidatedRequest,
    ) -> Result<AnalysisArtifacts, PipelineError> {
        let staging = self
            .store
            .prepare(&job_id)
            .await
            .map_err(PipelineError::Render)?;

        tracker.set_stage(job_id, Stage::Fetching);
        info!("Fetching video {} ({})", request.video_id, request.language);
        let fetched = self.fetch(&request).await?;
        info!(
            "Fetched \"{}\": {} transcript segments, {} comments",
            fetched.metadata.title,
            fetched.transcript.len(),
            fetched.comments.len()
        );

        tracker.set_stage(job_id, Stage::Analyzing);
        let bundle = self.analyze(fetched, &request).await?;
        info!(
            "Analyzed {} comments, {} segments, {} keywords",
            bundle.sentiments.len(),
            bundle.emotions.len(),
            bundle.keywords.len()
        );

        tracker.set_stage(job_id, Stage::Rendering);
        let files = self
            .renderer
            .render(&staging, &bundle)
            .await
            .map_err(PipelineError::Render)?;
        if let Some(missing) = EXPECTED_ARTIFACTS
            .iter()
            .find(|name| !files.iter().any(|f| f.name == **name))
        {
            return Err(PipelineError::Render(anyhow!(
                "Renderer did not produce {}",
                missing
            )));
        }

        self.store
            .commit(
                job_id,
                bundle.metadata.clone(),
                bundle.language,
                files,
                bundle.tables(),
            )
            .await
            .map_err(PipelineError::Render)
    }

    async fn fetch(&self, request: &ValidatedRequest) -> Result<FetchedVideo, FetchError> {
        let video_id = request.video_id.as_str();
        let requests = async {
            tokio::try_join!(
                self.source.video_metadata(video_id),
                self.source.transcript(video_id, request.language),
                self.source.comments(video_id, self.max_comments),
            )
        };

        let (metadata, mut transcript, mut comments) =
            tokio::time::timeout(self.fetch_timeout, requests)
                .await
                .map_err(|_| FetchError::Timeout {
                    secs: self.fetch_timeout.as_secs(),
                })??;

        if transcript.is_empty() {
            return Err(FetchError::TranscriptUnavailable {
                video_id: request.video_id.clone(),
                language: request.language.code().to_string(),
            });
        }
        transcript.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        comments.truncate(self.max_comments);

        Ok(FetchedVideo {
            metadata,
            transcript,
            comments,
        })
    }

    async fn analyze(
        &self,
        fetched: FetchedVideo,
        request: &ValidatedRequest,
    ) -> Result<AnalysisBundle, AnalysisError> {
        let FetchedVideo {
            metadata,
            transcript,
            comments,
        } = fetched;

        let text = transcript
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let top_keywords = self.analyzers.top_keywords;
        let keywords = async move {
            tokio::task::spawn_blocking(move || extract_keywords(&text, top_keywords))
                .await
                .map_err(|e| AnalysisError::Task(e.to_string()))
        };

        let (sentiments, emotions, keywords) = tokio::try_join!(
            analyze_comments(self.analyzers.sentiment.clone(), comments),
            analyze_transcript(self.analyzers.emotion.clone(), transcript),
            keywords,
        )?;

        Ok(AnalysisBundle {
            metadata,
            language: request.language,
            sentiments,
            emotions,
            keywords,
        })
    }
}
