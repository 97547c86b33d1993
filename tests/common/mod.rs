// Shared fixtures for the integration tests: an in-memory video source and
// renderers that let a test hold or break the render stage.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;
use youtube_insight::fetch::{Comment, Language, TranscriptSegment, VideoMetadata, VideoSource};
use youtube_insight::render::{AnalysisBundle, ArtifactFile, ArtifactRenderer, FileRenderer};
use youtube_insight::{Analyzers, ArtifactStore, FetchError, JobManager, Pipeline};

pub const VIDEO_URL: &str = "https://www.youtube.com/watch?v=abc123";

/// How the stub answers a comments request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsBehavior {
    Serve,
    Hang,
    RateLimited,
    Disabled,
}

/// Video data served from memory. Languages without a transcript report
/// `TranscriptUnavailable`.
pub struct StubSource {
    pub metadata: VideoMetadata,
    pub transcripts: HashMap<Language, Vec<TranscriptSegment>>,
    pub comments: Vec<Comment>,
    pub comments_behavior: CommentsBehavior,
    pub panic_on_metadata: bool,
}

impl StubSource {
    pub fn english_only() -> Self {
        let mut transcripts = HashMap::new();
        transcripts.insert(Language::En, sample_transcript());
        Self {
            metadata: VideoMetadata {
                video_id: "abc123".to_string(),
                title: "Learning Rust Ownership".to_string(),
                channel_name: "Systems Weekly".to_string(),
            },
            transcripts,
            comments: sample_comments(),
            comments_behavior: CommentsBehavior::Serve,
            panic_on_metadata: false,
        }
    }
}

#[async_trait]
impl VideoSource for StubSource {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, FetchError> {
        if self.panic_on_metadata {
            panic!("metadata parser exploded");
        }
        if video_id != self.metadata.video_id {
            return Err(FetchError::NotFound {
                video_id: video_id.to_string(),
            });
        }
        Ok(self.metadata.clone())
    }

    async fn transcript(
        &self,
        video_id: &str,
        language: Language,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        self.transcripts
            .get(&language)
            .cloned()
            .ok_or_else(|| FetchError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                language: language.code().to_string(),
            })
    }

    async fn comments(&self, video_id: &str, max: usize) -> Result<Vec<Comment>, FetchError> {
        match self.comments_behavior {
            CommentsBehavior::Serve => Ok(self.comments.iter().take(max).cloned().collect()),
            CommentsBehavior::Hang => std::future::pending().await,
            CommentsBehavior::RateLimited => Err(FetchError::RateLimited {
                reason: "quotaExceeded".to_string(),
            }),
            CommentsBehavior::Disabled => Err(FetchError::CommentsDisabled {
                video_id: video_id.to_string(),
            }),
        }
    }
}

/// Writes real artifacts, but only after `release` is notified.
pub struct GatedRenderer {
    pub release: Arc<Notify>,
}

#[async_trait]
impl ArtifactRenderer for GatedRenderer {
    async fn render(&self, dir: &Path, bundle: &AnalysisBundle) -> Result<Vec<ArtifactFile>> {
        self.release.notified().await;
        FileRenderer.render(dir, bundle).await
    }
}

/// Reports success without writing anything.
pub struct SilentRenderer;

#[async_trait]
impl ArtifactRenderer for SilentRenderer {
    async fn render(&self, _dir: &Path, _bundle: &AnalysisBundle) -> Result<Vec<ArtifactFile>> {
        Ok(Vec::new())
    }
}

pub fn sample_transcript() -> Vec<TranscriptSegment> {
    let lines = [
        "Rust is a systems language focused on safety.",
        "I love how Rust handles ownership and borrowing.",
        "Ownership rules in Rust prevent data races.",
        "Some people are afraid of the borrow checker at first.",
        "But Rust makes memory safety a happy default.",
        "The compiler rejects code that would be unsafe.",
    ];
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| TranscriptSegment {
            start_time: i as f64 * 20.0,
            duration: 20.0,
            text: text.to_string(),
        })
        .collect()
}

pub fn sample_comments() -> Vec<Comment> {
    let texts = [
        "Great explanation, I love it!",
        "This was terrible and confusing.",
        "Watched on my lunch break",
        "Amazing work, thanks https://example.com",
    ];
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Comment {
            text: text.to_string(),
            author: format!("viewer{}", i),
            published_at: Some("2024-01-01T00:00:00Z".to_string()),
            like_count: i as u64,
        })
        .collect()
}

pub fn pipeline_with(
    source: impl VideoSource + 'static,
    renderer: Arc<dyn ArtifactRenderer>,
    root: &Path,
) -> Pipeline {
    Pipeline::new(
        Arc::new(source),
        Analyzers::lexicon(15),
        renderer,
        ArtifactStore::new(root),
    )
}

pub fn manager_with(
    source: impl VideoSource + 'static,
    renderer: Arc<dyn ArtifactRenderer>,
    root: &Path,
) -> JobManager {
    JobManager::new(pipeline_with(source, renderer, root))
}

pub fn manager(root: &Path) -> JobManager {
    manager_with(StubSource::english_only(), Arc::new(FileRenderer), root)
}
