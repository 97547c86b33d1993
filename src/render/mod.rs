//! Renderers: turn labeled records into persisted artifacts
//!
//! Files are written into a per-job staging directory by an `ArtifactRenderer`;
//! `ArtifactStore::commit` flushes and publishes them. Only a committed directory
//! yields `AnalysisArtifacts`.

pub mod chart;
pub mod store;
pub mod table;

pub use store::{AnalysisArtifacts, ArtifactFile, ArtifactKind, ArtifactStore};
pub use table::{Cell, Table};

use crate::analysis::{EmotionResult, Keyword, SentimentResult};
use crate::fetch::{Language, VideoMetadata};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub const FULL_TEXT: &str = "full_text.txt";
pub const COMMENTS_CSV: &str = "comments_with_sentiment.csv";
pub const TRANSCRIPT_CSV: &str = "transcript_emotion_keywords.csv";
pub const KEYWORDS_CSV: &str = "top_keywords_yake.csv";
pub const STACKED_AREA_PNG: &str = "emotion_stacked_area.png";
pub const HEATMAP_PNG: &str = "emotion_heatmap.png";
pub const SENTIMENT_PIE_PNG: &str = "sentiment_pie_chart.png";

/// Every file a successful job produces, in results-view order
pub const EXPECTED_ARTIFACTS: [&str; 7] = [
    FULL_TEXT,
    COMMENTS_CSV,
    TRANSCRIPT_CSV,
    KEYWORDS_CSV,
    STACKED_AREA_PNG,
    HEATMAP_PNG,
    SENTIMENT_PIE_PNG,
];

/// Analyzer output handed to the render stage
#[derive(Debug, Clone)]
pub struct AnalysisBundle {
    pub metadata: VideoMetadata,
    pub language: Language,
    pub sentiments: Vec<SentimentResult>,
    pub emotions: Vec<EmotionResult>,
    pub keywords: Vec<Keyword>,
}

impl AnalysisBundle {
    /// Transcript segments joined in chronological order
    pub fn full_text(&self) -> String {
        self.emotions
            .iter()
            .map(|e| e.segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn tables(&self) -> Vec<Table> {
        vec![
            table::sentiment_table(&self.sentiments),
            table::emotion_table(&self.metadata.video_id, &self.emotions),
            table::keyword_table(&self.keywords),
        ]
    }
}

/// Render stage seam. Implementations write every artifact into `dir` and report
/// what they wrote; flushing and publication belong to `ArtifactStore::commit`.
#[async_trait::async_trait]
pub trait ArtifactRenderer: Send + Sync {
    async fn render(&self, dir: &Path, bundle: &AnalysisBundle) -> Result<Vec<ArtifactFile>>;
}

/// Writes the text, CSV and PNG artifacts to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileRenderer;

#[async_trait::async_trait]
impl ArtifactRenderer for FileRenderer {
    async fn render(&self, dir: &Path, bundle: &AnalysisBundle) -> Result<Vec<ArtifactFile>> {
        let dir = dir.to_path_buf();
        let bundle = bundle.clone();

        tokio::task::spawn_blocking(move || write_artifacts(&dir, &bundle))
            .await
            .context("Render task panicked")?
    }
}

fn write_artifacts(dir: &Path, bundle: &AnalysisBundle) -> Result<Vec<ArtifactFile>> {
    let mut files = Vec::with_capacity(EXPECTED_ARTIFACTS.len());

    let text_path = dir.join(FULL_TEXT);
    std::fs::write(&text_path, bundle.full_text())
        .with_context(|| format!("Failed to write {}", text_path.display()))?;
    files.push(ArtifactFile::new(FULL_TEXT, ArtifactKind::Text, text_path));

    for table in bundle.tables() {
        let path = dir.join(&table.name);
        std::fs::write(&path, table.to_csv())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved {} ({} rows)", table.name, table.rows.len());
        files.push(ArtifactFile::new(&table.name, ArtifactKind::Table, path));
    }

    let charts = [
        (STACKED_AREA_PNG, chart::emotion_stacked_area(&bundle.emotions)),
        (HEATMAP_PNG, chart::emotion_heatmap(&bundle.emotions)),
        (SENTIMENT_PIE_PNG, chart::sentiment_pie(&bundle.sentiments)),
    ];
    for (name, image) in charts {
        let path = dir.join(name);
        image
            .save(&path)
            .with_context(|| format!("Failed to save chart {}", path.display()))?;
        info!("Saved chart {}", name);
        files.push(ArtifactFile::new(name, ArtifactKind::Chart, path));
    }

    Ok(files)
}
