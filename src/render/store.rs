use super::table::Table;
use crate::fetch::{Language, VideoMetadata};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

const STAGING_PREFIX: &str = ".staging-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Text,
    Table,
    Chart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFile {
    pub name: String,
    pub kind: ArtifactKind,
    #[serde(skip)]
    pub path: PathBuf,
}

impl ArtifactFile {
    pub fn new(name: &str, kind: ArtifactKind, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            kind,
            path,
        }
    }
}

/// Outputs of one finished job. Only `ArtifactStore::commit` can build this,
/// after every file is durable in the job directory.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisArtifacts {
    pub job_id: Uuid,
    pub metadata: VideoMetadata,
    pub language: Language,
    #[serde(skip)]
    pub dir: PathBuf,
    pub files: Vec<ArtifactFile>,
    pub tables: Vec<Table>,
    pub committed_at: DateTime<Utc>,
    #[serde(skip)]
    _sealed: (),
}

impl AnalysisArtifacts {
    pub fn file(&self, name: &str) -> Option<&ArtifactFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// Per-job artifact directories under a single output root.
///
/// Layout: `<root>/<job_id>/` for committed jobs, `<root>/.staging-<job_id>/`
/// while a job is rendering.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn job_dir(&self, job_id: &Uuid) -> PathBuf {
        self.root.join(job_id.to_string())
    }

    fn staging_dir(&self, job_id: &Uuid) -> PathBuf {
        self.root.join(format!("{}{}", STAGING_PREFIX, job_id))
    }

    /// Remove outputs of earlier jobs and create a fresh staging directory.
    ///
    /// Must only run while no other job is rendering.
    pub async fn prepare(&self, job_id: &Uuid) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create output root {}", self.root.display()))?;

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let owned = name.starts_with(STAGING_PREFIX) || Uuid::parse_str(&name).is_ok();
            if !owned || !entry.file_type().await?.is_dir() {
                continue;
            }
            match tokio::fs::remove_dir_all(entry.path()).await {
                Ok(()) => info!("Removed previous run output: {}", name),
                Err(e) => warn!("Could not remove {}: {}", entry.path().display(), e),
            }
        }

        let staging = self.staging_dir(job_id);
        tokio::fs::create_dir_all(&staging)
            .await
            .with_context(|| format!("Failed to create {}", staging.display()))?;
        Ok(staging)
    }

    /// Best-effort removal of a failed job's staging directory.
    pub async fn discard(&self, job_id: &Uuid) {
        let staging = self.staging_dir(job_id);
        if let Err(e) = tokio::fs::remove_dir_all(&staging).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove {}: {}", staging.display(), e);
            }
        }
    }

    /// Flush every staged file, publish the staging directory under the job id and
    /// flush the output root. Files the renderer reported but did not write fail
    /// the commit.
    pub async fn commit(
        &self,
        job_id: Uuid,
        metadata: VideoMetadata,
        language: Language,
        files: Vec<ArtifactFile>,
        tables: Vec<Table>,
    ) -> Result<AnalysisArtifacts> {
        let staging = self.staging_dir(&job_id);
        let final_dir = self.job_dir(&job_id);
        let root = self.root.clone();

        let files = tokio::task::spawn_blocking(move || -> Result<Vec<ArtifactFile>> {
            for file in &files {
                if file.path.parent() != Some(staging.as_path()) {
                    bail!("Artifact {} was written outside the staging directory", file.name);
                }
                File::open(&file.path)
                    .and_then(|f| f.sync_all())
                    .with_context(|| format!("Failed to flush {}", file.path.display()))?;
            }

            std::fs::rename(&staging, &final_dir).with_context(|| {
                format!("Failed to publish {} as {}", staging.display(), final_dir.display())
            })?;
            sync_dir(&root)?;

            Ok(files
                .into_iter()
                .map(|f| {
                    let path = final_dir.join(&f.name);
                    ArtifactFile { path, ..f }
                })
                .collect())
        })
        .await
        .context("Commit task panicked")??;

        info!("Committed {} artifacts for job {}", files.len(), job_id);

        Ok(AnalysisArtifacts {
            job_id,
            metadata,
            language,
            dir: self.job_dir(&job_id),
            files,
            tables,
            committed_at: Utc::now(),
            _sealed: (),
        })
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .with_context(|| format!("Failed to flush directory {}", dir.display()))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
