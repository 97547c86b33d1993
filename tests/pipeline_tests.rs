// Integration tests for the job lifecycle
//
// These tests drive JobManager end to end against an in-memory video source
// and check the status protocol, the committed artifact set and failure
// reporting.

mod common;

use anyhow::Result;
use common::{
    manager, manager_with, pipeline_with, CommentsBehavior, GatedRenderer, SilentRenderer,
    StubSource, VIDEO_URL,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;
use youtube_insight::job::ResultsOutcome;
use youtube_insight::render::{Cell, FileRenderer, EXPECTED_ARTIFACTS};
use youtube_insight::{ErrorKind, JobManager, JobState, Stage, SubmitError};

#[tokio::test]
async fn test_english_job_commits_every_artifact() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let jobs = manager(temp_dir.path());

    let job_id = jobs.submit(VIDEO_URL, "en")?;
    let state = jobs.wait_until_finished().await;

    let (artifacts, info) = match state {
        JobState::Done { artifacts, info, .. } => (artifacts, info),
        other => panic!("expected done, got {:?}", other),
    };
    assert_eq!(info.job_id, job_id);
    assert_eq!(info.video_id, "abc123");
    assert_eq!(artifacts.metadata.title, "Learning Rust Ownership");

    let job_dir = temp_dir.path().join(job_id.to_string());
    for name in EXPECTED_ARTIFACTS {
        let path = job_dir.join(name);
        assert!(path.exists(), "{} should exist", name);
        assert!(std::fs::metadata(&path)?.len() > 0, "{} should not be empty", name);
        assert!(artifacts.file(name).is_some());
    }

    // One CSV row per comment and per transcript segment
    let comments_csv = std::fs::read_to_string(job_dir.join("comments_with_sentiment.csv"))?;
    assert_eq!(comments_csv.lines().count(), 1 + 4);
    let transcript_csv = std::fs::read_to_string(job_dir.join("transcript_emotion_keywords.csv"))?;
    assert_eq!(transcript_csv.lines().count(), 1 + 6);

    let full_text = std::fs::read_to_string(job_dir.join("full_text.txt"))?;
    assert!(full_text.starts_with("Rust is a systems language"));

    // Every comment carries one of the three sentiment labels
    let sentiments = &artifacts.tables[0];
    assert_eq!(sentiments.name, "comments_with_sentiment.csv");
    let label_col = sentiments.headers.iter().position(|h| h == "sentiment").unwrap();
    for row in &sentiments.rows {
        match &row[label_col] {
            Cell::Text(label) => assert!(
                ["positive", "neutral", "negative"].contains(&label.as_str()),
                "unexpected label {}",
                label
            ),
            other => panic!("sentiment cell should be text, got {:?}", other),
        }
    }

    // Non-empty transcript text yields keywords
    let keywords = &artifacts.tables[2];
    assert_eq!(keywords.name, "top_keywords_yake.csv");
    assert!(!keywords.rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_poll_is_idempotent_after_completion() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let jobs = manager(temp_dir.path());

    let before = jobs.poll();
    assert!(!before.done);
    assert_eq!(before.state, "idle");

    jobs.submit(VIDEO_URL, "")?;
    jobs.wait_until_finished().await;

    let first = jobs.poll();
    let second = jobs.poll();
    assert!(first.done);
    assert_eq!(first.state, "done");
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_missing_transcript_fails_the_job() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let jobs = manager(temp_dir.path());

    let job_id = jobs.submit("https://youtu.be/abc123", "te")?;
    let state = jobs.wait_until_finished().await;

    let error = match state {
        JobState::Failed { error, .. } => error,
        other => panic!("expected failed, got {:?}", other),
    };
    assert_eq!(error.kind, ErrorKind::Fetch);
    assert!(error.message.contains("te"));

    let status = jobs.poll();
    assert!(status.done);
    assert_eq!(status.state, "failed");
    assert!(status.error.is_some());

    // No partial output is left behind
    assert!(!temp_dir.path().join(job_id.to_string()).exists());
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);

    match jobs.results().await? {
        ResultsOutcome::Failed { job_id: failed, .. } => assert_eq!(failed, job_id),
        other => panic!("expected failed results, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_invalid_submit_leaves_state_unchanged() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let jobs = manager(temp_dir.path());

    let err = jobs.submit("https://vimeo.com/12345", "en").unwrap_err();
    assert!(matches!(err, SubmitError::InvalidUrl { .. }));

    let err = jobs.submit(VIDEO_URL, "fr").unwrap_err();
    assert!(matches!(err, SubmitError::UnsupportedLanguage { .. }));

    assert!(matches!(jobs.snapshot(), JobState::Idle));
    Ok(())
}

#[tokio::test]
async fn test_done_is_set_only_after_commit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let release = Arc::new(Notify::new());
    let jobs = manager_with(
        StubSource::english_only(),
        Arc::new(GatedRenderer {
            release: release.clone(),
        }),
        temp_dir.path(),
    );

    let job_id = jobs.submit(VIDEO_URL, "en")?;

    // Hold the job in the render stage
    let mut rx = jobs.subscribe();
    rx.wait_for(|s| s.stage() == Some(Stage::Rendering)).await?;

    let status = jobs.poll();
    assert!(!status.done);
    assert_eq!(status.stage, Some(Stage::Rendering));
    assert!(!temp_dir.path().join(job_id.to_string()).exists());
    assert!(matches!(
        jobs.results().await?,
        ResultsOutcome::NotReady { state: "running" }
    ));

    // A second submit is rejected and does not disturb the running job
    let err = jobs.submit(VIDEO_URL, "en").unwrap_err();
    assert_eq!(
        err,
        SubmitError::JobInFlight {
            job_id: job_id.to_string()
        }
    );
    assert_eq!(jobs.snapshot().job_id(), Some(job_id));

    release.notify_one();
    let state = jobs.wait_until_finished().await;
    assert!(matches!(state, JobState::Done { .. }));
    for name in EXPECTED_ARTIFACTS {
        assert!(temp_dir.path().join(job_id.to_string()).join(name).exists());
    }

    Ok(())
}

#[tokio::test]
async fn test_renderer_that_skips_files_fails_the_job() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let jobs = manager_with(StubSource::english_only(), Arc::new(SilentRenderer), temp_dir.path());

    jobs.submit(VIDEO_URL, "en")?;
    let state = jobs.wait_until_finished().await;

    let error = match state {
        JobState::Failed { error, .. } => error,
        other => panic!("expected failed, got {:?}", other),
    };
    assert_eq!(error.kind, ErrorKind::Render);
    Ok(())
}

#[tokio::test]
async fn test_panicking_source_is_reported_as_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut source = StubSource::english_only();
    source.panic_on_metadata = true;
    let jobs = manager_with(source, Arc::new(FileRenderer), temp_dir.path());

    jobs.submit(VIDEO_URL, "en")?;
    let state = jobs.wait_until_finished().await;

    let error = match state {
        JobState::Failed { error, .. } => error,
        other => panic!("expected failed, got {:?}", other),
    };
    assert_eq!(error.kind, ErrorKind::Internal);
    assert!(error.message.contains("metadata parser exploded"));
    Ok(())
}

#[tokio::test]
async fn test_new_job_replaces_previous_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let jobs = manager(temp_dir.path());

    let first = jobs.submit(VIDEO_URL, "en")?;
    jobs.wait_until_finished().await;
    assert!(temp_dir.path().join(first.to_string()).exists());

    let second = jobs.submit(VIDEO_URL, "en")?;
    let mut rx = jobs.subscribe();
    rx.wait_for(|s| s.job_id() == Some(second) && s.is_terminal())
        .await?;

    assert!(!temp_dir.path().join(first.to_string()).exists());
    assert!(temp_dir.path().join(second.to_string()).exists());

    match jobs.results().await? {
        ResultsOutcome::Ready(view) => {
            assert_eq!(view.job_id, second);
            assert_eq!(view.charts.len(), 3);
            assert!(view.charts[0].url.starts_with(&format!("/artifacts/{}/", second)));
            assert!(view.full_text.contains("borrow checker"));
        }
        other => panic!("expected ready results, got {:?}", other),
    }

    Ok(())
}

async fn failed_kind_for(source: StubSource, fetch_timeout: Duration) -> Result<(ErrorKind, String)> {
    let temp_dir = TempDir::new()?;
    let pipeline = pipeline_with(source, Arc::new(FileRenderer), temp_dir.path())
        .with_fetch_timeout(fetch_timeout);
    let jobs = JobManager::new(pipeline);

    jobs.submit(VIDEO_URL, "en")?;
    let state = jobs.wait_until_finished().await;

    // Failed jobs leave nothing in the output root
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 0);

    match state {
        JobState::Failed { error, .. } => Ok((error.kind, error.message)),
        other => panic!("expected failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_timeout_fails_the_job() -> Result<()> {
    let mut source = StubSource::english_only();
    source.comments_behavior = CommentsBehavior::Hang;

    let (kind, message) = failed_kind_for(source, Duration::from_millis(50)).await?;
    assert_eq!(kind, ErrorKind::Fetch);
    assert!(message.contains("timed out"), "{}", message);
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_comments_fail_the_job() -> Result<()> {
    let mut source = StubSource::english_only();
    source.comments_behavior = CommentsBehavior::RateLimited;

    let (kind, message) = failed_kind_for(source, Duration::from_secs(5)).await?;
    assert_eq!(kind, ErrorKind::Fetch);
    assert!(message.contains("quotaExceeded"), "{}", message);
    Ok(())
}

#[tokio::test]
async fn test_disabled_comments_fail_the_job() -> Result<()> {
    let mut source = StubSource::english_only();
    source.comments_behavior = CommentsBehavior::Disabled;

    let (kind, message) = failed_kind_for(source, Duration::from_secs(5)).await?;
    assert_eq!(kind, ErrorKind::Fetch);
    assert!(message.contains("disabled"), "{}", message);
    Ok(())
}
