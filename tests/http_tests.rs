// Integration tests for the HTTP gateway
//
// Requests are sent straight into the axum router with `oneshot`; no socket
// is opened.

mod common;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{manager, manager_with, GatedRenderer, StubSource};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Notify;
use tower::ServiceExt;
use youtube_insight::{create_router, AppState, JobState, Stage};

async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    Ok((status, body))
}

fn form(body: &str) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = create_router(AppState::new(manager(temp_dir.path())));

    let (status, body) = send(&app, get("/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_form_submit_then_results() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let state = AppState::new(manager(temp_dir.path()));
    let app = create_router(state.clone());

    let (status, body) = send(
        &app,
        form("video_url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc123&language=en"),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "processing");
    let job_id = body["job_id"].as_str().unwrap().to_string();

    state.jobs.wait_until_finished().await;

    let (status, body) = send(&app, get("/check_status")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["done"], true);
    assert_eq!(body["state"], "done");
    assert_eq!(body["job_id"], job_id.as_str());

    let (status, body) = send(&app, get("/results")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");
    assert_eq!(body["title"], "Learning Rust Ownership");
    assert_eq!(body["tables"].as_array().unwrap().len(), 3);
    assert_eq!(body["charts"].as_array().unwrap().len(), 3);

    // Numeric cells are rounded for display
    let comments = &body["tables"][0];
    assert_eq!(comments["name"], "comments_with_sentiment.csv");
    for row in comments["rows"].as_array().unwrap() {
        let confidence = row[5].as_f64().unwrap();
        assert_eq!(confidence, (confidence * 100.0).round() / 100.0);
    }

    // Chart links are served from the committed job directory
    let url = body["charts"][0]["url"].as_str().unwrap().to_string();
    assert!(url.starts_with(&format!("/artifacts/{}/", job_id)));
    let response = app.clone().oneshot(get(&url)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let png = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(png.starts_with(b"\x89PNG"));

    Ok(())
}

#[tokio::test]
async fn test_json_submit_validation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = create_router(AppState::new(manager(temp_dir.path())));

    let json = |body: &str| {
        Request::post("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let (status, body) = send(&app, json(r#"{"video_url": "https://example.com/video"}"#)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Not a YouTube video URL"));

    let (status, _) = send(
        &app,
        json(r#"{"video_url": "https://youtu.be/abc123", "language": "de"}"#),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json(r#"{"language": "en"}"#)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/check_status")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "idle");
    assert_eq!(body["done"], false);

    Ok(())
}

#[tokio::test]
async fn test_missing_form_url_is_bad_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = create_router(AppState::new(manager(temp_dir.path())));

    let (status, body) = send(&app, form("language=en")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing video_url");
    Ok(())
}

#[tokio::test]
async fn test_results_before_completion_conflict() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let release = Arc::new(Notify::new());
    let state = AppState::new(manager_with(
        StubSource::english_only(),
        Arc::new(GatedRenderer {
            release: release.clone(),
        }),
        temp_dir.path(),
    ));
    let app = create_router(state.clone());

    let (status, body) = send(&app, get("/results")).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["state"], "idle");

    let (status, _) = send(&app, form("video_url=https%3A%2F%2Fyoutu.be%2Fabc123")).await?;
    assert_eq!(status, StatusCode::OK);

    // Second submit while the first is held in the render stage
    let (status, body) = send(&app, form("video_url=https%3A%2F%2Fyoutu.be%2Fabc123")).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("still in progress"));

    let (status, body) = send(&app, get("/results")).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "not_ready");

    release.notify_one();
    let finished = state.jobs.wait_until_finished().await;
    assert!(matches!(finished, JobState::Done { .. }));

    let (status, body) = send(&app, get("/results")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");
    Ok(())
}

#[tokio::test]
async fn test_failed_job_results_are_distinguishable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let state = AppState::new(manager(temp_dir.path()));
    let app = create_router(state.clone());

    let (status, _) = send(
        &app,
        form("video_url=https%3A%2F%2Fyoutu.be%2Fabc123&language=hi"),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    state.jobs.wait_until_finished().await;

    let (status, body) = send(&app, get("/check_status")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["done"], true);
    assert_eq!(body["state"], "failed");

    let (status, body) = send(&app, get("/results")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"]["kind"], "fetch");
    Ok(())
}

#[tokio::test]
async fn test_artifacts_are_served_only_after_commit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let release = Arc::new(Notify::new());
    let state = AppState::new(manager_with(
        StubSource::english_only(),
        Arc::new(GatedRenderer {
            release: release.clone(),
        }),
        temp_dir.path(),
    ));
    let app = create_router(state.clone());

    let (status, body) = send(&app, form("video_url=https%3A%2F%2Fyoutu.be%2Fabc123")).await?;
    assert_eq!(status, StatusCode::OK);
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let mut rx = state.jobs.subscribe();
    rx.wait_for(|s| s.stage() == Some(Stage::Rendering)).await?;

    // A partial file sitting in the staging directory
    let staging = temp_dir.path().join(format!(".staging-{}", job_id));
    assert!(staging.is_dir());
    std::fs::write(staging.join("full_text.txt"), "partial")?;

    let (status, _) = send(&app, get(&format!("/artifacts/.staging-{}/full_text.txt", job_id))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get(&format!("/artifacts/{}/full_text.txt", job_id))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!state.jobs.poll().done);

    release.notify_one();
    state.jobs.wait_until_finished().await;

    let response = app
        .clone()
        .oneshot(get(&format!("/artifacts/{}/full_text.txt", job_id)))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let text = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(text.starts_with(b"Rust is a systems language"));

    // Only the known artifact names of the current job resolve
    let (status, _) = send(&app, get(&format!("/artifacts/{}/secrets.txt", job_id))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let other = uuid::Uuid::new_v4();
    let (status, _) = send(&app, get(&format!("/artifacts/{}/full_text.txt", other))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_form_with_wrong_content_type_reports_the_rejection() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let app = create_router(AppState::new(manager(temp_dir.path())));

    let request = Request::post("/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("video_url=https%3A%2F%2Fyoutu.be%2Fabc123"))
        .unwrap();
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert_ne!(error, "Missing video_url");
    assert!(error.contains("Content-Type"), "{}", error);
    Ok(())
}
