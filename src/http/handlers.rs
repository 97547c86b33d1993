use super::state::AppState;
use crate::error::{ErrorInfo, SubmitError};
use crate::job::{AnalysisRequest, ResultsOutcome};
use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub job_id: Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FailedResultsResponse {
    pub status: String,
    pub job_id: Uuid,
    pub error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct NotReadyResponse {
    pub status: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /
/// Start an analysis from the HTML form fields `video_url` and `language`
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<AnalysisRequest>, FormRejection>,
) -> Response {
    match form {
        Ok(Form(req)) => submit(&state, req),
        Err(e) if e.body_text().contains("missing field `video_url`") => {
            warn!("Rejected submit form: {}", e);
            error_response(StatusCode::BAD_REQUEST, "Missing video_url".to_string())
        }
        Err(e) => {
            warn!("Rejected submit form: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.body_text())
        }
    }
}

/// POST /analyze
/// Same as the form submit, with a JSON body
pub async fn submit_json(
    State(state): State<AppState>,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(req)) => submit(&state, req),
        Err(e) => {
            warn!("Rejected submit body: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.body_text())
        }
    }
}

fn submit(state: &AppState, req: AnalysisRequest) -> Response {
    info!("Submit for {}", req.video_url);

    match state.jobs.submit_request(req) {
        Ok(job_id) => (
            StatusCode::OK,
            Json(SubmitResponse {
                job_id,
                status: "processing".to_string(),
                message: format!("Analysis started as job {}", job_id),
            }),
        )
            .into_response(),
        Err(e) => {
            let status = match e {
                SubmitError::InvalidUrl { .. } | SubmitError::UnsupportedLanguage { .. } => {
                    StatusCode::BAD_REQUEST
                }
                SubmitError::JobInFlight { .. } => StatusCode::CONFLICT,
            };
            warn!("Submit rejected: {}", e);
            error_response(status, e.to_string())
        }
    }
}

/// GET /check_status
/// Current job state; `done` is true once the job finished or failed
pub async fn check_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.jobs.poll()))
}

/// GET /results
/// Results view of the finished job
pub async fn get_results(State(state): State<AppState>) -> Response {
    match state.jobs.results().await {
        Ok(ResultsOutcome::Ready(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(ResultsOutcome::Failed { job_id, error }) => (
            StatusCode::OK,
            Json(FailedResultsResponse {
                status: "failed".to_string(),
                job_id,
                error,
            }),
        )
            .into_response(),
        Ok(ResultsOutcome::NotReady { state }) => (
            StatusCode::CONFLICT,
            Json(NotReadyResponse {
                status: "not_ready".to_string(),
                state: state.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load results: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load results: {}", e),
            )
        }
    }
}

/// GET /artifacts/:job_id/:file
/// A committed artifact of the finished job
pub async fn get_artifact(
    State(state): State<AppState>,
    Path((job_id, file)): Path<(String, String)>,
) -> Response {
    let path = Uuid::parse_str(&job_id)
        .ok()
        .and_then(|id| state.jobs.artifact_path(&id, &file));
    let Some(path) = path else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Artifact {}/{} not found", job_id, file),
        );
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&file))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read artifact {}", file),
            )
        }
    }
}

fn content_type(file: &str) -> &'static str {
    match file.rsplit('.').next() {
        Some("png") => "image/png",
        Some("csv") => "text/csv; charset=utf-8",
        _ => "text/plain; charset=utf-8",
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
