//! HTTP gateway for submitting videos and polling the analysis job
//!
//! - POST / - Start a job from form fields `video_url`, `language`
//! - POST /analyze - Start a job from a JSON body
//! - GET /check_status - Poll the current job
//! - GET /results - Results view of the finished job
//! - GET /artifacts/:job_id/:file - Committed artifact files
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
