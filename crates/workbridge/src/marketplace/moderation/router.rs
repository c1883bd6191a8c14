use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ModerationDecision, ModerationOutcome};
use super::service::{ModerationError, ModerationService};
use crate::marketplace::jobs::domain::JobId;
use crate::marketplace::repository::JobRepository;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    decision: ModerationDecision,
    job_ids: Vec<String>,
}

/// Router builder for the admin review surface. Authentication sits in
/// front of this router, outside the crate.
pub fn moderation_router<J>(service: Arc<ModerationService<J>>) -> Router
where
    J: JobRepository + 'static,
{
    Router::new()
        .route("/api/v1/admin/jobs/pending", get(pending_handler::<J>))
        .route(
            "/api/v1/admin/jobs/:job_id/approve",
            post(approve_handler::<J>),
        )
        .route(
            "/api/v1/admin/jobs/:job_id/reject",
            post(reject_handler::<J>),
        )
        .route("/api/v1/admin/jobs/moderate", post(batch_handler::<J>))
        .with_state(service)
}

fn outcome_response(outcome: ModerationOutcome) -> Response {
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

fn error_response(err: ModerationError) -> Response {
    match err {
        ModerationError::JobNotFound { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn pending_handler<J>(
    State(service): State<Arc<ModerationService<J>>>,
) -> Response
where
    J: JobRepository + 'static,
{
    match service.pending_queue() {
        Ok(queue) => {
            let payload = json!({
                "total": queue.len(),
                "jobs": queue,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<J>(
    State(service): State<Arc<ModerationService<J>>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
{
    match service.approve(&JobId(job_id)) {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_handler<J>(
    State(service): State<Arc<ModerationService<J>>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
{
    match service.reject(&JobId(job_id)) {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn batch_handler<J>(
    State(service): State<Arc<ModerationService<J>>>,
    axum::Json(request): axum::Json<BatchRequest>,
) -> Response
where
    J: JobRepository + 'static,
{
    let ids: Vec<JobId> = request.job_ids.into_iter().map(JobId).collect();
    let outcomes = service.moderate_batch(&ids, request.decision);
    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    let payload = json!({
        "requested": ids.len(),
        "failed": failed,
        "outcomes": outcomes,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
