use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::SaveToggle;
use super::service::{InteractionError, InteractionTracker};
use crate::marketplace::jobs::deadline::Actionability;
use crate::marketplace::jobs::domain::{ContactMethod, JobId, UserId};
use crate::marketplace::repository::{
    ApplicationRepository, ContactChannel, JobRepository, SavedJobRepository,
};

/// Shared state of the interaction routes: the tracker plus the job store
/// (applies are gated on the posting's current actionability).
pub struct InteractionRoutes<S, A, C, J> {
    pub tracker: Arc<InteractionTracker<S, A, C>>,
    pub jobs: Arc<J>,
}

impl<S, A, C, J> Clone for InteractionRoutes<S, A, C, J> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveRequest {
    user_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    user_id: String,
    method: ContactMethod,
}

/// Router builder for save/apply interactions.
pub fn interactions_router<S, A, C, J>(
    tracker: Arc<InteractionTracker<S, A, C>>,
    jobs: Arc<J>,
) -> Router
where
    S: SavedJobRepository + 'static,
    A: ApplicationRepository + 'static,
    C: ContactChannel + 'static,
    J: JobRepository + 'static,
{
    let state = InteractionRoutes { tracker, jobs };
    Router::new()
        .route("/api/v1/jobs/:job_id/save", post(save_handler::<S, A, C, J>))
        .route(
            "/api/v1/jobs/:job_id/save/undo",
            post(undo_handler::<S, A, C, J>),
        )
        .route(
            "/api/v1/jobs/:job_id/apply",
            post(apply_handler::<S, A, C, J>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/:user_id",
            get(applied_handler::<S, A, C, J>),
        )
        .route(
            "/api/v1/users/:user_id/saved",
            get(saved_handler::<S, A, C, J>),
        )
        .with_state(state)
}

fn interaction_error_response(err: InteractionError) -> Response {
    match err {
        InteractionError::MethodNotOffered { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        InteractionError::Contact(inner) => {
            let payload = json!({ "error": inner.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn save_handler<S, A, C, J>(
    State(state): State<InteractionRoutes<S, A, C, J>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<SaveRequest>,
) -> Response
where
    S: SavedJobRepository + 'static,
    A: ApplicationRepository + 'static,
    C: ContactChannel + 'static,
    J: JobRepository + 'static,
{
    let user = UserId(request.user_id);
    let job = JobId(job_id);
    match state.tracker.toggle_save(&user, &job, Utc::now()) {
        Ok(SaveToggle::Saved(bookmark)) => {
            let payload = json!({ "saved": true, "bookmark": bookmark });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(SaveToggle::Removed(bookmark)) => {
            let payload = json!({ "saved": false, "removed": bookmark });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => interaction_error_response(err),
    }
}

pub(crate) async fn undo_handler<S, A, C, J>(
    State(state): State<InteractionRoutes<S, A, C, J>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<SaveRequest>,
) -> Response
where
    S: SavedJobRepository + 'static,
    A: ApplicationRepository + 'static,
    C: ContactChannel + 'static,
    J: JobRepository + 'static,
{
    let user = UserId(request.user_id);
    let job = JobId(job_id);
    match state.tracker.undo_remove(&user, &job, Utc::now()) {
        Ok(bookmark) => {
            let payload = json!({ "saved": true, "bookmark": bookmark });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => interaction_error_response(err),
    }
}

pub(crate) async fn apply_handler<S, A, C, J>(
    State(state): State<InteractionRoutes<S, A, C, J>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    S: SavedJobRepository + 'static,
    A: ApplicationRepository + 'static,
    C: ContactChannel + 'static,
    J: JobRepository + 'static,
{
    let id = JobId(job_id);
    let job = match state.jobs.fetch(&id) {
        Ok(Some(job)) => job,
        Ok(None) => {
            let payload = json!({ "error": "job not found" });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    let gates = Actionability::evaluate(&job, Local::now().date_naive());
    if !gates.visible {
        let payload = json!({ "error": "job not found" });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    }
    if !gates.can_apply {
        let payload = json!({ "error": "applications are closed for this job" });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    let user = UserId(request.user_id);
    match state.tracker.apply(&user, &job, request.method, Utc::now()) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => interaction_error_response(err),
    }
}

pub(crate) async fn applied_handler<S, A, C, J>(
    State(state): State<InteractionRoutes<S, A, C, J>>,
    Path((job_id, user_id)): Path<(String, String)>,
) -> Response
where
    S: SavedJobRepository + 'static,
    A: ApplicationRepository + 'static,
    C: ContactChannel + 'static,
    J: JobRepository + 'static,
{
    let user = UserId(user_id);
    let job = JobId(job_id);
    match state.tracker.applied_methods(&user, &job) {
        Ok(methods) => {
            let payload = json!({
                "has_applied": !methods.is_empty(),
                "methods": methods,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => interaction_error_response(err),
    }
}

pub(crate) async fn saved_handler<S, A, C, J>(
    State(state): State<InteractionRoutes<S, A, C, J>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: SavedJobRepository + 'static,
    A: ApplicationRepository + 'static,
    C: ContactChannel + 'static,
    J: JobRepository + 'static,
{
    let user = UserId(user_id);
    match state.tracker.saved_jobs(&user) {
        Ok(saved) => {
            let payload = json!({
                "total": saved.len(),
                "saved": saved,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => interaction_error_response(err),
    }
}
