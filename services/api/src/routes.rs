use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use crate::infra::{
    AppState, InMemoryApplicationRepository, InMemoryCompanyRepository, InMemoryJobRepository,
    InMemorySavedJobRepository, LoggingContactChannel,
};
use workbridge::marketplace::interactions::{interactions_router, InteractionTracker};
use workbridge::marketplace::jobs::{listings_router, ListingCatalog};
use workbridge::marketplace::moderation::{moderation_router, ModerationService};

/// Everything the HTTP surface needs, built over the in-memory store. A
/// future SQL-backed deployment swaps the repository types here and nothing
/// else.
pub(crate) struct Marketplace {
    pub(crate) jobs: Arc<InMemoryJobRepository>,
    pub(crate) companies: Arc<InMemoryCompanyRepository>,
    pub(crate) channel: Arc<LoggingContactChannel>,
    pub(crate) catalog: Arc<ListingCatalog<InMemoryJobRepository, InMemoryCompanyRepository>>,
    pub(crate) moderation: Arc<ModerationService<InMemoryJobRepository>>,
    pub(crate) tracker: Arc<
        InteractionTracker<
            InMemorySavedJobRepository,
            InMemoryApplicationRepository,
            LoggingContactChannel,
        >,
    >,
}

impl Marketplace {
    pub(crate) fn in_memory() -> Self {
        let jobs = Arc::new(InMemoryJobRepository::default());
        let companies = Arc::new(InMemoryCompanyRepository::default());
        let saved = Arc::new(InMemorySavedJobRepository::default());
        let applications = Arc::new(InMemoryApplicationRepository::default());
        let channel = Arc::new(LoggingContactChannel::default());

        Self {
            catalog: Arc::new(ListingCatalog::new(jobs.clone(), companies.clone())),
            moderation: Arc::new(ModerationService::new(jobs.clone())),
            tracker: Arc::new(InteractionTracker::new(
                saved,
                applications,
                channel.clone(),
            )),
            jobs,
            companies,
            channel,
        }
    }

    pub(crate) fn router(&self) -> Router {
        Router::new()
            .merge(listings_router(self.catalog.clone()))
            .merge(moderation_router(self.moderation.clone()))
            .merge(interactions_router(self.tracker.clone(), self.jobs.clone()))
    }
}

pub(crate) fn with_service_routes(marketplace: &Marketplace) -> Router {
    marketplace
        .router()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
