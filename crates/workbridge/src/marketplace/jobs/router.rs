use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::catalog::{CatalogQuery, ListingCatalog, SessionKey};
use super::domain::{CategoryId, ExperienceLevel, JobId, JobType, LanguageId, LocationType};
use super::filter::ListingFilter;
use crate::marketplace::repository::{CompanyRepository, JobRepository, RepositoryError};

/// Query-string shape of the public listing endpoint. Multi-valued
/// dimensions arrive comma-separated (`job_type=full_time,contract`).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingParams {
    session: Option<String>,
    query: Option<String>,
    job_type: Option<String>,
    location_type: Option<String>,
    experience: Option<String>,
    language: Option<String>,
    salary_min: Option<u64>,
    salary_max: Option<u64>,
    category: Option<String>,
    active: Option<bool>,
    /// Evaluation date override, mainly for tests and demos.
    today: Option<String>,
}

fn parse_tokens<T>(raw: Option<&str>) -> Result<Vec<T>, String>
where
    T: serde::de::DeserializeOwned,
{
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            serde_json::from_value(serde_json::Value::String(token.to_string()))
                .map_err(|_| format!("unrecognized value '{token}'"))
        })
        .collect()
}

fn parse_today(raw: Option<&str>) -> Result<NaiveDate, String> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})")),
        None => Ok(Local::now().date_naive()),
    }
}

impl ListingParams {
    fn into_request(self) -> Result<(SessionKey, CatalogQuery, NaiveDate), String> {
        let job_types: Vec<JobType> = parse_tokens(self.job_type.as_deref())?;
        let location_types: Vec<LocationType> = parse_tokens(self.location_type.as_deref())?;
        let experience_levels: Vec<ExperienceLevel> = parse_tokens(self.experience.as_deref())?;
        let languages: Vec<LanguageId> = parse_tokens(self.language.as_deref())?;
        let today = parse_today(self.today.as_deref())?;

        let query = CatalogQuery {
            category: self.category.map(CategoryId),
            active_only: self.active.unwrap_or(false),
            filter: ListingFilter {
                query: self.query,
                job_types,
                location_types,
                experience_levels,
                languages,
                salary_min: self.salary_min,
                salary_max: self.salary_max,
            },
        };
        let session = SessionKey(self.session.unwrap_or_else(|| "anonymous".to_string()));
        Ok((session, query, today))
    }
}

/// Router builder for the public listing surface.
pub fn listings_router<J, C>(catalog: Arc<ListingCatalog<J, C>>) -> Router
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    Router::new()
        .route("/api/v1/jobs", get(list_handler::<J, C>))
        .route("/api/v1/jobs/:job_id", get(detail_handler::<J, C>))
        .with_state(catalog)
}

pub(crate) async fn list_handler<J, C>(
    State(catalog): State<Arc<ListingCatalog<J, C>>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let (session, query, today) = match params.into_request() {
        Ok(parsed) => parsed,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match catalog.snapshot(&session, &query, today) {
        Ok(page) => {
            let payload = json!({
                "total": page.len(),
                "listings": *page,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn detail_handler<J, C>(
    State(catalog): State<Arc<ListingCatalog<J, C>>>,
    Path(job_id): Path<String>,
    Query(params): Query<ListingParams>,
) -> Response
where
    J: JobRepository + 'static,
    C: CompanyRepository + 'static,
{
    let today = match parse_today(params.today.as_deref()) {
        Ok(today) => today,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let id = JobId(job_id);
    match catalog.detail(&id, today) {
        Ok(Some(listing)) if listing.actionability.visible => {
            // the counter is advisory; a failed bump must not hide the page
            if let Err(err) = catalog.record_view(&id) {
                tracing::warn!(job = %id.0, error = %err, "view counter bump failed");
            }
            (StatusCode::OK, axum::Json(listing)).into_response()
        }
        Ok(_) => {
            let payload = json!({ "error": "job not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(RepositoryError::NotFound) => {
            let payload = json!({ "error": "job not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
