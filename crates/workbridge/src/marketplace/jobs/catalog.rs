use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deadline::{self, Actionability, DeadlineStatus};
use super::domain::{ApprovalState, CategoryId, CompanyCard, CompanyId, Job, JobId};
use super::filter::{ListingFilter, ListingRow};
use crate::marketplace::repository::{CompanyRepository, JobQuery, JobRepository, RepositoryError};

/// Cache partition for one browsing session. Listing snapshots are cached
/// per (session, query) so a session's repeated filter tweaks do not
/// re-fetch, while another session's writes only force a re-read through an
/// explicit invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(pub String);

/// Everything that shapes one listing page: store-side narrowing plus the
/// in-memory filter dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<CategoryId>,
    /// Drop expired rows from the page. Base visibility stays approval-only
    /// either way.
    pub active_only: bool,
    pub filter: ListingFilter,
}

/// A listing row annotated with everything the caller needs to render and
/// gate it, computed once per snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedListing {
    pub job: Job,
    pub company: CompanyCard,
    pub status: DeadlineStatus,
    pub actionability: Actionability,
}

struct CachedPage {
    computed_for: NaiveDate,
    listings: Arc<Vec<AnnotatedListing>>,
}

/// Read-through listing cache over the job and company stores.
///
/// This replaces the transient per-view listing state of the original
/// marketplace client with an explicit snapshot keyed by (session, query):
/// the filter engine runs over a fetched snapshot, and nothing here is
/// coupled to a render cycle.
pub struct ListingCatalog<J, C> {
    jobs: Arc<J>,
    companies: Arc<C>,
    cache: Mutex<HashMap<(SessionKey, CatalogQuery), CachedPage>>,
}

impl<J, C> ListingCatalog<J, C>
where
    J: JobRepository,
    C: CompanyRepository,
{
    pub fn new(jobs: Arc<J>, companies: Arc<C>) -> Self {
        Self {
            jobs,
            companies,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The public listing page for one session and query. Cached pages are
    /// only reused on the day they were computed; deadline annotations go
    /// stale at midnight.
    pub fn snapshot(
        &self,
        session: &SessionKey,
        query: &CatalogQuery,
        today: NaiveDate,
    ) -> Result<Arc<Vec<AnnotatedListing>>, RepositoryError> {
        let key = (session.clone(), query.clone());

        {
            let cache = self.cache.lock().expect("catalog mutex poisoned");
            if let Some(page) = cache.get(&key) {
                if page.computed_for == today {
                    return Ok(page.listings.clone());
                }
            }
        }

        let listings = Arc::new(self.build_page(query, today)?);

        let mut cache = self.cache.lock().expect("catalog mutex poisoned");
        cache.insert(
            key,
            CachedPage {
                computed_for: today,
                listings: listings.clone(),
            },
        );
        Ok(listings)
    }

    fn build_page(
        &self,
        query: &CatalogQuery,
        today: NaiveDate,
    ) -> Result<Vec<AnnotatedListing>, RepositoryError> {
        // active views pre-trim long-expired rows at the store; the final
        // expiry verdict still comes from the deadline evaluator below
        let fetched = self.jobs.list(&JobQuery {
            approval: Some(ApprovalState::Approved),
            category: query.category.clone(),
            deadline_on_or_after: query.active_only.then_some(today),
        })?;

        let mut company_ids: Vec<CompanyId> =
            fetched.iter().map(|job| job.company.clone()).collect();
        company_ids.sort();
        company_ids.dedup();
        let cards = self.companies.cards(&company_ids)?;

        let rows: Vec<ListingRow> = fetched
            .into_iter()
            .map(|job| ListingRow {
                company: cards.get(&job.company).cloned().unwrap_or_default(),
                job,
            })
            .collect();

        let mut page = Vec::new();
        for row in query.filter.apply(&rows) {
            let status = deadline::evaluate(row.job.deadline, today);
            if query.active_only && status.expired {
                continue;
            }
            let actionability = Actionability::evaluate(&row.job, today);
            page.push(AnnotatedListing {
                job: row.job,
                company: row.company,
                status,
                actionability,
            });
        }
        Ok(page)
    }

    /// One job with its annotations, regardless of approval state; the
    /// caller decides whether non-visible postings leak (public routes do
    /// not serve them).
    pub fn detail(
        &self,
        id: &JobId,
        today: NaiveDate,
    ) -> Result<Option<AnnotatedListing>, RepositoryError> {
        let Some(job) = self.jobs.fetch(id)? else {
            return Ok(None);
        };
        let company = self
            .companies
            .fetch(&job.company)?
            .map(|company| company.card())
            .unwrap_or_default();
        let status = deadline::evaluate(job.deadline, today);
        let actionability = Actionability::evaluate(&job, today);
        Ok(Some(AnnotatedListing {
            job,
            company,
            status,
            actionability,
        }))
    }

    /// Pass-through view-counter bump; see `JobRepository::increment_views`
    /// for the (lack of) atomicity contract.
    pub fn record_view(&self, id: &JobId) -> Result<(), RepositoryError> {
        self.jobs.increment_views(id)
    }

    /// Drop every cached page for one session.
    pub fn invalidate(&self, session: &SessionKey) {
        let mut cache = self.cache.lock().expect("catalog mutex poisoned");
        cache.retain(|(cached_session, _), _| cached_session != session);
    }

    /// Drop all cached pages; called after any moderation or content write.
    pub fn purge(&self) {
        self.cache.lock().expect("catalog mutex poisoned").clear();
    }
}
