use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::jobs::domain::{
    ApprovalState, CategoryId, Company, CompanyCard, CompanyId, ContactMethod, Job, JobId,
    SavedJobId, UserId,
};

/// Error enumeration for remote-store failures. The store is treated as an
/// opaque CRUD service; a failed call surfaces exactly once, with no retry
/// or backoff at this layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Store-side narrowing applied before any in-memory filtering. `approval`
/// and `category` translate to column predicates; `deadline_on_or_after`
/// lets a caller pre-trim long-expired rows without touching the posting's
/// approval state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobQuery {
    pub approval: Option<ApprovalState>,
    pub category: Option<CategoryId>,
    pub deadline_on_or_after: Option<NaiveDate>,
}

/// Storage abstraction over the `job` collection.
pub trait JobRepository: Send + Sync {
    fn list(&self, query: &JobQuery) -> Result<Vec<Job>, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update(&self, job: Job) -> Result<Job, RepositoryError>;
    fn set_approval(&self, id: &JobId, state: ApprovalState) -> Result<Job, RepositoryError>;
    /// Read-then-write bump of the view counter; last write wins, no atomic
    /// increment is promised by the store.
    fn increment_views(&self, id: &JobId) -> Result<(), RepositoryError>;
    fn delete(&self, id: &JobId) -> Result<(), RepositoryError>;
}

/// Storage abstraction over the `companies` collection.
pub trait CompanyRepository: Send + Sync {
    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn cards(&self, ids: &[CompanyId]) -> Result<BTreeMap<CompanyId, CompanyCard>, RepositoryError>;
}

/// One record per (user, job, contact method) triple; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub user: UserId,
    pub job: JobId,
    pub method: ContactMethod,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction over the `job_application` collection. The store is
/// expected to enforce uniqueness on (user, job, method) and answer a
/// duplicate insert with `Conflict`.
pub trait ApplicationRepository: Send + Sync {
    fn for_user(&self, user: &UserId, job: Option<&JobId>)
        -> Result<Vec<Application>, RepositoryError>;
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
}

/// A user's bookmark of a job; at most one per (user, job) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: SavedJobId,
    pub user: UserId,
    pub job: JobId,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction over the `job_saved` collection. Uniqueness on
/// (user, job) is the store's responsibility; `Conflict` is the idempotency
/// signal the tracker relies on.
pub trait SavedJobRepository: Send + Sync {
    fn for_user(&self, user: &UserId) -> Result<Vec<SavedJob>, RepositoryError>;
    fn find(&self, user: &UserId, job: &JobId) -> Result<Option<SavedJob>, RepositoryError>;
    fn insert(&self, saved: SavedJob) -> Result<SavedJob, RepositoryError>;
    fn delete(&self, id: &SavedJobId) -> Result<(), RepositoryError>;
}

/// The concrete destination an apply action opens: a contact method plus
/// the employer-supplied value for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTarget {
    pub method: ContactMethod,
    pub value: String,
}

/// Trait describing the outbound contact hook (mail client, dialer, link
/// opener). Tracking is best-effort around it, never in front of it.
pub trait ContactChannel: Send + Sync {
    fn open(&self, target: &ContactTarget) -> Result<(), ContactError>;
}

/// Contact dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("contact channel unavailable: {0}")]
    Transport(String),
}
