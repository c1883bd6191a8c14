use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{ApplyOutcome, ApplyReceipt, SaveToggle};
use crate::marketplace::jobs::domain::{ContactMethod, Job, JobId, SavedJobId, UserId};
use crate::marketplace::repository::{
    Application, ApplicationRepository, ContactChannel, ContactError, ContactTarget,
    RepositoryError, SavedJob, SavedJobRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("job {} does not offer contact via {}", job.0, method.label())]
    MethodNotOffered { job: JobId, method: ContactMethod },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Contact(#[from] ContactError),
}

static BOOKMARK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_saved_id() -> SavedJobId {
    let id = BOOKMARK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SavedJobId(format!("saved-{id:06}"))
}

/// Per-user save and apply tracking against the remote store.
///
/// Both operations are check-then-act round-trips; the store's uniqueness
/// constraints are the backstop for the duplicate-request race, and a
/// `Conflict` answer is read as "the row is already there", never as a
/// failure.
pub struct InteractionTracker<S, A, C> {
    saved: Arc<S>,
    applications: Arc<A>,
    contacts: Arc<C>,
}

impl<S, A, C> InteractionTracker<S, A, C>
where
    S: SavedJobRepository,
    A: ApplicationRepository,
    C: ContactChannel,
{
    pub fn new(saved: Arc<S>, applications: Arc<A>, contacts: Arc<C>) -> Self {
        Self {
            saved,
            applications,
            contacts,
        }
    }

    /// Flip the bookmark for (user, job): absent creates, present deletes.
    pub fn toggle_save(
        &self,
        user: &UserId,
        job: &JobId,
        now: DateTime<Utc>,
    ) -> Result<SaveToggle, InteractionError> {
        if let Some(existing) = self.saved.find(user, job)? {
            self.saved.delete(&existing.id)?;
            return Ok(SaveToggle::Removed(existing));
        }

        let bookmark = SavedJob {
            id: next_saved_id(),
            user: user.clone(),
            job: job.clone(),
            created_at: now,
        };
        match self.saved.insert(bookmark) {
            Ok(stored) => Ok(SaveToggle::Saved(stored)),
            Err(RepositoryError::Conflict) => {
                // lost the check-then-act race against a duplicate request;
                // the pair is saved, which is the state a toggle wanted
                let existing = self
                    .saved
                    .find(user, job)?
                    .ok_or(RepositoryError::NotFound)?;
                Ok(SaveToggle::Saved(existing))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Undo of a removal is "save again": a fresh row with a fresh id and
    /// timestamp, not a restore of the deleted row's identity.
    pub fn undo_remove(
        &self,
        user: &UserId,
        job: &JobId,
        now: DateTime<Utc>,
    ) -> Result<SavedJob, InteractionError> {
        let bookmark = SavedJob {
            id: next_saved_id(),
            user: user.clone(),
            job: job.clone(),
            created_at: now,
        };
        match self.saved.insert(bookmark) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => Ok(self
                .saved
                .find(user, job)?
                .ok_or(RepositoryError::NotFound)?),
            Err(err) => Err(err.into()),
        }
    }

    pub fn saved_jobs(&self, user: &UserId) -> Result<Vec<SavedJob>, InteractionError> {
        Ok(self.saved.for_user(user)?)
    }

    pub fn is_saved(&self, user: &UserId, job: &JobId) -> Result<bool, InteractionError> {
        Ok(self.saved.find(user, job)?.is_some())
    }

    /// Invoke one contact method on a posting. At most one `Application`
    /// row ever exists per (user, job, method); the contact channel is
    /// opened on every invocation, including when the tracking write
    /// fails — tracking is best-effort and must not stand between the
    /// user and the employer.
    pub fn apply(
        &self,
        user: &UserId,
        job: &Job,
        method: ContactMethod,
        now: DateTime<Utc>,
    ) -> Result<ApplyReceipt, InteractionError> {
        let value = job
            .contacts
            .target(method)
            .ok_or_else(|| InteractionError::MethodNotOffered {
                job: job.id.clone(),
                method,
            })?;
        let target = ContactTarget {
            method,
            value: value.to_string(),
        };

        let outcome = match self.record_application(user, &job.id, method, now) {
            Ok(true) => ApplyOutcome::Recorded,
            Ok(false) => ApplyOutcome::AlreadyRecorded,
            Err(err) => {
                tracing::warn!(
                    job = %job.id.0,
                    method = method.label(),
                    error = %err,
                    "apply tracking failed; opening contact channel anyway"
                );
                ApplyOutcome::RecordFailed {
                    reason: err.to_string(),
                }
            }
        };

        self.contacts.open(&target)?;

        Ok(ApplyReceipt {
            job: job.id.clone(),
            method,
            outcome,
            contact: target,
        })
    }

    fn record_application(
        &self,
        user: &UserId,
        job: &JobId,
        method: ContactMethod,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let used = self.applications.for_user(user, Some(job))?;
        if used.iter().any(|application| application.method == method) {
            return Ok(false);
        }

        let application = Application {
            user: user.clone(),
            job: job.clone(),
            method,
            created_at: now,
        };
        match self.applications.insert(application) {
            Ok(_) => Ok(true),
            Err(RepositoryError::Conflict) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The set of contact methods this user has already used on this job.
    pub fn applied_methods(
        &self,
        user: &UserId,
        job: &JobId,
    ) -> Result<BTreeSet<ContactMethod>, InteractionError> {
        Ok(self
            .applications
            .for_user(user, Some(job))?
            .into_iter()
            .map(|application| application.method)
            .collect())
    }

    /// True iff the user has invoked at least one contact method on the job.
    pub fn has_applied(&self, user: &UserId, job: &JobId) -> Result<bool, InteractionError> {
        Ok(!self.applied_methods(user, job)?.is_empty())
    }
}
