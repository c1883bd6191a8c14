use std::sync::Arc;

use super::domain::{ModerationDecision, ModerationOutcome, ModerationStatus, Transition};
use crate::marketplace::jobs::domain::{ApprovalState, Job, JobId};
use crate::marketplace::repository::{JobQuery, JobRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("job {} not found", job.0)]
    JobNotFound { job: JobId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Admin-facing review queue over the job store. All writes to the
/// approval state flow through here.
pub struct ModerationService<J> {
    jobs: Arc<J>,
}

impl<J> ModerationService<J>
where
    J: JobRepository,
{
    pub fn new(jobs: Arc<J>) -> Self {
        Self { jobs }
    }

    /// Postings awaiting a first verdict, oldest submission first.
    pub fn pending_queue(&self) -> Result<Vec<Job>, ModerationError> {
        let mut pending = self.jobs.list(&JobQuery {
            approval: Some(ApprovalState::Pending),
            ..JobQuery::default()
        })?;
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    pub fn approve(&self, id: &JobId) -> Result<ModerationOutcome, ModerationError> {
        self.moderate(id, ModerationDecision::Approve)
    }

    pub fn reject(&self, id: &JobId) -> Result<ModerationOutcome, ModerationError> {
        self.moderate(id, ModerationDecision::Reject)
    }

    pub fn moderate(
        &self,
        id: &JobId,
        decision: ModerationDecision,
    ) -> Result<ModerationOutcome, ModerationError> {
        let job = self
            .jobs
            .fetch(id)?
            .ok_or_else(|| ModerationError::JobNotFound { job: id.clone() })?;

        match decision.apply_to(job.approval) {
            Transition::Unchanged(state) => Ok(ModerationOutcome {
                job: id.clone(),
                status: ModerationStatus::AlreadyInState(state),
            }),
            Transition::Changed { from, to } => {
                self.jobs.set_approval(id, to)?;
                tracing::info!(
                    job = %id.0,
                    from = from.label(),
                    to = to.label(),
                    "moderation verdict applied"
                );
                Ok(ModerationOutcome {
                    job: id.clone(),
                    status: ModerationStatus::Applied { from, to },
                })
            }
        }
    }

    /// Apply one verdict to a batch of postings as independent, strictly
    /// sequential transitions. There is no cross-item transaction: failures
    /// are captured per id and never roll back the items already done.
    pub fn moderate_batch(
        &self,
        ids: &[JobId],
        decision: ModerationDecision,
    ) -> Vec<ModerationOutcome> {
        ids.iter()
            .map(|id| match self.moderate(id, decision) {
                Ok(outcome) => outcome,
                Err(err) => ModerationOutcome {
                    job: id.clone(),
                    status: ModerationStatus::Failed {
                        reason: err.to_string(),
                    },
                },
            })
            .collect()
    }
}
