use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ApprovalState, CategoryId, CompanyId, ContactDetails, ExperienceLevel, Job, JobId, JobType,
    LanguageRequirement, LocationType, Salary, UserId,
};
use crate::marketplace::repository::{CompanyRepository, JobRepository, RepositoryError};

/// Employer-authored content of a posting, before the marketplace attaches
/// identity, ownership, and lifecycle fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub category: CategoryId,
    pub job_type: JobType,
    pub location_type: LocationType,
    pub location: String,
    pub map_url: Option<String>,
    pub salary: Salary,
    pub experience: ExperienceLevel,
    pub languages: Vec<LanguageRequirement>,
    pub skills: Vec<String>,
    pub contacts: ContactDetails,
    pub deadline: Option<NaiveDate>,
    pub attachments: Vec<String>,
    pub cover_image: Option<String>,
}

/// Partial content update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub map_url: Option<String>,
    pub salary: Option<Salary>,
    pub experience: Option<ExperienceLevel>,
    pub languages: Option<Vec<LanguageRequirement>>,
    pub skills: Option<Vec<String>>,
    pub contacts: Option<ContactDetails>,
    pub deadline: Option<Option<NaiveDate>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("company {} not found", company.0)]
    CompanyNotFound { company: CompanyId },
    #[error("company {} is not verified for posting", company.0)]
    CompanyNotVerified { company: CompanyId },
    #[error("job {} not found", job.0)]
    JobNotFound { job: JobId },
    #[error("user {} does not own job {}", user.0, job.0)]
    NotOwner { job: JobId, user: UserId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Write side of the posting lifecycle for employers: submit, edit,
/// withdraw. Every accepted submission enters the moderation queue as
/// `Pending`; only verified companies get that far.
pub struct SubmissionService<J, C> {
    jobs: Arc<J>,
    companies: Arc<C>,
}

impl<J, C> SubmissionService<J, C>
where
    J: JobRepository,
    C: CompanyRepository,
{
    pub fn new(jobs: Arc<J>, companies: Arc<C>) -> Self {
        Self { jobs, companies }
    }

    pub fn submit(
        &self,
        draft: JobDraft,
        company: &CompanyId,
        owner: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Job, SubmissionError> {
        let employer = self
            .companies
            .fetch(company)?
            .ok_or_else(|| SubmissionError::CompanyNotFound {
                company: company.clone(),
            })?;
        if !employer.verified {
            return Err(SubmissionError::CompanyNotVerified {
                company: company.clone(),
            });
        }

        let job = Job {
            id: next_job_id(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            job_type: draft.job_type,
            location_type: draft.location_type,
            location: draft.location,
            map_url: draft.map_url,
            salary: draft.salary,
            experience: draft.experience,
            languages: draft.languages,
            skills: draft.skills,
            contacts: draft.contacts,
            deadline: draft.deadline,
            attachments: draft.attachments,
            cover_image: draft.cover_image,
            views: 0,
            created_at: now,
            updated_at: now,
            company: company.clone(),
            owner: owner.clone(),
            approval: ApprovalState::Pending,
        };

        let stored = self.jobs.insert(job)?;
        tracing::info!(job = %stored.id.0, company = %company.0, "posting submitted for review");
        Ok(stored)
    }

    /// Owner-only content update. The approval state is deliberately left
    /// where it is: edits do not re-enter the moderation queue.
    pub fn edit(
        &self,
        id: &JobId,
        patch: JobPatch,
        editor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Job, SubmissionError> {
        let mut job = self
            .jobs
            .fetch(id)?
            .ok_or_else(|| SubmissionError::JobNotFound { job: id.clone() })?;
        if &job.owner != editor {
            return Err(SubmissionError::NotOwner {
                job: id.clone(),
                user: editor.clone(),
            });
        }

        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(description) = patch.description {
            job.description = description;
        }
        if let Some(location) = patch.location {
            job.location = location;
        }
        if let Some(map_url) = patch.map_url {
            job.map_url = Some(map_url);
        }
        if let Some(salary) = patch.salary {
            job.salary = salary;
        }
        if let Some(experience) = patch.experience {
            job.experience = experience;
        }
        if let Some(languages) = patch.languages {
            job.languages = languages;
        }
        if let Some(skills) = patch.skills {
            job.skills = skills;
        }
        if let Some(contacts) = patch.contacts {
            job.contacts = contacts;
        }
        if let Some(deadline) = patch.deadline {
            job.deadline = deadline;
        }
        job.updated_at = now;

        Ok(self.jobs.update(job)?)
    }

    /// Delete a posting. Owners may withdraw their own; the admin flag
    /// bypasses the ownership check.
    pub fn withdraw(&self, id: &JobId, actor: &UserId, admin: bool) -> Result<(), SubmissionError> {
        let job = self
            .jobs
            .fetch(id)?
            .ok_or_else(|| SubmissionError::JobNotFound { job: id.clone() })?;
        if !admin && job.owner != *actor {
            return Err(SubmissionError::NotOwner {
                job: id.clone(),
                user: actor.clone(),
            });
        }
        self.jobs.delete(id)?;
        tracing::info!(job = %id.0, admin, "posting withdrawn");
        Ok(())
    }
}
