use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::marketplace::interactions::service::InteractionTracker;
use crate::marketplace::jobs::domain::{
    ApprovalState, CategoryId, CompanyId, ContactDetails, ExperienceLevel, Job, JobId, JobType,
    LocationType, Salary, SavedJobId, UserId,
};
use crate::marketplace::repository::{
    Application, ApplicationRepository, ContactChannel, ContactError, ContactTarget, JobQuery,
    JobRepository, RepositoryError, SavedJob, SavedJobRepository,
};

pub(super) fn user() -> UserId {
    UserId("seeker-7".to_string())
}

pub(super) fn job() -> Job {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid");
    Job {
        id: JobId("job-77".to_string()),
        title: "Weekend barista".to_string(),
        description: "Espresso bar, weekend shifts".to_string(),
        category: CategoryId("food-service".to_string()),
        job_type: JobType::PartTime,
        location_type: LocationType::OnSite,
        location: "Seoul, Hongdae".to_string(),
        map_url: None,
        salary: Salary::negotiable(),
        experience: ExperienceLevel::Entry,
        languages: Vec::new(),
        skills: vec!["latte art".to_string()],
        contacts: ContactDetails {
            email: Some("jobs@cafe.example".to_string()),
            phone: Some("+82-10-0000-0000".to_string()),
            ..ContactDetails::default()
        },
        deadline: None,
        attachments: Vec::new(),
        cover_image: None,
        views: 0,
        created_at: created,
        updated_at: created,
        company: CompanyId("cafe-han".to_string()),
        owner: UserId("employer-3".to_string()),
        approval: ApprovalState::Approved,
    }
}

#[derive(Default)]
pub(super) struct MemorySaved {
    rows: Mutex<Vec<SavedJob>>,
}

impl SavedJobRepository for MemorySaved {
    fn for_user(&self, user: &UserId) -> Result<Vec<SavedJob>, RepositoryError> {
        let rows = self.rows.lock().expect("saved mutex poisoned");
        Ok(rows.iter().filter(|row| &row.user == user).cloned().collect())
    }

    fn find(&self, user: &UserId, job: &JobId) -> Result<Option<SavedJob>, RepositoryError> {
        let rows = self.rows.lock().expect("saved mutex poisoned");
        Ok(rows
            .iter()
            .find(|row| &row.user == user && &row.job == job)
            .cloned())
    }

    fn insert(&self, saved: SavedJob) -> Result<SavedJob, RepositoryError> {
        let mut rows = self.rows.lock().expect("saved mutex poisoned");
        if rows
            .iter()
            .any(|row| row.user == saved.user && row.job == saved.job)
        {
            return Err(RepositoryError::Conflict);
        }
        rows.push(saved.clone());
        Ok(saved)
    }

    fn delete(&self, id: &SavedJobId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("saved mutex poisoned");
        let before = rows.len();
        rows.retain(|row| &row.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl MemorySaved {
    pub(super) fn count(&self) -> usize {
        self.rows.lock().expect("saved mutex poisoned").len()
    }
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    rows: Mutex<Vec<Application>>,
}

impl ApplicationRepository for MemoryApplications {
    fn for_user(
        &self,
        user: &UserId,
        job: Option<&JobId>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let rows = self.rows.lock().expect("applications mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| &row.user == user && job.map_or(true, |job| &row.job == job))
            .cloned()
            .collect())
    }

    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut rows = self.rows.lock().expect("applications mutex poisoned");
        if rows.iter().any(|row| {
            row.user == application.user
                && row.job == application.job
                && row.method == application.method
        }) {
            return Err(RepositoryError::Conflict);
        }
        rows.push(application.clone());
        Ok(application)
    }
}

impl MemoryApplications {
    pub(super) fn count(&self) -> usize {
        self.rows.lock().expect("applications mutex poisoned").len()
    }
}

/// Counts channel opens so tests can assert the side-action ran on every
/// invocation.
#[derive(Default)]
pub(super) struct CountingChannel {
    opened: Mutex<Vec<ContactTarget>>,
}

impl ContactChannel for CountingChannel {
    fn open(&self, target: &ContactTarget) -> Result<(), ContactError> {
        self.opened
            .lock()
            .expect("channel mutex poisoned")
            .push(target.clone());
        Ok(())
    }
}

impl CountingChannel {
    pub(super) fn opens(&self) -> usize {
        self.opened.lock().expect("channel mutex poisoned").len()
    }
}

/// Application store whose writes always fail; reads stay empty.
pub(super) struct WriteFailingApplications;

impl ApplicationRepository for WriteFailingApplications {
    fn for_user(
        &self,
        _user: &UserId,
        _job: Option<&JobId>,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

/// Saved store that answers every insert with `Conflict` while a row for
/// the pair exists.
pub(super) struct ConflictOnlySaved {
    pub(super) existing: SavedJob,
}

impl SavedJobRepository for ConflictOnlySaved {
    fn for_user(&self, _user: &UserId) -> Result<Vec<SavedJob>, RepositoryError> {
        Ok(vec![self.existing.clone()])
    }

    fn find(&self, user: &UserId, job: &JobId) -> Result<Option<SavedJob>, RepositoryError> {
        if &self.existing.user == user && &self.existing.job == job {
            Ok(Some(self.existing.clone()))
        } else {
            Ok(None)
        }
    }

    fn insert(&self, _saved: SavedJob) -> Result<SavedJob, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn delete(&self, _id: &SavedJobId) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryJobs {
    rows: Mutex<HashMap<JobId, Job>>,
}

impl MemoryJobs {
    pub(super) fn seed(&self, job: Job) {
        self.rows
            .lock()
            .expect("jobs mutex poisoned")
            .insert(job.id.clone(), job);
    }
}

impl JobRepository for MemoryJobs {
    fn list(&self, query: &JobQuery) -> Result<Vec<Job>, RepositoryError> {
        let rows = self.rows.lock().expect("jobs mutex poisoned");
        Ok(rows
            .values()
            .filter(|job| query.approval.map_or(true, |state| job.approval == state))
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let rows = self.rows.lock().expect("jobs mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        self.seed(job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<Job, RepositoryError> {
        self.seed(job.clone());
        Ok(job)
    }

    fn set_approval(&self, id: &JobId, state: ApprovalState) -> Result<Job, RepositoryError> {
        let mut rows = self.rows.lock().expect("jobs mutex poisoned");
        let job = rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.approval = state;
        Ok(job.clone())
    }

    fn increment_views(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("jobs mutex poisoned");
        let job = rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.views += 1;
        Ok(())
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("jobs mutex poisoned");
        rows.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) fn build_tracker() -> (
    InteractionTracker<MemorySaved, MemoryApplications, CountingChannel>,
    Arc<MemorySaved>,
    Arc<MemoryApplications>,
    Arc<CountingChannel>,
) {
    let saved = Arc::new(MemorySaved::default());
    let applications = Arc::new(MemoryApplications::default());
    let channel = Arc::new(CountingChannel::default());
    let tracker = InteractionTracker::new(saved.clone(), applications.clone(), channel.clone());
    (tracker, saved, applications, channel)
}
