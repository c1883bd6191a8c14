use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use crate::marketplace::jobs::domain::{
    ApprovalState, CategoryId, Company, CompanyCard, CompanyId, ContactDetails, ExperienceLevel,
    Job, JobId, JobType, LocationType, Salary, SalaryType, UserId,
};
use crate::marketplace::repository::{
    CompanyRepository, JobQuery, JobRepository, RepositoryError,
};

pub(super) fn approved_job(id: &str, build: impl FnOnce(&mut Job)) -> Job {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid");
    let mut job = Job {
        id: JobId(id.to_string()),
        title: format!("Posting {id}"),
        description: "General duties".to_string(),
        category: CategoryId("service".to_string()),
        job_type: JobType::FullTime,
        location_type: LocationType::OnSite,
        location: "Incheon".to_string(),
        map_url: None,
        salary: Salary {
            kind: SalaryType::Monthly,
            min: Some(2_400_000),
            max: Some(3_000_000),
        },
        experience: ExperienceLevel::Entry,
        languages: Vec::new(),
        skills: Vec::new(),
        contacts: ContactDetails {
            email: Some("hr@example.test".to_string()),
            ..ContactDetails::default()
        },
        deadline: None,
        attachments: Vec::new(),
        cover_image: None,
        views: 0,
        created_at: created,
        updated_at: created,
        company: CompanyId("acme".to_string()),
        owner: UserId("employer-1".to_string()),
        approval: ApprovalState::Approved,
    };
    build(&mut job);
    job
}

pub(super) fn verified_company(id: &str) -> Company {
    Company {
        id: CompanyId(id.to_string()),
        name_en: "Acme Trading".to_string(),
        name_ko: "아크메 무역".to_string(),
        verified: true,
        created_at: Utc.with_ymd_and_hms(2024, 11, 2, 8, 0, 0).single().expect("valid"),
    }
}

/// Job store that counts `list` calls so cache behavior is observable.
#[derive(Default)]
pub(super) struct CountingJobs {
    rows: Mutex<HashMap<JobId, Job>>,
    pub(super) list_calls: AtomicUsize,
}

impl CountingJobs {
    pub(super) fn seed(&self, job: Job) {
        self.rows
            .lock()
            .expect("jobs mutex poisoned")
            .insert(job.id.clone(), job);
    }

    pub(super) fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(super) fn views_of(&self, id: &JobId) -> u64 {
        self.rows.lock().expect("jobs mutex poisoned")[id].views
    }
}

impl JobRepository for CountingJobs {
    fn list(&self, query: &JobQuery) -> Result<Vec<Job>, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().expect("jobs mutex poisoned");
        let mut jobs: Vec<Job> = rows
            .values()
            .filter(|job| query.approval.map_or(true, |state| job.approval == state))
            .filter(|job| {
                query
                    .category
                    .as_ref()
                    .map_or(true, |category| &job.category == category)
            })
            .filter(|job| {
                query.deadline_on_or_after.map_or(true, |cutoff| {
                    job.deadline.map_or(true, |deadline| deadline >= cutoff)
                })
            })
            .cloned()
            .collect();
        // newest first, the order the marketplace shows by default
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let rows = self.rows.lock().expect("jobs mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut rows = self.rows.lock().expect("jobs mutex poisoned");
        if rows.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut rows = self.rows.lock().expect("jobs mutex poisoned");
        if !rows.contains_key(&job.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(job.id.clone(), job.clone());
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

#[derive(Default)]
pub(super) struct MemoryCompanies {
    rows: Mutex<HashMap<CompanyId, Company>>,
}

impl MemoryCompanies {
    pub(super) fn seed(&self, company: Company) {
        self.rows
            .lock()
            .expect("companies mutex poisoned")
            .insert(company.id.clone(), company);
    }
}

impl CompanyRepository for MemoryCompanies {
    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        let rows = self.rows.lock().expect("companies mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn cards(
        &self,
        ids: &[CompanyId],
    ) -> Result<BTreeMap<CompanyId, CompanyCard>, RepositoryError> {
        let rows = self.rows.lock().expect("companies mutex poisoned");
        Ok(ids
            .iter()
            .filter_map(|id| rows.get(id).map(|company| (id.clone(), company.card())))
            .collect())
    }
}
