use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use workbridge::marketplace::jobs::{
    ApprovalState, CategoryId, Company, CompanyCard, CompanyId, ContactDetails, ExperienceLevel,
    Job, JobId, JobType, LanguageId, LanguageRequirement, LocationType, Proficiency, Salary,
    SalaryType, SavedJobId, UserId,
};
use workbridge::marketplace::repository::{
    Application, ApplicationRepository, CompanyRepository, ContactChannel, ContactError,
    ContactTarget, JobQuery, JobRepository, RepositoryError, SavedJob, SavedJobRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryJobRepository {
    rows: Mutex<HashMap<JobId, Job>>,
}

impl JobRepository for InMemoryJobRepository {
    fn list(&self, query: &JobQuery) -> Result<Vec<Job>, RepositoryError> {
        let rows = self.rows.lock().expect("job mutex poisoned");
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
        // newest first, matching the marketplace's default ordering
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let rows = self.rows.lock().expect("job mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut rows = self.rows.lock().expect("job mutex poisoned");
        if rows.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut rows = self.rows.lock().expect("job mutex poisoned");
        if !rows.contains_key(&job.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn set_approval(&self, id: &JobId, state: ApprovalState) -> Result<Job, RepositoryError> {
        let mut rows = self.rows.lock().expect("job mutex poisoned");
        let job = rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.approval = state;
        Ok(job.clone())
    }

    fn increment_views(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("job mutex poisoned");
        let job = rows.get_mut(id).ok_or(RepositoryError::NotFound)?;
        // read-then-write bump, mirroring the remote store's last-write-wins
        // counter semantics
        job.views += 1;
        Ok(())
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("job mutex poisoned");
        rows.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryCompanyRepository {
    rows: Mutex<HashMap<CompanyId, Company>>,
}

impl InMemoryCompanyRepository {
    pub(crate) fn seed(&self, company: Company) {
        self.rows
            .lock()
            .expect("company mutex poisoned")
            .insert(company.id.clone(), company);
    }
}

impl CompanyRepository for InMemoryCompanyRepository {
    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        let rows = self.rows.lock().expect("company mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn cards(
        &self,
        ids: &[CompanyId],
    ) -> Result<BTreeMap<CompanyId, CompanyCard>, RepositoryError> {
        let rows = self.rows.lock().expect("company mutex poisoned");
        Ok(ids
            .iter()
            .filter_map(|id| rows.get(id).map(|company| (id.clone(), company.card())))
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryApplicationRepository {
    rows: Mutex<Vec<Application>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn for_user(
        &self,
        user: &UserId,
        job: Option<&JobId>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let rows = self.rows.lock().expect("application mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| &row.user == user && job.map_or(true, |job| &row.job == job))
            .cloned()
            .collect())
    }

    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut rows = self.rows.lock().expect("application mutex poisoned");
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

#[derive(Default)]
pub(crate) struct InMemorySavedJobRepository {
    rows: Mutex<Vec<SavedJob>>,
}

impl SavedJobRepository for InMemorySavedJobRepository {
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

/// Contact "channel" for a headless deployment: the open is logged and
/// retained so the demo can report how often it fired.
#[derive(Default)]
pub(crate) struct LoggingContactChannel {
    opened: Mutex<Vec<ContactTarget>>,
}

impl LoggingContactChannel {
    pub(crate) fn opens(&self) -> usize {
        self.opened.lock().expect("channel mutex poisoned").len()
    }
}

impl ContactChannel for LoggingContactChannel {
    fn open(&self, target: &ContactTarget) -> Result<(), ContactError> {
        tracing::info!(
            method = target.method.label(),
            value = %target.value,
            "opening contact channel"
        );
        self.opened
            .lock()
            .expect("channel mutex poisoned")
            .push(target.clone());
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Seed listings for the demo command and `serve --seed`: a spread of
/// types, deadlines, and salary shapes across two employers.
pub(crate) fn seed_marketplace(
    jobs: &InMemoryJobRepository,
    companies: &InMemoryCompanyRepository,
    today: NaiveDate,
) {
    let registered = Utc.with_ymd_and_hms(2024, 9, 12, 8, 0, 0).single().expect("valid");
    companies.seed(Company {
        id: CompanyId("hangang-logistics".to_string()),
        name_en: "Hangang Logistics".to_string(),
        name_ko: "한강 물류".to_string(),
        verified: true,
        created_at: registered,
    });
    companies.seed(Company {
        id: CompanyId("itaewon-kitchen".to_string()),
        name_en: "Itaewon Kitchen".to_string(),
        name_ko: "이태원 키친".to_string(),
        verified: true,
        created_at: registered,
    });
    companies.seed(Company {
        id: CompanyId("fresh-startup".to_string()),
        name_en: "Fresh Startup".to_string(),
        name_ko: "프레시 스타트업".to_string(),
        verified: false,
        created_at: registered,
    });

    let submitted = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).single().expect("valid");
    let seeds = [
        Job {
            id: JobId("job-warehouse".to_string()),
            title: "Warehouse associate".to_string(),
            description: "Sorting, packing, forklift support".to_string(),
            category: CategoryId("logistics".to_string()),
            job_type: JobType::FullTime,
            location_type: LocationType::OnSite,
            location: "Seoul, Guro-gu".to_string(),
            map_url: None,
            salary: Salary {
                kind: SalaryType::Monthly,
                min: Some(2_600_000),
                max: Some(3_100_000),
            },
            experience: ExperienceLevel::Entry,
            languages: vec![LanguageRequirement {
                language: LanguageId("ko".to_string()),
                proficiency: Proficiency::Basic,
            }],
            skills: vec!["forklift".to_string()],
            contacts: ContactDetails {
                email: Some("jobs@hangang.example".to_string()),
                phone: Some("+82-2-555-0101".to_string()),
                ..ContactDetails::default()
            },
            deadline: Some(today + Duration::days(2)),
            attachments: Vec::new(),
            cover_image: None,
            views: 0,
            created_at: submitted,
            updated_at: submitted,
            company: CompanyId("hangang-logistics".to_string()),
            owner: UserId("employer-hangang".to_string()),
            approval: ApprovalState::Approved,
        },
        Job {
            id: JobId("job-linecook".to_string()),
            title: "Line cook (English-speaking kitchen)".to_string(),
            description: "Evening service, Western menu".to_string(),
            category: CategoryId("food-service".to_string()),
            job_type: JobType::PartTime,
            location_type: LocationType::OnSite,
            location: "Seoul, Itaewon".to_string(),
            map_url: None,
            salary: Salary {
                kind: SalaryType::Hourly,
                min: Some(12_000),
                max: None,
            },
            experience: ExperienceLevel::Junior,
            languages: vec![LanguageRequirement {
                language: LanguageId("en".to_string()),
                proficiency: Proficiency::Conversational,
            }],
            skills: vec!["grill".to_string(), "prep".to_string()],
            contacts: ContactDetails {
                email: Some("kitchen@itaewon.example".to_string()),
                whatsapp: Some("+82-10-5550-0202".to_string()),
                ..ContactDetails::default()
            },
            deadline: Some(today + Duration::days(10)),
            attachments: Vec::new(),
            cover_image: None,
            views: 0,
            created_at: submitted + Duration::hours(3),
            updated_at: submitted + Duration::hours(3),
            company: CompanyId("itaewon-kitchen".to_string()),
            owner: UserId("employer-itaewon".to_string()),
            approval: ApprovalState::Approved,
        },
        Job {
            id: JobId("job-remote-dev".to_string()),
            title: "Remote frontend developer".to_string(),
            description: "React dashboard work, KST overlap required".to_string(),
            category: CategoryId("tech".to_string()),
            job_type: JobType::Contract,
            location_type: LocationType::Remote,
            location: "Remote (KST)".to_string(),
            map_url: None,
            salary: Salary::negotiable(),
            experience: ExperienceLevel::Mid,
            languages: vec![
                LanguageRequirement {
                    language: LanguageId("en".to_string()),
                    proficiency: Proficiency::Fluent,
                },
                LanguageRequirement {
                    language: LanguageId("ko".to_string()),
                    proficiency: Proficiency::Basic,
                },
            ],
            skills: vec!["react".to_string(), "typescript".to_string()],
            contacts: ContactDetails {
                email: Some("dev@hangang.example".to_string()),
                website: Some("https://careers.hangang.example".to_string()),
                ..ContactDetails::default()
            },
            deadline: None,
            attachments: Vec::new(),
            cover_image: None,
            views: 0,
            created_at: submitted + Duration::hours(6),
            updated_at: submitted + Duration::hours(6),
            company: CompanyId("hangang-logistics".to_string()),
            owner: UserId("employer-hangang".to_string()),
            approval: ApprovalState::Approved,
        },
        Job {
            id: JobId("job-expired".to_string()),
            title: "Holiday delivery driver".to_string(),
            description: "Seasonal route coverage".to_string(),
            category: CategoryId("logistics".to_string()),
            job_type: JobType::Contract,
            location_type: LocationType::OnSite,
            location: "Incheon".to_string(),
            map_url: None,
            salary: Salary {
                kind: SalaryType::Monthly,
                min: None,
                max: Some(2_900_000),
            },
            experience: ExperienceLevel::Entry,
            languages: Vec::new(),
            skills: Vec::new(),
            contacts: ContactDetails {
                phone: Some("+82-32-555-0303".to_string()),
                ..ContactDetails::default()
            },
            deadline: Some(today - Duration::days(4)),
            attachments: Vec::new(),
            cover_image: None,
            views: 0,
            created_at: submitted - Duration::days(20),
            updated_at: submitted - Duration::days(20),
            company: CompanyId("hangang-logistics".to_string()),
            owner: UserId("employer-hangang".to_string()),
            approval: ApprovalState::Approved,
        },
        Job {
            id: JobId("job-pending".to_string()),
            title: "Weekend barista".to_string(),
            description: "Espresso bar, weekend shifts".to_string(),
            category: CategoryId("food-service".to_string()),
            job_type: JobType::PartTime,
            location_type: LocationType::OnSite,
            location: "Seoul, Hongdae".to_string(),
            map_url: None,
            salary: Salary {
                kind: SalaryType::Hourly,
                min: Some(11_000),
                max: Some(13_000),
            },
            experience: ExperienceLevel::Entry,
            languages: vec![LanguageRequirement {
                language: LanguageId("ko".to_string()),
                proficiency: Proficiency::Conversational,
            }],
            skills: Vec::new(),
            contacts: ContactDetails {
                instagram: Some("@hongdae.cafe".to_string()),
                ..ContactDetails::default()
            },
            deadline: Some(today + Duration::days(21)),
            attachments: Vec::new(),
            cover_image: None,
            views: 0,
            created_at: submitted + Duration::hours(9),
            updated_at: submitted + Duration::hours(9),
            company: CompanyId("itaewon-kitchen".to_string()),
            owner: UserId("employer-itaewon".to_string()),
            approval: ApprovalState::Pending,
        },
    ];

    for job in seeds {
        let id = job.id.clone();
        if let Err(err) = jobs.insert(job) {
            tracing::warn!(job = %id.0, error = %err, "seed row skipped");
        }
    }
}
