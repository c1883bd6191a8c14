use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for marketplace users (job seekers and employers).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for employer companies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Identifier wrapper for job categories (reference table).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

/// Identifier wrapper for languages (reference table).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LanguageId(pub String);

/// Identifier wrapper for saved-job bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SavedJobId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::FullTime,
            Self::PartTime,
            Self::Contract,
            Self::Internship,
            Self::Freelance,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Freelance => "Freelance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Remote,
    OnSite,
    Hybrid,
}

impl LocationType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::OnSite => "On-site",
            Self::Hybrid => "Hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    Hourly,
    Monthly,
    Yearly,
    Negotiable,
}

impl SalaryType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hourly => "Hourly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
            Self::Negotiable => "Negotiable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::Junior => "Junior",
            Self::Mid => "Mid-level",
            Self::Senior => "Senior",
            Self::Executive => "Executive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Basic,
    Conversational,
    Fluent,
    Native,
}

impl Proficiency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Conversational => "Conversational",
            Self::Fluent => "Fluent",
            Self::Native => "Native",
        }
    }
}

/// Channels an applicant can use to reach the employer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Phone,
    Whatsapp,
    Instagram,
    Facebook,
    Website,
}

impl ContactMethod {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Email,
            Self::Phone,
            Self::Whatsapp,
            Self::Instagram,
            Self::Facebook,
            Self::Website,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Whatsapp => "whatsapp",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Website => "website",
        }
    }
}

/// Moderation state of a posting. Every submission starts `Pending`; only
/// `Approved` postings are publicly listable. Deadline expiry is evaluated
/// separately and never feeds back into this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Advertised pay. Either bound may be absent; `Negotiable` listings
/// usually carry neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salary {
    pub kind: SalaryType,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Salary {
    pub const fn negotiable() -> Self {
        Self {
            kind: SalaryType::Negotiable,
            min: None,
            max: None,
        }
    }

    /// A listing that never disclosed pay cannot be excluded by salary
    /// filters.
    pub fn is_undisclosed(&self) -> bool {
        matches!(self.kind, SalaryType::Negotiable) || (self.min.is_none() && self.max.is_none())
    }

    /// The single number compared against a filter's minimum.
    pub fn effective_upper(&self) -> Option<u64> {
        self.max.or(self.min)
    }

    /// The single number compared against a filter's maximum.
    pub fn effective_lower(&self) -> Option<u64> {
        self.min.or(self.max)
    }
}

/// One language the employer expects applicants to speak.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageRequirement {
    pub language: LanguageId,
    pub proficiency: Proficiency,
}

/// Per-method contact values an employer attached to a posting. Any subset
/// may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub website: Option<String>,
}

impl ContactDetails {
    pub fn target(&self, method: ContactMethod) -> Option<&str> {
        match method {
            ContactMethod::Email => self.email.as_deref(),
            ContactMethod::Phone => self.phone.as_deref(),
            ContactMethod::Whatsapp => self.whatsapp.as_deref(),
            ContactMethod::Instagram => self.instagram.as_deref(),
            ContactMethod::Facebook => self.facebook.as_deref(),
            ContactMethod::Website => self.website.as_deref(),
        }
    }

    pub fn offered(&self) -> Vec<ContactMethod> {
        ContactMethod::ordered()
            .into_iter()
            .filter(|method| self.target(*method).is_some())
            .collect()
    }
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
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
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company: CompanyId,
    pub owner: UserId,
    pub approval: ApprovalState,
}

/// Employer profile. `verified` gates the ability to submit postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name_en: String,
    pub name_ko: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn card(&self) -> CompanyCard {
        CompanyCard {
            name_en: self.name_en.clone(),
            name_ko: self.name_ko.clone(),
        }
    }
}

/// The slice of a company a listing row carries: both localized names, so
/// free-text search can hit either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCard {
    pub name_en: String,
    pub name_ko: String,
}
