//! Job postings: the domain model, the pure deadline and filter
//! evaluators, the session-scoped listing catalog, and the employer
//! submission service.

pub mod catalog;
pub mod deadline;
pub mod domain;
pub mod filter;
pub mod router;
pub mod submission;

#[cfg(test)]
mod tests;

pub use catalog::{AnnotatedListing, CatalogQuery, ListingCatalog, SessionKey};
pub use deadline::{evaluate as evaluate_deadline, Actionability, DeadlineStatus};
pub use domain::{
    ApprovalState, CategoryId, Company, CompanyCard, CompanyId, ContactDetails, ContactMethod,
    ExperienceLevel, Job, JobId, JobType, LanguageId, LanguageRequirement, LocationType,
    Proficiency, Salary, SalaryType, SavedJobId, UserId,
};
pub use filter::{ListingFilter, ListingRow};
pub use router::listings_router;
pub use submission::{JobDraft, JobPatch, SubmissionError, SubmissionService};
