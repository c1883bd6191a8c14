use serde::{Deserialize, Serialize};

use super::domain::{
    CompanyCard, ExperienceLevel, Job, JobType, LanguageId, LocationType, Salary,
};

/// One row of the public listing set: the posting plus the owning company's
/// localized names, joined ahead of filtering so free-text search can reach
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    pub job: Job,
    pub company: CompanyCard,
}

/// Multi-dimensional listing filter. Dimensions are AND-combined; within a
/// dimension the selected values OR-combine, and an empty selection leaves
/// that dimension unfiltered. Degenerate combinations (a minimum above the
/// maximum) are evaluated literally, never rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingFilter {
    pub query: Option<String>,
    pub job_types: Vec<JobType>,
    pub location_types: Vec<LocationType>,
    pub experience_levels: Vec<ExperienceLevel>,
    pub languages: Vec<LanguageId>,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.job_types.is_empty()
            && self.location_types.is_empty()
            && self.experience_levels.is_empty()
            && self.languages.is_empty()
            && self.salary_min.is_none()
            && self.salary_max.is_none()
    }

    /// Stateless reduction of the candidate set; input order is preserved.
    pub fn apply(&self, rows: &[ListingRow]) -> Vec<ListingRow> {
        rows.iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect()
    }

    pub fn matches(&self, row: &ListingRow) -> bool {
        self.matches_query(row)
            && self.matches_job_type(&row.job)
            && self.matches_location_type(&row.job)
            && self.matches_experience(&row.job)
            && self.matches_languages(&row.job)
            && self.matches_salary_min(&row.job.salary)
            && self.matches_salary_max(&row.job.salary)
    }

    fn matches_query(&self, row: &ListingRow) -> bool {
        let Some(query) = self.query.as_deref() else {
            return true;
        };
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let job = &row.job;
        [
            job.title.as_str(),
            job.description.as_str(),
            job.location.as_str(),
            row.company.name_en.as_str(),
            row.company.name_ko.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_job_type(&self, job: &Job) -> bool {
        self.job_types.is_empty() || self.job_types.contains(&job.job_type)
    }

    fn matches_location_type(&self, job: &Job) -> bool {
        self.location_types.is_empty() || self.location_types.contains(&job.location_type)
    }

    fn matches_experience(&self, job: &Job) -> bool {
        self.experience_levels.is_empty() || self.experience_levels.contains(&job.experience)
    }

    fn matches_languages(&self, job: &Job) -> bool {
        if self.languages.is_empty() {
            return true;
        }
        job.languages
            .iter()
            .any(|requirement| self.languages.contains(&requirement.language))
    }

    // Listings that never disclosed pay (negotiable, or neither bound set)
    // always pass both salary dimensions.
    fn matches_salary_min(&self, salary: &Salary) -> bool {
        let Some(floor) = self.salary_min else {
            return true;
        };
        if salary.is_undisclosed() {
            return true;
        }
        salary
            .effective_upper()
            .map_or(true, |upper| upper >= floor)
    }

    fn matches_salary_max(&self, salary: &Salary) -> bool {
        let Some(ceiling) = self.salary_max else {
            return true;
        };
        if salary.is_undisclosed() {
            return true;
        }
        salary
            .effective_lower()
            .map_or(true, |lower| lower <= ceiling)
    }
}
