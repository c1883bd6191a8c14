use chrono::{Local, NaiveDate, TimeZone, Utc};
use clap::Args;

use crate::infra::{parse_date, seed_marketplace};
use crate::routes::Marketplace;
use workbridge::error::AppError;
use workbridge::marketplace::jobs::{
    CatalogQuery, CategoryId, CompanyId, ContactDetails, ContactMethod, ExperienceLevel, JobDraft,
    JobId, JobType, LanguageId, ListingFilter, LocationType, Salary, SessionKey,
    SubmissionService, UserId,
};
use workbridge::marketplace::moderation::ModerationDecision;
use workbridge::marketplace::repository::JobRepository;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for the walkthrough (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

/// End-to-end walkthrough over a seeded in-memory store: submission,
/// moderation, filtered listing, and save/apply tracking.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let now = Utc.from_utc_datetime(&today.and_hms_opt(10, 0, 0).expect("valid time"));

    let marketplace = Marketplace::in_memory();
    seed_marketplace(&marketplace.jobs, &marketplace.companies, today);

    println!("workbridge marketplace demo (evaluated {today})");

    // -- employer submission ------------------------------------------------
    let submissions =
        SubmissionService::new(marketplace.jobs.clone(), marketplace.companies.clone());

    let draft = JobDraft {
        title: "Floor staff (new branch)".to_string(),
        description: "Opening team for the Mapo branch".to_string(),
        category: CategoryId("food-service".to_string()),
        job_type: JobType::FullTime,
        location_type: LocationType::OnSite,
        location: "Seoul, Mapo-gu".to_string(),
        map_url: None,
        salary: Salary::negotiable(),
        experience: ExperienceLevel::Entry,
        languages: Vec::new(),
        skills: Vec::new(),
        contacts: ContactDetails {
            email: Some("branch@itaewon.example".to_string()),
            ..ContactDetails::default()
        },
        deadline: None,
        attachments: Vec::new(),
        cover_image: None,
    };
    let submitted = submissions.submit(
        draft.clone(),
        &CompanyId("itaewon-kitchen".to_string()),
        &UserId("employer-itaewon".to_string()),
        now,
    )?;
    println!("\nSubmitted '{}' as {}", submitted.title, submitted.id.0);

    match submissions.submit(
        draft,
        &CompanyId("fresh-startup".to_string()),
        &UserId("employer-fresh".to_string()),
        now,
    ) {
        Err(err) => println!("Unverified employer blocked: {err}"),
        Ok(job) => println!("Unexpectedly accepted {}", job.id.0),
    }

    // -- admin review -------------------------------------------------------
    let queue = marketplace.moderation.pending_queue()?;
    println!("\nModeration queue ({} pending)", queue.len());
    for job in &queue {
        println!(
            "- {} | {} | submitted {}",
            job.id.0,
            job.title,
            job.created_at.date_naive()
        );
    }

    let verdict_ids: Vec<JobId> = queue
        .iter()
        .map(|job| job.id.clone())
        .chain(std::iter::once(JobId("job-missing".to_string())))
        .collect();
    let outcomes = marketplace
        .moderation
        .moderate_batch(&verdict_ids, ModerationDecision::Approve);
    println!("\nBulk approval outcomes");
    for outcome in &outcomes {
        println!("- {}: {:?}", outcome.job.0, outcome.status);
    }

    // -- public listing -----------------------------------------------------
    let session = SessionKey("demo-visitor".to_string());
    let english_friendly = CatalogQuery {
        filter: ListingFilter {
            languages: vec![LanguageId("en".to_string())],
            ..ListingFilter::default()
        },
        ..CatalogQuery::default()
    };
    let page = marketplace
        .catalog
        .snapshot(&session, &english_friendly, today)?;
    println!("\nEnglish-friendly listings ({})", page.len());
    for listing in page.iter() {
        let deadline_note = listing
            .status
            .label
            .clone()
            .unwrap_or_else(|| "open-ended".to_string());
        println!(
            "- {} @ {} | {} | urgent: {} | can apply: {}",
            listing.job.title,
            listing.company.name_en,
            deadline_note,
            listing.status.urgent,
            listing.actionability.can_apply
        );
    }

    let full_page = marketplace
        .catalog
        .snapshot(&session, &CatalogQuery::default(), today)?;
    let expired = full_page
        .iter()
        .filter(|listing| listing.status.expired)
        .count();
    println!(
        "\nFull board: {} approved listings, {} expired but still visible",
        full_page.len(),
        expired
    );

    // -- seeker interactions ------------------------------------------------
    let seeker = UserId("demo-seeker".to_string());
    let target = JobId("job-warehouse".to_string());

    let toggled = marketplace.tracker.toggle_save(&seeker, &target, now)?;
    println!("\nSave toggle #1 -> saved: {}", toggled.is_saved());
    let toggled = marketplace.tracker.toggle_save(&seeker, &target, now)?;
    println!("Save toggle #2 -> saved: {}", toggled.is_saved());
    let restored = marketplace.tracker.undo_remove(&seeker, &target, now)?;
    println!("Undo re-created bookmark {} (new identity)", restored.id.0);

    let job = marketplace
        .jobs
        .fetch(&target)
        .map_err(AppError::from)?
        .expect("seeded job present");
    for round in 1..=2 {
        let receipt = marketplace
            .tracker
            .apply(&seeker, &job, ContactMethod::Email, now)?;
        println!(
            "Apply round {round} via {} -> {}",
            receipt.method.label(),
            receipt.outcome.label()
        );
    }
    let methods = marketplace.tracker.applied_methods(&seeker, &target)?;
    println!(
        "Methods used on {}: {:?}; contact channel opened {} time(s)",
        target.0,
        methods
            .iter()
            .map(|method| method.label())
            .collect::<Vec<_>>(),
        marketplace.channel.opens()
    );

    Ok(())
}
