use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::common::*;
use crate::marketplace::interactions::domain::{ApplyOutcome, SaveToggle};
use crate::marketplace::interactions::service::{InteractionError, InteractionTracker};
use crate::marketplace::jobs::domain::{ContactMethod, JobId, SavedJobId, UserId};
use crate::marketplace::repository::{RepositoryError, SavedJob, SavedJobRepository};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 16, 10, 30, 0).single().expect("valid")
}

#[test]
fn toggle_inverts_and_double_toggle_returns_to_start() {
    let (tracker, saved, _, _) = build_tracker();
    let user = user();
    let job = job();

    let first = tracker
        .toggle_save(&user, &job.id, now())
        .expect("first toggle");
    assert!(first.is_saved());
    assert_eq!(saved.count(), 1);

    let second = tracker
        .toggle_save(&user, &job.id, now())
        .expect("second toggle");
    assert!(!second.is_saved());
    assert_eq!(saved.count(), 0);
}

/// `find` missing the row while `insert` conflicts models the lost
/// check-then-act race from a duplicate request.
struct RacySaved {
    inner: ConflictOnlySaved,
    misses_first_find: AtomicBool,
}

impl SavedJobRepository for RacySaved {
    fn for_user(&self, user: &UserId) -> Result<Vec<SavedJob>, RepositoryError> {
        self.inner.for_user(user)
    }

    fn find(&self, user: &UserId, job: &JobId) -> Result<Option<SavedJob>, RepositoryError> {
        if self.misses_first_find.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find(user, job)
    }

    fn insert(&self, saved: SavedJob) -> Result<SavedJob, RepositoryError> {
        self.inner.insert(saved)
    }

    fn delete(&self, id: &SavedJobId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }
}

#[test]
fn duplicate_insert_conflict_reads_as_saved() {
    let user = user();
    let job = job();
    let existing = SavedJob {
        id: SavedJobId("saved-existing".to_string()),
        user: user.clone(),
        job: job.id.clone(),
        created_at: now(),
    };

    let saved = Arc::new(RacySaved {
        inner: ConflictOnlySaved {
            existing: existing.clone(),
        },
        misses_first_find: AtomicBool::new(true),
    });
    let applications = Arc::new(MemoryApplications::default());
    let channel = Arc::new(CountingChannel::default());
    let tracker = InteractionTracker::new(saved, applications, channel);

    let toggled = tracker
        .toggle_save(&user, &job.id, now())
        .expect("conflict absorbed");
    match toggled {
        SaveToggle::Saved(bookmark) => assert_eq!(bookmark.id, existing.id),
        other => panic!("expected saved, got {other:?}"),
    }
}

#[test]
fn undo_creates_a_fresh_row_with_new_identity() {
    let (tracker, saved, _, _) = build_tracker();
    let user = user();
    let job = job();

    let original = match tracker.toggle_save(&user, &job.id, now()).expect("save") {
        SaveToggle::Saved(bookmark) => bookmark,
        other => panic!("expected saved, got {other:?}"),
    };
    tracker.toggle_save(&user, &job.id, now()).expect("remove");
    assert_eq!(saved.count(), 0);

    let later = Utc.with_ymd_and_hms(2025, 6, 16, 10, 45, 0).single().expect("valid");
    let recreated = tracker.undo_remove(&user, &job.id, later).expect("undo");

    assert_ne!(recreated.id, original.id);
    assert_eq!(recreated.created_at, later);
    assert_eq!(saved.count(), 1);
}

#[test]
fn apply_records_once_but_opens_channel_every_time() {
    let (tracker, _, applications, channel) = build_tracker();
    let user = user();
    let job = job();

    for _ in 0..3 {
        tracker
            .apply(&user, &job, ContactMethod::Email, now())
            .expect("apply");
    }

    assert_eq!(applications.count(), 1);
    assert_eq!(channel.opens(), 3);
    assert!(tracker.has_applied(&user, &job.id).expect("has applied"));
}

#[test]
fn second_method_creates_a_second_record() {
    let (tracker, _, applications, _) = build_tracker();
    let user = user();
    let job = job();

    let first = tracker
        .apply(&user, &job, ContactMethod::Email, now())
        .expect("email");
    assert_eq!(first.outcome, ApplyOutcome::Recorded);

    let second = tracker
        .apply(&user, &job, ContactMethod::Phone, now())
        .expect("phone");
    assert_eq!(second.outcome, ApplyOutcome::Recorded);

    let repeat = tracker
        .apply(&user, &job, ContactMethod::Phone, now())
        .expect("phone again");
    assert_eq!(repeat.outcome, ApplyOutcome::AlreadyRecorded);

    assert_eq!(applications.count(), 2);
    let methods = tracker.applied_methods(&user, &job.id).expect("methods");
    assert_eq!(methods.len(), 2);
}

#[test]
fn tracking_failure_still_opens_the_channel() {
    let saved = Arc::new(MemorySaved::default());
    let applications = Arc::new(WriteFailingApplications);
    let channel = Arc::new(CountingChannel::default());
    let tracker = InteractionTracker::new(saved, applications, channel.clone());

    let receipt = tracker
        .apply(&user(), &job(), ContactMethod::Email, now())
        .expect("apply proceeds despite tracking failure");

    assert!(matches!(receipt.outcome, ApplyOutcome::RecordFailed { .. }));
    assert_eq!(channel.opens(), 1);
}

#[test]
fn unoffered_method_is_rejected_without_opening_channel() {
    let (tracker, _, applications, channel) = build_tracker();

    let err = tracker
        .apply(&user(), &job(), ContactMethod::Instagram, now())
        .expect_err("method not offered");
    assert!(matches!(err, InteractionError::MethodNotOffered { .. }));
    assert_eq!(applications.count(), 0);
    assert_eq!(channel.opens(), 0);
}

#[test]
fn has_applied_is_false_before_any_method() {
    let (tracker, _, _, _) = build_tracker();
    assert!(!tracker
        .has_applied(&user(), &job().id)
        .expect("empty set reads fine"));
}
