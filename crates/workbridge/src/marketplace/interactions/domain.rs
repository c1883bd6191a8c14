use serde::Serialize;

use crate::marketplace::jobs::domain::{ContactMethod, JobId};
use crate::marketplace::repository::{ContactTarget, SavedJob};

/// Result of one save toggle. The removed row is returned so callers can
/// offer an undo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveToggle {
    Saved(SavedJob),
    Removed(SavedJob),
}

impl SaveToggle {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveToggle::Saved(_))
    }
}

/// What one apply invocation did. The contact channel is opened in every
/// case; `outcome` only describes the tracking side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyReceipt {
    pub job: JobId,
    pub method: ContactMethod,
    pub outcome: ApplyOutcome,
    pub contact: ContactTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Recorded,
    AlreadyRecorded,
    RecordFailed { reason: String },
}

impl ApplyOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ApplyOutcome::Recorded => "recorded",
            ApplyOutcome::AlreadyRecorded => "already_recorded",
            ApplyOutcome::RecordFailed { .. } => "record_failed",
        }
    }
}
