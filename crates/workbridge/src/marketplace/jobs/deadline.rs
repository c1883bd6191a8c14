use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{ApprovalState, Job};

/// Deadlines this many days out (exclusive of today) are flagged urgent.
pub const URGENT_WINDOW_DAYS: i64 = 3;

/// Temporal status of a posting, derived from its deadline at evaluation
/// time. "Now" is injected so the evaluation stays pure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineStatus {
    pub expired: bool,
    pub urgent: bool,
    /// Days until the deadline, or days since it when `expired`. Absent for
    /// open-ended postings.
    pub days: Option<i64>,
    pub label: Option<String>,
}

impl DeadlineStatus {
    fn open_ended() -> Self {
        Self {
            expired: false,
            urgent: false,
            days: None,
            label: None,
        }
    }
}

/// Derive the deadline status for `today`.
///
/// A deadline falling on `today` still counts as open ("expires today") and
/// is deliberately not urgent; urgency covers the 1..=3 days-left window.
pub fn evaluate(deadline: Option<NaiveDate>, today: NaiveDate) -> DeadlineStatus {
    let Some(deadline) = deadline else {
        return DeadlineStatus::open_ended();
    };

    let days = (deadline - today).num_days();

    if days < 0 {
        let overdue = days.abs();
        return DeadlineStatus {
            expired: true,
            urgent: false,
            days: Some(overdue),
            label: Some(format!("expired {overdue} day(s) ago")),
        };
    }

    if days == 0 {
        return DeadlineStatus {
            expired: false,
            urgent: false,
            days: Some(0),
            label: Some("expires today".to_string()),
        };
    }

    DeadlineStatus {
        expired: false,
        urgent: days <= URGENT_WINDOW_DAYS,
        days: Some(days),
        label: Some(format!("{days} day(s) left")),
    }
}

/// The two independent gates every consumer of "is this job actionable"
/// must combine: approval controls base visibility, expiry only downgrades
/// an approved posting from the active views and disables applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Actionability {
    pub visible: bool,
    pub active: bool,
    pub can_apply: bool,
}

impl Actionability {
    pub fn evaluate(job: &Job, today: NaiveDate) -> Self {
        let visible = matches!(job.approval, ApprovalState::Approved);
        let expired = evaluate(job.deadline, today).expired;
        let active = visible && !expired;
        Self {
            visible,
            active,
            can_apply: active,
        }
    }
}
