use serde::{Deserialize, Serialize};

use crate::marketplace::jobs::domain::{ApprovalState, JobId};

/// An admin's verdict on a pending (or previously decided) posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl ModerationDecision {
    pub const fn target(self) -> ApprovalState {
        match self {
            Self::Approve => ApprovalState::Approved,
            Self::Reject => ApprovalState::Rejected,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// The transition function of the approval machine. Any state may be
    /// driven to either verdict at any time; reaching the state a posting
    /// is already in is a visible no-op, not an error.
    pub fn apply_to(self, current: ApprovalState) -> Transition {
        let target = self.target();
        if current == target {
            Transition::Unchanged(current)
        } else {
            Transition::Changed {
                from: current,
                to: target,
            }
        }
    }
}

/// Outcome of one application of the approval machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Changed {
        from: ApprovalState,
        to: ApprovalState,
    },
    Unchanged(ApprovalState),
}

/// Per-posting result of a moderation call; bulk runs return one of these
/// per requested id so partial failures stay addressable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationOutcome {
    pub job: JobId,
    pub status: ModerationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Applied {
        from: ApprovalState,
        to: ApprovalState,
    },
    AlreadyInState(ApprovalState),
    Failed {
        reason: String,
    },
}

impl ModerationOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status, ModerationStatus::Failed { .. })
    }
}
