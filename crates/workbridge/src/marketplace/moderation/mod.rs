//! Admin moderation: the approval state machine and the review queue.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{ModerationDecision, ModerationOutcome, ModerationStatus, Transition};
pub use router::moderation_router;
pub use service::{ModerationError, ModerationService};
