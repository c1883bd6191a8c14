//! Save/apply interaction tracking: idempotent bookmarks and
//! record-once-per-method application tracking against the remote store.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplyOutcome, ApplyReceipt, SaveToggle};
pub use router::{interactions_router, InteractionRoutes};
pub use service::{InteractionError, InteractionTracker};
