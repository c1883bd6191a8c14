//! Marketplace core: listings, moderation, and user interactions.
//!
//! Each submodule owns one slice of behavior. `jobs` carries the domain
//! model plus the pure evaluators (deadline, filter) and the listing
//! catalog; `moderation` owns the approval state machine and the admin
//! queue; `interactions` tracks saves and applications. The shared store
//! contract lives in `repository`.

pub mod interactions;
pub mod jobs;
pub mod moderation;
pub mod repository;
