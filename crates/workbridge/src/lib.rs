//! Domain core for the workbridge bilingual jobs marketplace.
//!
//! Everything that decides marketplace behavior lives in this crate: the
//! listing domain model, the deadline evaluator, the filter engine, the
//! moderation state machine, and the save/apply interaction tracker. The
//! deployable HTTP service in `services/api` only wires these pieces to a
//! concrete store and a socket.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
