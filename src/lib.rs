//! Job-application pipeline tracker: the job store, next-action
//! classification, and the weekly checklist that turns confirmed outcomes
//! into status transitions.

pub mod checklist;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preset;
pub mod seed;
pub mod store;

pub use checklist::{ChecklistOptions, TaskChecklist};
pub use error::ParseError;
pub use models::{Decision, JobEntry, JobStatus, WeeklyActionItem};
pub use store::JobStore;
