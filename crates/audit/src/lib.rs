//! File-integrity audit engine.
//!
//! This crate provides:
//! - Inventory builder: baseline `{path, mtime}` snapshot of a rule's tree
//! - Job assembly: one immutable `AuditJob` per rule whose walk succeeded
//! - Change detector: per-pass comparison of live files against the baseline
//! - Scheduler: one staggered, periodic, cancellable task per job

pub mod detector;
pub mod error;
pub mod inventory;
pub mod job;
pub mod scheduler;

pub use detector::detect;
pub use error::AuditError;
pub use inventory::{build_inventory, FileSnapshot};
pub use job::{assemble_jobs, AuditJob, JobAssembly, SkippedPlan};
pub use scheduler::{run_job, run_pass, startup_offset, AuditScheduler, PassReport, SchedulerSettings};
