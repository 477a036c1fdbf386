//! Audit rule ingestion.
//!
//! This crate provides:
//! - `AuditPlan`, the structured record for one rule line
//! - A tab-separated rule-file loader that never drops a line over a bad numeric field

pub mod loader;
pub mod schema;

pub use loader::{load_rules, parse_line, parse_rules, RuleError};
pub use schema::{AuditPlan, PlanKind};
