//! Rule-file loader.
//!
//! Reads tab-separated rule lines of the form
//! `kind presence mode atime ctime mtime hash path prune` into [`AuditPlan`]s.
//! Comment lines (`#`) and lines whose first character is not `d` or `f`
//! are ignored.
//!
//! [`AuditPlan`]: crate::schema::AuditPlan

mod core;
mod error;


pub use self::core::{load_rules, parse_line, parse_rules};
pub use self::error::{Result, RuleError};
