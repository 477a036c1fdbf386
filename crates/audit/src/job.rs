//! Audit job assembly.

use std::path::PathBuf;

use tracing::{info, warn};

use filewatch_rules::AuditPlan;

use crate::error::AuditError;
use crate::inventory::{build_inventory, FileSnapshot};

/// An audit plan paired with the baseline captured for it at startup.
///
/// The baseline is never refreshed: a file that changed and stays changed
/// is reported again on every pass.
#[derive(Debug, Clone)]
pub struct AuditJob {
    plan: AuditPlan,
    baseline: Vec<FileSnapshot>,
}

impl AuditJob {
    pub fn new(plan: AuditPlan, baseline: Vec<FileSnapshot>) -> Self {
        Self { plan, baseline }
    }

    /// Build the baseline for `plan` and wrap both into a job.
    pub fn build(plan: AuditPlan) -> Result<Self, AuditError> {
        let baseline = build_inventory(&plan)?;
        Ok(Self::new(plan, baseline))
    }

    pub fn plan(&self) -> &AuditPlan {
        &self.plan
    }

    pub fn baseline(&self) -> &[FileSnapshot] {
        &self.baseline
    }
}

/// A rule that produced no job.
#[derive(Debug)]
pub struct SkippedPlan {
    /// 1-based position of the plan in the input sequence.
    pub rule: usize,
    pub path: PathBuf,
    pub error: AuditError,
}

/// Outcome of [`assemble_jobs`].
#[derive(Debug, Default)]
pub struct JobAssembly {
    /// Jobs whose inventory build succeeded, in input order.
    pub jobs: Vec<AuditJob>,
    pub skipped: Vec<SkippedPlan>,
}

/// Build one job per plan. Plans whose walk fails are logged and skipped.
pub fn assemble_jobs(plans: Vec<AuditPlan>) -> JobAssembly {
    let mut assembly = JobAssembly::default();

    for (idx, plan) in plans.into_iter().enumerate() {
        let rule = idx + 1;
        let path = plan.path.clone();
        match AuditJob::build(plan) {
            Ok(job) => {
                info!(rule, path = %path.display(), files = job.baseline().len(), "audit job assembled");
                assembly.jobs.push(job);
            }
            Err(error) => {
                warn!(rule, path = %path.display(), error = %error, "skipping rule, check rules and file system path");
                assembly.skipped.push(SkippedPlan { rule, path, error });
            }
        }
    }

    assembly
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use filewatch_rules::PlanKind;
    use tempfile::TempDir;

    #[test]
    fn failed_plans_are_skipped_and_order_kept() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("one.txt"), "1").unwrap();
        fs::write(second.path().join("two.txt"), "2").unwrap();
        let missing = first.path().join("missing");

        let plans = vec![
            AuditPlan::new(PlanKind::Directory, first.path()),
            AuditPlan::new(PlanKind::Directory, &missing),
            AuditPlan::new(PlanKind::Directory, second.path()),
        ];

        let assembly = assemble_jobs(plans);

        assert_eq!(assembly.jobs.len(), 2);
        assert_eq!(assembly.jobs[0].plan().path, first.path());
        assert_eq!(assembly.jobs[1].plan().path, second.path());
        assert_eq!(assembly.jobs[0].baseline().len(), 1);

        assert_eq!(assembly.skipped.len(), 1);
        assert_eq!(assembly.skipped[0].rule, 2);
        assert_eq!(assembly.skipped[0].path, missing);
        assert!(matches!(assembly.skipped[0].error, AuditError::WalkFailure { .. }));
    }

    #[test]
    fn empty_directory_is_a_valid_job() {
        let dir = TempDir::new().unwrap();
        let assembly = assemble_jobs(vec![AuditPlan::new(PlanKind::Directory, dir.path())]);
        assert_eq!(assembly.jobs.len(), 1);
        assert!(assembly.jobs[0].baseline().is_empty());
        assert!(assembly.skipped.is_empty());
    }
}
