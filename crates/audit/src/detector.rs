//! Change detector.
//!
//! Re-stats every baseline file of a job and reports drift. Comparison is
//! exact inequality on the modification time, so backdated files and clock
//! skew are reported as well as ordinary edits.

use std::fs;

use tracing::{debug, info, warn};

use filewatch_core::Alert;

use crate::job::AuditJob;

/// Run one pass for `job` and return the alerts it produced, in baseline order.
pub fn detect(job: &AuditJob, index: usize) -> Vec<Alert> {
    let check_mtime = job.plan().mtime_enabled();
    let mut alerts = Vec::new();

    for snapshot in job.baseline() {
        debug!(job = index, file = %snapshot.path.display(), "audit");

        let metadata = match fs::symlink_metadata(&snapshot.path) {
            Ok(m) => m,
            Err(e) => {
                let alert = Alert::deletion(index, snapshot.path.clone(), &e);
                info!("{alert}");
                alerts.push(alert);
                continue;
            }
        };

        if !check_mtime {
            continue;
        }

        let current = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!(job = index, file = %snapshot.path.display(), error = %e, "modification time unavailable");
                continue;
            }
        };

        if current != snapshot.mtime {
            let alert = Alert::modification(index, snapshot.path.clone(), snapshot.mtime, current);
            info!("{alert}");
            alerts.push(alert);
        }
    }

    info!(job = index, "{} alerts", alerts.len());
    alerts
}
