//! fqc-report
//!
//! End-of-run failure reporting: collect per-feature processing failures,
//! write them to a CSV artifact and hand the artifact to a [`Mailer`].
//! The artifact is deleted once the mail goes out; it only survives on
//! disk when delivery fails.

mod artifact;
mod collector;
mod mailer;

pub use artifact::{remove_artifact, write_failure_report};
pub use collector::FailureCollector;
pub use mailer::{LogMailer, Mailer, ReportEmail};

use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Write, mail and clean up the failure report for one run.
///
/// A run with no failures sends nothing. On delivery failure the error
/// propagates and the artifact stays on disk for manual follow-up.
pub fn dispatch_failure_report(
    collector: &FailureCollector,
    output_dir: &Path,
    run_id: Uuid,
    run_date: NaiveDate,
    mailer: &dyn Mailer,
    recipients: &[String],
) -> Result<()> {
    if collector.is_empty() {
        info!("no processing failures this run, skipping failure report");
        return Ok(());
    }

    let path = write_failure_report(output_dir, run_id, run_date, collector.records())?;
    let email = ReportEmail {
        subject: format!("Survey QC failure report {run_date}"),
        body: collector.summary(),
        recipients: recipients.to_vec(),
        attachment: Some(path.clone()),
    };

    mailer.send(&email)?;
    remove_artifact(&path)?;
    Ok(())
}
