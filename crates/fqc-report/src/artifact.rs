use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use fqc_schemas::FailureRecord;

/// Write the run's failure records to `<dir>/qc_failures_<date>_<run_id>.csv`.
pub fn write_failure_report(
    output_dir: &Path,
    run_id: Uuid,
    run_date: NaiveDate,
    records: &[FailureRecord],
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create report dir failed: {}", output_dir.display()))?;

    let path = output_dir.join(format!("qc_failures_{run_date}_{run_id}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("open report failed: {}", path.display()))?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("write report row failed: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush report failed: {}", path.display()))?;

    info!(path = %path.display(), rows = records.len(), "failure report written");
    Ok(path)
}

/// Delete a report artifact after successful delivery.
pub fn remove_artifact(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("delete report failed: {}", path.display()))
}
