use std::collections::BTreeMap;

use tracing::warn;

use fqc_schemas::FailureRecord;

/// Accumulates per-feature processing failures across a whole run.
///
/// A failure never stops the run; it is logged at `warn!` when recorded
/// and reported in bulk at the end.
#[derive(Debug, Default)]
pub struct FailureCollector {
    records: Vec<FailureRecord>,
}

impl FailureCollector {
    pub fn new() -> FailureCollector {
        FailureCollector::default()
    }

    pub fn record(&mut self, failure: FailureRecord) {
        warn!(
            survey_area = %failure.survey_area,
            layer = %failure.layer,
            object_id = failure.object_id,
            diagnostic = %failure.diagnostic,
            "feature processing failed"
        );
        self.records.push(failure);
    }

    pub fn records(&self) -> &[FailureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plain-text digest used as the report email body: total count plus a
    /// per survey-area/layer breakdown.
    pub fn summary(&self) -> String {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for f in &self.records {
            *counts
                .entry((f.survey_area.as_str(), f.layer.as_str()))
                .or_default() += 1;
        }

        let mut out = format!(
            "{} feature(s) could not be processed during the QC run.\n\n",
            self.records.len()
        );
        for ((area, layer), n) in counts {
            out.push_str(&format!("  {area} / {layer}: {n}\n"));
        }
        out.push_str("\nDetails are in the attached report.\n");
        out
    }
}
