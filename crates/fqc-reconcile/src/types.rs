use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fqc_schemas::{FeatureType, QcStatus};

/// Hard cap on stored issue descriptions, imposed by the QC layer schema.
pub const DESCRIPTION_LIMIT: usize = 1000;

/// Clamp a joined error description to the layer's field width.
pub fn truncate_description(s: &str) -> String {
    if s.chars().count() <= DESCRIPTION_LIMIT {
        return s.to_string();
    }
    s.chars().take(DESCRIPTION_LIMIT).collect()
}

/// One previously recorded QC issue, as materialized from the QC layer at
/// the start of a map's processing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredIssue {
    /// Opaque record handle (OBJECTID) used to address updates. `None` only
    /// for issues created earlier in the same run whose ack was lost.
    pub record_key: Option<i64>,
    /// Global id of the QC record itself (not the related feature).
    pub issue_gid: Option<String>,
    /// Canonical identity of the feature this issue refers to (related_gid).
    pub identity: String,
    pub error_type: i32,
    pub status: QcStatus,
    pub priority: i32,
    pub description: Option<String>,
    /// QC_User tag; only issues carrying the automation's own tag are ever
    /// auto-updated or auto-resolved.
    pub owner_tag: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Persist a brand-new QC issue for a failing feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssueCreate {
    pub identity: String,
    pub feature_type: FeatureType,
    pub priority: i32,
    /// Already truncated to [`DESCRIPTION_LIMIT`].
    pub description: String,
    pub error_count: usize,
    pub anchor: (f64, f64),
    /// The source feature's last editor; recorded as the expected resolver.
    pub resolver_name: String,
    pub owner_tag: String,
    pub created_at: DateTime<Utc>,
}

/// Refresh an existing owned issue whose failure content changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssueUpdate {
    pub record_key: Option<i64>,
    pub issue_gid: Option<String>,
    pub identity: String,
    pub priority: i32,
    /// Already truncated to [`DESCRIPTION_LIMIT`].
    pub description: String,
    pub anchor: (f64, f64),
    pub edited_at: DateTime<Utc>,
}

/// Close an owned issue whose feature now passes every rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssueResolve {
    pub record_key: Option<i64>,
    pub issue_gid: Option<String>,
    pub identity: String,
    pub anchor: (f64, f64),
    /// Sourced from the feature's last-edit timestamp: when it was actually
    /// fixed, not when the QC pass happened to run.
    pub resolved_at: DateTime<Utc>,
    pub approved_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoopReason {
    /// Feature passes and nothing was recorded: nothing to do.
    StillPassing,
    /// Same failure text as already stored: avoid a redundant write.
    UnchangedFailure,
    /// Stored issue belongs to a different feature type's lineage.
    ForeignErrorType,
    /// Stored issue was entered manually (not our owner tag).
    ForeignOwner,
    /// Feature passes and the issue is already Resolved.
    AlreadyResolved,
}

/// The minimal state transition for one evaluated feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Transition {
    Create(IssueCreate),
    Update(IssueUpdate),
    Resolve(IssueResolve),
    Noop(NoopReason),
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        matches!(self, Transition::Noop(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_exactly_the_field_width() {
        let long = "x".repeat(DESCRIPTION_LIMIT + 500);
        assert_eq!(truncate_description(&long).chars().count(), DESCRIPTION_LIMIT);

        let short = "1 - 'Status' can not be blank";
        assert_eq!(truncate_description(short), short);
    }
}
