use serde::{Deserialize, Serialize};

/// One unexpected per-feature evaluation fault, reported to operators by
/// email at the end of the run. Never persisted anywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Survey area tag derived from the webmap title.
    pub survey_area: String,
    pub layer: String,
    pub object_id: i64,
    pub diagnostic: String,
}
