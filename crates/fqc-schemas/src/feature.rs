use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AttrValue, Geometry};

/// Canonical form of a feature's unique key: braces stripped, lowercased.
///
/// The portal emits global ids in mixed forms (`{ABC-123}` vs `abc-123`);
/// every identity comparison in the workspace goes through this.
pub fn canonical_key(raw: &str) -> String {
    raw.replace(['{', '}'], "").to_lowercase()
}

/// One surveyed real-world object, fetched fresh each run and never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub object_id: i64,
    /// Global id exactly as the portal returned it.
    pub global_id: String,
    /// Canonicalized identity; immutable for the feature's lifetime.
    pub identity: String,
    pub attributes: BTreeMap<String, AttrValue>,
    pub geometry: Geometry,
    /// Provenance of the most recent edit to the source feature.
    pub last_editor: String,
    pub last_edit: DateTime<Utc>,
}

impl FeatureRecord {
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }
}
