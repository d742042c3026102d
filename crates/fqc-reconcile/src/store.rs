use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use fqc_schemas::{canonical_key, AttrValue, FeatureRecord, QcStatus};

use crate::types::{StoredIssue, Transition};

/// In-memory index of the QC layer's current contents, keyed by the
/// identity of the feature each issue refers to (`related_gid`).
///
/// Materialized once per map, then mutated only by [`QcStateStore::apply`]
/// as the reconciler creates and transitions issues, so later features in
/// the same run observe earlier writes.
///
/// Lookup is identity-only: if the layer ever held two issues for one
/// identity under different error types, only the last row loaded is
/// visible here. Preserved limitation; see DESIGN.md.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QcStateStore {
    issues: BTreeMap<String, StoredIssue>,
}

fn attr_i64(row: &FeatureRecord, name: &str) -> Option<i64> {
    match row.attr(name)? {
        AttrValue::Int(i) => Some(*i),
        AttrValue::Float(f) => Some(*f as i64),
        // Historical rows store some numeric fields as text.
        AttrValue::Text(t) => t.trim().parse().ok(),
        AttrValue::Null => None,
    }
}

fn attr_text(row: &FeatureRecord, name: &str) -> Option<String> {
    row.attr(name)?.as_text().map(str::to_string)
}

fn attr_timestamp(row: &FeatureRecord, name: &str) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(attr_i64(row, name)?).single()
}

impl QcStateStore {
    pub fn new() -> QcStateStore {
        QcStateStore::default()
    }

    /// Build the store from the QC layer's current rows. Rows without a
    /// `related_gid` cannot participate in matching and are dropped.
    pub fn from_layer_rows(rows: &[FeatureRecord]) -> QcStateStore {
        let mut store = QcStateStore::new();
        for row in rows {
            let identity = match attr_text(row, "related_gid") {
                Some(gid) => canonical_key(&gid),
                None => continue,
            };
            store.insert(StoredIssue {
                record_key: Some(row.object_id),
                issue_gid: Some(row.global_id.clone()),
                identity,
                error_type: attr_i64(row, "error_type").unwrap_or(0) as i32,
                status: QcStatus::from_code(attr_i64(row, "QC_Status").unwrap_or(0) as i32),
                priority: attr_i64(row, "qc_priority").unwrap_or(0) as i32,
                description: attr_text(row, "error_description"),
                owner_tag: attr_text(row, "QC_User"),
                created_at: attr_timestamp(row, "QC_created_date"),
            });
        }
        store
    }

    pub fn insert(&mut self, issue: StoredIssue) {
        self.issues.insert(issue.identity.clone(), issue);
    }

    pub fn get(&self, identity: &str) -> Option<&StoredIssue> {
        self.issues.get(identity)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Reflect a persisted transition into the in-memory state.
    pub fn apply(&mut self, transition: &Transition) {
        match transition {
            Transition::Create(c) => self.insert(StoredIssue {
                record_key: None,
                issue_gid: None,
                identity: c.identity.clone(),
                error_type: c.feature_type.error_code(),
                status: QcStatus::Flagged,
                priority: c.priority,
                description: Some(c.description.clone()),
                owner_tag: Some(c.owner_tag.clone()),
                created_at: Some(c.created_at),
            }),
            Transition::Update(u) => {
                if let Some(issue) = self.issues.get_mut(&u.identity) {
                    issue.status = QcStatus::Flagged;
                    issue.priority = u.priority;
                    issue.description = Some(u.description.clone());
                }
            }
            Transition::Resolve(r) => {
                if let Some(issue) = self.issues.get_mut(&r.identity) {
                    issue.status = QcStatus::Resolved;
                }
            }
            Transition::Noop(_) => {}
        }
    }

    /// Attach the portal-assigned record handle after a create is acked, so
    /// an in-run follow-up write can address the new row.
    pub fn set_record_key(&mut self, identity: &str, record_key: i64, issue_gid: Option<String>) {
        if let Some(issue) = self.issues.get_mut(identity) {
            issue.record_key = Some(record_key);
            if issue.issue_gid.is_none() {
                issue.issue_gid = issue_gid;
            }
        }
    }
}
