//! Transition → `applyEdits` payload mapping.
//!
//! Attribute names here are the QC layer's published field names and are
//! load-bearing: historical rows and downstream dashboards read them
//! verbatim. Timestamps go over the wire as epoch milliseconds.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use fqc_portal::{EditFeature, PointGeometry};
use fqc_reconcile::{IssueCreate, IssueResolve, IssueUpdate};
use fqc_schemas::QcStatus;

fn ms(t: DateTime<Utc>) -> Value {
    Value::from(t.timestamp_millis())
}

/// Add payload for a brand-new QC issue. `related_gid` is the source
/// feature's global id in its raw (braced) form, as historical rows store it.
pub fn create_payload(c: &IssueCreate, portal_user: &str, related_gid: &str) -> EditFeature {
    let mut attributes = Map::new();
    attributes.insert("related_gid".into(), Value::from(related_gid));
    attributes.insert("QC_Status".into(), Value::from(QcStatus::Flagged.code()));
    attributes.insert("qc_priority".into(), Value::from(c.priority));
    attributes.insert(
        "error_type".into(),
        Value::from(c.feature_type.error_code()),
    );
    attributes.insert("error_description".into(), Value::from(c.description.clone()));
    attributes.insert("Number_of_errors".into(), Value::from(c.error_count));
    attributes.insert("CreationDate".into(), ms(c.created_at));
    attributes.insert("EditDate".into(), ms(c.created_at));
    attributes.insert("QC_created_date".into(), ms(c.created_at));
    attributes.insert("Creator".into(), Value::from(portal_user));
    attributes.insert("Editor".into(), Value::from(portal_user));
    attributes.insert("QC_User".into(), Value::from(c.owner_tag.clone()));
    attributes.insert("resolver_name".into(), Value::from(c.resolver_name.clone()));
    attributes.insert("updated_error".into(), Value::Null);

    EditFeature {
        attributes,
        geometry: Some(PointGeometry::at(c.anchor)),
    }
}

fn addressed(record_key: Option<i64>, issue_gid: &Option<String>) -> Option<Map<String, Value>> {
    let mut attributes = Map::new();
    attributes.insert("OBJECTID".into(), Value::from(record_key?));
    if let Some(gid) = issue_gid {
        attributes.insert("GlobalID".into(), Value::from(gid.clone()));
    }
    Some(attributes)
}

/// Update payload refreshing an owned issue's failure content.
/// `None` when the stored issue has no record key to address.
pub fn update_payload(u: &IssueUpdate, owning_tag: &str) -> Option<EditFeature> {
    let mut attributes = addressed(u.record_key, &u.issue_gid)?;
    attributes.insert("QC_Status".into(), Value::from(QcStatus::Flagged.code()));
    attributes.insert("qc_priority".into(), Value::from(u.priority));
    attributes.insert("updated_error".into(), Value::from(u.description.clone()));
    attributes.insert("EditDate".into(), ms(u.edited_at));
    attributes.insert("Editor".into(), Value::from(owning_tag));

    Some(EditFeature {
        attributes,
        geometry: Some(PointGeometry::at(u.anchor)),
    })
}

/// Update payload closing an owned issue whose feature now passes.
/// `None` when the stored issue has no record key to address.
pub fn resolve_payload(r: &IssueResolve, owning_tag: &str) -> Option<EditFeature> {
    let mut attributes = addressed(r.record_key, &r.issue_gid)?;
    attributes.insert("QC_Status".into(), Value::from(QcStatus::Resolved.code()));
    attributes.insert("EditDate".into(), ms(r.approved_at));
    attributes.insert("Editor".into(), Value::from(owning_tag));
    attributes.insert("QC_resolved_date".into(), ms(r.resolved_at));
    attributes.insert("QC_fixed_approved_date".into(), ms(r.approved_at));
    attributes.insert("QC_name_approved".into(), Value::from(owning_tag));

    Some(EditFeature {
        attributes,
        geometry: Some(PointGeometry::at(r.anchor)),
    })
}
