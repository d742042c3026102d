use std::fmt;

use fqc_schemas::{FeatureRecord, FeatureType};

use crate::sets::rule_set;

/// Severity reported when no rule triggers.
pub const NEUTRAL_SEVERITY: i32 = 0;

/// Evaluation context shared by every rule of one feature's evaluation.
#[derive(Clone, Copy, Debug)]
pub struct EvalCtx {
    /// Whether the feature's identity appears in its layer's attachment index.
    pub has_attachment: bool,
}

/// Output of applying one feature type's rule set to one feature.
///
/// `errors` empty ⇔ the feature currently passes all rules for its type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Violation texts in rule-set order, each prefixed with its stable tag.
    pub errors: Vec<String>,
    /// Max severity among triggered rules, or [`NEUTRAL_SEVERITY`].
    pub severity: i32,
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Joined description exactly as compared against (and stored into)
    /// the QC layer.
    pub fn description(&self) -> String {
        self.errors.join(", ")
    }
}

/// Unexpected failure while evaluating a single feature, typically an
/// attribute a rule assumes exists is missing after upstream schema drift.
/// The feature is skipped; the run continues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleFault {
    pub rule_tag: Option<u32>,
    pub field: String,
}

impl RuleFault {
    pub fn missing_attribute(field: impl Into<String>) -> RuleFault {
        RuleFault {
            rule_tag: None,
            field: field.into(),
        }
    }

    pub(crate) fn in_rule(mut self, tag: u32) -> RuleFault {
        self.rule_tag = Some(tag);
        self
    }
}

impl fmt::Display for RuleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule_tag {
            Some(tag) => write!(
                f,
                "rule {tag}: attribute '{}' missing from feature schema",
                self.field
            ),
            None => write!(f, "attribute '{}' missing from feature schema", self.field),
        }
    }
}

impl std::error::Error for RuleFault {}

/// Run every rule of `feature_type` against `feature`.
///
/// Rules never short-circuit each other: all applicable rules are checked
/// and all violated ones reported, in rule-set order. A fault from any rule
/// aborts this feature's evaluation; the caller records it and moves on to
/// the next feature, producing no reconciliation for this one.
pub fn evaluate(
    feature_type: FeatureType,
    feature: &FeatureRecord,
    has_attachment: bool,
) -> Result<Evaluation, RuleFault> {
    let set = rule_set(feature_type);
    let ctx = EvalCtx { has_attachment };

    let mut errors = Vec::new();
    let mut severity = NEUTRAL_SEVERITY;
    for rule in &set.rules {
        if rule.violated(feature, &ctx)? {
            errors.push(rule.error_text());
            severity = severity.max(rule.severity);
        }
    }
    Ok(Evaluation { errors, severity })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use fqc_schemas::{AttrValue, Geometry};

    use super::*;

    fn feature(attrs: &[(&str, AttrValue)]) -> FeatureRecord {
        let attributes: BTreeMap<String, AttrValue> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        FeatureRecord {
            object_id: 1,
            global_id: "{AA-1}".into(),
            identity: "aa-1".into(),
            attributes,
            geometry: Geometry::Point(0.0, 0.0),
            last_editor: "surveyor_a".into(),
            last_edit: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn severity_is_max_of_triggered_weights() {
        // Chambers: rule 1 (sev 5, surveyed blank) + rule 4 (sev 3, owner
        // blank) both trigger; max wins.
        let f = feature(&[
            ("surveyed", AttrValue::Null),
            ("chamber_loc", AttrValue::Null),
            ("status", AttrValue::Int(1)),
            ("owner", AttrValue::Null),
            ("space_cf", AttrValue::Int(1)),
            ("hole_type", AttrValue::Int(1)),
            ("mobra_fit", AttrValue::Int(1)),
            ("surface", AttrValue::Text("Footway".into())),
            ("data_collection", AttrValue::Int(1)),
            ("comments", AttrValue::Text("ok".into())),
        ]);
        let eval = evaluate(FeatureType::Chambers, &f, true).unwrap();
        assert_eq!(
            eval.errors,
            vec![
                "1 - 'Surveyed' can not be blank".to_string(),
                "4 - 'Owner' can not be blank".to_string(),
            ]
        );
        assert_eq!(eval.severity, 5);
    }

    #[test]
    fn clean_feature_reports_neutral_severity() {
        let f = feature(&[
            ("toby_type", AttrValue::Text("Standard".into())),
            ("status", AttrValue::Int(1)),
        ]);
        let eval = evaluate(FeatureType::TobyLocation, &f, false).unwrap();
        assert!(eval.passed());
        assert_eq!(eval.severity, NEUTRAL_SEVERITY);
    }

    #[test]
    fn missing_attribute_is_a_fault_not_a_panic() {
        // toby_type key absent entirely (schema drift), unlike an explicit null.
        let f = feature(&[("status", AttrValue::Int(1))]);
        let err = evaluate(FeatureType::TobyLocation, &f, false).unwrap_err();
        assert_eq!(err.field, "toby_type");
        assert_eq!(err.rule_tag, Some(1));
        assert!(err.to_string().contains("toby_type"));
    }

    #[test]
    fn attachment_rule_fires_only_without_attachment() {
        let f = feature(&[
            ("comments", AttrValue::Text("span ok".into())),
            ("surface_type", AttrValue::Text("Grass".into())),
        ]);
        let with = evaluate(FeatureType::ProposedUgRoute, &f, true).unwrap();
        assert!(with.passed());

        let without = evaluate(FeatureType::ProposedUgRoute, &f, false).unwrap();
        assert_eq!(without.errors, vec!["3 - Attachments missing".to_string()]);
        assert_eq!(without.severity, 5);
    }

    #[test]
    fn cabinets_report_source_order_not_tag_order() {
        let f = feature(&[
            ("cab_type", AttrValue::Text("PCP".into())),
            ("surface", AttrValue::Text("Road".into())),
            ("footway_width", AttrValue::Null),
            ("grassverge_width", AttrValue::Null),
            ("comments", AttrValue::Null),
        ]);
        let eval = evaluate(FeatureType::Cabinets, &f, false).unwrap();
        assert_eq!(
            eval.errors,
            vec![
                "17 - 'Comments' can not be blank".to_string(),
                "16 - Attachments missing".to_string(),
            ]
        );
    }

    #[test]
    fn sed_rule_set_is_inactive() {
        assert!(!rule_set(FeatureType::Sed).is_active());
    }
}
