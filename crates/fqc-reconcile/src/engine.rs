use chrono::{DateTime, Utc};

use fqc_rules::Evaluation;
use fqc_schemas::{FeatureRecord, FeatureType};

use crate::store::QcStateStore;
use crate::types::{
    truncate_description, IssueCreate, IssueResolve, IssueUpdate, NoopReason, Transition,
};

/// The (identity, featureType, EvaluationResult) triple being reconciled.
#[derive(Clone, Copy, Debug)]
pub struct FeatureOutcome<'a> {
    pub feature: &'a FeatureRecord,
    pub feature_type: FeatureType,
    pub evaluation: &'a Evaluation,
}

/// Run-scoped reconciliation parameters.
#[derive(Clone, Copy, Debug)]
pub struct ReconcileCtx<'a> {
    /// Owning-automation tag; issues not carrying it are never touched.
    pub owning_tag: &'a str,
    pub now: DateTime<Utc>,
}

/// Decide the minimal transition for one evaluated feature.
///
/// Lookup is by identity only: a stored issue for the same identity under a
/// different error type makes this a no-op rather than a second lineage
/// (known limitation, see DESIGN.md). The caller persists the transition and
/// then feeds it back through [`QcStateStore::apply`] so later features in
/// the same run observe it.
pub fn reconcile_feature(
    store: &QcStateStore,
    outcome: &FeatureOutcome<'_>,
    ctx: &ReconcileCtx<'_>,
) -> Transition {
    let feature = outcome.feature;
    let eval = outcome.evaluation;
    let error_code = outcome.feature_type.error_code();

    let existing = match store.get(&feature.identity) {
        Some(issue) => issue,
        None => {
            if eval.passed() {
                return Transition::Noop(NoopReason::StillPassing);
            }
            return Transition::Create(IssueCreate {
                identity: feature.identity.clone(),
                feature_type: outcome.feature_type,
                priority: eval.severity,
                description: truncate_description(&eval.description()),
                error_count: eval.errors.len(),
                anchor: feature.geometry.anchor(),
                resolver_name: feature.last_editor.clone(),
                owner_tag: ctx.owning_tag.to_string(),
                created_at: ctx.now,
            });
        }
    };

    if existing.error_type != error_code {
        return Transition::Noop(NoopReason::ForeignErrorType);
    }
    if existing.owner_tag.as_deref() != Some(ctx.owning_tag) {
        return Transition::Noop(NoopReason::ForeignOwner);
    }

    if eval.passed() {
        if existing.status.is_resolved() {
            return Transition::Noop(NoopReason::AlreadyResolved);
        }
        return Transition::Resolve(IssueResolve {
            record_key: existing.record_key,
            issue_gid: existing.issue_gid.clone(),
            identity: feature.identity.clone(),
            anchor: feature.geometry.anchor(),
            resolved_at: feature.last_edit,
            approved_at: ctx.now,
        });
    }

    let description = truncate_description(&eval.description());
    if existing.description.as_deref() == Some(description.as_str()) {
        return Transition::Noop(NoopReason::UnchangedFailure);
    }
    Transition::Update(IssueUpdate {
        record_key: existing.record_key,
        issue_gid: existing.issue_gid.clone(),
        identity: feature.identity.clone(),
        priority: eval.severity,
        description,
        anchor: feature.geometry.anchor(),
        edited_at: ctx.now,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use fqc_schemas::{Geometry, QcStatus};

    use super::*;
    use crate::types::{StoredIssue, DESCRIPTION_LIMIT};

    const TAG: &str = "Survey QC Automation";

    fn ctx(now: DateTime<Utc>) -> ReconcileCtx<'static> {
        ReconcileCtx {
            owning_tag: TAG,
            now,
        }
    }

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap()
    }

    fn feature(identity: &str) -> FeatureRecord {
        FeatureRecord {
            object_id: 42,
            global_id: format!("{{{}}}", identity.to_uppercase()),
            identity: identity.to_string(),
            attributes: BTreeMap::new(),
            geometry: Geometry::Point(1.0, 2.0),
            last_editor: "surveyor_a".into(),
            last_edit: ts(8),
        }
    }

    fn eval(errors: &[&str], severity: i32) -> Evaluation {
        Evaluation {
            errors: errors.iter().map(|s| s.to_string()).collect(),
            severity,
        }
    }

    fn outcome<'a>(
        feature: &'a FeatureRecord,
        feature_type: FeatureType,
        evaluation: &'a Evaluation,
    ) -> FeatureOutcome<'a> {
        FeatureOutcome {
            feature,
            feature_type,
            evaluation,
        }
    }

    fn stored(identity: &str, error_type: i32, status: QcStatus, description: &str) -> StoredIssue {
        StoredIssue {
            record_key: Some(7),
            issue_gid: Some("{QC-1}".into()),
            identity: identity.to_string(),
            error_type,
            status,
            priority: 5,
            description: Some(description.to_string()),
            owner_tag: Some(TAG.to_string()),
            created_at: Some(ts(6)),
        }
    }

    #[test]
    fn failing_feature_with_no_history_creates_flagged_issue() {
        let store = QcStateStore::new();
        let f = feature("p-1");
        let e = eval(&["2 - bad", "6 - worse"], 5);

        match reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &e), &ctx(ts(10))) {
            Transition::Create(c) => {
                assert_eq!(c.identity, "p-1");
                assert_eq!(c.feature_type, FeatureType::Poles);
                assert_eq!(c.priority, 5);
                assert_eq!(c.description, "2 - bad, 6 - worse");
                assert_eq!(c.error_count, 2);
                assert_eq!(c.anchor, (1.0, 2.0));
                assert_eq!(c.resolver_name, "surveyor_a");
                assert_eq!(c.owner_tag, TAG);
            }
            other => panic!("expected Create, got {other:?}"),
        }
    }

    #[test]
    fn passing_feature_with_no_history_is_a_noop() {
        let store = QcStateStore::new();
        let f = feature("p-1");
        let e = eval(&[], 0);
        assert_eq!(
            reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &e), &ctx(ts(10))),
            Transition::Noop(NoopReason::StillPassing)
        );
    }

    #[test]
    fn unchanged_failure_is_a_noop_and_changed_failure_updates() {
        let mut store = QcStateStore::new();
        store.insert(stored("p-1", 1, QcStatus::Flagged, "2 - bad"));
        let f = feature("p-1");

        let same = eval(&["2 - bad"], 5);
        assert_eq!(
            reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &same), &ctx(ts(10))),
            Transition::Noop(NoopReason::UnchangedFailure)
        );

        let changed = eval(&["2 - bad", "25 - 'Comments' can not be blank"], 5);
        match reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &changed), &ctx(ts(10))) {
            Transition::Update(u) => {
                assert_eq!(u.record_key, Some(7));
                assert_eq!(u.description, "2 - bad, 25 - 'Comments' can not be blank");
                assert_eq!(u.edited_at, ts(10));
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn resolve_sources_timestamp_from_the_feature_edit() {
        let mut store = QcStateStore::new();
        store.insert(stored("p-1", 1, QcStatus::Flagged, "2 - bad"));
        let f = feature("p-1");
        let e = eval(&[], 0);

        match reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &e), &ctx(ts(10))) {
            Transition::Resolve(r) => {
                assert_eq!(r.resolved_at, f.last_edit);
                assert_eq!(r.approved_at, ts(10));
            }
            other => panic!("expected Resolve, got {other:?}"),
        }
    }

    #[test]
    fn create_then_resolve_round_trip_ends_in_noop() {
        let mut store = QcStateStore::new();
        let f = feature("p-1");
        let now = ctx(ts(10));

        // Fails: Create, and the store sees it immediately.
        let failing = eval(&["1 - X"], 5);
        let t1 = reconcile_feature(&store, &outcome(&f, FeatureType::TobyLocation, &failing), &now);
        assert!(matches!(t1, Transition::Create(_)));
        store.apply(&t1);

        // Passes: Resolve.
        let passing = eval(&[], 0);
        let t2 = reconcile_feature(&store, &outcome(&f, FeatureType::TobyLocation, &passing), &now);
        assert!(matches!(t2, Transition::Resolve(_)));
        store.apply(&t2);

        // Passes again: already Resolved, nothing to write.
        let t3 = reconcile_feature(&store, &outcome(&f, FeatureType::TobyLocation, &passing), &now);
        assert_eq!(t3, Transition::Noop(NoopReason::AlreadyResolved));
    }

    #[test]
    fn reconcile_is_idempotent_across_identical_passes() {
        let mut store = QcStateStore::new();
        let f = feature("p-1");
        let now = ctx(ts(10));
        let e = eval(&["2 - bad"], 5);

        let first = reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &e), &now);
        assert!(matches!(first, Transition::Create(_)));
        store.apply(&first);
        let snapshot = store.clone();

        // Second pass with unchanged inputs: no write, no store change.
        let second = reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &e), &now);
        assert_eq!(second, Transition::Noop(NoopReason::UnchangedFailure));
        store.apply(&second);
        assert_eq!(store, snapshot);
    }

    #[test]
    fn foreign_error_type_is_never_mutated() {
        let mut store = QcStateStore::new();
        // Stored under chambers (7) while we now evaluate poles (1).
        store.insert(stored("p-1", 7, QcStatus::Flagged, "1 - old"));
        let f = feature("p-1");

        let failing = eval(&["2 - bad"], 5);
        assert_eq!(
            reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &failing), &ctx(ts(10))),
            Transition::Noop(NoopReason::ForeignErrorType)
        );

        let passing = eval(&[], 0);
        assert_eq!(
            reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &passing), &ctx(ts(10))),
            Transition::Noop(NoopReason::ForeignErrorType)
        );
    }

    #[test]
    fn manually_entered_issues_are_never_touched() {
        let mut store = QcStateStore::new();
        let mut manual = stored("p-1", 1, QcStatus::Open, "checked by hand");
        manual.owner_tag = Some("j.bloggs".into());
        store.insert(manual);
        let f = feature("p-1");

        let failing = eval(&["2 - bad"], 5);
        assert_eq!(
            reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &failing), &ctx(ts(10))),
            Transition::Noop(NoopReason::ForeignOwner)
        );

        let passing = eval(&[], 0);
        assert_eq!(
            reconcile_feature(&store, &outcome(&f, FeatureType::Poles, &passing), &ctx(ts(10))),
            Transition::Noop(NoopReason::ForeignOwner)
        );
    }

    #[test]
    fn oversized_description_is_stored_truncated_on_create_and_update() {
        let mut store = QcStateStore::new();
        let f = feature("p-1");
        let long_error = format!("1 - {}", "x".repeat(2000));
        let e = eval(&[long_error.as_str()], 5);

        let t = reconcile_feature(&store, &outcome(&f, FeatureType::TobyLocation, &e), &ctx(ts(10)));
        let created = match &t {
            Transition::Create(c) => c.description.clone(),
            other => panic!("expected Create, got {other:?}"),
        };
        assert_eq!(created.chars().count(), DESCRIPTION_LIMIT);
        store.apply(&t);

        let longer = format!("1 - {}", "y".repeat(2000));
        let e2 = eval(&[longer.as_str()], 5);
        match reconcile_feature(&store, &outcome(&f, FeatureType::TobyLocation, &e2), &ctx(ts(10))) {
            Transition::Update(u) => assert_eq!(u.description.chars().count(), DESCRIPTION_LIMIT),
            other => panic!("expected Update, got {other:?}"),
        }
    }
}
