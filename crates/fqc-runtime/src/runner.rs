use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fqc_portal::{FeatureLayer, Portal};
use fqc_reconcile::{
    reconcile_feature, FeatureOutcome, QcStateStore, ReconcileCtx, Transition,
};
use fqc_report::FailureCollector;
use fqc_rules::{evaluate, rule_set, AttachmentIndex};
use fqc_schemas::{FailureRecord, FeatureRecord, FeatureType};

use crate::payload::{create_payload, resolve_payload, update_payload};

/// Parameters for one QC pass.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub run_id: Uuid,
    /// Signed-in portal account, stamped as Creator/Editor on created rows.
    pub portal_user: String,
    /// Title of the QC issues point layer inside each webmap.
    pub qc_layer_title: String,
    /// Attribution tag; only issues carrying it are auto-updated/resolved.
    pub owning_tag: String,
    /// Webmap item ids, processed in order.
    pub map_ids: Vec<String>,
}

/// Counters accumulated over a whole pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub maps: usize,
    pub layers: usize,
    pub features: usize,
    pub creates: usize,
    pub updates: usize,
    pub resolves: usize,
    pub noops: usize,
    pub failures: usize,
}

/// Walk every configured webmap and reconcile all survey layers against
/// that map's QC layer.
///
/// Per-feature problems (rule faults, rejected edits) go to `collector`
/// and the pass continues; transport and API failures propagate and abort
/// the pass. Everything already persisted stays valid either way.
pub fn run_qc_pass(
    portal: &dyn Portal,
    opts: &RunOptions,
    collector: &mut FailureCollector,
) -> Result<RunStats> {
    info!(
        run_id = %opts.run_id,
        backend = portal.name(),
        maps = opts.map_ids.len(),
        "starting qc pass"
    );

    let mut stats = RunStats::default();
    for map_id in &opts.map_ids {
        process_map(portal, opts, map_id, collector, &mut stats)?;
    }
    stats.failures = collector.len();

    info!(
        run_id = %opts.run_id,
        maps = stats.maps,
        features = stats.features,
        creates = stats.creates,
        updates = stats.updates,
        resolves = stats.resolves,
        failures = stats.failures,
        "qc pass complete"
    );
    Ok(stats)
}

/// Survey-area tag: the webmap title's suffix after the last `_`.
fn survey_area(map_title: &str) -> &str {
    map_title.rsplit('_').next().unwrap_or(map_title)
}

fn process_map(
    portal: &dyn Portal,
    opts: &RunOptions,
    map_id: &str,
    collector: &mut FailureCollector,
    stats: &mut RunStats,
) -> Result<()> {
    let map = portal
        .open_map(map_id)
        .with_context(|| format!("open webmap {map_id} failed"))?;
    let area = survey_area(&map.title).to_string();
    info!(map = %map.title, survey_area = %area, layers = map.layers.len(), "processing webmap");

    let Some(qc_info) = map.layers.iter().find(|l| l.title == opts.qc_layer_title) else {
        warn!(map = %map.title, qc_layer = %opts.qc_layer_title, "webmap has no qc layer, skipping");
        return Ok(());
    };
    let qc_layer = portal
        .open_layer(&qc_info.item_id)
        .with_context(|| format!("open qc layer in {} failed", map.title))?;
    let qc_rows = qc_layer
        .query_features()
        .with_context(|| format!("query qc layer in {} failed", map.title))?;
    let mut store = QcStateStore::from_layer_rows(&qc_rows);
    debug!(map = %map.title, known_issues = store.len(), "qc state materialized");

    stats.maps += 1;
    for layer_info in &map.layers {
        if layer_info.title == opts.qc_layer_title {
            continue;
        }
        let Some(feature_type) = FeatureType::from_layer_title(&layer_info.title) else {
            warn!(map = %map.title, layer = %layer_info.title, "unrecognized layer title, skipping");
            continue;
        };
        let set = rule_set(feature_type);
        if !set.is_active() {
            // Routed but inert: no rules means nothing to reconcile.
            info!(layer = %layer_info.title, "layer has no active rules, skipping");
            continue;
        }

        let layer = portal
            .open_layer(&layer_info.item_id)
            .with_context(|| format!("open layer {} failed", layer_info.title))?;
        let attachments = if set.requires_attachments() {
            match layer.attachment_parents() {
                Ok(ids) => AttachmentIndex::from_parent_ids(ids),
                Err(err) => {
                    // Fail open: attachment rules see "no attachment".
                    warn!(layer = %layer_info.title, error = %err, "attachment query failed, assuming none");
                    AttachmentIndex::empty()
                }
            }
        } else {
            AttachmentIndex::empty()
        };

        let features = layer
            .query_features()
            .with_context(|| format!("query layer {} failed", layer_info.title))?;
        debug!(layer = %layer_info.title, features = features.len(), "evaluating layer");

        stats.layers += 1;
        for feature in &features {
            stats.features += 1;
            process_feature(
                opts,
                &area,
                &layer_info.title,
                feature_type,
                feature,
                &attachments,
                qc_layer.as_ref(),
                &mut store,
                collector,
                stats,
            )?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn process_feature(
    opts: &RunOptions,
    area: &str,
    layer_title: &str,
    feature_type: FeatureType,
    feature: &FeatureRecord,
    attachments: &AttachmentIndex,
    qc_layer: &dyn FeatureLayer,
    store: &mut QcStateStore,
    collector: &mut FailureCollector,
    stats: &mut RunStats,
) -> Result<()> {
    let evaluation = match evaluate(feature_type, feature, attachments.contains(&feature.identity))
    {
        Ok(eval) => eval,
        Err(fault) => {
            collector.record(FailureRecord {
                survey_area: area.to_string(),
                layer: layer_title.to_string(),
                object_id: feature.object_id,
                diagnostic: fault.to_string(),
            });
            return Ok(());
        }
    };

    let ctx = ReconcileCtx {
        owning_tag: &opts.owning_tag,
        now: Utc::now(),
    };
    let outcome = FeatureOutcome {
        feature,
        feature_type,
        evaluation: &evaluation,
    };
    let transition = reconcile_feature(store, &outcome, &ctx);

    match &transition {
        Transition::Noop(reason) => {
            debug!(identity = %feature.identity, ?reason, "no-op");
            stats.noops += 1;
            Ok(())
        }
        Transition::Create(c) => {
            let edit = create_payload(c, &opts.portal_user, &feature.global_id);
            let acks = qc_layer
                .apply_edits(&[edit], &[])
                .with_context(|| format!("create qc issue for {} failed", feature.identity))?;
            match acks.first() {
                Some(ack) if ack.success => {
                    info!(identity = %feature.identity, layer = %layer_title, priority = c.priority, "qc issue created");
                    store.apply(&transition);
                    if let Some(object_id) = ack.object_id {
                        store.set_record_key(&c.identity, object_id, ack.global_id.clone());
                    }
                    stats.creates += 1;
                }
                _ => collector.record(FailureRecord {
                    survey_area: area.to_string(),
                    layer: layer_title.to_string(),
                    object_id: feature.object_id,
                    diagnostic: "qc issue create was rejected by the backend".to_string(),
                }),
            }
            Ok(())
        }
        Transition::Update(u) => {
            let Some(edit) = update_payload(u, &opts.owning_tag) else {
                warn!(identity = %feature.identity, "stored issue has no record key, cannot update");
                return Ok(());
            };
            let acks = qc_layer
                .apply_edits(&[], &[edit])
                .with_context(|| format!("update qc issue for {} failed", feature.identity))?;
            match acks.first() {
                Some(ack) if ack.success => {
                    info!(identity = %feature.identity, layer = %layer_title, priority = u.priority, "qc issue updated");
                    store.apply(&transition);
                    stats.updates += 1;
                }
                _ => collector.record(FailureRecord {
                    survey_area: area.to_string(),
                    layer: layer_title.to_string(),
                    object_id: feature.object_id,
                    diagnostic: "qc issue update was rejected by the backend".to_string(),
                }),
            }
            Ok(())
        }
        Transition::Resolve(r) => {
            let Some(edit) = resolve_payload(r, &opts.owning_tag) else {
                warn!(identity = %feature.identity, "stored issue has no record key, cannot resolve");
                return Ok(());
            };
            let acks = qc_layer
                .apply_edits(&[], &[edit])
                .with_context(|| format!("resolve qc issue for {} failed", feature.identity))?;
            match acks.first() {
                Some(ack) if ack.success => {
                    info!(identity = %feature.identity, layer = %layer_title, "qc issue resolved");
                    store.apply(&transition);
                    stats.resolves += 1;
                }
                _ => collector.record(FailureRecord {
                    survey_area: area.to_string(),
                    layer: layer_title.to_string(),
                    object_id: feature.object_id,
                    diagnostic: "qc issue resolve was rejected by the backend".to_string(),
                }),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_area_is_the_title_suffix() {
        assert_eq!(survey_area("Area_North_OLT7"), "OLT7");
        assert_eq!(survey_area("OLT9"), "OLT9");
        assert_eq!(survey_area("a_b_c_Final"), "Final");
    }
}
