//! fqc-testkit
//!
//! In-memory fakes for the collaborator boundaries plus shared builders
//! for the cross-crate `scenario_*` tests under `tests/`.
//!
//! [`FakePortal`] scripts webmaps and layers and plays back `applyEdits`
//! into its own feature rows, so a second pass over the same portal sees
//! exactly what the first pass persisted.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use fqc_portal::{
    EditAck, EditFeature, FeatureLayer, LayerInfo, Portal, PortalError, WebMapInfo,
};
use fqc_report::{Mailer, ReportEmail};
use fqc_runtime::RunOptions;
use fqc_schemas::{canonical_key, AttrValue, FeatureRecord, Geometry};

pub const TEST_OWNING_TAG: &str = "Survey QC Automation";
pub const TEST_QC_LAYER_TITLE: &str = "City Fibre QC Point";

// ---------------------------------------------------------------------------
// Fake portal
// ---------------------------------------------------------------------------

/// One recorded `applyEdits` call.
#[derive(Clone, Debug)]
pub struct RecordedEdit {
    pub adds: Vec<EditFeature>,
    pub updates: Vec<EditFeature>,
}

#[derive(Default)]
struct LayerState {
    title: String,
    features: Vec<FeatureRecord>,
    attachment_parents: Vec<String>,
    fail_attachment_query: bool,
    edits: Vec<RecordedEdit>,
    next_object_id: i64,
}

struct MapDef {
    title: String,
    layer_items: Vec<String>,
}

/// Scripted in-memory portal.
#[derive(Default)]
pub struct FakePortal {
    maps: RefCell<BTreeMap<String, MapDef>>,
    layers: RefCell<BTreeMap<String, Rc<RefCell<LayerState>>>>,
}

impl FakePortal {
    pub fn new() -> FakePortal {
        FakePortal::default()
    }

    pub fn add_layer(&self, item_id: &str, title: &str) {
        self.layers.borrow_mut().insert(
            item_id.to_string(),
            Rc::new(RefCell::new(LayerState {
                title: title.to_string(),
                next_object_id: 1,
                ..LayerState::default()
            })),
        );
    }

    pub fn add_map(&self, map_id: &str, title: &str, layer_items: &[&str]) {
        self.maps.borrow_mut().insert(
            map_id.to_string(),
            MapDef {
                title: title.to_string(),
                layer_items: layer_items.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    pub fn set_features(&self, item_id: &str, features: Vec<FeatureRecord>) {
        self.layer(item_id).borrow_mut().features = features;
    }

    pub fn set_attachment_parents(&self, item_id: &str, parents: Vec<String>) {
        self.layer(item_id).borrow_mut().attachment_parents = parents;
    }

    /// Make every subsequent attachment query on this layer fail.
    pub fn fail_attachment_query(&self, item_id: &str) {
        self.layer(item_id).borrow_mut().fail_attachment_query = true;
    }

    /// All `applyEdits` calls recorded against a layer so far.
    pub fn edits(&self, item_id: &str) -> Vec<RecordedEdit> {
        self.layer(item_id).borrow().edits.clone()
    }

    pub fn edit_count(&self, item_id: &str) -> usize {
        self.layer(item_id).borrow().edits.len()
    }

    /// Current rows of a layer, with played-back edits applied.
    pub fn features(&self, item_id: &str) -> Vec<FeatureRecord> {
        self.layer(item_id).borrow().features.clone()
    }

    fn layer(&self, item_id: &str) -> Rc<RefCell<LayerState>> {
        match self.layers.borrow().get(item_id) {
            Some(state) => Rc::clone(state),
            None => panic!("fake portal has no layer item '{item_id}'"),
        }
    }
}

impl Portal for FakePortal {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn open_map(&self, map_id: &str) -> Result<WebMapInfo, PortalError> {
        let maps = self.maps.borrow();
        let def = maps.get(map_id).ok_or_else(|| PortalError::Api {
            code: Some(404),
            message: format!("unknown webmap item {map_id}"),
        })?;
        let layers = def
            .layer_items
            .iter()
            .map(|item_id| LayerInfo {
                title: self.layer(item_id).borrow().title.clone(),
                item_id: item_id.clone(),
            })
            .collect();
        Ok(WebMapInfo {
            id: map_id.to_string(),
            title: def.title.clone(),
            layers,
        })
    }

    fn open_layer(&self, item_id: &str) -> Result<Box<dyn FeatureLayer>, PortalError> {
        let state = self
            .layers
            .borrow()
            .get(item_id)
            .map(Rc::clone)
            .ok_or_else(|| PortalError::Api {
                code: Some(404),
                message: format!("unknown layer item {item_id}"),
            })?;
        let title = state.borrow().title.clone();
        Ok(Box::new(FakeLayer { title, state }))
    }
}

struct FakeLayer {
    title: String,
    state: Rc<RefCell<LayerState>>,
}

fn value_to_timestamp(v: Option<&Value>) -> DateTime<Utc> {
    let ms = v.and_then(Value::as_i64).unwrap_or(0);
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl FeatureLayer for FakeLayer {
    fn title(&self) -> &str {
        &self.title
    }

    fn query_features(&self) -> Result<Vec<FeatureRecord>, PortalError> {
        Ok(self.state.borrow().features.clone())
    }

    fn attachment_parents(&self) -> Result<Vec<String>, PortalError> {
        let state = self.state.borrow();
        if state.fail_attachment_query {
            return Err(PortalError::Transport(
                "scripted attachment query failure".to_string(),
            ));
        }
        Ok(state.attachment_parents.clone())
    }

    fn apply_edits(
        &self,
        adds: &[EditFeature],
        updates: &[EditFeature],
    ) -> Result<Vec<EditAck>, PortalError> {
        let mut state = self.state.borrow_mut();
        state.edits.push(RecordedEdit {
            adds: adds.to_vec(),
            updates: updates.to_vec(),
        });

        let mut acks = Vec::with_capacity(adds.len() + updates.len());
        for add in adds {
            let object_id = state.next_object_id;
            state.next_object_id += 1;
            let global_id = format!("{{FAKE-{object_id}}}");

            let mut attributes: BTreeMap<String, AttrValue> = add
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), AttrValue::from_json(v)))
                .collect();
            attributes.insert("OBJECTID".into(), AttrValue::Int(object_id));
            attributes.insert("GlobalID".into(), AttrValue::Text(global_id.clone()));

            let geometry = add
                .geometry
                .as_ref()
                .map(|g| Geometry::Point(g.x, g.y))
                .unwrap_or(Geometry::Point(0.0, 0.0));
            let last_editor = add
                .attributes
                .get("Editor")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let last_edit = value_to_timestamp(add.attributes.get("EditDate"));

            state.features.push(FeatureRecord {
                object_id,
                identity: canonical_key(&global_id),
                global_id: global_id.clone(),
                attributes,
                geometry,
                last_editor,
                last_edit,
            });
            acks.push(EditAck {
                object_id: Some(object_id),
                global_id: Some(global_id),
                success: true,
            });
        }

        for update in updates {
            let target = update.attributes.get("OBJECTID").and_then(Value::as_i64);
            let row = target.and_then(|oid| {
                state.features.iter_mut().find(|f| f.object_id == oid)
            });
            match row {
                Some(feature) => {
                    for (k, v) in &update.attributes {
                        feature
                            .attributes
                            .insert(k.clone(), AttrValue::from_json(v));
                    }
                    if let Some(g) = &update.geometry {
                        feature.geometry = Geometry::Point(g.x, g.y);
                    }
                    acks.push(EditAck {
                        object_id: Some(feature.object_id),
                        global_id: Some(feature.global_id.clone()),
                        success: true,
                    });
                }
                None => acks.push(EditAck {
                    object_id: target,
                    global_id: None,
                    success: false,
                }),
            }
        }
        Ok(acks)
    }
}

// ---------------------------------------------------------------------------
// Recording mailer
// ---------------------------------------------------------------------------

/// Captures every email instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: RefCell<Vec<ReportEmail>>,
}

impl RecordingMailer {
    pub fn new() -> RecordingMailer {
        RecordingMailer::default()
    }

    pub fn sent(&self) -> Vec<ReportEmail> {
        self.sent.borrow().clone()
    }
}

impl Mailer for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn send(&self, email: &ReportEmail) -> anyhow::Result<()> {
        self.sent.borrow_mut().push(email.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// A survey feature with a point geometry and the given attributes.
pub fn feature(object_id: i64, global_id: &str, attrs: &[(&str, AttrValue)]) -> FeatureRecord {
    FeatureRecord {
        object_id,
        identity: canonical_key(global_id),
        global_id: global_id.to_string(),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        geometry: Geometry::Point(-0.1275, 51.5072),
        last_editor: "surveyor_a".to_string(),
        last_edit: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}

/// Standard run options against [`FakePortal`] scenarios.
pub fn run_options(map_ids: &[&str]) -> RunOptions {
    RunOptions {
        run_id: uuid::Uuid::new_v4(),
        portal_user: "qc_bot".to_string(),
        qc_layer_title: TEST_QC_LAYER_TITLE.to_string(),
        owning_tag: TEST_OWNING_TAG.to_string(),
        map_ids: map_ids.iter().map(|s| s.to_string()).collect(),
    }
}
