//! Decoding of ArcGIS REST response payloads into schema types.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use fqc_portal::PortalError;
use fqc_schemas::{canonical_key, AttrValue, FeatureRecord, Geometry};

fn decode_err(msg: impl Into<String>) -> PortalError {
    PortalError::Decode(msg.into())
}

fn pair(v: &Value) -> Option<(f64, f64)> {
    let coords = v.as_array()?;
    Some((coords.first()?.as_f64()?, coords.get(1)?.as_f64()?))
}

fn path(v: &Value) -> Option<Vec<(f64, f64)>> {
    v.as_array()?.iter().map(pair).collect()
}

/// Decode a queried feature's geometry object. Points carry `x`/`y`,
/// polylines a `paths` array and polygons a `rings` array.
pub(crate) fn geometry(v: &Value) -> Result<Geometry, PortalError> {
    if let (Some(x), Some(y)) = (v.get("x").and_then(Value::as_f64), v.get("y").and_then(Value::as_f64)) {
        return Ok(Geometry::Point(x, y));
    }
    if let Some(paths) = v.get("paths").and_then(Value::as_array) {
        let first = paths
            .first()
            .and_then(path)
            .ok_or_else(|| decode_err("polyline geometry with no usable path"))?;
        return Ok(Geometry::Line(first));
    }
    if let Some(rings) = v.get("rings").and_then(Value::as_array) {
        let rings: Option<Vec<Vec<(f64, f64)>>> = rings.iter().map(path).collect();
        let rings = rings.ok_or_else(|| decode_err("polygon geometry with malformed ring"))?;
        if rings.is_empty() {
            return Err(decode_err("polygon geometry with no rings"));
        }
        return Ok(Geometry::Polygon(rings));
    }
    Err(decode_err("unsupported geometry shape"))
}

/// Decode one element of a query response's `features` array.
pub(crate) fn feature_record(v: &Value) -> Result<FeatureRecord, PortalError> {
    let attrs = v
        .get("attributes")
        .and_then(Value::as_object)
        .ok_or_else(|| decode_err("feature without attributes object"))?;

    let object_id = attrs
        .get("OBJECTID")
        .and_then(Value::as_i64)
        .ok_or_else(|| decode_err("feature missing OBJECTID"))?;
    let global_id = attrs
        .get("GlobalID")
        .and_then(Value::as_str)
        .ok_or_else(|| decode_err("feature missing GlobalID"))?
        .to_string();

    let last_editor = attrs
        .get("Editor")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    // Epoch-ms; rows predating editor tracking carry null.
    let edit_ms = attrs.get("EditDate").and_then(Value::as_i64).unwrap_or(0);
    let last_edit: DateTime<Utc> = Utc
        .timestamp_millis_opt(edit_ms)
        .single()
        .ok_or_else(|| decode_err("EditDate out of range"))?;

    let geometry = geometry(
        v.get("geometry")
            .ok_or_else(|| decode_err("feature without geometry"))?,
    )?;

    let attributes: BTreeMap<String, AttrValue> = attrs
        .iter()
        .map(|(k, val)| (k.clone(), AttrValue::from_json(val)))
        .collect();

    Ok(FeatureRecord {
        object_id,
        identity: canonical_key(&global_id),
        global_id,
        attributes,
        geometry,
        last_editor,
        last_edit,
    })
}
