use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Web-Mercator spatial reference the QC layer is published in.
pub const WKID: i32 = 102_100;
pub const LATEST_WKID: i32 = 3_857;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: i32,
    #[serde(rename = "latestWkid")]
    pub latest_wkid: i32,
}

impl Default for SpatialReference {
    fn default() -> Self {
        SpatialReference {
            wkid: WKID,
            latest_wkid: LATEST_WKID,
        }
    }
}

/// Point geometry payload for a QC marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
    pub x: f64,
    pub y: f64,
}

impl PointGeometry {
    pub fn at(anchor: (f64, f64)) -> PointGeometry {
        PointGeometry {
            spatial_reference: SpatialReference::default(),
            x: anchor.0,
            y: anchor.1,
        }
    }
}

/// One feature add/update as submitted to the backend. Attribute names are
/// the QC layer's published field names and must be passed through verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditFeature {
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PointGeometry>,
}

/// Backend acknowledgement for one submitted edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditAck {
    #[serde(rename = "objectId")]
    pub object_id: Option<i64>,
    #[serde(rename = "globalId")]
    pub global_id: Option<String>,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_geometry_serializes_to_the_portal_shape() {
        let g = PointGeometry::at((1.5, -2.25));
        let v = serde_json::to_value(&g).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "spatialReference": {"wkid": 102100, "latestWkid": 3857},
                "x": 1.5,
                "y": -2.25
            })
        );
    }

    #[test]
    fn edit_feature_omits_absent_geometry() {
        let e = EditFeature {
            attributes: Map::new(),
            geometry: None,
        };
        let v = serde_json::to_value(&e).unwrap();
        assert!(v.get("geometry").is_none());
    }
}
