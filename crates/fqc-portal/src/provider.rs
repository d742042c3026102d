use std::fmt;

use fqc_schemas::FeatureRecord;

use crate::edits::{EditAck, EditFeature};

/// Errors a portal implementation may return.
#[derive(Debug)]
pub enum PortalError {
    /// Network or transport failure.
    Transport(String),
    /// The backend returned an application-level error.
    Api { code: Option<i64>, message: String },
    /// A response payload could not be decoded.
    Decode(String),
    /// Authentication failed or the session token was rejected.
    Auth(String),
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalError::Transport(msg) => write!(f, "transport error: {msg}"),
            PortalError::Api {
                code: Some(c),
                message,
            } => write!(f, "portal api error code={c}: {message}"),
            PortalError::Api {
                code: None,
                message,
            } => write!(f, "portal api error: {message}"),
            PortalError::Decode(msg) => write!(f, "decode error: {msg}"),
            PortalError::Auth(msg) => write!(f, "auth error: {msg}"),
        }
    }
}

impl std::error::Error for PortalError {}

/// One operational layer listed by a webmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerInfo {
    /// Display title; the routing key into the feature-type table.
    pub title: String,
    /// Portal item id used to open the layer.
    pub item_id: String,
}

/// A webmap and its layer listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebMapInfo {
    pub id: String,
    /// Item title; the survey-area tag is its suffix after the last `_`.
    pub title: String,
    pub layers: Vec<LayerInfo>,
}

/// Map-hosting backend contract. Object-safe so callers can hold a
/// `Box<dyn Portal>` without knowing the concrete backend.
pub trait Portal {
    /// Human-readable name identifying this backend (e.g. `"arcgis"`).
    fn name(&self) -> &'static str;

    /// Fetch a webmap's title and layer listing.
    fn open_map(&self, map_id: &str) -> Result<WebMapInfo, PortalError>;

    /// Open query/edit access to one layer by portal item id.
    fn open_layer(&self, item_id: &str) -> Result<Box<dyn FeatureLayer>, PortalError>;
}

/// Query and edit access to one feature layer.
pub trait FeatureLayer {
    fn title(&self) -> &str;

    /// All current features of the layer, as a read-only snapshot.
    fn query_features(&self) -> Result<Vec<FeatureRecord>, PortalError>;

    /// Global ids of features with at least one file attachment. Callers
    /// treat a failure here as "no attachments" (fail-open), so
    /// implementations should not retry.
    fn attachment_parents(&self) -> Result<Vec<String>, PortalError>;

    /// Persist feature adds/updates; acks come back in submission order.
    fn apply_edits(
        &self,
        adds: &[EditFeature],
        updates: &[EditFeature],
    ) -> Result<Vec<EditAck>, PortalError>;
}
