//! fqc-portal
//!
//! Collaborator boundary for the map-hosting backend.
//!
//! This crate defines **only** the portal traits, their error type and the
//! edit wire shapes. No HTTP, no credentials, no concrete backend: the
//! live adapter lives in `fqc-portal-arcgis`, and the in-memory fake used
//! by the scenario tests lives in `fqc-testkit`.

mod edits;
mod provider;

pub use edits::{EditAck, EditFeature, PointGeometry, SpatialReference, LATEST_WKID, WKID};
pub use provider::{FeatureLayer, LayerInfo, Portal, PortalError, WebMapInfo};
