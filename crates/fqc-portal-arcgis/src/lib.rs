//! fqc-portal-arcgis
//!
//! Live ArcGIS REST adapter behind the `fqc-portal` traits.
//!
//! Talks to a portal's `sharing/rest` endpoints with a blocking HTTP
//! client: token acquisition, webmap item lookup, feature layer query,
//! attachment listing and `applyEdits` submission. All response decoding
//! into [`fqc_schemas::FeatureRecord`] lives in `parse`.

mod client;
mod parse;

pub use client::{ArcgisLayer, ArcgisPortal};
