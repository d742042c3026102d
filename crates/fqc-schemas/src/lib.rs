//! fqc-schemas
//!
//! Core data model shared by every crate in the workspace:
//! - feature records and attribute values (explicit null semantics)
//! - geometry and its anchor-point reduction
//! - feature types with their fixed error-type codes and layer routing table
//! - QC status codes
//! - failure rows for the end-of-run report
//!
//! No I/O. No portal calls.

mod attributes;
mod failure;
mod feature;
mod feature_type;
mod geometry;
mod status;

pub use attributes::AttrValue;
pub use failure::FailureRecord;
pub use feature::{canonical_key, FeatureRecord};
pub use feature_type::FeatureType;
pub use geometry::Geometry;
pub use status::QcStatus;
