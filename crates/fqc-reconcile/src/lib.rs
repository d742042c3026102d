//! fqc-reconcile
//!
//! The reconciliation engine: diff a fresh rule evaluation against the
//! previously recorded QC state and emit the minimal transition.
//!
//! Architectural decisions:
//! - One issue lineage per source feature, keyed by canonical identity
//! - Create / update-description / resolve / no-op; issues are never deleted
//! - Issues not owned by this automation are never touched
//! - Issues with a different error-type code are never touched
//! - Running twice with unchanged inputs makes the second pass all no-ops
//!
//! Deterministic, pure logic. No I/O. No portal calls.

mod engine;
mod store;
mod types;

pub use engine::{reconcile_feature, FeatureOutcome, ReconcileCtx};
pub use store::QcStateStore;
pub use types::{
    truncate_description, IssueCreate, IssueResolve, IssueUpdate, NoopReason, Transition,
    StoredIssue, DESCRIPTION_LIMIT,
};
