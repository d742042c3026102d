//! fqc-runtime
//!
//! The run orchestrator: walks configured webmaps, routes each survey
//! layer to its rule set, reconciles every feature against the QC layer
//! and persists the resulting transitions one feature at a time.
//!
//! Wiring only. Rule semantics live in `fqc-rules`, the transition state
//! machine in `fqc-reconcile`, the backend behind the `fqc-portal` traits.

mod payload;
mod runner;

pub use runner::{run_qc_pass, RunOptions, RunStats};
