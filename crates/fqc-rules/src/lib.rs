//! fqc-rules
//!
//! Validation rule sets and the rule evaluator.
//!
//! Architectural decisions:
//! - One declarative rule set per feature type: ordered (tag, severity,
//!   message, predicate) tuples, evaluated without short-circuiting
//! - Tags are stable and historical gaps are never renumbered
//! - Severity is an opaque ordinal, max-reduced with a neutral floor of 0
//! - Schema drift (an attribute a rule needs is absent from the record)
//!   surfaces as an explicit `RuleFault`, never a panic
//!
//! Pure logic. No I/O. No portal calls.

mod attachment;
mod evaluator;
mod rule;
mod sets;

pub use attachment::AttachmentIndex;
pub use evaluator::{evaluate, EvalCtx, Evaluation, RuleFault, NEUTRAL_SEVERITY};
pub use rule::{Rule, RuleSet};
pub use sets::rule_set;
