use fqc_schemas::{AttrValue, FeatureRecord, FeatureType};

use crate::evaluator::{EvalCtx, RuleFault};

type Check = Box<dyn Fn(&FeatureRecord, &EvalCtx) -> Result<bool, RuleFault> + Send + Sync>;

/// One validation rule: an independent predicate over a feature's
/// attributes (and occasionally the attachment index).
///
/// The predicate returns `Ok(true)` when the rule is VIOLATED.
pub struct Rule {
    /// Stable numeric tag prefixed onto the violation message. Gaps in a
    /// rule set's tag sequence come from retired rules and stay gaps.
    pub tag: u32,
    pub severity: i32,
    pub message: String,
    pub uses_attachments: bool,
    check: Check,
}

impl Rule {
    pub fn new(
        tag: u32,
        severity: i32,
        message: impl Into<String>,
        check: impl Fn(&FeatureRecord, &EvalCtx) -> Result<bool, RuleFault> + Send + Sync + 'static,
    ) -> Rule {
        Rule {
            tag,
            severity,
            message: message.into(),
            uses_attachments: false,
            check: Box::new(check),
        }
    }

    /// A rule whose predicate consults the attachment index. Layers whose
    /// rule set contains none of these never pay for an attachment query.
    pub fn with_attachments(
        tag: u32,
        severity: i32,
        message: impl Into<String>,
        check: impl Fn(&FeatureRecord, &EvalCtx) -> Result<bool, RuleFault> + Send + Sync + 'static,
    ) -> Rule {
        Rule {
            uses_attachments: true,
            ..Rule::new(tag, severity, message, check)
        }
    }

    pub fn violated(&self, feature: &FeatureRecord, ctx: &EvalCtx) -> Result<bool, RuleFault> {
        (self.check)(feature, ctx).map_err(|f| f.in_rule(self.tag))
    }

    /// "{tag} - {message}" as written into the QC issue description.
    pub fn error_text(&self) -> String {
        format!("{} - {}", self.tag, self.message)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("tag", &self.tag)
            .field("severity", &self.severity)
            .field("message", &self.message)
            .field("uses_attachments", &self.uses_attachments)
            .finish()
    }
}

/// The ordered rule set for one feature type. Evaluation order is source
/// order, which is not always tag order (cabinets reports 17 before 16);
/// that order is part of the stored-description contract and must not be
/// "fixed" by sorting.
#[derive(Debug)]
pub struct RuleSet {
    pub feature_type: FeatureType,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(feature_type: FeatureType, rules: Vec<Rule>) -> RuleSet {
        RuleSet { feature_type, rules }
    }

    /// An empty rule set marks a feature type whose checks are not yet
    /// authored (SED); such layers are routed but never reconciled.
    pub fn is_active(&self) -> bool {
        !self.rules.is_empty()
    }

    pub fn requires_attachments(&self) -> bool {
        self.rules.iter().any(|r| r.uses_attachments)
    }
}

/// Fetch an attribute a rule depends on, treating a key that is absent from
/// the record's map as schema drift (fault), while an explicit null is a
/// perfectly ordinary blank value.
pub fn req<'a>(feature: &'a FeatureRecord, field: &str) -> Result<&'a AttrValue, RuleFault> {
    feature
        .attr(field)
        .ok_or_else(|| RuleFault::missing_attribute(field))
}
