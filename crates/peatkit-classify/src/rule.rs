//! Classification rules: condition classes and the predicate language.

use peatkit_survey::{AttributeValue, Zone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ecological condition category of a zone.
///
/// A closed enumeration with no implicit ordering; any ranking between
/// categories is expressed by the rules that assign them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConditionClass {
    /// Actively degrading peat: bare surfaces, erosion, drainage.
    Degraded,
    /// Under restoration and responding, but not yet stable.
    Recovering,
    /// Functionally intact with no strong trend either way.
    Stable,
    /// Near-natural reference condition.
    Reference,
}

impl std::fmt::Display for ConditionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConditionClass::Degraded => "degraded",
            ConditionClass::Recovering => "recovering",
            ConditionClass::Stable => "stable",
            ConditionClass::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// Comparison operator for threshold predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Equal (exact; use [`Predicate::Range`] for tolerant matching).
    Eq,
}

impl CmpOp {
    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
        }
    }
}

/// The predicate language rules are written in.
///
/// A closed sum type evaluated by [`Predicate::holds`] - a single
/// interpreter over tagged variants, deliberately not an open trait.
/// A predicate that names a missing or non-numeric attribute is false;
/// bad data never panics and never silently matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Compare a numeric attribute against a constant.
    Threshold {
        /// Attribute name in the zone's mapping.
        attribute: String,
        /// Comparison operator.
        op: CmpOp,
        /// Right-hand constant.
        value: f64,
    },
    /// Inclusive range membership for a numeric attribute.
    Range {
        /// Attribute name in the zone's mapping.
        attribute: String,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
    /// All sub-predicates must hold (empty list holds).
    All(Vec<Predicate>),
    /// At least one sub-predicate must hold (empty list fails).
    Any(Vec<Predicate>),
    /// Always holds; the catch-all for default rules.
    Always,
}

impl Predicate {
    /// Evaluate against an attribute mapping.
    pub fn holds(&self, attributes: &BTreeMap<String, AttributeValue>) -> bool {
        match self {
            Predicate::Threshold {
                attribute,
                op,
                value,
            } => attributes
                .get(attribute)
                .and_then(AttributeValue::as_f64)
                .is_some_and(|v| op.holds(v, *value)),
            Predicate::Range {
                attribute,
                min,
                max,
            } => attributes
                .get(attribute)
                .and_then(AttributeValue::as_f64)
                .is_some_and(|v| v >= *min && v <= *max),
            Predicate::All(preds) => preds.iter().all(|p| p.holds(attributes)),
            Predicate::Any(preds) => preds.iter().any(|p| p.holds(attributes)),
            Predicate::Always => true,
        }
    }
}

/// One rule: a predicate, the class it assigns, and its priority.
///
/// Lower priority values are evaluated first; the first rule whose
/// predicate holds wins. Rules with equal priority keep their list
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Evaluation priority; lower runs first.
    pub priority: u32,
    /// Class assigned when the predicate holds.
    pub class: ConditionClass,
    /// The predicate to test.
    pub predicate: Predicate,
}

impl ClassificationRule {
    /// Create a rule.
    pub fn new(priority: u32, class: ConditionClass, predicate: Predicate) -> Self {
        Self {
            priority,
            class,
            predicate,
        }
    }

    /// A lowest-priority catch-all assigning `class`.
    pub fn default_rule(class: ConditionClass) -> Self {
        Self {
            priority: u32::MAX,
            class,
            predicate: Predicate::Always,
        }
    }

    /// Whether this rule matches the zone.
    pub fn matches(&self, zone: &Zone) -> bool {
        self.predicate.holds(&zone.attributes)
    }
}
