use serde::Serialize;

use mandate_core::{
    AndConstraint, AtomicConstraint, Duty, OrConstraint, Permission, Prohibition, Rule,
    XoneConstraint,
};

// ---------------------------------------------------------------------------
// Plan node model
//
// The plan mirrors the policy tree one step per source element. Every
// node is plain owned data: cloned back-references to the source, the
// filtering decision, and the name of the function that would fire.
// Nothing here evaluates anything.
// ---------------------------------------------------------------------------

/// A pre- or post-evaluation policy validator recorded in the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorStep {
    pub name: String,
}

impl ValidatorStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A whole-rule function that would fire for a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFunctionStep {
    pub function_name: String,
    pub rule: Rule,
}

// ---------------------------------------------------------------------------
// Constraint steps
// ---------------------------------------------------------------------------

/// Planning outcome for a leaf constraint: which function would fire,
/// or why the constraint is inert in this scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomicConstraintStep {
    pub constraint: AtomicConstraint,
    pub filtering_reasons: Vec<String>,
    pub rule: Rule,
    pub function_name: Option<String>,
}

impl AtomicConstraintStep {
    /// Rendered in place of a function name when resolution found
    /// nothing.
    pub const UNBOUND_FUNCTION: &'static str = "unbound";

    pub fn is_filtered(&self) -> bool {
        !self.filtering_reasons.is_empty()
    }

    pub fn function_label(&self) -> &str {
        self.function_name
            .as_deref()
            .unwrap_or(Self::UNBOUND_FUNCTION)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndConstraintStep {
    pub constraint_steps: Vec<ConstraintStep>,
    pub constraint: AndConstraint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrConstraintStep {
    pub constraint_steps: Vec<ConstraintStep>,
    pub constraint: OrConstraint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XoneConstraintStep {
    pub constraint_steps: Vec<ConstraintStep>,
    pub constraint: XoneConstraint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstraintStep {
    Atomic(AtomicConstraintStep),
    And(AndConstraintStep),
    Or(OrConstraintStep),
    Xone(XoneConstraintStep),
}

// ---------------------------------------------------------------------------
// Rule steps
// ---------------------------------------------------------------------------

/// Planning outcome for a permission, including the plans of its
/// attached duties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionStep {
    pub rule: Permission,
    pub filtered: bool,
    pub filtering_reasons: Vec<String>,
    pub rule_functions: Vec<RuleFunctionStep>,
    pub constraint_steps: Vec<ConstraintStep>,
    pub duty_steps: Vec<DutyStep>,
}

impl PermissionStep {
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }
}

/// Planning outcome for a prohibition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProhibitionStep {
    pub rule: Prohibition,
    pub filtered: bool,
    pub filtering_reasons: Vec<String>,
    pub rule_functions: Vec<RuleFunctionStep>,
    pub constraint_steps: Vec<ConstraintStep>,
}

impl ProhibitionStep {
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }
}

/// Planning outcome for a duty, free-standing or permission-attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DutyStep {
    pub rule: Duty,
    pub filtered: bool,
    pub filtering_reasons: Vec<String>,
    pub rule_functions: Vec<RuleFunctionStep>,
    pub constraint_steps: Vec<ConstraintStep>,
}

impl DutyStep {
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }
}

// ---------------------------------------------------------------------------
// EvaluationPlan — the root
// ---------------------------------------------------------------------------

/// The full dry-run description of what evaluating a policy in one
/// scope would do. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EvaluationPlan {
    pub pre_validators: Vec<ValidatorStep>,
    pub permission_steps: Vec<PermissionStep>,
    pub duty_steps: Vec<DutyStep>,
    pub prohibition_steps: Vec<ProhibitionStep>,
    pub post_validators: Vec<ValidatorStep>,
}
