use crate::policy::Policy;

// ---------------------------------------------------------------------------
// RuleValidator — scope binding oracle
//
// Reports whether keys and action types are bound to the scope a planner
// or evaluator is working in. Always injected; this crate never decides
// what "bound" means.
// ---------------------------------------------------------------------------

pub trait RuleValidator: Send + Sync {
    /// True iff `key` is bound to the scope whose delimited form
    /// (scope plus trailing delimiter) is given.
    fn is_in_scope(&self, key: &str, delimited_scope: &str) -> bool;

    /// True iff the action type is known to the current scope.
    fn is_bounded(&self, action_type: &str) -> bool;
}

// ---------------------------------------------------------------------------
// Evaluation function interfaces
//
// Functions are opaque to planning: only their identity (name) and their
// applicability are consulted. Execution belongs to the evaluator.
// ---------------------------------------------------------------------------

/// An atomic-constraint evaluation function registered under an exact
/// left-operand key.
pub trait ConstraintFunction: Send + Sync {
    /// Stable identifier, shown in evaluation plans.
    fn name(&self) -> String;
}

/// An atomic-constraint evaluation function that decides per key whether
/// it applies, instead of being registered under one exact key.
pub trait DynamicConstraintFunction: Send + Sync {
    /// Stable identifier, shown in evaluation plans.
    fn name(&self) -> String;

    /// Whether this function can evaluate constraints whose left operand
    /// is `key`.
    fn can_handle(&self, key: &str) -> bool;
}

/// A function applied to a whole rule rather than to one of its
/// constraints.
pub trait RuleFunction: Send + Sync {
    /// Stable identifier, shown in evaluation plans.
    fn name(&self) -> String;
}

/// A pre- or post-evaluation check over a whole policy.
pub trait PolicyValidator: Send + Sync {
    /// Stable identifier, shown in evaluation plans.
    fn name(&self) -> String;

    fn validate(&self, policy: &Policy) -> bool;
}
