use std::sync::Arc;

use mandate_core::{
    delimited_scope, AtomicConstraint, Constraint, ConstraintFunction, Duty,
    DynamicConstraintFunction, Permission, Policy, PolicyRule, PolicyValidator, Prohibition, Rule,
    RuleFunction, RuleTarget, RuleValidator,
};

use crate::error::{PlanError, PlanResult};
use crate::registry::FunctionRegistry;
use crate::step::{
    AndConstraintStep, AtomicConstraintStep, ConstraintStep, DutyStep, EvaluationPlan,
    OrConstraintStep, PermissionStep, ProhibitionStep, RuleFunctionStep, ValidatorStep,
    XoneConstraintStep,
};

// ---------------------------------------------------------------------------
// PolicyPlanner — dry-run policy walk
//
// Walks a policy within one scope and records, for every rule and
// constraint, which evaluation function would fire and which elements
// are inert (unbound key, unknown action, no handler). Nothing is
// executed and the policy is never mutated.
// ---------------------------------------------------------------------------

pub struct PolicyPlanner {
    scope: String,
    delimited_scope: String,
    rule_validator: Arc<dyn RuleValidator>,
    pre_validators: Vec<Arc<dyn PolicyValidator>>,
    post_validators: Vec<Arc<dyn PolicyValidator>>,
    functions: FunctionRegistry,
}

/// Walk output for the parts shared by all three rule kinds.
struct WalkedRule {
    filtered: bool,
    filtering_reasons: Vec<String>,
    rule_functions: Vec<RuleFunctionStep>,
    constraint_steps: Vec<ConstraintStep>,
}

impl PolicyPlanner {
    pub fn builder(scope: impl Into<String>) -> PlannerBuilder {
        PlannerBuilder::new(scope)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Produce the evaluation plan for `policy`.
    ///
    /// The plan lists permissions, then obligations, then prohibitions,
    /// each in source order. The planner itself is stateless across
    /// calls; the enclosing rule is threaded through the walk, so one
    /// planner can serve concurrent calls when its collaborators do.
    pub fn plan(&self, policy: &Policy) -> EvaluationPlan {
        tracing::debug!(scope = %self.scope, "planning policy evaluation");

        let pre_validators = self
            .pre_validators
            .iter()
            .map(|validator| ValidatorStep::new(validator.name()))
            .collect();
        let post_validators = self
            .post_validators
            .iter()
            .map(|validator| ValidatorStep::new(validator.name()))
            .collect();

        let permission_steps = policy
            .permissions
            .iter()
            .map(|permission| self.walk_permission(permission))
            .collect();
        let duty_steps = policy
            .obligations
            .iter()
            .map(|obligation| self.walk_duty(obligation))
            .collect();
        let prohibition_steps = policy
            .prohibitions
            .iter()
            .map(|prohibition| self.walk_prohibition(prohibition))
            .collect();

        EvaluationPlan {
            pre_validators,
            permission_steps,
            duty_steps,
            prohibition_steps,
            post_validators,
        }
    }

    fn walk_permission(&self, permission: &Permission) -> PermissionStep {
        let walked = self.walk_rule(permission);
        let duty_steps = permission
            .duties
            .iter()
            .map(|duty| self.walk_duty(duty))
            .collect();

        PermissionStep {
            rule: permission.clone(),
            filtered: walked.filtered,
            filtering_reasons: walked.filtering_reasons,
            rule_functions: walked.rule_functions,
            constraint_steps: walked.constraint_steps,
            duty_steps,
        }
    }

    fn walk_prohibition(&self, prohibition: &Prohibition) -> ProhibitionStep {
        let walked = self.walk_rule(prohibition);
        ProhibitionStep {
            rule: prohibition.clone(),
            filtered: walked.filtered,
            filtering_reasons: walked.filtering_reasons,
            rule_functions: walked.rule_functions,
            constraint_steps: walked.constraint_steps,
        }
    }

    fn walk_duty(&self, duty: &Duty) -> DutyStep {
        let walked = self.walk_rule(duty);
        DutyStep {
            rule: duty.clone(),
            filtered: walked.filtered,
            filtering_reasons: walked.filtering_reasons,
            rule_functions: walked.rule_functions,
            constraint_steps: walked.constraint_steps,
        }
    }

    fn walk_rule<R: PolicyRule>(&self, rule: &R) -> WalkedRule {
        let mut filtered = false;
        let mut filtering_reasons = Vec::new();

        if let Some(action) = rule.action() {
            if !self.rule_validator.is_bounded(&action.action_type) {
                filtered = true;
                filtering_reasons.push(format!(
                    "action '{}' is not bound to scope '{}'",
                    action.action_type, self.scope
                ));
            }
        }

        let current = rule.to_rule();

        let rule_functions = self
            .functions
            .rule_functions_for(R::KIND)
            .map(|function| RuleFunctionStep {
                function_name: function.name(),
                rule: current.clone(),
            })
            .collect();

        let constraint_steps = rule
            .constraints()
            .iter()
            .map(|constraint| self.walk_constraint(constraint, &current))
            .collect();

        WalkedRule {
            filtered,
            filtering_reasons,
            rule_functions,
            constraint_steps,
        }
    }

    fn walk_constraint(&self, constraint: &Constraint, current: &Rule) -> ConstraintStep {
        match constraint {
            Constraint::Atomic(atomic) => {
                ConstraintStep::Atomic(self.walk_atomic(atomic, current))
            }
            Constraint::And(and) => ConstraintStep::And(AndConstraintStep {
                constraint_steps: self.walk_children(&and.constraints, current),
                constraint: and.clone(),
            }),
            Constraint::Or(or) => ConstraintStep::Or(OrConstraintStep {
                constraint_steps: self.walk_children(&or.constraints, current),
                constraint: or.clone(),
            }),
            Constraint::Xone(xone) => ConstraintStep::Xone(XoneConstraintStep {
                constraint_steps: self.walk_children(&xone.constraints, current),
                constraint: xone.clone(),
            }),
        }
    }

    fn walk_children(&self, constraints: &[Constraint], current: &Rule) -> Vec<ConstraintStep> {
        constraints
            .iter()
            .map(|constraint| self.walk_constraint(constraint, current))
            .collect()
    }

    fn walk_atomic(&self, constraint: &AtomicConstraint, current: &Rule) -> AtomicConstraintStep {
        let key = constraint.left.text();
        let mut filtering_reasons = Vec::new();

        if !self
            .rule_validator
            .is_in_scope(&key, &self.delimited_scope)
        {
            filtering_reasons.push(format!(
                "leftOperand '{}' is not bound to scope '{}'",
                key, self.scope
            ));
        }

        let function_name = self.functions.resolve_function_name(&key, current.kind());

        if function_name.is_none() {
            tracing::trace!(key = %key, kind = %current.kind(), "no function bound");
            filtering_reasons.push(format!(
                "leftOperand '{}' is not bound to any function within scope '{}'",
                key, self.scope
            ));
        }

        AtomicConstraintStep {
            constraint: constraint.clone(),
            filtering_reasons,
            rule: current.clone(),
            function_name,
        }
    }
}

// ---------------------------------------------------------------------------
// PlannerBuilder — write-once configuration
// ---------------------------------------------------------------------------

/// Collects the scope, the binding oracle, validators, and function
/// registrations, then yields an immutable planner. Registrations are
/// append-only and keep call order; validators keep duplicates.
#[derive(Clone)]
pub struct PlannerBuilder {
    scope: String,
    rule_validator: Option<Arc<dyn RuleValidator>>,
    pre_validators: Vec<Arc<dyn PolicyValidator>>,
    post_validators: Vec<Arc<dyn PolicyValidator>>,
    functions: FunctionRegistry,
}

impl PlannerBuilder {
    fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            rule_validator: None,
            pre_validators: Vec::new(),
            post_validators: Vec::new(),
            functions: FunctionRegistry::new(),
        }
    }

    pub fn rule_validator(mut self, validator: Arc<dyn RuleValidator>) -> Self {
        self.rule_validator = Some(validator);
        self
    }

    pub fn pre_validator(mut self, validator: Arc<dyn PolicyValidator>) -> Self {
        self.pre_validators.push(validator);
        self
    }

    pub fn pre_validators(
        mut self,
        validators: impl IntoIterator<Item = Arc<dyn PolicyValidator>>,
    ) -> Self {
        self.pre_validators.extend(validators);
        self
    }

    pub fn post_validator(mut self, validator: Arc<dyn PolicyValidator>) -> Self {
        self.post_validators.push(validator);
        self
    }

    pub fn post_validators(
        mut self,
        validators: impl IntoIterator<Item = Arc<dyn PolicyValidator>>,
    ) -> Self {
        self.post_validators.extend(validators);
        self
    }

    /// Register a static constraint function under `key` for rules
    /// matching `target`.
    pub fn constraint_function(
        mut self,
        key: impl Into<String>,
        target: impl Into<RuleTarget>,
        function: Arc<dyn ConstraintFunction>,
    ) -> Self {
        self.functions.register(key, target.into(), function);
        self
    }

    /// Register a dynamic constraint function for rules matching
    /// `target`; it is consulted for any key it `can_handle`.
    pub fn dynamic_function(
        mut self,
        target: impl Into<RuleTarget>,
        function: Arc<dyn DynamicConstraintFunction>,
    ) -> Self {
        self.functions.register_dynamic(target.into(), function);
        self
    }

    /// Register a whole-rule function for rules matching `target`.
    pub fn rule_function(
        mut self,
        target: impl Into<RuleTarget>,
        function: Arc<dyn RuleFunction>,
    ) -> Self {
        self.functions.register_rule(target.into(), function);
        self
    }

    pub fn build(self) -> PlanResult<PolicyPlanner> {
        if self.scope.is_empty() {
            return Err(PlanError::EmptyScope);
        }
        let rule_validator = self.rule_validator.ok_or(PlanError::MissingRuleValidator)?;

        Ok(PolicyPlanner {
            delimited_scope: delimited_scope(&self.scope),
            scope: self.scope,
            rule_validator,
            pre_validators: self.pre_validators,
            post_validators: self.post_validators,
            functions: self.functions,
        })
    }
}
