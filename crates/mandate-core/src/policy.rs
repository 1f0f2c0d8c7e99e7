use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::types::RuleKind;

// ---------------------------------------------------------------------------
// Action — what a rule permits, prohibits, or obliges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub action_type: String,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules — Permission / Prohibition / Duty
// ---------------------------------------------------------------------------

/// Grants the ability to perform an action, optionally conditioned on
/// constraints and tied to duties that come with the grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Permission {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub duties: Vec<Duty>,
}

/// Forbids an action under the given constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Prohibition {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

/// An obligation to perform an action, either free-standing or attached
/// to a permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Duty {
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

/// A rule of any kind. Used wherever a back-reference to "the enclosing
/// rule" must carry the concrete rule regardless of its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    Permission(Permission),
    Prohibition(Prohibition),
    Duty(Duty),
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Permission(_) => RuleKind::Permission,
            Rule::Prohibition(_) => RuleKind::Prohibition,
            Rule::Duty(_) => RuleKind::Duty,
        }
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            Rule::Permission(p) => p.action.as_ref(),
            Rule::Prohibition(p) => p.action.as_ref(),
            Rule::Duty(d) => d.action.as_ref(),
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        match self {
            Rule::Permission(p) => &p.constraints,
            Rule::Prohibition(p) => &p.constraints,
            Rule::Duty(d) => &d.constraints,
        }
    }
}

/// Compile-time view of a concrete rule type. Lets rule-generic code
/// walk all three kinds through one path while keeping the kind known
/// at monomorphization time.
pub trait PolicyRule: Clone {
    const KIND: RuleKind;

    fn action(&self) -> Option<&Action>;
    fn constraints(&self) -> &[Constraint];
    fn to_rule(&self) -> Rule;
}

impl PolicyRule for Permission {
    const KIND: RuleKind = RuleKind::Permission;

    fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn to_rule(&self) -> Rule {
        Rule::Permission(self.clone())
    }
}

impl PolicyRule for Prohibition {
    const KIND: RuleKind = RuleKind::Prohibition;

    fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn to_rule(&self) -> Rule {
        Rule::Prohibition(self.clone())
    }
}

impl PolicyRule for Duty {
    const KIND: RuleKind = RuleKind::Duty;

    fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn to_rule(&self) -> Rule {
        Rule::Duty(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Policy — ordered collections of rules plus agreement metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PolicyType {
    /// A unilateral statement of rules.
    #[default]
    Set,
    /// An offer from an assigner, not yet agreed.
    Offer,
    /// An agreed contract between assigner and assignee.
    Contract,
}

/// A declarative policy: ordered permissions, prohibitions, and
/// obligations, plus the parties and target the policy speaks about.
/// Rule order is meaningful and preserved by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Policy {
    #[serde(default)]
    pub policy_type: PolicyType,
    #[serde(default)]
    pub assigner: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub prohibitions: Vec<Prohibition>,
    #[serde(default)]
    pub obligations: Vec<Duty>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{AtomicConstraint, Operator};

    #[test]
    fn test_rule_kind_accessor() {
        assert_eq!(
            Rule::Permission(Permission::default()).kind(),
            RuleKind::Permission
        );
        assert_eq!(
            Rule::Prohibition(Prohibition::default()).kind(),
            RuleKind::Prohibition
        );
        assert_eq!(Rule::Duty(Duty::default()).kind(), RuleKind::Duty);
    }

    #[test]
    fn test_rule_action_accessor() {
        let permission = Permission {
            action: Some(Action::new("use")),
            ..Default::default()
        };
        let rule = Rule::Permission(permission);
        assert_eq!(rule.action().unwrap().action_type, "use");

        assert!(Rule::Duty(Duty::default()).action().is_none());
    }

    #[test]
    fn test_rule_constraints_accessor() {
        let duty = Duty {
            constraints: vec![AtomicConstraint::new("k", Operator::Eq, "v").into()],
            ..Default::default()
        };
        let rule = Rule::Duty(duty);
        assert_eq!(rule.constraints().len(), 1);
    }

    #[test]
    fn test_policy_rule_kinds_are_distinct() {
        assert_eq!(Permission::KIND, RuleKind::Permission);
        assert_eq!(Prohibition::KIND, RuleKind::Prohibition);
        assert_eq!(Duty::KIND, RuleKind::Duty);
    }

    #[test]
    fn test_policy_rule_to_rule_preserves_content() {
        let prohibition = Prohibition {
            action: Some(Action::new("distribute")),
            constraints: vec![AtomicConstraint::new("k", Operator::Neq, "v").into()],
        };
        let rule = prohibition.to_rule();
        assert_eq!(rule.kind(), RuleKind::Prohibition);
        assert_eq!(rule.action().unwrap().action_type, "distribute");
        assert_eq!(rule.constraints().len(), 1);
    }

    #[test]
    fn test_policy_defaults_to_empty_set() {
        let policy = Policy::default();
        assert_eq!(policy.policy_type, PolicyType::Set);
        assert!(policy.permissions.is_empty());
        assert!(policy.prohibitions.is_empty());
        assert!(policy.obligations.is_empty());
    }

    #[test]
    fn test_policy_serde_roundtrip() {
        let policy = Policy {
            policy_type: PolicyType::Contract,
            assigner: Some("provider".into()),
            assignee: Some("consumer".into()),
            target: Some("asset-1".into()),
            permissions: vec![Permission {
                action: Some(Action::new("use")),
                constraints: vec![AtomicConstraint::new("region", Operator::Eq, "eu").into()],
                duties: vec![Duty {
                    action: Some(Action::new("notify")),
                    constraints: vec![],
                }],
            }],
            prohibitions: vec![],
            obligations: vec![Duty::default()],
        };

        let json = serde_json::to_string(&policy).unwrap();
        let back: Policy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }

    #[test]
    fn test_policy_deserializes_with_missing_fields() {
        let policy: Policy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, Policy::default());
    }
}
