use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Operator — comparison operators for atomic constraints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Geq,
    Lt,
    Leq,
    In,
    HasPart,
    IsA,
    IsAllOf,
    IsAnyOf,
    IsNoneOf,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Gt => "GT",
            Operator::Geq => "GEQ",
            Operator::Lt => "LT",
            Operator::Leq => "LEQ",
            Operator::In => "IN",
            Operator::HasPart => "HAS_PART",
            Operator::IsA => "IS_A",
            Operator::IsAllOf => "IS_ALL_OF",
            Operator::IsAnyOf => "IS_ANY_OF",
            Operator::IsNoneOf => "IS_NONE_OF",
        };
        write!(f, "{}", symbol)
    }
}

// ---------------------------------------------------------------------------
// LiteralExpression — a literal operand of an atomic constraint
// ---------------------------------------------------------------------------

/// A literal operand. When used as a left operand, its string form is
/// the key that scope bindings and function registrations are looked
/// up under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub value: Value,
}

impl LiteralExpression {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// String form of the literal: raw content for JSON strings, the
    /// JSON rendering for anything else.
    pub fn text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// AtomicConstraint — leaf constraint `left OP right`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicConstraint {
    pub left: LiteralExpression,
    pub operator: Operator,
    pub right: LiteralExpression,
}

impl AtomicConstraint {
    pub fn new(
        left: impl Into<Value>,
        operator: Operator,
        right: impl Into<Value>,
    ) -> Self {
        Self {
            left: LiteralExpression::new(left),
            operator,
            right: LiteralExpression::new(right),
        }
    }
}

// ---------------------------------------------------------------------------
// Multiplicity constraints — And / Or / Xone over child constraints
// ---------------------------------------------------------------------------

/// All children must hold. An empty child list is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AndConstraint {
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl AndConstraint {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }
}

/// At least one child must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrConstraint {
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl OrConstraint {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }
}

/// Exactly one child must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct XoneConstraint {
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl XoneConstraint {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }
}

// ---------------------------------------------------------------------------
// Constraint — the tagged sum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Atomic(AtomicConstraint),
    And(AndConstraint),
    Or(OrConstraint),
    Xone(XoneConstraint),
}

impl From<AtomicConstraint> for Constraint {
    fn from(constraint: AtomicConstraint) -> Self {
        Constraint::Atomic(constraint)
    }
}

impl From<AndConstraint> for Constraint {
    fn from(constraint: AndConstraint) -> Self {
        Constraint::And(constraint)
    }
}

impl From<OrConstraint> for Constraint {
    fn from(constraint: OrConstraint) -> Self {
        Constraint::Or(constraint)
    }
}

impl From<XoneConstraint> for Constraint {
    fn from(constraint: XoneConstraint) -> Self {
        Constraint::Xone(constraint)
    }
}
