use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scope — namespace partitioning for policy evaluation
// ---------------------------------------------------------------------------

/// Separator between a scope and its sub-scopes.
///
/// Whoever binds keys to scopes and whoever plans against a scope must
/// agree on this character; it is part of the wire contract.
pub const SCOPE_DELIMITER: char = '.';

/// Append the delimiter to a scope, yielding the prefix used for
/// sub-scope matching (`"request.catalog"` becomes `"request.catalog."`).
pub fn delimited_scope(scope: &str) -> String {
    format!("{}{}", scope, SCOPE_DELIMITER)
}

// ---------------------------------------------------------------------------
// RuleKind — closed set of rule kinds
// ---------------------------------------------------------------------------

/// The three kinds of rule a policy can carry. Exhaustive (no
/// #[non_exhaustive]) so a new kind forces compile-time review of all
/// match sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    Permission,
    Prohibition,
    Duty,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Permission => write!(f, "Permission"),
            RuleKind::Prohibition => write!(f, "Prohibition"),
            RuleKind::Duty => write!(f, "Duty"),
        }
    }
}

// ---------------------------------------------------------------------------
// RuleTarget — what a function registration is bound against
// ---------------------------------------------------------------------------

/// The rule kinds a registered function applies to: one concrete kind,
/// or every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleTarget {
    /// Applies to every rule kind.
    Any,
    /// Applies to exactly one rule kind.
    Kind(RuleKind),
}

impl RuleTarget {
    pub fn matches(self, kind: RuleKind) -> bool {
        match self {
            RuleTarget::Any => true,
            RuleTarget::Kind(k) => k == kind,
        }
    }
}

impl From<RuleKind> for RuleTarget {
    fn from(kind: RuleKind) -> Self {
        RuleTarget::Kind(kind)
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::Any => write!(f, "Any"),
            RuleTarget::Kind(kind) => write!(f, "{}", kind),
        }
    }
}
