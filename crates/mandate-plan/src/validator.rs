use std::collections::{HashMap, HashSet};

use mandate_core::{RuleValidator, SCOPE_DELIMITER};

/// Binding to this scope covers every scope.
pub const ALL_SCOPES: &str = "*";

// ---------------------------------------------------------------------------
// BindingRuleValidator — rule validator backed by explicit bindings
//
// Keys and action types become meaningful within a scope by being bound
// to it. A binding to a scope also covers all of its dot-delimited
// sub-scopes, and ALL_SCOPES covers everything.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct BindingRuleValidator {
    bindings: HashMap<String, HashSet<String>>,
}

impl BindingRuleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert that `key` is meaningful within `scope`.
    pub fn bind(&mut self, key: impl Into<String>, scope: impl Into<String>) {
        self.bindings
            .entry(key.into())
            .or_default()
            .insert(scope.into());
    }

    fn covers(bound: &str, delimited_scope: &str) -> bool {
        if bound == ALL_SCOPES {
            return true;
        }
        // The probe always carries a trailing delimiter, so an exact
        // scope and a parent scope both reduce to a prefix test.
        delimited_scope.starts_with(&format!("{}{}", bound, SCOPE_DELIMITER))
    }
}

impl RuleValidator for BindingRuleValidator {
    fn is_in_scope(&self, key: &str, delimited_scope: &str) -> bool {
        self.bindings
            .get(key)
            .is_some_and(|scopes| scopes.iter().any(|bound| Self::covers(bound, delimited_scope)))
    }

    fn is_bounded(&self, action_type: &str) -> bool {
        self.bindings
            .get(action_type)
            .is_some_and(|scopes| !scopes.is_empty())
    }
}
