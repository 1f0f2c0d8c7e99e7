use std::collections::BTreeMap;
use std::sync::Arc;

use mandate_core::{
    ConstraintFunction, DynamicConstraintFunction, RuleFunction, RuleKind, RuleTarget,
};

// ---------------------------------------------------------------------------
// FunctionRegistry — evaluation functions indexed three ways
//
// Static functions live under their exact left-operand key, dynamic
// functions decide applicability per key, and rule functions attach to
// whole rules. All collections are append-only; the first matching
// registration always wins at lookup.
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct ConstraintFunctionEntry {
    target: RuleTarget,
    function: Arc<dyn ConstraintFunction>,
}

#[derive(Clone)]
struct DynamicFunctionEntry {
    target: RuleTarget,
    function: Arc<dyn DynamicConstraintFunction>,
}

#[derive(Clone)]
struct RuleFunctionEntry {
    target: RuleTarget,
    function: Arc<dyn RuleFunction>,
}

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    // Keyed map is ordered so whole-registry iteration is sorted by key.
    constraint_functions: BTreeMap<String, Vec<ConstraintFunctionEntry>>,
    dynamic_functions: Vec<DynamicFunctionEntry>,
    rule_functions: Vec<RuleFunctionEntry>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static constraint function under `key`. Appends;
    /// earlier registrations under the same key keep priority.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        target: RuleTarget,
        function: Arc<dyn ConstraintFunction>,
    ) {
        self.constraint_functions
            .entry(key.into())
            .or_default()
            .push(ConstraintFunctionEntry { target, function });
    }

    pub fn register_dynamic(
        &mut self,
        target: RuleTarget,
        function: Arc<dyn DynamicConstraintFunction>,
    ) {
        self.dynamic_functions
            .push(DynamicFunctionEntry { target, function });
    }

    pub fn register_rule(&mut self, target: RuleTarget, function: Arc<dyn RuleFunction>) {
        self.rule_functions
            .push(RuleFunctionEntry { target, function });
    }

    /// Name of the function that would evaluate an atomic constraint
    /// with left-operand `key` under a rule of `kind`.
    ///
    /// Static entries under `key` are consulted in registration order
    /// first; dynamic entries in registration order second. Returns
    /// `None` when nothing applies.
    pub fn resolve_function_name(&self, key: &str, kind: RuleKind) -> Option<String> {
        self.constraint_functions
            .get(key)
            .into_iter()
            .flatten()
            .find(|entry| entry.target.matches(kind))
            .map(|entry| entry.function.name())
            .or_else(|| {
                self.dynamic_functions
                    .iter()
                    .find(|entry| entry.target.matches(kind) && entry.function.can_handle(key))
                    .map(|entry| entry.function.name())
            })
    }

    /// All rule functions applicable to rules of `kind`, in
    /// registration order.
    pub fn rule_functions_for(
        &self,
        kind: RuleKind,
    ) -> impl Iterator<Item = &Arc<dyn RuleFunction>> {
        self.rule_functions
            .iter()
            .filter(move |entry| entry.target.matches(kind))
            .map(|entry| &entry.function)
    }

    /// Keys with static registrations, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constraint_functions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl ConstraintFunction for Named {
        fn name(&self) -> String {
            self.0.to_string()
        }
    }

    impl RuleFunction for Named {
        fn name(&self) -> String {
            self.0.to_string()
        }
    }

    struct Dynamic {
        name: &'static str,
        handles: &'static str,
    }

    impl DynamicConstraintFunction for Dynamic {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn can_handle(&self, key: &str) -> bool {
            key == self.handles
        }
    }

    #[test]
    fn test_resolve_static_function() {
        let mut registry = FunctionRegistry::new();
        registry.register("k1", RuleKind::Permission.into(), Arc::new(Named("f1")));

        assert_eq!(
            registry.resolve_function_name("k1", RuleKind::Permission),
            Some("f1".to_string())
        );
        assert_eq!(registry.resolve_function_name("k1", RuleKind::Duty), None);
        assert_eq!(
            registry.resolve_function_name("other", RuleKind::Permission),
            None
        );
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = FunctionRegistry::new();
        registry.register("k", RuleKind::Permission.into(), Arc::new(Named("first")));
        registry.register("k", RuleKind::Permission.into(), Arc::new(Named("second")));

        assert_eq!(
            registry.resolve_function_name("k", RuleKind::Permission),
            Some("first".to_string())
        );
    }

    #[test]
    fn test_static_entry_with_wrong_kind_is_skipped() {
        let mut registry = FunctionRegistry::new();
        registry.register("k", RuleKind::Duty.into(), Arc::new(Named("duty-fn")));
        registry.register("k", RuleKind::Permission.into(), Arc::new(Named("perm-fn")));

        assert_eq!(
            registry.resolve_function_name("k", RuleKind::Permission),
            Some("perm-fn".to_string())
        );
    }

    #[test]
    fn test_any_target_matches_all_kinds() {
        let mut registry = FunctionRegistry::new();
        registry.register("k", RuleTarget::Any, Arc::new(Named("generic")));

        for kind in [RuleKind::Permission, RuleKind::Prohibition, RuleKind::Duty] {
            assert_eq!(
                registry.resolve_function_name("k", kind),
                Some("generic".to_string())
            );
        }
    }

    #[test]
    fn test_static_takes_precedence_over_dynamic() {
        let mut registry = FunctionRegistry::new();
        registry.register_dynamic(
            RuleTarget::Any,
            Arc::new(Dynamic {
                name: "dyn",
                handles: "k",
            }),
        );
        registry.register("k", RuleTarget::Any, Arc::new(Named("static")));

        assert_eq!(
            registry.resolve_function_name("k", RuleKind::Permission),
            Some("static".to_string())
        );
    }

    #[test]
    fn test_dynamic_fallback_respects_can_handle() {
        let mut registry = FunctionRegistry::new();
        registry.register_dynamic(
            RuleTarget::Any,
            Arc::new(Dynamic {
                name: "dyn",
                handles: "k2",
            }),
        );

        assert_eq!(
            registry.resolve_function_name("k2", RuleKind::Prohibition),
            Some("dyn".to_string())
        );
        assert_eq!(
            registry.resolve_function_name("k1", RuleKind::Prohibition),
            None
        );
    }

    #[test]
    fn test_dynamic_entries_resolve_in_registration_order() {
        let mut registry = FunctionRegistry::new();
        registry.register_dynamic(
            RuleTarget::Any,
            Arc::new(Dynamic {
                name: "first",
                handles: "k",
            }),
        );
        registry.register_dynamic(
            RuleTarget::Any,
            Arc::new(Dynamic {
                name: "second",
                handles: "k",
            }),
        );

        assert_eq!(
            registry.resolve_function_name("k", RuleKind::Duty),
            Some("first".to_string())
        );
    }

    #[test]
    fn test_rule_functions_for_filters_by_kind() {
        let mut registry = FunctionRegistry::new();
        registry.register_rule(RuleKind::Permission.into(), Arc::new(Named("perm")));
        registry.register_rule(RuleTarget::Any, Arc::new(Named("any")));
        registry.register_rule(RuleKind::Duty.into(), Arc::new(Named("duty")));

        let names: Vec<String> = registry
            .rule_functions_for(RuleKind::Permission)
            .map(|f| f.name())
            .collect();
        assert_eq!(names, vec!["perm".to_string(), "any".to_string()]);

        let names: Vec<String> = registry
            .rule_functions_for(RuleKind::Prohibition)
            .map(|f| f.name())
            .collect();
        assert_eq!(names, vec!["any".to_string()]);
    }

    #[test]
    fn test_keys_iterate_sorted() {
        let mut registry = FunctionRegistry::new();
        registry.register("zeta", RuleTarget::Any, Arc::new(Named("z")));
        registry.register("alpha", RuleTarget::Any, Arc::new(Named("a")));
        registry.register("mid", RuleTarget::Any, Arc::new(Named("m")));

        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }
}
