//! Predicate registry: named predicates with declared input domains.
//!
//! A registry is filled once (builtins plus any custom predicates) and then
//! only read. Evaluators borrow it; schemas share it behind an `Arc`.

use std::collections::BTreeMap;
use std::fmt;

use crate::builtin;
use crate::error::{ArgumentError, Fault};
use crate::message;
use crate::types::Value;

/// Tells whether `apply` may be invoked on a value.
pub type DomainFn = fn(&Value) -> bool;

/// The predicate itself. Only argument problems are errors; a value outside
/// the domain is screened out by the evaluator before this runs.
pub type ApplyFn = fn(&Value, &[Value]) -> Result<bool, ArgumentError>;

/// Everything the evaluator needs to know about one predicate.
#[derive(Clone)]
pub struct PredicateDescriptor {
    name: String,
    arg_names: Vec<String>,
    domain: DomainFn,
    apply: ApplyFn,
    message: String,
    negated: String,
    hint: bool,
}

impl PredicateDescriptor {
    /// A zero-argument predicate with default messages that reports itself
    /// on missing values.
    pub fn new(name: impl Into<String>, domain: DomainFn, apply: ApplyFn) -> Self {
        let name = name.into();
        PredicateDescriptor {
            message: message::default_message(&name),
            negated: message::default_negated(&name),
            name,
            arg_names: Vec::new(),
            domain,
            apply,
            hint: true,
        }
    }

    /// Declares positional arguments; their names are the message
    /// placeholders.
    pub fn args(mut self, names: &[&str]) -> Self {
        self.arg_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    pub fn negated(mut self, template: impl Into<String>) -> Self {
        self.negated = template.into();
        self
    }

    /// Marks a guard or type check: silent when the value is missing, since
    /// the key-presence failure already says everything.
    pub fn guard(mut self) -> Self {
        self.hint = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arg_names.len()
    }

    pub fn in_domain(&self, value: &Value) -> bool {
        (self.domain)(value)
    }

    pub fn apply(&self, value: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
        (self.apply)(value, args)
    }

    /// Whether a missing value still reports this predicate's message.
    pub fn is_hint(&self) -> bool {
        self.hint
    }

    pub fn failure_message(&self, args: &[Value]) -> String {
        message::render(&self.message, &self.arg_names, args)
    }

    pub fn negated_message(&self, args: &[Value]) -> String {
        message::render(&self.negated, &self.arg_names, args)
    }
}

impl fmt::Debug for PredicateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateDescriptor")
            .field("name", &self.name)
            .field("arg_names", &self.arg_names)
            .field("message", &self.message)
            .field("hint", &self.hint)
            .finish_non_exhaustive()
    }
}

/// Lookup from predicate name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    predicates: BTreeMap<String, PredicateDescriptor>,
}

impl PredicateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        PredicateRegistry {
            predicates: BTreeMap::new(),
        }
    }

    /// A registry holding the standard predicate library.
    pub fn standard() -> Self {
        let mut registry = PredicateRegistry::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Adds or replaces a predicate. Returns the descriptor it replaced.
    pub fn register(&mut self, descriptor: PredicateDescriptor) -> Option<PredicateDescriptor> {
        self.predicates
            .insert(descriptor.name().to_string(), descriptor)
    }

    pub fn lookup(&self, name: &str) -> Result<&PredicateDescriptor, Fault> {
        self.predicates
            .get(name)
            .ok_or_else(|| Fault::UnknownPredicate {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: &Value, _: &[Value]) -> Result<bool, ArgumentError> {
        Ok(true)
    }

    #[test]
    fn lookup_unknown_is_fault() {
        let registry = PredicateRegistry::new();
        let err = registry.lookup("even?").unwrap_err();
        assert_eq!(
            err,
            Fault::UnknownPredicate {
                name: "even?".to_string()
            }
        );
    }

    #[test]
    fn register_custom_predicate() {
        let mut registry = PredicateRegistry::standard();
        assert!(!registry.contains("email?"));
        let replaced = registry.register(PredicateDescriptor::new("email?", |_| true, always));
        assert!(replaced.is_none());

        let email = registry.lookup("email?").unwrap();
        assert_eq!(email.arity(), 0);
        assert_eq!(email.failure_message(&[]), "must be email");
        assert!(email.is_hint());
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = PredicateRegistry::standard();
        let replaced = registry.register(
            PredicateDescriptor::new("even?", |_| true, always).message("must be divisible by two"),
        );
        assert!(replaced.is_some());
        assert_eq!(
            registry.lookup("even?").unwrap().failure_message(&[]),
            "must be divisible by two"
        );
    }

    #[test]
    fn standard_registry_is_sorted() {
        let registry = PredicateRegistry::standard();
        let names: Vec<_> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"filled?"));
        assert!(names.contains(&"nil?"));
    }
}
