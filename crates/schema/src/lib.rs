//! Sieve schemas -- key-rule macros compiled into rule trees, evaluated
//! against input documents.
//!
//! A schema is built once through [`SchemaBuilder`]; the resulting
//! [`Schema`] is immutable and can be shared across threads. Each call
//! produces a fresh [`SchemaResult`], or a [`Fault`] when a strict
//! predicate meets a value it cannot be applied to.
//!
//! ```
//! use sieve_schema::{optional, required, Schema, Value};
//!
//! let schema = Schema::builder()
//!     .key(required("foo").filled(["even?"]))
//!     .key(optional("bar").maybe(["str?"]))
//!     .build()
//!     .unwrap();
//!
//! let input = Value::from_json(&serde_json::json!({ "foo": 1 })).unwrap();
//! let result = schema.call(&input).unwrap();
//! assert_eq!(result.error_messages(), vec!["must be even"]);
//! ```

pub mod config;
pub mod error;
pub mod macros;
pub mod result;

use std::sync::Arc;

use sieve_logic::message;
use sieve_logic::Evaluator;

pub use config::SchemaConfig;
pub use error::SchemaError;
pub use macros::{call, optional, required, KeyMacro, KeyRule, Optionality, PredicateCall};
pub use result::SchemaResult;
pub use sieve_logic::{
    Failure, Fault, Path, PathSegment, PredicateDescriptor, PredicateRegistry, Rule, Strategy,
    Value,
};

/// A compiled schema: one rule tree plus the registry it was checked against.
#[derive(Debug, Clone)]
pub struct Schema {
    keys: Vec<String>,
    rule: Option<Rule>,
    registry: Arc<PredicateRegistry>,
    config: SchemaConfig,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Evaluate the schema against one input document.
    ///
    /// Validation failures are part of the returned result; a fault aborts
    /// the call and no partial result is produced.
    pub fn call(&self, input: &Value) -> Result<SchemaResult, Fault> {
        let outcome = match &self.rule {
            Some(rule) => Evaluator::new(&self.registry)
                .evaluate(rule, input)
                .map_err(|fault| {
                    tracing::debug!(%fault, "schema call aborted");
                    fault
                })?,
            None => sieve_logic::Outcome::Pass,
        };

        let mut success = outcome.is_pass();
        let mut errors = outcome.into_failures();

        if self.config.validate_keys {
            let undeclared = self.undeclared_keys(input);
            success &= undeclared.is_empty();
            errors.extend(undeclared);
        }

        tracing::debug!(errors = errors.len(), success, "schema evaluated");
        Ok(SchemaResult::new(input.clone(), success, errors))
    }

    /// Declared keys, in declaration order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The conjunction of every key rule; `None` when no key has checks.
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    fn undeclared_keys(&self, input: &Value) -> Vec<Failure> {
        let Value::Map(fields) = input else {
            return Vec::new();
        };
        fields
            .keys()
            .filter(|k| !self.keys.contains(*k))
            .map(|k| Failure::new(Path::from(k.as_str()), message::NOT_ALLOWED))
            .collect()
    }
}

/// Evaluate `schema` against `input`. Same as [`Schema::call`].
pub fn evaluate(schema: &Schema, input: &Value) -> Result<SchemaResult, Fault> {
    schema.call(input)
}

/// The only mutable surface: collects key rules, custom predicates and
/// configuration, then checks everything once in [`SchemaBuilder::build`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    registry: PredicateRegistry,
    rules: Vec<KeyRule>,
    config: SchemaConfig,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Starts from the standard predicate library and default config.
    pub fn new() -> Self {
        SchemaBuilder {
            registry: PredicateRegistry::standard(),
            rules: Vec::new(),
            config: SchemaConfig::default(),
        }
    }

    /// Replaces the predicate registry.
    pub fn registry(mut self, registry: PredicateRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers an extra predicate.
    pub fn predicate(mut self, descriptor: PredicateDescriptor) -> Self {
        self.registry.register(descriptor);
        self
    }

    pub fn config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn key(mut self, rule: KeyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Checks every key rule against the registry and freezes the schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut keys: Vec<String> = Vec::with_capacity(self.rules.len());
        for key_rule in &self.rules {
            if keys.iter().any(|k| k == key_rule.key()) {
                return Err(SchemaError::DuplicateKey {
                    key: key_rule.key().to_string(),
                });
            }
            keys.push(key_rule.key().to_string());
            if let Some(rule) = key_rule.rule() {
                check_predicates(&self.registry, key_rule.key(), rule)?;
            }
        }

        let rule = Rule::all(self.rules.into_iter().filter_map(KeyRule::into_rule));
        tracing::debug!(keys = keys.len(), "schema built");
        if let Some(rule) = &rule {
            tracing::trace!(%rule, "compiled rule");
        }

        Ok(Schema {
            keys,
            rule,
            registry: Arc::new(self.registry),
            config: self.config,
        })
    }
}

fn check_predicates(
    registry: &PredicateRegistry,
    key: &str,
    rule: &Rule,
) -> Result<(), SchemaError> {
    let mut problem = None;
    rule.for_each_predicate(&mut |name, args| {
        if problem.is_some() {
            return;
        }
        match registry.lookup(name) {
            Err(_) => {
                problem = Some(SchemaError::UnknownPredicate {
                    key: key.to_string(),
                    predicate: name.to_string(),
                })
            }
            Ok(descriptor) if descriptor.arity() != args.len() => {
                problem = Some(SchemaError::Arity {
                    key: key.to_string(),
                    predicate: name.to_string(),
                    expected: descriptor.arity(),
                    got: args.len(),
                })
            }
            Ok(_) => {}
        }
    });
    match problem {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
