//! Rule tree evaluator.
//!
//! Walks a [`Rule`] against one input value in a single recursive descent.
//! Ordinary failures are collected into [`Outcome::Fail`]; a [`Fault`] is
//! returned as `Err` and aborts the walk wherever it happens.
//!
//! Propagation per node:
//! - `And` evaluates both sides and unions their failures, left first. It
//!   only stops early on a fault.
//! - `Or` skips the right side when the left side passes.
//! - `Implies` skips the dependent rule when the guard fails, and passes.
//! - `Not` swaps pass and fail.
//! - Predicates never fault on a missing value, whatever their strategy.

use serde::Serialize;

use crate::error::Fault;
use crate::message;
use crate::presence::Presence;
use crate::registry::PredicateRegistry;
use crate::rule::{Path, PathSegment, Rule, Strategy};
use crate::types::Value;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: Path,
    pub message: String,
}

impl Failure {
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Failure {
            path,
            message: message.into(),
        }
    }
}

/// Result of evaluating one node.
///
/// A `Fail` may carry no failures at all: guard predicates on a missing
/// value fail silently so the key-presence message stands alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(Vec<Failure>),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    pub fn failures(&self) -> &[Failure] {
        match self {
            Outcome::Pass => &[],
            Outcome::Fail(failures) => failures,
        }
    }

    pub fn into_failures(self) -> Vec<Failure> {
        match self {
            Outcome::Pass => Vec::new(),
            Outcome::Fail(failures) => failures,
        }
    }

    fn fail(path: &Path, message: impl Into<String>) -> Outcome {
        Outcome::Fail(vec![Failure::new(path.clone(), message)])
    }
}

/// Evaluates rule trees against predicates from one registry.
///
/// Holds no state between calls; one evaluator may serve any number of
/// evaluations, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r PredicateRegistry,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r PredicateRegistry) -> Self {
        Evaluator { registry }
    }

    /// Evaluate `rule` with `input` as the root document.
    pub fn evaluate(&self, rule: &Rule, input: &Value) -> Result<Outcome, Fault> {
        let mut path = Path::root();
        self.eval(rule, Some(input), &mut path)
    }

    /// `value` is the document the node sees; `None` when the key or index
    /// leading here was absent.
    fn eval(&self, rule: &Rule, value: Option<&Value>, path: &mut Path) -> Result<Outcome, Fault> {
        match rule {
            Rule::KeyPresent(key) => {
                let presence = Presence::of(value.and_then(|v| v.get(key)));
                if presence.is_present() {
                    Ok(Outcome::Pass)
                } else {
                    Ok(Outcome::fail(&path.key(key), message::MISSING))
                }
            }

            Rule::Predicate {
                name,
                args,
                strategy,
            } => self.eval_predicate(name, args, *strategy, value, path),

            Rule::And(left, right) => {
                let left = self.eval(left, value, path)?;
                let right = self.eval(right, value, path)?;
                Ok(match (left, right) {
                    (Outcome::Pass, Outcome::Pass) => Outcome::Pass,
                    (left, right) => {
                        let mut failures = left.into_failures();
                        failures.extend(right.into_failures());
                        Outcome::Fail(failures)
                    }
                })
            }

            Rule::Or(left, right) => {
                if self.eval(left, value, path)?.is_pass() {
                    return Ok(Outcome::Pass);
                }
                self.eval(right, value, path)
            }

            Rule::Not(inner) => match self.eval(inner, value, path)? {
                Outcome::Pass => {
                    let mut failures = Vec::new();
                    self.collect_messages(inner, true, path, &mut failures)?;
                    Ok(Outcome::Fail(failures))
                }
                Outcome::Fail(_) => Ok(Outcome::Pass),
            },

            Rule::Implies(guard, inner) => {
                if self.eval(guard, value, path)?.is_pass() {
                    self.eval(inner, value, path)
                } else {
                    Ok(Outcome::Pass)
                }
            }

            Rule::KeySet(key, inner) => {
                let child = value.and_then(|v| v.get(key));
                path.push(PathSegment::Key(key.clone()));
                let outcome = self.eval(inner, child, path);
                path.pop();
                outcome
            }

            Rule::Each(inner) => match value {
                None => Ok(Outcome::Fail(Vec::new())),
                Some(Value::List(items)) => {
                    let mut failed = false;
                    let mut failures = Vec::new();
                    for (i, item) in items.iter().enumerate() {
                        path.push(PathSegment::Index(i));
                        let outcome = self.eval(inner, Some(item), path);
                        path.pop();
                        if let Outcome::Fail(item_failures) = outcome? {
                            failed = true;
                            failures.extend(item_failures);
                        }
                    }
                    if failed {
                        Ok(Outcome::Fail(failures))
                    } else {
                        Ok(Outcome::Pass)
                    }
                }
                Some(other) => {
                    tracing::debug!(path = %path, got = other.type_name(), "each applied to a non-list");
                    Err(Fault::NotAList {
                        path: path.clone(),
                        got: other.type_name(),
                    })
                }
            },
        }
    }

    fn eval_predicate(
        &self,
        name: &str,
        args: &[Value],
        strategy: Strategy,
        value: Option<&Value>,
        path: &Path,
    ) -> Result<Outcome, Fault> {
        let descriptor = self.registry.lookup(name)?;
        if args.len() != descriptor.arity() {
            return Err(Fault::InvalidArgument {
                predicate: name.to_string(),
                message: format!(
                    "expected {} argument(s), got {}",
                    descriptor.arity(),
                    args.len()
                ),
            });
        }

        let Some(value) = value else {
            return Ok(if descriptor.is_hint() {
                Outcome::fail(path, descriptor.failure_message(args))
            } else {
                Outcome::Fail(Vec::new())
            });
        };

        if !descriptor.in_domain(value) {
            return match strategy {
                Strategy::Strict => {
                    tracing::debug!(
                        predicate = name,
                        path = %path,
                        got = value.type_name(),
                        "strict predicate outside its domain"
                    );
                    Err(Fault::DomainMismatch {
                        predicate: name.to_string(),
                        path: path.clone(),
                        got: value.type_name(),
                    })
                }
                Strategy::Defensive => Ok(Outcome::fail(path, descriptor.failure_message(args))),
            };
        }

        let passed = descriptor
            .apply(value, args)
            .map_err(|e| Fault::InvalidArgument {
                predicate: name.to_string(),
                message: e.to_string(),
            })?;
        tracing::trace!(predicate = name, path = %path, passed, "predicate applied");

        if passed {
            Ok(Outcome::Pass)
        } else {
            Ok(Outcome::fail(path, descriptor.failure_message(args)))
        }
    }

    /// Messages for the predicate leaves under a node, used by `Not`.
    /// Nested negations flip back to the positive message.
    fn collect_messages(
        &self,
        rule: &Rule,
        negated: bool,
        path: &mut Path,
        out: &mut Vec<Failure>,
    ) -> Result<(), Fault> {
        match rule {
            Rule::KeyPresent(key) => {
                let text = if negated {
                    message::NOT_ALLOWED
                } else {
                    message::MISSING
                };
                out.push(Failure::new(path.key(key), text));
            }
            Rule::Predicate { name, args, .. } => {
                let descriptor = self.registry.lookup(name)?;
                let text = if negated {
                    descriptor.negated_message(args)
                } else {
                    descriptor.failure_message(args)
                };
                out.push(Failure::new(path.clone(), text));
            }
            Rule::And(l, r) | Rule::Or(l, r) | Rule::Implies(l, r) => {
                self.collect_messages(l, negated, path, out)?;
                self.collect_messages(r, negated, path, out)?;
            }
            Rule::Not(inner) => self.collect_messages(inner, !negated, path, out)?,
            Rule::KeySet(key, inner) => {
                path.push(PathSegment::Key(key.clone()));
                let result = self.collect_messages(inner, negated, path, out);
                path.pop();
                result?;
            }
            Rule::Each(inner) => self.collect_messages(inner, negated, path, out)?,
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
