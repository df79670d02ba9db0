//! Sieve rule logic -- predicates, rule trees and the tree-walking
//! evaluator.
//!
//! A rule tree is built once and evaluated many times. Each evaluation
//! walks the tree against one input value and produces either
//! [`Outcome::Pass`], [`Outcome::Fail`] with path-scoped failures, or a
//! [`Fault`] when a strict predicate meets a value outside its domain.
//!
//! The schema layer (`sieve-schema`) builds these trees from key-rule
//! macros; this crate knows nothing about macros.

pub mod builtin;
pub mod error;
pub mod evaluate;
pub mod message;
pub mod presence;
pub mod registry;
pub mod rule;
pub mod types;

pub use error::{ArgumentError, Fault, ValueError};
pub use evaluate::{Evaluator, Failure, Outcome};
pub use presence::Presence;
pub use registry::{ApplyFn, DomainFn, PredicateDescriptor, PredicateRegistry};
pub use rule::{Path, PathSegment, Rule, Strategy};
pub use types::Value;

/// Evaluate `rule` against `input` using `registry`.
///
/// Convenience wrapper over [`Evaluator`] for one-off calls.
pub fn evaluate(
    registry: &PredicateRegistry,
    rule: &Rule,
    input: &Value,
) -> Result<Outcome, Fault> {
    Evaluator::new(registry).evaluate(rule, input)
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
