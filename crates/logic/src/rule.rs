//! Rule trees and the paths failures are reported against.
//!
//! A [`Rule`] is built once (usually by the schema macros) and then shared
//! read-only by every evaluation. Nothing in this module carries
//! evaluation state.

use serde::Serialize;
use std::fmt;

use crate::types::Value;

// ──────────────────────────────────────────────
// Paths
// ──────────────────────────────────────────────

/// One step into a document: a map key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the input document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Returns a new path one key deeper.
    pub fn key(&self, key: &str) -> Path {
        let mut next = self.clone();
        next.push(PathSegment::Key(key.to_string()));
        next
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Path(vec![PathSegment::Key(key.to_string())])
    }
}

/// Dotted form: `user.tags[0]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(k) if i == 0 => write!(f, "{}", k)?,
                PathSegment::Key(k) => write!(f, ".{}", k)?,
                PathSegment::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Rule tree
// ──────────────────────────────────────────────

/// How a predicate leaf treats values outside its declared domain.
///
/// Chosen when the rule is built, never at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Apply unconditionally; an out-of-domain value is a fault.
    Strict,
    /// Check the domain first; an out-of-domain value is an ordinary failure.
    Defensive,
}

/// A node of the rule tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The current document must contain `key`.
    KeyPresent(String),
    /// A registered predicate applied to the current value.
    Predicate {
        name: String,
        args: Vec<Value>,
        strategy: Strategy,
    },
    /// Both sides are evaluated and their failures collected.
    And(Box<Rule>, Box<Rule>),
    /// Right side only runs when the left side fails.
    Or(Box<Rule>, Box<Rule>),
    Not(Box<Rule>),
    /// Dependent rule only runs when the guard passes.
    Implies(Box<Rule>, Box<Rule>),
    /// Evaluate the inner rule against the value stored at `key`.
    KeySet(String, Box<Rule>),
    /// Evaluate the inner rule against every element of a list.
    Each(Box<Rule>),
}

impl Rule {
    pub fn key_present(key: impl Into<String>) -> Rule {
        Rule::KeyPresent(key.into())
    }

    pub fn predicate(name: impl Into<String>, args: Vec<Value>, strategy: Strategy) -> Rule {
        Rule::Predicate {
            name: name.into(),
            args,
            strategy,
        }
    }

    pub fn and(left: Rule, right: Rule) -> Rule {
        Rule::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Rule, right: Rule) -> Rule {
        Rule::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(rule: Rule) -> Rule {
        Rule::Not(Box::new(rule))
    }

    pub fn implies(guard: Rule, rule: Rule) -> Rule {
        Rule::Implies(Box::new(guard), Box::new(rule))
    }

    pub fn key_set(key: impl Into<String>, rule: Rule) -> Rule {
        Rule::KeySet(key.into(), Box::new(rule))
    }

    pub fn each(rule: Rule) -> Rule {
        Rule::Each(Box::new(rule))
    }

    /// Left-folds rules into a conjunction. `None` for an empty input.
    pub fn all(rules: impl IntoIterator<Item = Rule>) -> Option<Rule> {
        rules.into_iter().reduce(Rule::and)
    }

    /// Visits every predicate leaf depth-first, left to right.
    pub fn for_each_predicate<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a [Value])) {
        match self {
            Rule::KeyPresent(_) => {}
            Rule::Predicate { name, args, .. } => f(name, args),
            Rule::And(l, r) | Rule::Or(l, r) | Rule::Implies(l, r) => {
                l.for_each_predicate(f);
                r.for_each_predicate(f);
            }
            Rule::Not(inner) | Rule::KeySet(_, inner) | Rule::Each(inner) => {
                inner.for_each_predicate(f)
            }
        }
    }
}

/// Compact infix rendering, used in debug logs.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::KeyPresent(key) => write!(f, "key?({})", key),
            Rule::Predicate { name, args, .. } if args.is_empty() => write!(f, "{}", name),
            Rule::Predicate { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg.to_json())?;
                }
                write!(f, ")")
            }
            Rule::And(l, r) => write!(f, "({} AND {})", l, r),
            Rule::Or(l, r) => write!(f, "({} OR {})", l, r),
            Rule::Not(inner) => write!(f, "NOT {}", inner),
            Rule::Implies(l, r) => write!(f, "({} THEN {})", l, r),
            Rule::KeySet(key, inner) => write!(f, "{}: {}", key, inner),
            Rule::Each(inner) => write!(f, "each({})", inner),
        }
    }
}
