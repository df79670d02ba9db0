//! Key-rule macros.
//!
//! Each macro compiles one key declaration into a rule fragment, fixing the
//! application strategy of every predicate leaf as it goes:
//!
//! | macro         | value fragment               | strategy  |
//! |---------------|------------------------------|-----------|
//! | `block`       | `P`                          | Strict    |
//! | `value`       | `P`                          | Strict    |
//! | `filled`      | `filled? AND P`              | Defensive |
//! | `maybe`       | `nil? OR P`                  | Strict    |
//!
//! A required key wraps the fragment as `key?(K) AND K: fragment`; an
//! optional key as `key?(K) THEN K: fragment`. Expansion is pure tree
//! construction and cannot fail; predicate names are checked when the
//! schema is built.

use sieve_logic::{Rule, Strategy, Value};

const FILLED: &str = "filled?";
const NIL: &str = "nil?";

/// A predicate name with its arguments, as written in a key declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateCall {
    pub name: String,
    pub args: Vec<Value>,
}

/// Builds a predicate call with arguments: `call("gt?", vec![18.into()])`.
pub fn call(name: impl Into<String>, args: Vec<Value>) -> PredicateCall {
    PredicateCall {
        name: name.into(),
        args,
    }
}

impl From<&str> for PredicateCall {
    fn from(name: &str) -> Self {
        call(name, Vec::new())
    }
}

impl PredicateCall {
    fn into_rule(self, strategy: Strategy) -> Rule {
        Rule::predicate(self.name, self.args, strategy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optionality {
    Required,
    Optional,
}

/// The key declaration a macro is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMacro {
    key: String,
    optionality: Optionality,
}

/// `required(K)`: the key must be present.
pub fn required(key: impl Into<String>) -> KeyMacro {
    KeyMacro {
        key: key.into(),
        optionality: Optionality::Required,
    }
}

/// `optional(K)`: checks only run when the key is present.
pub fn optional(key: impl Into<String>) -> KeyMacro {
    KeyMacro {
        key: key.into(),
        optionality: Optionality::Optional,
    }
}

impl KeyMacro {
    /// Plain block: predicates applied at face value.
    pub fn block<I, P>(self, predicates: I) -> KeyRule
    where
        I: IntoIterator<Item = P>,
        P: Into<PredicateCall>,
    {
        let fragment = conjoin(predicates, Strategy::Strict);
        self.finish(fragment)
    }

    /// `.value(P)`: same expansion as a plain block.
    pub fn value<I, P>(self, predicates: I) -> KeyRule
    where
        I: IntoIterator<Item = P>,
        P: Into<PredicateCall>,
    {
        self.block(predicates)
    }

    /// `.filled(P)`: the value must be filled, and every predicate is
    /// applied defensively so any input shape yields messages, not faults.
    pub fn filled<I, P>(self, predicates: I) -> KeyRule
    where
        I: IntoIterator<Item = P>,
        P: Into<PredicateCall>,
    {
        let filled = Rule::predicate(FILLED, Vec::new(), Strategy::Defensive);
        let fragment = match conjoin(predicates, Strategy::Defensive) {
            Some(rest) => Rule::and(filled, rest),
            None => filled,
        };
        self.finish(Some(fragment))
    }

    /// `.maybe(P)`: nil is accepted; anything else must satisfy `P`.
    pub fn maybe<I, P>(self, predicates: I) -> KeyRule
    where
        I: IntoIterator<Item = P>,
        P: Into<PredicateCall>,
    {
        let fragment = conjoin(predicates, Strategy::Strict).map(|rest| {
            Rule::or(Rule::predicate(NIL, Vec::new(), Strategy::Strict), rest)
        });
        self.finish(fragment)
    }

    fn finish(self, fragment: Option<Rule>) -> KeyRule {
        let presence = Rule::key_present(self.key.clone());
        let rule = match (self.optionality, fragment) {
            (Optionality::Required, Some(fragment)) => Some(Rule::and(
                presence,
                Rule::key_set(self.key.clone(), fragment),
            )),
            (Optionality::Required, None) => Some(presence),
            (Optionality::Optional, Some(fragment)) => Some(Rule::implies(
                presence,
                Rule::key_set(self.key.clone(), fragment),
            )),
            // Nothing to check on an optional key; it is still declared.
            (Optionality::Optional, None) => None,
        };
        KeyRule {
            key: self.key,
            optionality: self.optionality,
            rule,
        }
    }
}

fn conjoin<I, P>(predicates: I, strategy: Strategy) -> Option<Rule>
where
    I: IntoIterator<Item = P>,
    P: Into<PredicateCall>,
{
    Rule::all(
        predicates
            .into_iter()
            .map(|p| p.into().into_rule(strategy)),
    )
}

/// The expanded rule for one declared key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRule {
    key: String,
    optionality: Optionality,
    rule: Option<Rule>,
}

impl KeyRule {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn optionality(&self) -> Optionality {
        self.optionality
    }

    /// `None` for an optional key declared without any checks.
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    pub fn into_rule(self) -> Option<Rule> {
        self.rule
    }
}
