//! Failure message templates.
//!
//! Templates reference predicate arguments by name, `%{num}` style. These
//! are the built-in English texts; translating them is left to callers.

use crate::types::Value;

/// Reported by a key-presence check on an absent key.
pub const MISSING: &str = "is missing";

/// Reported for keys that must not be present.
pub const NOT_ALLOWED: &str = "is not allowed";

/// Substitutes `%{name}` placeholders with the positional argument of the
/// same name. Placeholders without a matching argument are left as is.
pub fn render(template: &str, arg_names: &[String], args: &[Value]) -> String {
    let mut out = template.to_string();
    for (name, value) in arg_names.iter().zip(args) {
        let placeholder = format!("%{{{}}}", name);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &value.to_string());
        }
    }
    out
}

/// Default phrase for a predicate registered without its own message:
/// `"email?"` becomes `"must be email"`.
pub fn default_message(predicate: &str) -> String {
    format!("must be {}", phrase(predicate))
}

/// Negated counterpart of [`default_message`].
pub fn default_negated(predicate: &str) -> String {
    format!("must not be {}", phrase(predicate))
}

fn phrase(predicate: &str) -> String {
    predicate.trim_end_matches('?').replace('_', " ")
}
