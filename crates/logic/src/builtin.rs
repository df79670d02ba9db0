//! The standard predicate library.
//!
//! Each predicate declares its domain separately from its check, so a
//! defensive application can screen values without calling into the check.
//! Checks stay total: a value outside the domain simply answers `false`.

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ArgumentError;
use crate::presence::Presence;
use crate::registry::{PredicateDescriptor, PredicateRegistry};
use crate::types::Value;

pub(crate) fn register_all(registry: &mut PredicateRegistry) {
    for descriptor in descriptors() {
        registry.register(descriptor);
    }
}

fn descriptors() -> Vec<PredicateDescriptor> {
    vec![
        // Presence guards
        PredicateDescriptor::new("filled?", any, filled)
            .message("must be filled")
            .negated("cannot be filled")
            .guard(),
        PredicateDescriptor::new("nil?", any, nil)
            .message("cannot be defined")
            .negated("cannot be nil")
            .guard(),
        PredicateDescriptor::new("empty?", sized, empty)
            .message("must be empty")
            .negated("cannot be empty"),
        // Type checks
        PredicateDescriptor::new("int?", any, |v, _| Ok(matches!(v, Value::Int(_))))
            .message("must be an integer")
            .guard(),
        PredicateDescriptor::new("decimal?", any, |v, _| Ok(matches!(v, Value::Decimal(_))))
            .message("must be a decimal")
            .guard(),
        PredicateDescriptor::new("number?", any, |v, _| Ok(numeric(v)))
            .message("must be a number")
            .guard(),
        PredicateDescriptor::new("str?", any, |v, _| Ok(matches!(v, Value::Text(_))))
            .message("must be a string")
            .guard(),
        PredicateDescriptor::new("bool?", any, |v, _| Ok(matches!(v, Value::Bool(_))))
            .message("must be boolean")
            .guard(),
        PredicateDescriptor::new("array?", any, |v, _| Ok(matches!(v, Value::List(_))))
            .message("must be an array")
            .guard(),
        PredicateDescriptor::new("hash?", any, |v, _| Ok(matches!(v, Value::Map(_))))
            .message("must be a hash")
            .guard(),
        // Value checks
        PredicateDescriptor::new("even?", integer, even).message("must be even"),
        PredicateDescriptor::new("odd?", integer, odd).message("must be odd"),
        PredicateDescriptor::new("true?", any, |v, _| Ok(*v == Value::Bool(true)))
            .message("must be true"),
        PredicateDescriptor::new("false?", any, |v, _| Ok(*v == Value::Bool(false)))
            .message("must be false"),
        // Comparisons
        PredicateDescriptor::new("gt?", numeric, gt)
            .args(&["num"])
            .message("must be greater than %{num}")
            .negated("must not be greater than %{num}"),
        PredicateDescriptor::new("gteq?", numeric, gteq)
            .args(&["num"])
            .message("must be greater than or equal to %{num}")
            .negated("must be less than %{num}"),
        PredicateDescriptor::new("lt?", numeric, lt)
            .args(&["num"])
            .message("must be less than %{num}")
            .negated("must not be less than %{num}"),
        PredicateDescriptor::new("lteq?", numeric, lteq)
            .args(&["num"])
            .message("must be less than or equal to %{num}")
            .negated("must be greater than %{num}"),
        // Sizes
        PredicateDescriptor::new("size?", sized, size)
            .args(&["size"])
            .message("size must be %{size}")
            .negated("size cannot be %{size}"),
        PredicateDescriptor::new("min_size?", sized, min_size)
            .args(&["num"])
            .message("size cannot be less than %{num}")
            .negated("size must be less than %{num}"),
        PredicateDescriptor::new("max_size?", sized, max_size)
            .args(&["num"])
            .message("size cannot be greater than %{num}")
            .negated("size must be greater than %{num}"),
        // Equality and membership
        PredicateDescriptor::new("eql?", any, |v, args| Ok(v == arg(args, 0)?))
            .args(&["left"])
            .message("must be equal to %{left}")
            .negated("must not be equal to %{left}"),
        PredicateDescriptor::new("not_eql?", any, |v, args| Ok(v != arg(args, 0)?))
            .args(&["left"])
            .message("must not be equal to %{left}")
            .negated("must be equal to %{left}"),
        PredicateDescriptor::new("included_in?", any, |v, args| {
            Ok(list_arg(args)?.contains(v))
        })
        .args(&["list"])
        .message("must be one of: %{list}")
        .negated("must not be one of: %{list}"),
        PredicateDescriptor::new("excluded_from?", any, |v, args| {
            Ok(!list_arg(args)?.contains(v))
        })
        .args(&["list"])
        .message("must not be one of: %{list}")
        .negated("must be one of: %{list}"),
        // Formats
        PredicateDescriptor::new("format?", |v| matches!(v, Value::Text(_)), format)
            .args(&["regex"])
            .message("is in invalid format")
            .negated("must not match %{regex}")
            .guard(),
    ]
}

// ──────────────────────────────────────────────
// Domains
// ──────────────────────────────────────────────

fn any(_: &Value) -> bool {
    true
}

/// Integers, including integral decimals too large for `Int`.
fn integer(v: &Value) -> bool {
    parity(v).is_some()
}

fn numeric(v: &Value) -> bool {
    matches!(v, Value::Int(_) | Value::Decimal(_))
}

fn sized(v: &Value) -> bool {
    v.size().is_some()
}

// ──────────────────────────────────────────────
// Checks
// ──────────────────────────────────────────────

fn filled(v: &Value, _: &[Value]) -> Result<bool, ArgumentError> {
    Ok(Presence::of(Some(v)).is_filled())
}

fn nil(v: &Value, _: &[Value]) -> Result<bool, ArgumentError> {
    Ok(*v == Value::Nil)
}

fn empty(v: &Value, _: &[Value]) -> Result<bool, ArgumentError> {
    Ok(v.size() == Some(0))
}

fn even(v: &Value, _: &[Value]) -> Result<bool, ArgumentError> {
    Ok(parity(v) == Some(0))
}

fn odd(v: &Value, _: &[Value]) -> Result<bool, ArgumentError> {
    Ok(parity(v) == Some(1))
}

/// `Some(0)` or `Some(1)` for integral values, `None` otherwise.
fn parity(v: &Value) -> Option<u8> {
    match v {
        Value::Int(i) => Some((i % 2 != 0) as u8),
        Value::Decimal(d) if d.fract().is_zero() => Some(!(*d % Decimal::TWO).is_zero() as u8),
        _ => None,
    }
}

fn gt(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    compare(v, args, |l, r| l > r)
}

fn gteq(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    compare(v, args, |l, r| l >= r)
}

fn lt(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    compare(v, args, |l, r| l < r)
}

fn lteq(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    compare(v, args, |l, r| l <= r)
}

fn compare(
    v: &Value,
    args: &[Value],
    op: fn(Decimal, Decimal) -> bool,
) -> Result<bool, ArgumentError> {
    let bound = arg(args, 0)?;
    let bound = bound.as_decimal().ok_or_else(|| {
        ArgumentError(format!("expected a number, got {}", bound.type_name()))
    })?;
    Ok(v.as_decimal().is_some_and(|n| op(n, bound)))
}

fn size(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    let expected = size_arg(args)?;
    Ok(v.size() == Some(expected))
}

fn min_size(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    let min = size_arg(args)?;
    Ok(v.size().is_some_and(|n| n >= min))
}

fn max_size(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    let max = size_arg(args)?;
    Ok(v.size().is_some_and(|n| n <= max))
}

fn format(v: &Value, args: &[Value]) -> Result<bool, ArgumentError> {
    let pattern = match arg(args, 0)? {
        Value::Text(p) => p,
        other => {
            return Err(ArgumentError(format!(
                "expected a pattern string, got {}",
                other.type_name()
            )))
        }
    };
    let re = Regex::new(pattern).map_err(|e| ArgumentError(format!("invalid pattern: {}", e)))?;
    Ok(matches!(v, Value::Text(s) if re.is_match(s)))
}

// ──────────────────────────────────────────────
// Argument helpers
// ──────────────────────────────────────────────

fn arg(args: &[Value], index: usize) -> Result<&Value, ArgumentError> {
    args.get(index)
        .ok_or_else(|| ArgumentError(format!("missing argument {}", index + 1)))
}

fn size_arg(args: &[Value]) -> Result<usize, ArgumentError> {
    match arg(args, 0)? {
        Value::Int(n) if *n >= 0 => Ok(*n as usize),
        other => Err(ArgumentError(format!(
            "expected a non-negative integer, got {}",
            other
        ))),
    }
}

fn list_arg(args: &[Value]) -> Result<&[Value], ArgumentError> {
    match arg(args, 0)? {
        Value::List(items) => Ok(items),
        other => Err(ArgumentError(format!(
            "expected a list, got {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> PredicateRegistry {
        PredicateRegistry::standard()
    }

    fn check(name: &str, value: Value, args: &[Value]) -> bool {
        standard().lookup(name).unwrap().apply(&value, args).unwrap()
    }

    #[test]
    fn even_domain_is_integers() {
        let registry = standard();
        let even = registry.lookup("even?").unwrap();
        assert!(even.in_domain(&Value::Int(3)));
        assert!(!even.in_domain(&Value::Nil));
        assert!(!even.in_domain(&Value::from("")));
        assert!(!even.in_domain(&Value::List(vec![])));
        assert!(check("even?", Value::Int(2), &[]));
        assert!(!check("even?", Value::Int(1), &[]));
        assert!(check("odd?", Value::Int(-3), &[]));
    }

    #[test]
    fn parity_covers_integers_beyond_i64() {
        let registry = standard();
        let even = registry.lookup("even?").unwrap();
        let big_even = Value::Decimal(Decimal::from(u64::MAX - 1));
        let big_odd = Value::Decimal(Decimal::from(u64::MAX));
        assert!(even.in_domain(&big_even));
        assert!(check("even?", big_even.clone(), &[]));
        assert!(!check("even?", big_odd.clone(), &[]));
        assert!(check("odd?", big_odd, &[]));
        assert!(!check("odd?", big_even, &[]));
        assert!(check("odd?", Value::Int(i64::MIN + 1), &[]));
        assert!(!even.in_domain(&Value::Decimal(Decimal::new(25, 1))));
    }

    #[test]
    fn filled_accepts_any_value() {
        let registry = standard();
        let filled = registry.lookup("filled?").unwrap();
        assert!(filled.in_domain(&Value::Nil));
        assert!(!check("filled?", Value::Nil, &[]));
        assert!(!check("filled?", Value::from(""), &[]));
        assert!(!check("filled?", Value::List(vec![]), &[]));
        assert!(check("filled?", Value::Int(0), &[]));
        assert!(!filled.is_hint());
    }

    #[test]
    fn comparisons_mix_int_and_decimal() {
        let half = Value::Decimal(Decimal::new(5, 1));
        assert!(check("gt?", Value::Int(1), &[half.clone()]));
        assert!(check("lt?", half.clone(), &[Value::Int(1)]));
        assert!(check("gteq?", Value::Int(18), &[Value::Int(18)]));
        assert!(!check("lteq?", Value::Int(19), &[Value::Int(18)]));
    }

    #[test]
    fn comparison_with_text_bound_is_argument_error() {
        let registry = standard();
        let gt = registry.lookup("gt?").unwrap();
        let err = gt.apply(&Value::Int(1), &[Value::from("x")]).unwrap_err();
        assert_eq!(err.0, "expected a number, got Text");
    }

    #[test]
    fn size_predicates() {
        assert!(check("size?", Value::from("abc"), &[Value::Int(3)]));
        assert!(check("min_size?", Value::List(vec![Value::Nil]), &[Value::Int(1)]));
        assert!(!check("max_size?", Value::from("abcd"), &[Value::Int(3)]));
    }

    #[test]
    fn membership() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert!(check("included_in?", Value::from("a"), &[list.clone()]));
        assert!(check("excluded_from?", Value::from("c"), &[list]));
    }

    #[test]
    fn format_matches_pattern() {
        assert!(check("format?", Value::from("ab12"), &[Value::from("^[a-z]+\\d+$")]));
        assert!(!check("format?", Value::from("12ab"), &[Value::from("^[a-z]+\\d+$")]));
        let registry = standard();
        let err = registry
            .lookup("format?")
            .unwrap()
            .apply(&Value::from("x"), &[Value::from("(")])
            .unwrap_err();
        assert!(err.0.starts_with("invalid pattern"));
    }

    #[test]
    fn messages_render_arguments() {
        let registry = standard();
        let gt = registry.lookup("gt?").unwrap();
        assert_eq!(gt.failure_message(&[Value::Int(18)]), "must be greater than 18");
        assert_eq!(
            gt.negated_message(&[Value::Int(18)]),
            "must not be greater than 18"
        );
        let included = registry.lookup("included_in?").unwrap();
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(included.failure_message(&[list]), "must be one of: 1, 2");
    }

    #[test]
    fn type_checks_are_guards() {
        let registry = standard();
        for name in ["int?", "decimal?", "number?", "str?", "bool?", "array?", "hash?"] {
            let descriptor = registry.lookup(name).unwrap();
            assert!(!descriptor.is_hint(), "{} should be a guard", name);
            assert!(descriptor.in_domain(&Value::Nil));
        }
        assert!(check("int?", Value::Int(1), &[]));
        assert!(!check("str?", Value::Int(1), &[]));
        assert!(check("number?", Value::Decimal(Decimal::new(1, 2)), &[]));
    }
}
