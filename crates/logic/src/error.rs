//! Error types for the rule layer.

use crate::rule::Path;

/// An evaluation that cannot produce a result.
///
/// Faults are never collected next to validation failures: the first one
/// aborts the whole call and is handed back to the caller as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// A strict predicate met a value outside its declared domain.
    #[error("predicate '{predicate}' cannot be applied to {got} at '{path}'")]
    DomainMismatch {
        predicate: String,
        path: Path,
        got: &'static str,
    },

    /// The rule tree names a predicate the registry does not know.
    #[error("unknown predicate: {name}")]
    UnknownPredicate { name: String },

    /// Predicate arguments are malformed (wrong count or type, bad pattern).
    #[error("invalid arguments for predicate '{predicate}': {message}")]
    InvalidArgument { predicate: String, message: String },

    /// `each` reached a present value that is not a list.
    #[error("each expects a List at '{path}', got {got}")]
    NotAList { path: Path, got: &'static str },
}

/// Raised by a predicate's `apply` when its arguments are unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ArgumentError(pub String);

/// Errors converting external data into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("number {0} cannot be represented as a decimal")]
    UnrepresentableNumber(String),
}
