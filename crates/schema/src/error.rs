//! Errors raised while building a schema.

/// A key declaration that cannot be evaluated.
///
/// These are caught once, when the schema is finalized, so that evaluation
/// never meets an unknown predicate through the macros.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("key '{key}' uses unknown predicate '{predicate}'")]
    UnknownPredicate { key: String, predicate: String },

    #[error("key '{key}': predicate '{predicate}' takes {expected} argument(s), got {got}")]
    Arity {
        key: String,
        predicate: String,
        expected: usize,
        got: usize,
    },

    #[error("key '{key}' is declared more than once")]
    DuplicateKey { key: String },
}
