//! Runtime value types for the rule evaluator.
//!
//! Input documents arrive as JSON and are converted once into [`Value`]
//! before evaluation; predicates only ever see these values.

pub mod values;

pub use values::Value;
