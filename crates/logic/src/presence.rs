//! Presence classification of a looked-up value.

use crate::types::Value;

/// How a key or index resolved inside the enclosing document.
///
/// Recomputed at every node that needs it; never cached across siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The key or index is absent.
    Missing,
    /// Present, holding an explicit nil.
    NilValue,
    /// Present, holding empty text or an empty collection.
    Blank,
    /// Present with anything else, including `false`, `0` and
    /// whitespace-only text.
    Filled,
}

impl Presence {
    /// Classifies the result of a lookup.
    pub fn of(value: Option<&Value>) -> Presence {
        match value {
            None => Presence::Missing,
            Some(Value::Nil) => Presence::NilValue,
            Some(Value::Text(s)) if s.is_empty() => Presence::Blank,
            Some(Value::List(items)) if items.is_empty() => Presence::Blank,
            Some(Value::Map(fields)) if fields.is_empty() => Presence::Blank,
            Some(_) => Presence::Filled,
        }
    }

    pub fn is_present(self) -> bool {
        self != Presence::Missing
    }

    pub fn is_filled(self) -> bool {
        self == Presence::Filled
    }
}
