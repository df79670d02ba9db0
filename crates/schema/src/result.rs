//! Evaluation results and failure aggregation.
//!
//! Failures keep the order the rule tree produced them in: depth-first,
//! left to right, so a key's presence message always precedes its value
//! messages.

use sieve_logic::{Failure, Path, PathSegment, Value};

/// Outcome of calling a schema on one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaResult {
    input: Value,
    success: bool,
    errors: Vec<Failure>,
}

impl SchemaResult {
    pub(crate) fn new(input: Value, success: bool, errors: Vec<Failure>) -> Self {
        SchemaResult {
            input,
            success,
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// The evaluated document, unchanged.
    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn into_input(self) -> Value {
        self.input
    }

    /// All failures in evaluation order.
    pub fn errors(&self) -> &[Failure] {
        &self.errors
    }

    /// Failure texts in evaluation order, without paths.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|f| f.message.as_str()).collect()
    }

    /// Failures grouped by path. Groups appear in the order their first
    /// failure did; messages keep their order within a group.
    pub fn messages(&self) -> Vec<(&Path, Vec<&str>)> {
        let mut groups: Vec<(&Path, Vec<&str>)> = Vec::new();
        for failure in &self.errors {
            match groups.iter_mut().find(|(path, _)| *path == &failure.path) {
                Some((_, messages)) => messages.push(failure.message.as_str()),
                None => groups.push((&failure.path, vec![failure.message.as_str()])),
            }
        }
        groups
    }

    /// Nested JSON view: path segments become object keys (list indices as
    /// their decimal text) and message arrays sit at the leaves, e.g.
    /// `{"foo": ["is missing", "must be even"]}`.
    ///
    /// Messages for the root, or for a path that also has nested messages,
    /// are stored under the empty key.
    pub fn to_json(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for failure in &self.errors {
            insert_message(&mut root, failure.path.segments(), &failure.message);
        }
        serde_json::Value::Object(root)
    }
}

fn segment_key(segment: &PathSegment) -> String {
    match segment {
        PathSegment::Key(k) => k.clone(),
        PathSegment::Index(i) => i.to_string(),
    }
}

fn insert_message(
    node: &mut serde_json::Map<String, serde_json::Value>,
    path: &[PathSegment],
    message: &str,
) {
    let Some((first, rest)) = path.split_first() else {
        push_message(node, "", message);
        return;
    };
    let key = segment_key(first);

    if rest.is_empty() {
        if matches!(node.get(&key), Some(serde_json::Value::Object(_))) {
            if let Some(serde_json::Value::Object(child)) = node.get_mut(&key) {
                push_message(child, "", message);
            }
        } else {
            push_message(node, &key, message);
        }
        return;
    }

    // Messages already recorded for this key move under the empty key so
    // the nested ones have an object to live in.
    if let Some(serde_json::Value::Array(existing)) = node.get_mut(&key) {
        let messages = std::mem::take(existing);
        let mut child = serde_json::Map::new();
        child.insert(String::new(), serde_json::Value::Array(messages));
        node.insert(key.clone(), serde_json::Value::Object(child));
    }
    let entry = node
        .entry(key)
        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    if let serde_json::Value::Object(child) = entry {
        insert_message(child, rest, message);
    }
}

fn push_message(
    node: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
    message: &str,
) {
    let entry = node
        .entry(key.to_string())
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    if let serde_json::Value::Array(messages) = entry {
        messages.push(serde_json::Value::String(message.to_string()));
    }
}
