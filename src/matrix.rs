//! Turning evaluation outputs into a job matrix.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::EvaluationResult;

/// A job matrix of the form `{"include": [...]}`.
///
/// Entries are kept in the order they were supplied; an entry whose JSON
/// serialization equals an earlier one is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    include: Vec<Map<String, Value>>,
}

impl Matrix {
    #[must_use]
    pub fn from_outputs<I>(outputs: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let mut seen = HashSet::new();
        let include = outputs
            .into_iter()
            .filter(|entry| seen.insert(Value::Object(entry.clone()).to_string()))
            .collect();
        Self { include }
    }

    /// A single-entry matrix from a matched result, or an empty one.
    #[must_use]
    pub fn from_result(result: &EvaluationResult) -> Self {
        if result.matched() {
            Self::from_outputs([result.outputs().clone()])
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub fn include(&self) -> &[Map<String, Value>] {
        &self.include
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.include.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let include = self.include.iter().cloned().map(Value::Object).collect();
        let mut root = Map::new();
        root.insert("include".to_owned(), Value::Array(include));
        Value::Object(root)
    }

    /// Compact JSON text, e.g. `{"include":[{"env":"dev"}]}`.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// Shallow-merge output maps left to right; later keys win.
#[must_use]
pub fn merge_outputs<'a, I>(outputs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for output in outputs {
        merged.extend(output.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Render an output value for a step output: strings verbatim, anything else
/// as compact JSON.
#[must_use]
pub fn format_output(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
