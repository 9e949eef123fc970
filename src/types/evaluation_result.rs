use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Outcome of evaluating a [`ConditionConfig`](super::ConditionConfig).
///
/// `matched` is true when at least one rule matched. `matched_conditions` lists
/// the matching rule names in declaration order, and `outputs` is the shallow
/// merge of their outputs where later rules overwrite earlier keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct EvaluationResult {
    matched: bool,
    matched_conditions: Vec<String>,
    outputs: Map<String, Value>,
}

impl EvaluationResult {
    pub(crate) fn new(
        matched: bool,
        matched_conditions: Vec<String>,
        outputs: Map<String, Value>,
    ) -> Self {
        Self {
            matched,
            matched_conditions,
            outputs,
        }
    }

    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn matched_conditions(&self) -> &[String] {
        &self.matched_conditions
    }

    #[must_use]
    pub fn outputs(&self) -> &Map<String, Value> {
        &self.outputs
    }

    #[must_use]
    pub fn into_outputs(self) -> Map<String, Value> {
        self.outputs
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matched: {}, conditions: [{}], outputs: {}",
            self.matched,
            self.matched_conditions.join(", "),
            self.outputs.len()
        )
    }
}
