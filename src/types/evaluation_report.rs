use std::fmt;
use std::time::Duration;

use super::evaluation_result::EvaluationResult;

/// How a single rule fared during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub name: String,
    pub matched: bool,
    /// The rule had no conditions and matched without looking at the context.
    pub unconditional: bool,
}

/// Detailed evaluation report returned by
/// [`ConditionEvaluator::evaluate_detailed()`](super::ConditionEvaluator::evaluate_detailed).
///
/// Contains the regular [`EvaluationResult`], the outcome of every rule in
/// declaration order, and the wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    result: EvaluationResult,
    outcomes: Vec<RuleOutcome>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        result: EvaluationResult,
        outcomes: Vec<RuleOutcome>,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            outcomes,
            duration,
        }
    }

    /// The evaluation result, same as [`ConditionEvaluator::evaluate_config()`](super::ConditionEvaluator::evaluate_config).
    pub fn result(&self) -> &EvaluationResult {
        &self.result
    }

    pub fn into_result(self) -> EvaluationResult {
        self.result
    }

    /// One entry per rule, in declaration order.
    #[must_use]
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Names of rules that did not match, in declaration order.
    #[must_use]
    pub fn unmatched(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.matched)
            .map(|o| o.name.as_str())
            .collect()
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        write!(f, ", unmatched: [{}]", self.unmatched().join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
