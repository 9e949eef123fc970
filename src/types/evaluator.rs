use log::debug;
use serde_json::Value;

use super::context::Context;
use super::error::ConditionError;
use super::evaluation_report::EvaluationReport;
use super::evaluation_result::EvaluationResult;
use super::options::EvaluatorOptions;
use super::ruleset::ConditionConfig;

/// Evaluates condition configurations against one fixed [`Context`].
///
/// Evaluation never mutates the evaluator, so a single instance can be shared
/// across threads (e.g. behind an `Arc`) and reused for any number of
/// configurations.
///
/// # Example
///
/// ```
/// use condmatrix::{ConditionEvaluator, Context};
/// use serde_json::json;
///
/// let evaluator = ConditionEvaluator::new(Context::new().set("env", "dev"));
/// let result = evaluator
///     .evaluate(&json!({
///         "dev-config": {
///             "conditions": [{"field": "env", "op": "=", "value": "dev"}],
///             "outputs": {"account": "123456"}
///         }
///     }))
///     .unwrap();
/// assert!(result.matched());
/// ```
#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    context: Context,
    options: EvaluatorOptions,
}

impl ConditionEvaluator {
    #[must_use]
    pub fn new(context: impl Into<Context>) -> Self {
        Self::with_options(context, EvaluatorOptions::default())
    }

    #[must_use]
    pub fn with_options(context: impl Into<Context>, options: EvaluatorOptions) -> Self {
        Self {
            context: context.into(),
            options,
        }
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Compile a raw JSON configuration and evaluate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] if the configuration is invalid; nothing is
    /// evaluated in that case.
    pub fn evaluate(&self, config: &Value) -> Result<EvaluationResult, ConditionError> {
        let config = ConditionConfig::from_value(config, &self.options)?;
        debug!("compiled {config}");
        Ok(self.evaluate_config(&config))
    }

    /// Evaluate an already compiled configuration.
    pub fn evaluate_config(&self, config: &ConditionConfig) -> EvaluationResult {
        let result = crate::evaluate::evaluate(config, &self.context);
        debug!("evaluation result: {result}");
        result
    }

    /// Evaluate with per-rule diagnostics and timing.
    pub fn evaluate_detailed(&self, config: &ConditionConfig) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(config, &self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evaluate_raw_json() {
        let evaluator = ConditionEvaluator::new(json!({"x": "y", "z": "value"}));
        let result = evaluator
            .evaluate(&json!({
                "test-condition": {
                    "operator": "and",
                    "conditions": [{"field": "x", "op": "=", "value": "y"}],
                    "outputs": {"result": "matched"}
                }
            }))
            .unwrap();
        assert!(result.matched());
        assert_eq!(
            Value::Object(result.into_outputs()),
            json!({"result": "matched"})
        );
    }

    #[test]
    fn evaluate_propagates_compile_errors() {
        let evaluator = ConditionEvaluator::new(json!({"x": "y"}));
        let err = evaluator
            .evaluate(&json!({
                "test-condition": {"conditions": [{"field": "x", "op": "foo", "value": "y"}]}
            }))
            .unwrap_err();
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn options_are_applied_when_compiling() {
        let evaluator = ConditionEvaluator::with_options(
            Context::new(),
            EvaluatorOptions::default().with_max_depth(1),
        );
        let err = evaluator
            .evaluate(&json!({
                "r": {"conditions": [{"operator": "or", "conditions": []}]}
            }))
            .unwrap_err();
        assert!(matches!(err, ConditionError::ConfigTooDeep { max_depth: 1, .. }));
        assert_eq!(evaluator.options().max_depth, 1);
    }

    #[test]
    fn evaluator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConditionEvaluator>();
        assert_send_sync::<ConditionConfig>();
    }
}
