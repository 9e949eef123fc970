use std::fmt;

use serde_json::{Map, Value};

use super::error::ConditionError;
use super::expr::{LogicalOp, Node};
use super::options::EvaluatorOptions;
use super::rule::Rule;

/// A compiled condition configuration: named rules in declaration order.
///
/// Built either from JSON with [`from_value`](Self::from_value) /
/// [`from_json_str`](Self::from_json_str), or in code with
/// [`ConditionConfig::builder()`].
///
/// # Example
///
/// ```
/// use condmatrix::{ConditionConfig, field};
///
/// let config = ConditionConfig::builder()
///     .rule("dev-config", |r| r.when(field("env").eq("dev")).output("account", "123456"))
///     .rule("prod-config", |r| r.when(field("env").eq("prod")).output("account", "789012"))
///     .build()
///     .unwrap();
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionConfig {
    pub(crate) rules: Vec<Rule>,
}

impl ConditionConfig {
    #[must_use]
    pub fn builder() -> ConditionConfigBuilder {
        ConditionConfigBuilder::default()
    }

    /// Compile a JSON configuration value (an object of named definitions).
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] for the first invalid definition found, in
    /// declaration order.
    pub fn from_value(value: &Value, options: &EvaluatorOptions) -> Result<Self, ConditionError> {
        crate::compile::compile(value, options)
    }

    /// Parse and compile a JSON configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::InvalidConfig`] if the text is not JSON, and
    /// otherwise the same errors as [`from_value`](Self::from_value).
    pub fn from_json_str(input: &str, options: &EvaluatorOptions) -> Result<Self, ConditionError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| ConditionError::InvalidConfig {
                reason: e.to_string(),
            })?;
        Self::from_value(&value, options)
    }

    /// Rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for ConditionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unconditional = self.rules.iter().filter(|r| r.is_unconditional()).count();
        write!(
            f,
            "ConditionConfig({} rules, {} unconditional)",
            self.rules.len(),
            unconditional,
        )
    }
}

/// Builder for constructing a [`ConditionConfig`] in code.
#[derive(Debug, Default)]
pub struct ConditionConfigBuilder {
    drafts: Vec<RuleDraft>,
    options: EvaluatorOptions,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    operator: LogicalOp,
    conditions: Option<Vec<Node>>,
    conditions_file: Option<String>,
    outputs: Map<String, Value>,
}

/// A rule as written by the builder, before validation.
#[derive(Debug)]
pub(crate) struct RuleDraft {
    pub(crate) name: String,
    pub(crate) operator: LogicalOp,
    pub(crate) conditions: Option<Vec<Node>>,
    pub(crate) conditions_file: Option<String>,
    pub(crate) outputs: Map<String, Value>,
}

impl ConditionConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. The closure should add conditions with `.when()`, set an
    /// explicit (possibly empty) list with `.conditions()`, or name a
    /// `.conditions_file()`; otherwise [`build()`](Self::build) fails with
    /// [`ConditionError::MalformedConfig`].
    #[must_use]
    pub fn rule(mut self, name: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder::default());
        self.drafts.push(RuleDraft {
            name: name.to_owned(),
            operator: builder.operator,
            conditions: builder.conditions,
            conditions_file: builder.conditions_file,
            outputs: builder.outputs,
        });
        self
    }

    #[must_use]
    pub fn options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the rules and produce an immutable `ConditionConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] if validation fails.
    pub fn build(self) -> Result<ConditionConfig, ConditionError> {
        crate::compile::assemble(self.drafts, &self.options)
    }
}

impl RuleBuilder {
    /// How the rule's top-level conditions combine. Defaults to `and`.
    #[must_use]
    pub fn operator(mut self, operator: LogicalOp) -> Self {
        self.operator = operator;
        self
    }

    /// Append a condition (leaf or group) to the rule.
    #[must_use]
    pub fn when(mut self, node: impl Into<Node>) -> Self {
        self.conditions.get_or_insert_with(Vec::new).push(node.into());
        self
    }

    /// Replace the rule's conditions. An empty list makes the rule unconditional.
    #[must_use]
    pub fn conditions(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.conditions = Some(nodes.into_iter().collect());
        self
    }

    #[must_use]
    pub fn conditions_file(mut self, path: impl Into<String>) -> Self {
        self.conditions_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn outputs(mut self, outputs: Map<String, Value>) -> Self {
        self.outputs = outputs;
        self
    }
}
