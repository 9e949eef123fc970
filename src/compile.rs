use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::types::RuleDraft;
use crate::{
    CompareOp, Condition, ConditionConfig, ConditionError, ConditionGroup, EvaluatorOptions,
    LogicalOp, Node, Rule,
};

const OPERATOR: &str = "operator";
const CONDITIONS: &str = "conditions";
const CONDITIONS_FILE: &str = "conditions-file";
const OUTPUTS: &str = "outputs";

/// Compile a raw JSON configuration into a typed [`ConditionConfig`].
///
/// Definitions are processed in declaration order and the first error wins.
pub(crate) fn compile(
    value: &Value,
    options: &EvaluatorOptions,
) -> Result<ConditionConfig, ConditionError> {
    let definitions = value
        .as_object()
        .ok_or_else(|| ConditionError::InvalidConfig {
            reason: format!("expected a JSON object of named conditions, got {}", kind(value)),
        })?;

    let rules = definitions
        .iter()
        .map(|(name, definition)| compile_rule(name, definition, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConditionConfig { rules })
}

/// Validate builder drafts into a [`ConditionConfig`].
pub(crate) fn assemble(
    drafts: Vec<RuleDraft>,
    options: &EvaluatorOptions,
) -> Result<ConditionConfig, ConditionError> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(drafts.len());

    for draft in drafts {
        if !seen.insert(draft.name.clone()) {
            return Err(ConditionError::DuplicateRule { name: draft.name });
        }
        let conditions_file = draft.conditions_file.filter(|f| !f.is_empty());
        if draft.conditions.is_none() && conditions_file.is_none() {
            return Err(ConditionError::MalformedConfig { rule: draft.name });
        }

        let has_conditions = draft.conditions.is_some();
        let condition = ConditionGroup::new(draft.operator, draft.conditions.unwrap_or_default());
        if has_conditions && condition.depth() > options.max_depth {
            return Err(ConditionError::ConfigTooDeep {
                rule: draft.name,
                max_depth: options.max_depth,
            });
        }

        rules.push(Rule {
            name: draft.name,
            condition,
            conditions_file,
            outputs: draft.outputs,
        });
    }

    Ok(ConditionConfig { rules })
}

fn compile_rule(
    name: &str,
    definition: &Value,
    options: &EvaluatorOptions,
) -> Result<Rule, ConditionError> {
    let invalid = |reason: String| ConditionError::InvalidDefinition {
        rule: name.to_owned(),
        reason,
    };

    let fields = definition
        .as_object()
        .ok_or_else(|| invalid(format!("expected an object, got {}", kind(definition))))?;

    // `null` and an empty file name count as absent.
    let conditions = fields.get(CONDITIONS).filter(|v| !v.is_null());
    let conditions_file = match fields.get(CONDITIONS_FILE) {
        None | Some(Value::Null) => None,
        Some(Value::String(path)) if path.is_empty() => None,
        Some(Value::String(path)) => Some(path.clone()),
        Some(other) => {
            return Err(invalid(format!(
                "'{CONDITIONS_FILE}' must be a string, got {}",
                kind(other)
            )))
        }
    };
    if conditions.is_none() && conditions_file.is_none() {
        return Err(ConditionError::MalformedConfig {
            rule: name.to_owned(),
        });
    }

    let operator = match fields.get(OPERATOR) {
        None | Some(Value::Null) => LogicalOp::default(),
        Some(value) => parse_logical_op(value).map_err(invalid)?,
    };

    let outputs = match fields.get(OUTPUTS) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(invalid(format!(
                "'{OUTPUTS}' must be an object, got {}",
                kind(other)
            )))
        }
    };

    let compiler = NodeCompiler {
        rule: name,
        max_depth: options.max_depth,
    };
    let nodes = match conditions {
        None => Vec::new(),
        Some(value) => compiler.compile_list(value, 1)?,
    };

    Ok(Rule {
        name: name.to_owned(),
        condition: ConditionGroup::new(operator, nodes),
        conditions_file,
        outputs,
    })
}

/// Walks one rule's condition tree, tracking group depth.
struct NodeCompiler<'a> {
    rule: &'a str,
    max_depth: usize,
}

impl NodeCompiler<'_> {
    fn invalid(&self, reason: String) -> ConditionError {
        ConditionError::InvalidDefinition {
            rule: self.rule.to_owned(),
            reason,
        }
    }

    /// Compile the children of a group sitting at `depth`.
    fn compile_list(&self, value: &Value, depth: usize) -> Result<Vec<Node>, ConditionError> {
        if depth > self.max_depth {
            return Err(ConditionError::ConfigTooDeep {
                rule: self.rule.to_owned(),
                max_depth: self.max_depth,
            });
        }
        let items = value.as_array().ok_or_else(|| {
            self.invalid(format!(
                "'{CONDITIONS}' must be an array, got {}",
                kind(value)
            ))
        })?;
        items
            .iter()
            .map(|item| self.compile_node(item, depth))
            .collect()
    }

    fn compile_node(&self, value: &Value, depth: usize) -> Result<Node, ConditionError> {
        let fields = value.as_object().ok_or_else(|| {
            self.invalid(format!("expected a condition object, got {}", kind(value)))
        })?;

        // A node carrying both `operator` and `conditions` is a group.
        if let (Some(operator), Some(children)) = (fields.get(OPERATOR), fields.get(CONDITIONS)) {
            let operator = parse_logical_op(operator).map_err(|reason| self.invalid(reason))?;
            let conditions = self.compile_list(children, depth + 1)?;
            return Ok(Node::Group(ConditionGroup::new(operator, conditions)));
        }

        let field = match fields.get("field") {
            Some(Value::String(path)) => path.clone(),
            Some(other) => {
                return Err(self.invalid(format!("'field' must be a string, got {}", kind(other))))
            }
            None => return Err(self.invalid("condition is missing 'field'".to_owned())),
        };
        let op = match fields.get("op") {
            Some(Value::String(op)) => {
                CompareOp::parse(op).ok_or_else(|| ConditionError::UnknownOperator {
                    op: op.clone(),
                })?
            }
            Some(other) => {
                return Err(ConditionError::UnknownOperator {
                    op: other.to_string(),
                })
            }
            None => return Err(self.invalid(format!("condition on '{field}' is missing 'op'"))),
        };
        let value = fields.get("value").cloned().unwrap_or(Value::Null);

        Ok(Node::Leaf(Condition { field, op, value }))
    }
}

fn parse_logical_op(value: &Value) -> Result<LogicalOp, String> {
    value
        .as_str()
        .and_then(LogicalOp::parse)
        .ok_or_else(|| format!("'{OPERATOR}' must be \"and\" or \"or\", got {value}"))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
