use std::time::Instant;

use log::debug;
use serde_json::{Map, Value};

use crate::types::value;
use crate::{
    ConditionConfig, ConditionGroup, Context, EvaluationReport, EvaluationResult, LogicalOp, Node,
    Rule, RuleOutcome,
};

pub(crate) fn evaluate(config: &ConditionConfig, ctx: &Context) -> EvaluationResult {
    let mut merged = Merged::default();
    for rule in config.rules() {
        let matched = eval_rule(rule, ctx);
        merged.record(rule, matched);
    }
    merged.finish()
}

pub(crate) fn evaluate_detailed(config: &ConditionConfig, ctx: &Context) -> EvaluationReport {
    let start = Instant::now();
    let mut merged = Merged::default();
    let mut outcomes = Vec::with_capacity(config.len());

    for rule in config.rules() {
        let matched = eval_rule(rule, ctx);
        outcomes.push(RuleOutcome {
            name: rule.name().to_owned(),
            matched,
            unconditional: rule.is_unconditional(),
        });
        merged.record(rule, matched);
    }

    EvaluationReport::new(merged.finish(), outcomes, start.elapsed())
}

fn eval_rule(rule: &Rule, ctx: &Context) -> bool {
    let matched = eval_group(rule.condition(), ctx);
    debug!(
        "condition {:?} {} {}",
        rule.name(),
        if matched { "matched" } else { "did not match" },
        rule.condition()
    );
    matched
}

fn eval_group(group: &ConditionGroup, ctx: &Context) -> bool {
    if group.is_empty() {
        return true;
    }
    let mut results = group.conditions.iter().map(|node| eval_node(node, ctx));
    match group.operator {
        LogicalOp::And => results.all(|r| r),
        LogicalOp::Or => results.any(|r| r),
    }
}

fn eval_node(node: &Node, ctx: &Context) -> bool {
    match node {
        Node::Leaf(c) => value::compare(ctx.get(&c.field), c.op, &c.value),
        Node::Group(group) => eval_group(group, ctx),
    }
}

/// Accumulates matched rule names and their shallow-merged outputs.
#[derive(Default)]
struct Merged {
    names: Vec<String>,
    outputs: Map<String, Value>,
}

impl Merged {
    fn record(&mut self, rule: &Rule, matched: bool) {
        if !matched {
            return;
        }
        self.names.push(rule.name().to_owned());
        // Later rules overwrite earlier keys; nested objects are replaced whole.
        self.outputs.extend(
            rule.outputs()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    fn finish(self) -> EvaluationResult {
        EvaluationResult::new(!self.names.is_empty(), self.names, self.outputs)
    }
}
