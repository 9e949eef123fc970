mod context;
mod error;
mod evaluation_report;
mod evaluation_result;
mod evaluator;
mod expr;
mod options;
mod rule;
mod ruleset;
pub(crate) mod value;

pub use context::Context;
pub use error::ConditionError;
pub use evaluation_report::{EvaluationReport, RuleOutcome};
pub use evaluation_result::EvaluationResult;
pub use evaluator::ConditionEvaluator;
pub use expr::{
    all, any, field, CompareOp, Condition, ConditionGroup, FieldExpr, LogicalOp, Node,
};
pub use options::{EvaluatorOptions, DEFAULT_MAX_DEPTH};
pub use rule::Rule;
pub use ruleset::{ConditionConfig, ConditionConfigBuilder, RuleBuilder};

pub(crate) use ruleset::RuleDraft;
