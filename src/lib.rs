mod compile;
mod error;
mod evaluate;
mod types;

pub mod context_source;
pub mod host;
pub mod matrix;
pub mod source;

pub use error::CondmatrixError;
pub use matrix::Matrix;
pub use serde_json::{Map, Value};
pub use source::{ConditionsInput, SourceError};
pub use types::{
    all, any, field, CompareOp, Condition, ConditionConfig, ConditionConfigBuilder,
    ConditionError, ConditionEvaluator, ConditionGroup, Context, EvaluationReport,
    EvaluationResult, EvaluatorOptions, FieldExpr, LogicalOp, Node, Rule, RuleBuilder,
    RuleOutcome, DEFAULT_MAX_DEPTH,
};
