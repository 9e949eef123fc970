use thiserror::Error;

/// Errors raised while compiling or evaluating a condition configuration.
///
/// Any of these aborts the whole evaluation; no partial result is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("Condition \"{rule}\" must have either 'conditions' or 'conditions-file'")]
    MalformedConfig { rule: String },

    #[error("Unknown operator: {op}")]
    UnknownOperator { op: String },

    #[error("conditions in \"{rule}\" nest deeper than the maximum depth of {max_depth}")]
    ConfigTooDeep { rule: String, max_depth: usize },

    #[error("invalid condition configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid definition for condition \"{rule}\": {reason}")]
    InvalidDefinition { rule: String, reason: String },

    #[error("duplicate condition name \"{name}\"")]
    DuplicateRule { name: String },
}
