use serde_json::{Map, Value};

use super::expr::{ConditionGroup, LogicalOp, Node};

/// One named top-level rule of a [`ConditionConfig`](super::ConditionConfig).
///
/// The rule's `operator` and `conditions` form its root group. A rule that only
/// names a `conditions-file` has an empty root group and therefore always
/// matches; loading that file is up to whoever assembles the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) condition: ConditionGroup,
    pub(crate) conditions_file: Option<String>,
    pub(crate) outputs: Map<String, Value>,
}

impl Rule {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn operator(&self) -> LogicalOp {
        self.condition.operator
    }

    #[must_use]
    pub fn conditions(&self) -> &[Node] {
        &self.condition.conditions
    }

    /// The rule's operator and conditions as a single group.
    #[must_use]
    pub fn condition(&self) -> &ConditionGroup {
        &self.condition
    }

    #[must_use]
    pub fn conditions_file(&self) -> Option<&str> {
        self.conditions_file.as_deref()
    }

    #[must_use]
    pub fn outputs(&self) -> &Map<String, Value> {
        &self.outputs
    }

    /// True when the rule has no conditions and so matches any context.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_empty()
    }
}
