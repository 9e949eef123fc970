use std::fmt;

use serde_json::Value;

/// Comparison operators supported in leaf conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

impl CompareOp {
    pub const ALL: [CompareOp; 10] = [
        CompareOp::Eq,
        CompareOp::Neq,
        CompareOp::Gt,
        CompareOp::Gte,
        CompareOp::Lt,
        CompareOp::Lte,
        CompareOp::Contains,
        CompareOp::NotContains,
        CompareOp::StartsWith,
        CompareOp::EndsWith,
    ];

    /// Parse the operator spelling used in condition definitions.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Contains => "contains",
            CompareOp::NotContains => "not_contains",
            CompareOp::StartsWith => "starts_with",
            CompareOp::EndsWith => "ends_with",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the children of a [`ConditionGroup`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "and" => Some(LogicalOp::And),
            "or" => Some(LogicalOp::Or),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field op value` test against the context.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

/// Children combined with `and` / `or`. An empty group is true.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    pub operator: LogicalOp,
    pub conditions: Vec<Node>,
}

/// One node of a condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Condition),
    Group(ConditionGroup),
}

impl ConditionGroup {
    #[must_use]
    pub fn new(operator: LogicalOp, conditions: Vec<Node>) -> Self {
        Self {
            operator,
            conditions,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Nesting depth of this group; a group holding only leaves has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .conditions
            .iter()
            .map(|node| match node {
                Node::Leaf(_) => 0,
                Node::Group(group) => group.depth(),
            })
            .max()
            .unwrap_or(0)
    }
}

impl From<Condition> for Node {
    fn from(condition: Condition) -> Self {
        Node::Leaf(condition)
    }
}

impl From<ConditionGroup> for Node {
    fn from(group: ConditionGroup) -> Self {
        Node::Group(group)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.field, self.op, self.value)
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("(TRUE)");
        }
        let sep = match self.operator {
            LogicalOp::And => " AND ",
            LogicalOp::Or => " OR ",
        };
        f.write_str("(")?;
        for (i, node) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{node}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(condition) => condition.fmt(f),
            Node::Group(group) => group.fmt(f),
        }
    }
}

/// Intermediate builder for leaf conditions.
/// Created by [`field()`]; requires a comparison method to produce a [`Node`].
#[derive(Debug, Clone)]
pub struct FieldExpr {
    path: String,
}

impl FieldExpr {
    #[must_use]
    pub fn compare(self, op: CompareOp, value: impl Into<Value>) -> Node {
        Node::Leaf(Condition {
            field: self.path,
            op,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Eq, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Neq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Lte, value)
    }

    #[must_use]
    pub fn contains(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::Contains, value)
    }

    #[must_use]
    pub fn not_contains(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::NotContains, value)
    }

    #[must_use]
    pub fn starts_with(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::StartsWith, value)
    }

    #[must_use]
    pub fn ends_with(self, value: impl Into<Value>) -> Node {
        self.compare(CompareOp::EndsWith, value)
    }
}

#[must_use]
pub fn field(path: &str) -> FieldExpr {
    FieldExpr {
        path: path.to_owned(),
    }
}

/// A group that matches when every child matches.
#[must_use]
pub fn all(conditions: impl IntoIterator<Item = Node>) -> Node {
    Node::Group(ConditionGroup::new(
        LogicalOp::And,
        conditions.into_iter().collect(),
    ))
}

/// A group that matches when at least one child matches.
#[must_use]
pub fn any(conditions: impl IntoIterator<Item = Node>) -> Node {
    Node::Group(ConditionGroup::new(
        LogicalOp::Or,
        conditions.into_iter().collect(),
    ))
}
