/// Default limit on how deeply condition groups may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs applied when a configuration is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum group nesting depth; a rule's own root group counts as 1.
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvaluatorOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
