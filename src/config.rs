/// Settings for [`EquationParser`](crate::parser::EquationParser).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Upper bound on both parenthesis nesting and the depth of the resulting tree. Every
    /// recursive walk over a parsed tree is bounded by this.
    pub max_depth: usize,

    /// Whether adjacency such as `2x`, `3(x + 1)` or `(a)(b)` is read as multiplication.
    pub implicit_multiplication: bool,
}

impl ParserConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_implicit_multiplication(mut self, enabled: bool) -> Self {
        self.implicit_multiplication = enabled;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            implicit_multiplication: true,
        }
    }
}
