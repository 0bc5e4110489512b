//! The public face of the crate: an owned, parsed expression which can be evaluated, printed and
//! inspected.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::bindings::Bindings;
use crate::config::ParserConfig;
use crate::error::{EvalError, Error, Result};
use crate::node::{MathNode, TreeEntry};
use crate::parser::EquationParser;

/// A parsed expression. Cloning an equation deep-copies its tree, and trees are never mutated
/// after parsing, so one equation may be evaluated from many threads at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equation {
    root: Option<MathNode>,
}

impl Equation {
    /// Parses `source` with the default [`ParserConfig`].
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with(source, ParserConfig::default())
    }

    pub fn parse_with(source: &str, config: ParserConfig) -> Result<Self> {
        let root = EquationParser::with_config(source, config).parse()?;
        Ok(Self { root: Some(root) })
    }

    pub fn root(&self) -> Option<&MathNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> std::result::Result<f64, EvalError> {
        self.root
            .as_ref()
            .ok_or(EvalError::EmptyEquation)?
            .evaluate(bindings)
    }

    /// Evaluates the equation as a function of its single free variable, if it has one. An
    /// equation without variables ignores `x`.
    pub fn evaluate_at(&self, x: f64) -> std::result::Result<f64, EvalError> {
        let variables = self.variables();
        match variables.len() {
            0 => self.evaluate(&()),
            1 => {
                let name = variables.into_iter().next().unwrap_or_default();
                self.evaluate(&[(name, x)])
            }
            _ => Err(EvalError::TooManyVariables {
                names: variables.into_iter().map(String::from).collect(),
            }),
        }
    }

    /// The names of all free variables, sorted.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        if let Some(root) = &self.root {
            root.collect_variables(&mut names);
        }
        names
    }

    /// The canonical infix rendering. For a parsed equation, re-parsing it yields an identical
    /// tree; hand-built trees holding infinite or NaN numbers print them as `inf` and `NaN`.
    pub fn print(&self) -> String {
        self.to_string()
    }

    /// Depth-first dump of every node with its depth, the root at depth 0.
    pub fn print_tree(&self) -> Vec<TreeEntry> {
        let mut entries = Vec::new();
        if let Some(root) = &self.root {
            root.tree_entries(0, &mut entries);
        }
        entries
    }

    /// [`print_tree`](Self::print_tree) rendered as indented lines.
    pub fn render_tree(&self) -> String {
        self.print_tree()
            .iter()
            .map(|entry| format!("{}{}", "  ".repeat(entry.depth), entry.label))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, MathNode::node_count)
    }
}

impl From<MathNode> for Equation {
    fn from(root: MathNode) -> Self {
        Self { root: Some(root) }
    }
}

impl FromStr for Equation {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{root}"),
            None => Ok(()),
        }
    }
}
