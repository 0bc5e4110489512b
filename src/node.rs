use std::collections::BTreeSet;
use std::fmt;

use crate::bindings::Bindings;
use crate::error::EvalError;
use crate::function::Function;
use crate::operator::{Associativity, Operator};

/// A node of a parsed expression tree. Every node exclusively owns its children, so cloning a
/// node deep-copies the whole subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum MathNode {
    Number(f64),
    Variable(String),
    Unary {
        op: Operator,
        operand: Box<MathNode>,
    },
    Binary {
        op: Operator,
        lhs: Box<MathNode>,
        rhs: Box<MathNode>,
    },
    Call {
        function: Function,
        args: Vec<MathNode>,
    },
}

/// One line of a tree dump: how deep the node sits (the root is at 0) and what it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub depth: usize,
    pub label: String,
}

impl MathNode {
    pub fn unary(op: Operator, operand: MathNode) -> Self {
        debug_assert!(op.is_unary(), "{op:?} is not a unary operator");
        MathNode::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: Operator, lhs: MathNode, rhs: MathNode) -> Self {
        debug_assert!(!op.is_unary(), "{op:?} is not a binary operator");
        MathNode::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(function: Function, args: Vec<MathNode>) -> Self {
        debug_assert_eq!(function.arity(), args.len(), "arity of {}", function.name());
        MathNode::Call { function, args }
    }

    /// The children of this node, in operand/argument order.
    pub fn children(&self) -> Vec<&MathNode> {
        match self {
            MathNode::Number(_) | MathNode::Variable(_) => Vec::new(),
            MathNode::Unary { operand, .. } => vec![&**operand],
            MathNode::Binary { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            MathNode::Call { args, .. } => args.iter().collect(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            MathNode::Number(n) => n.to_string(),
            MathNode::Variable(name) => name.clone(),
            MathNode::Unary { op, .. } | MathNode::Binary { op, .. } => op.symbol().to_string(),
            MathNode::Call { function, .. } => function.name().to_string(),
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(MathNode::node_count)
            .sum::<usize>()
    }

    /// The number of nodes on the longest path from this node down to a leaf.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(MathNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Collects the names of all variables referenced in this subtree.
    pub fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            MathNode::Variable(name) => {
                names.insert(name.as_str());
            }
            node => {
                for child in node.children() {
                    child.collect_variables(names);
                }
            }
        }
    }

    /// Evaluates this subtree. Children are evaluated left to right before their parent is
    /// applied.
    pub fn evaluate<B: Bindings + ?Sized>(&self, bindings: &B) -> Result<f64, EvalError> {
        match self {
            MathNode::Number(n) => Ok(*n),
            MathNode::Variable(name) => {
                bindings
                    .value_of(name)
                    .ok_or_else(|| EvalError::UnboundVariable { name: name.clone() })
            }
            MathNode::Unary { op, operand } => {
                let operand = operand.evaluate(bindings)?;
                apply(op, &[operand])
            }
            MathNode::Binary { op, lhs, rhs } => {
                let lhs = lhs.evaluate(bindings)?;
                let rhs = rhs.evaluate(bindings)?;
                apply(op, &[lhs, rhs])
            }
            MathNode::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                apply(function, &args)
            }
        }
    }

    /// Depth-first, pre-order dump of this subtree, `depth` being the depth of this node.
    pub fn tree_entries(&self, depth: usize, entries: &mut Vec<TreeEntry>) {
        entries.push(TreeEntry {
            depth,
            label: self.label(),
        });
        for child in self.children() {
            child.tree_entries(depth + 1, entries);
        }
    }

    /// The priority this node has when printed, or `None` for nodes which never need
    /// parenthesising.
    fn print_priority(&self) -> Option<u8> {
        match self {
            MathNode::Number(n) if n.is_sign_negative() => Some(Operator::Neg.priority()),
            MathNode::Unary { op, .. } | MathNode::Binary { op, .. } => Some(op.priority()),
            _ => None,
        }
    }

    /// Whether this node prints starting with a prefix operator.
    fn is_prefixed(&self) -> bool {
        match self {
            MathNode::Number(n) => n.is_sign_negative(),
            MathNode::Unary { .. } => true,
            _ => false,
        }
    }
}

/// Something a node applies to the values of its children.
trait Operation {
    fn describe(&self) -> String;
    fn arity(&self) -> usize;
    fn apply(&self, arguments: &[f64]) -> Option<f64>;
}

impl Operation for Operator {
    fn describe(&self) -> String {
        let kind = if self.is_unary() { "unary" } else { "binary" };
        format!("{kind} '{}'", self.symbol())
    }

    fn arity(&self) -> usize {
        Operator::arity(self)
    }

    fn apply(&self, arguments: &[f64]) -> Option<f64> {
        Operator::apply(self, arguments)
    }
}

impl Operation for Function {
    fn describe(&self) -> String {
        format!("{}()", self.name())
    }

    fn arity(&self) -> usize {
        Function::arity(self)
    }

    fn apply(&self, arguments: &[f64]) -> Option<f64> {
        Function::apply(self, arguments)
    }
}

/// Applies `operation` to already evaluated arguments.
///
/// Infinities are legitimate results (`1/0` is `inf`), but a NaN produced from non-NaN inputs
/// (`0/0`, `sqrt(-1)`) is a domain error. Hand-built trees may hold the wrong number of children
/// for an operation, which is reported rather than evaluated.
fn apply(operation: &impl Operation, arguments: &[f64]) -> Result<f64, EvalError> {
    let result = operation
        .apply(arguments)
        .ok_or_else(|| EvalError::ArityMismatch {
            operation: operation.describe(),
            expected: operation.arity(),
            found: arguments.len(),
        })?;

    if result.is_nan() && !arguments.iter().any(|a| a.is_nan()) {
        Err(EvalError::Domain {
            operation: operation.describe(),
            arguments: arguments.to_vec(),
        })
    } else {
        Ok(result)
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &MathNode, parenthesise: bool) -> fmt::Result {
    if parenthesise {
        write!(f, "({node})")
    } else {
        write!(f, "{node}")
    }
}

/// Canonical infix form, with parentheses only where the tree shape differs from what operator
/// priority and associativity would produce on their own.
impl fmt::Display for MathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathNode::Number(n) => write!(f, "{n}"),
            MathNode::Variable(name) => write!(f, "{name}"),
            MathNode::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                let parenthesise = operand
                    .print_priority()
                    .is_some_and(|p| p < op.priority());
                write_operand(f, operand, parenthesise)
            }
            MathNode::Binary { op, lhs, rhs } => {
                let priority = op.priority();
                let right_associative = op.associativity() == Associativity::Right;

                let lhs_parens = lhs.print_priority().is_some_and(|p| {
                    p < priority || (p == priority && right_associative)
                });
                // A prefixed right operand cannot capture anything to its left.
                let rhs_parens = !rhs.is_prefixed()
                    && rhs.print_priority().is_some_and(|p| {
                        p < priority || (p == priority && !right_associative)
                    });

                write_operand(f, lhs, lhs_parens)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, rhs, rhs_parens)
            }
            MathNode::Call { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
