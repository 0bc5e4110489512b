use log::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::function::Function;
use crate::lexer::Lexer;
use crate::node::MathNode;
use crate::operator::Operator;
use crate::token::{Span, Token, TokenKind};

/// Builds a [`MathNode`] tree from an expression with two stacks: finished subtrees on one, and
/// operators, function names and open groups still waiting for their operands on the other.
///
/// The parser alternates between expecting an operand and expecting an operator, which is how
/// missing operands (`2 +`) and missing operators (`2 3`) are told apart.
pub struct EquationParser<'source> {
    lexer: Lexer<'source>,
    config: ParserConfig,
    operands: Vec<Operand>,
    operators: Vec<Pending>,
    open_groups: usize,
    expect_operand: bool,
}

struct Operand {
    node: MathNode,
    depth: usize,
    span: Span,
}

enum Pending {
    Operator {
        op: Operator,
        span: Span,
    },
    Function {
        function: Function,
        span: Span,
    },
    Group {
        span: Span,
        operands_at_open: usize,
    },
}

impl<'source> EquationParser<'source> {
    pub fn new(source: &'source str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &'source str, config: ParserConfig) -> Self {
        Self {
            lexer: Lexer::new(source).with_implicit_multiplication(config.implicit_multiplication),
            config,
            operands: Vec::new(),
            operators: Vec::new(),
            open_groups: 0,
            expect_operand: true,
        }
    }

    pub fn parse(&mut self) -> Result<MathNode> {
        while let Some(token) = self.lexer.next().transpose()? {
            self.process_token(token)?;
        }

        let root = self.finish()?;
        debug!(
            "parsed tree with {} nodes, depth {}",
            root.node_count(),
            root.depth()
        );
        Ok(root)
    }

    fn process_token(&mut self, token: Token<'source>) -> Result<()> {
        trace!("processing {:?}", token.kind);
        let span = token.span;

        match token.kind {
            TokenKind::Number(value) | TokenKind::Constant(value) => {
                self.push_leaf(MathNode::Number(value), &token)?;
            }
            TokenKind::Variable(name) => {
                self.push_leaf(MathNode::Variable(name.to_string()), &token)?;
            }
            TokenKind::Function(function) => {
                self.ensure_operand_position(&token)?;
                match self.lexer.peek()? {
                    Some(Token {
                        kind: TokenKind::OpenParen,
                        ..
                    }) => {}
                    _ => {
                        return Err(ParseError::ExpectedOpenParen {
                            function: function.name(),
                            span: span.into(),
                        }
                        .into())
                    }
                }
                self.operators.push(Pending::Function { function, span });
            }
            TokenKind::OpenParen => {
                self.ensure_operand_position(&token)?;
                self.open_groups += 1;
                if self.open_groups > self.config.max_depth {
                    return Err(ParseError::TooDeeplyNested {
                        limit: self.config.max_depth,
                        span: span.into(),
                    }
                    .into());
                }
                self.operators.push(Pending::Group {
                    span,
                    operands_at_open: self.operands.len(),
                });
            }
            TokenKind::Operator(op) if op.is_unary() => {
                self.ensure_operand_position(&token)?;
                // Prefix operators have nothing to their left to reduce
                self.operators.push(Pending::Operator { op, span });
            }
            TokenKind::Operator(op) => {
                self.ensure_operator_position(span)?;
                self.reduce_yielding_to(&op)?;
                self.operators.push(Pending::Operator { op, span });
                self.expect_operand = true;
            }
            TokenKind::Comma => {
                self.ensure_operator_position(span)?;
                let in_call = match self.reduce_to_group()? {
                    Some(group) => {
                        let in_call = matches!(self.operators.last(), Some(Pending::Function { .. }));
                        self.operators.push(group);
                        in_call
                    }
                    None => false,
                };
                if !in_call {
                    return Err(ParseError::UnexpectedToken {
                        found: token.kind.describe(),
                        span: span.into(),
                    }
                    .into());
                }
                self.expect_operand = true;
            }
            TokenKind::CloseParen => {
                if self.open_groups == 0 {
                    return Err(ParseError::UnexpectedCloseParen { span: span.into() }.into());
                }
                self.ensure_operator_position(span)?;
                self.close_group(span)?;
            }
        }

        Ok(())
    }

    fn ensure_operand_position(&self, token: &Token) -> std::result::Result<(), ParseError> {
        if self.expect_operand {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                found: token.kind.describe(),
                span: token.span.into(),
            })
        }
    }

    fn ensure_operator_position(&self, span: Span) -> std::result::Result<(), ParseError> {
        if self.expect_operand {
            Err(ParseError::MissingOperand { span: span.into() })
        } else {
            Ok(())
        }
    }

    fn push_leaf(&mut self, node: MathNode, token: &Token) -> std::result::Result<(), ParseError> {
        self.ensure_operand_position(token)?;
        self.operands.push(Operand {
            node,
            depth: 1,
            span: token.span,
        });
        self.expect_operand = false;
        Ok(())
    }

    /// Pushes a freshly reduced node, enforcing the depth limit.
    fn push_reduced(
        &mut self,
        node: MathNode,
        depth: usize,
        span: Span,
    ) -> std::result::Result<(), ParseError> {
        if depth > self.config.max_depth {
            return Err(ParseError::TreeTooDeep {
                limit: self.config.max_depth,
                span: span.into(),
            });
        }

        self.operands.push(Operand { node, depth, span });
        Ok(())
    }

    /// Pops the operands `op` needs off the operand stack and pushes the node applying `op` to
    /// them. The operand popped last is the left one.
    fn reduce(&mut self, op: Operator, op_span: Span) -> std::result::Result<(), ParseError> {
        let missing = || ParseError::MissingOperand {
            span: op_span.into(),
        };

        if op.is_unary() {
            let operand = self.operands.pop().ok_or_else(missing)?;
            let span = Span::new(op_span.start, operand.span.end);
            trace!("reducing unary {}", op.symbol());
            self.push_reduced(MathNode::unary(op, operand.node), operand.depth + 1, span)
        } else {
            let rhs = self.operands.pop().ok_or_else(missing)?;
            let lhs = self.operands.pop().ok_or_else(missing)?;
            let span = Span::new(lhs.span.start, rhs.span.end);
            trace!("reducing binary {}", op.symbol());
            self.push_reduced(
                MathNode::binary(op, lhs.node, rhs.node),
                lhs.depth.max(rhs.depth) + 1,
                span,
            )
        }
    }

    /// Reduces every waiting operator which binds at least as tightly as `incoming`.
    fn reduce_yielding_to(&mut self, incoming: &Operator) -> std::result::Result<(), ParseError> {
        while let Some(&Pending::Operator { op, span }) = self.operators.last() {
            if !op.yields_to(incoming) {
                break;
            }
            self.operators.pop();
            self.reduce(op, span)?;
        }

        Ok(())
    }

    /// Reduces operators down to the innermost open group, and pops that group.
    fn reduce_to_group(&mut self) -> std::result::Result<Option<Pending>, ParseError> {
        loop {
            match self.operators.pop() {
                Some(Pending::Operator { op, span }) => self.reduce(op, span)?,
                Some(group @ Pending::Group { .. }) => return Ok(Some(group)),
                Some(function @ Pending::Function { .. }) => {
                    self.operators.push(function);
                    return Ok(None);
                }
                None => return Ok(None),
            }
        }
    }

    fn close_group(&mut self, close: Span) -> std::result::Result<(), ParseError> {
        let Some(Pending::Group {
            span: open,
            operands_at_open,
        }) = self.reduce_to_group()?
        else {
            return Err(ParseError::UnexpectedCloseParen { span: close.into() });
        };
        self.open_groups -= 1;

        let inside = self.operands.len() - operands_at_open;

        if let Some(&Pending::Function { function, span }) = self.operators.last() {
            self.operators.pop();
            let call_span = Span::new(span.start, close.end);

            if inside != function.arity() {
                return Err(ParseError::ArityMismatch {
                    function: function.name(),
                    expected: function.arity(),
                    found: inside,
                    span: call_span.into(),
                });
            }

            let args = self.operands.split_off(operands_at_open);
            let depth = args.iter().map(|arg| arg.depth).max().unwrap_or(0) + 1;
            let args = args.into_iter().map(|arg| arg.node).collect();
            trace!("reducing call to {}", function.name());
            self.push_reduced(MathNode::call(function, args), depth, call_span)?;
        } else {
            // Commas outside calls are rejected when seen, so a plain group holds one operand
            let Some(operand) = self.operands.last_mut().filter(|_| inside == 1) else {
                return Err(ParseError::MissingOperand { span: close.into() });
            };
            operand.span = Span::new(open.start, close.end);
        }

        Ok(())
    }

    fn finish(&mut self) -> std::result::Result<MathNode, ParseError> {
        if self.expect_operand {
            return Err(if self.operands.is_empty() && self.operators.is_empty() {
                ParseError::EmptyExpression
            } else {
                ParseError::MissingOperand {
                    span: self.lexer.end_span().into(),
                }
            });
        }

        while let Some(pending) = self.operators.pop() {
            match pending {
                Pending::Operator { op, span } => self.reduce(op, span)?,
                Pending::Group { span, .. } | Pending::Function { span, .. } => {
                    return Err(ParseError::UnclosedParen { span: span.into() });
                }
            }
        }

        let mut operands = std::mem::take(&mut self.operands);
        match operands.len() {
            0 => Err(ParseError::EmptyExpression),
            1 => Ok(operands.remove(0).node),
            _ => Err(ParseError::UnexpectedToken {
                found: "operand".to_string(),
                span: operands[1].span.into(),
            }),
        }
    }
}
