use miette::SourceSpan;

use crate::{function::Function, operator::Operator};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span, used for synthetic tokens and end of input.
    pub fn at(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    pub kind: TokenKind<'source>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'source> {
    Number(f64),
    // A named constant such as `pi`, already resolved to its value.
    Constant(f64),
    Variable(&'source str),
    Function(Function),
    // Unary and binary uses of `+`/`-` carry distinct operators.
    Operator(Operator),
    OpenParen,
    CloseParen,
    Comma,
}

impl TokenKind<'_> {
    /// Whether this token can end an operand, i.e. whatever follows it is in operator position.
    pub(crate) fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::Constant(_)
                | TokenKind::Variable(_)
                | TokenKind::CloseParen
        )
    }

    /// Whether implicit multiplication may be inserted in front of this token.
    pub(crate) fn starts_implicit_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Constant(_)
                | TokenKind::Variable(_)
                | TokenKind::Function(_)
                | TokenKind::OpenParen
        )
    }

    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) | TokenKind::Constant(n) => format!("number {n}"),
            TokenKind::Variable(name) => format!("variable '{name}'"),
            TokenKind::Function(function) => format!("function '{}'", function.name()),
            TokenKind::Operator(op) => format!("operator '{}'", op.symbol()),
            TokenKind::OpenParen => "'('".to_string(),
            TokenKind::CloseParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}
