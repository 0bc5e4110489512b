use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),
}

#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum LexError {
    #[error("unexpected character '{character}'")]
    #[diagnostic(code = "lex::unexpected_character")]
    UnexpectedCharacter {
        character: char,
        #[label("unexpected character")]
        span: SourceSpan,
    },

    #[error("malformed number literal '{literal}'")]
    #[diagnostic(code = "lex::malformed_number")]
    MalformedNumber {
        literal: String,
        #[label("this literal")]
        span: SourceSpan,
    },

    #[error("number literal '{literal}' is too large")]
    #[diagnostic(
        code = "lex::number_out_of_range",
        help("the largest finite value is about 1.8e308")
    )]
    NumberOutOfRange {
        literal: String,
        #[label("does not fit in a double")]
        span: SourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum ParseError {
    #[error("unexpected {found}")]
    #[diagnostic(code = "parse::unexpected_token", help("is an operator missing?"))]
    UnexpectedToken {
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("missing operand")]
    #[diagnostic(code = "parse::missing_operand")]
    MissingOperand {
        #[label("expected an operand here")]
        span: SourceSpan,
    },

    #[error("mismatched parentheses: '(' is never closed")]
    #[diagnostic(code = "parse::unclosed_paren")]
    UnclosedParen {
        #[label("this group")]
        span: SourceSpan,
    },

    #[error("mismatched parentheses: ')' has no matching '('")]
    #[diagnostic(code = "parse::unexpected_close_paren")]
    UnexpectedCloseParen {
        #[label("unmatched")]
        span: SourceSpan,
    },

    #[error("expected '(' after function '{function}'")]
    #[diagnostic(code = "parse::expected_open_paren")]
    ExpectedOpenParen {
        function: &'static str,
        #[label("arguments must follow in parentheses")]
        span: SourceSpan,
    },

    #[error("function '{function}' takes {expected} argument(s), but {found} were given")]
    #[diagnostic(code = "parse::arity_mismatch")]
    ArityMismatch {
        function: &'static str,
        expected: usize,
        found: usize,
        #[label("in this call")]
        span: SourceSpan,
    },

    #[error("empty expression")]
    #[diagnostic(code = "parse::empty_expression")]
    EmptyExpression,

    #[error("parentheses are nested more than {limit} levels deep")]
    #[diagnostic(code = "parse::too_deeply_nested")]
    TooDeeplyNested {
        limit: usize,
        #[label("limit exceeded here")]
        span: SourceSpan,
    },

    #[error("expression tree would be more than {limit} levels deep")]
    #[diagnostic(
        code = "parse::tree_too_deep",
        help("each operator in a chain such as 1+1+...+1 adds a level; raise the depth limit or split the chain with parentheses")
    )]
    TreeTooDeep {
        limit: usize,
        #[label("limit exceeded here")]
        span: SourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum EvalError {
    #[error("no value bound for variable '{name}'")]
    #[diagnostic(code = "eval::unbound_variable")]
    UnboundVariable { name: String },

    #[error("{operation} is undefined for {arguments:?}")]
    #[diagnostic(code = "eval::domain_error")]
    Domain {
        operation: String,
        arguments: Vec<f64>,
    },

    #[error("{operation} takes {expected} operand(s), but the tree gives it {found}")]
    #[diagnostic(code = "eval::arity_mismatch")]
    ArityMismatch {
        operation: String,
        expected: usize,
        found: usize,
    },

    #[error("expected at most one free variable, found {}", names.join(", "))]
    #[diagnostic(code = "eval::too_many_variables")]
    TooManyVariables { names: Vec<String> },

    #[error("cannot evaluate an empty equation")]
    #[diagnostic(code = "eval::empty_equation")]
    EmptyEquation,
}
