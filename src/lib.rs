pub mod bindings;
pub mod config;
pub mod equation;
pub mod error;
pub mod function;
pub mod lexer;
pub mod node;
pub mod operator;
pub mod parser;
pub mod token;

pub use crate::{
    bindings::Bindings,
    config::ParserConfig,
    equation::Equation,
    error::{Error, EvalError, LexError, ParseError, Result},
    node::{MathNode, TreeEntry},
};
