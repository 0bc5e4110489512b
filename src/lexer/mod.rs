pub(crate) mod numbers;

use log::{debug, trace};
use miette::NamedSource;

use crate::error::LexError;
use crate::function::{self, Function};
use crate::operator::Operator;
use crate::token::{Span, Token, TokenKind};

/// Splits an expression into tokens.
///
/// Two pieces of state ride along with the scan. `prev_was_operator` is set at the start of the
/// input and after operators, `(` and `,`; a `+` or `-` seen while it is set is a prefix operator.
/// `prev_ended_operand` is set after numbers, variables and `)`; when an operand-starting token
/// follows one of those, a zero-width `*` is emitted in between.
pub struct Lexer<'source> {
    source: &'source str,
    position: usize,
    peeked: Option<Token<'source>>,
    pending: Option<Token<'source>>,
    prev_was_operator: bool,
    prev_ended_operand: bool,
    implicit_multiplication: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            peeked: None,
            pending: None,
            prev_was_operator: true,
            prev_ended_operand: false,
            implicit_multiplication: true,
        }
    }

    pub fn with_implicit_multiplication(mut self, enabled: bool) -> Self {
        self.implicit_multiplication = enabled;
        self
    }

    /// Consumes the lexer, returning every token or the first error.
    pub fn tokenize(self) -> Result<Vec<Token<'source>>, LexError> {
        self.collect()
    }

    pub fn get_source_code(&self) -> NamedSource<String> {
        NamedSource::new("<expression>", self.source.to_string())
    }

    /// The end of the input, where "unexpected end" errors point.
    pub fn end_span(&self) -> Span {
        Span::at(self.source.len())
    }

    pub fn peek(&mut self) -> Result<Option<&Token<'source>>, LexError> {
        if self.peeked.is_none() {
            self.peeked = self.next().transpose()?;
        }

        Ok(self.peeked.as_ref())
    }

    fn record(&mut self, kind: &TokenKind) {
        self.prev_was_operator = matches!(
            kind,
            TokenKind::Operator(_) | TokenKind::OpenParen | TokenKind::Comma
        );
        self.prev_ended_operand = kind.ends_operand();
    }

    fn scan(&mut self) -> Option<Result<Token<'source>, LexError>> {
        let bytes = self.source.as_bytes();
        while bytes.get(self.position)?.is_ascii_whitespace() {
            self.position += 1;
        }

        let start = self.position;
        let c = bytes[start];

        let kind = match c {
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b',' => TokenKind::Comma,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'^' => {
                let unary = matches!(c, b'+' | b'-') && self.prev_was_operator;
                match Operator::from_symbol(c as char, unary) {
                    Some(op) => TokenKind::Operator(op),
                    None => unreachable!("no operator for symbol {}", c as char),
                }
            }
            b'0'..=b'9' | b'.' => return Some(self.scan_number(start)),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => return Some(Ok(self.scan_ident(start))),
            _ => {
                let character = self.source[start..].chars().next()?;
                self.position += character.len_utf8();
                return Some(Err(LexError::UnexpectedCharacter {
                    character,
                    span: Span::new(start, self.position).into(),
                }));
            }
        };

        self.position += 1;
        Some(Ok(Token {
            kind,
            span: Span::new(start, self.position),
        }))
    }

    fn scan_number(&mut self, start: usize) -> Result<Token<'source>, LexError> {
        let numbers::ParsedNumber { value, literal_len } =
            numbers::parse_number(&self.source.as_bytes()[start..]).map_err(|e| {
                let span = Span::new(start + e.span.start, start + e.span.end).into();
                match e.kind {
                    numbers::NumberErrorKind::Malformed => LexError::MalformedNumber {
                        literal: e.literal,
                        span,
                    },
                    numbers::NumberErrorKind::OutOfRange => LexError::NumberOutOfRange {
                        literal: e.literal,
                        span,
                    },
                }
            })?;

        self.position = start + literal_len;

        Ok(Token {
            kind: TokenKind::Number(value),
            span: Span::new(start, self.position),
        })
    }

    fn scan_ident(&mut self, start: usize) -> Token<'source> {
        let bytes = self.source.as_bytes();
        let mut end = start;
        while matches!(
            bytes.get(end),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            end += 1;
        }
        self.position = end;

        let ident = &self.source[start..end];
        let kind = if let Some(function) = Function::from_name(ident) {
            TokenKind::Function(function)
        } else if let Some(value) = function::constant(ident) {
            TokenKind::Constant(value)
        } else {
            TokenKind::Variable(ident)
        };

        Token {
            kind,
            span: Span::new(start, end),
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Token<'source>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(peeked) = self.peeked.take() {
            return Some(Ok(peeked));
        }

        if let Some(pending) = self.pending.take() {
            self.record(&pending.kind);
            trace!("token {:?} at {:?}", pending.kind, pending.span);
            return Some(Ok(pending));
        }

        let token = match self.scan()? {
            Ok(token) => token,
            Err(e) => return Some(Err(e)),
        };

        if self.implicit_multiplication
            && self.prev_ended_operand
            && token.kind.starts_implicit_operand()
        {
            let synthetic = Token {
                kind: TokenKind::Operator(Operator::Mul),
                span: Span::at(token.span.start),
            };
            debug!("implicit multiplication before {:?}", token.kind);
            self.record(&synthetic.kind);
            self.pending = Some(token);
            return Some(Ok(synthetic));
        }

        self.record(&token.kind);
        trace!("token {:?} at {:?}", token.kind, token.span);
        Some(Ok(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(input)
            .tokenize()
            .unwrap_or_else(|e| panic!("failed to lex '{input}': {e}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn op(op: Operator) -> TokenKind<'static> {
        TokenKind::Operator(op)
    }

    fn num(n: f64) -> TokenKind<'static> {
        TokenKind::Number(n)
    }

    #[test]
    fn unary_and_binary_minus() {
        assert_eq!(
            kinds("-3+5"),
            vec![op(Operator::Neg), num(3.0), op(Operator::Add), num(5.0)]
        );
        assert_eq!(
            kinds("3--5"),
            vec![num(3.0), op(Operator::Sub), op(Operator::Neg), num(5.0)]
        );
        assert_eq!(
            kinds("(+2)"),
            vec![
                TokenKind::OpenParen,
                op(Operator::Pos),
                num(2.0),
                TokenKind::CloseParen
            ]
        );
        assert_eq!(
            kinds("max(1,-2)"),
            vec![
                TokenKind::Function(Function::Max),
                TokenKind::OpenParen,
                num(1.0),
                TokenKind::Comma,
                op(Operator::Neg),
                num(2.0),
                TokenKind::CloseParen
            ]
        );
        // A function name does not put a following '-' in prefix position
        assert_eq!(
            kinds("sin-1"),
            vec![TokenKind::Function(Function::Sin), op(Operator::Sub), num(1.0)]
        );
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(
            kinds("2x"),
            vec![num(2.0), op(Operator::Mul), TokenKind::Variable("x")]
        );
        assert_eq!(
            kinds("(1)(2)"),
            vec![
                TokenKind::OpenParen,
                num(1.0),
                TokenKind::CloseParen,
                op(Operator::Mul),
                TokenKind::OpenParen,
                num(2.0),
                TokenKind::CloseParen
            ]
        );
        assert_eq!(
            kinds("x sin(x)"),
            vec![
                TokenKind::Variable("x"),
                op(Operator::Mul),
                TokenKind::Function(Function::Sin),
                TokenKind::OpenParen,
                TokenKind::Variable("x"),
                TokenKind::CloseParen
            ]
        );

        assert_eq!(
            kinds("2pi"),
            vec![
                num(2.0),
                op(Operator::Mul),
                TokenKind::Constant(std::f64::consts::PI)
            ]
        );
        // Literal numbers never start an implicit product
        assert_eq!(kinds("2 3"), vec![num(2.0), num(3.0)]);
        assert_eq!(
            kinds("(1)2"),
            vec![
                TokenKind::OpenParen,
                num(1.0),
                TokenKind::CloseParen,
                num(2.0)
            ]
        );

        // Never after a prefix operator
        assert_eq!(kinds("-x"), vec![op(Operator::Neg), TokenKind::Variable("x")]);
        // Identifiers swallow their digits
        assert_eq!(kinds("x2"), vec![TokenKind::Variable("x2")]);
    }

    #[test]
    fn implicit_multiplication_is_zero_width() {
        let tokens = Lexer::new("3 (x)").tokenize().unwrap();
        assert_eq!(tokens[1].kind, op(Operator::Mul));
        assert_eq!(tokens[1].span, Span::at(2));
        assert_eq!(tokens[2].span, Span::new(2, 3));
    }

    #[test]
    fn implicit_multiplication_disabled() {
        let tokens: Vec<_> = Lexer::new("2x")
            .with_implicit_multiplication(false)
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(tokens, vec![num(2.0), TokenKind::Variable("x")]);
    }

    #[test]
    fn identifiers() {
        assert_eq!(
            kinds("rate_1 * sqrt(x)"),
            vec![
                TokenKind::Variable("rate_1"),
                op(Operator::Mul),
                TokenKind::Function(Function::Sqrt),
                TokenKind::OpenParen,
                TokenKind::Variable("x"),
                TokenKind::CloseParen
            ]
        );
    }

    #[test]
    fn unexpected_character() {
        for (input, character, span) in [("2 & 3", '&', (2usize, 1usize)), ("1 + é", 'é', (4, 2))] {
            let err = Lexer::new(input).tokenize().unwrap_err();
            assert_eq!(
                err,
                LexError::UnexpectedCharacter {
                    character,
                    span: span.into()
                }
            );
        }
    }

    #[test]
    fn malformed_number() {
        let err = Lexer::new("1 + 1.2.3").tokenize().unwrap_err();
        assert_eq!(
            err,
            LexError::MalformedNumber {
                literal: "1.2.3".to_string(),
                span: (4usize, 5usize).into()
            }
        );
    }

    #[test]
    fn number_out_of_range() {
        let err = Lexer::new("x - 1e400").tokenize().unwrap_err();
        assert_eq!(
            err,
            LexError::NumberOutOfRange {
                literal: "1e400".to_string(),
                span: (4usize, 5usize).into()
            }
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("1 + 2");
        assert_eq!(lexer.peek().unwrap().map(|t| &t.kind), Some(&num(1.0)));
        assert_eq!(lexer.next().unwrap().unwrap().kind, num(1.0));
        assert_eq!(lexer.next().unwrap().unwrap().kind, op(Operator::Add));
    }

    #[test]
    fn empty_input() {
        assert!(Lexer::new("").next().is_none());
        assert!(Lexer::new("   ").next().is_none());
    }
}
