//! # Depth Order Array Codec
//!
//! Conversion between sequences of [`DepthOrder`] and PostgreSQL's
//! `depth_order[]` column type.
//!
//! # Wire Format (read path)
//!
//! Postgres renders an array of `(price, base_qty)` composites as text like:
//!
//! ```text
//! {"(0.010782342,24)","(0.010765101,11.5)"}
//! ```
//!
//! and an empty array as `{}`. The decoder tokenizes the literal and parses
//! it with the grammar
//!
//! ```text
//! array   := '{' '}' | '{' element (',' element)* '}'
//! element := '"' '(' field ',' field ')' '"'
//! field   := text
//! ```
//!
//! # Write Path
//!
//! Writes never interpolate values into SQL. [`push_array_expr`] appends an
//! `ARRAY[ROW($n, $m)::type, ...]::type[]` constructor to a [`QueryBuilder`],
//! binding every price and quantity as its own positional parameter.

use crate::domain::value_objects::DepthOrder;
use sqlx::{Postgres, QueryBuilder};
use std::fmt;
use std::iter::Peekable;
use std::num::ParseFloatError;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// The two fields of a `depth_order` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthOrderField {
    /// `price`
    Price,
    /// `base_qty`
    BaseQty,
}

impl fmt::Display for DepthOrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => f.write_str("DepthOrder.Price"),
            Self::BaseQty => f.write_str("DepthOrder.BaseQty"),
        }
    }
}

/// Error decoding a `depth_order[]` literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The column value was SQL `NULL`.
    #[error("value is NULL")]
    NullValue,

    /// The literal ended before the array was closed.
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    /// A token appeared where the grammar does not allow it.
    #[error("expected {expected} at byte {position}, found {found}")]
    UnexpectedToken {
        /// What the grammar expected.
        expected: &'static str,
        /// What was found instead.
        found: String,
        /// Byte offset of the offending token.
        position: usize,
    },

    /// Input continued after the closing `}`.
    #[error("unexpected trailing input at byte {0}")]
    TrailingInput(usize),

    /// A record field was empty (SQL `NULL` inside the composite).
    #[error("missing {0} field")]
    MissingField(DepthOrderField),

    /// A record field is not a valid 64-bit float.
    #[error("parse {field} field from {text:?}: {source}")]
    InvalidField {
        /// Which field failed.
        field: DepthOrderField,
        /// The offending text.
        text: String,
        /// Underlying parse error.
        #[source]
        source: ParseFloatError,
    },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    OpenBrace,
    CloseBrace,
    Quote,
    OpenParen,
    CloseParen,
    Comma,
    Text(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenBrace => f.write_str("'{'"),
            Self::CloseBrace => f.write_str("'}'"),
            Self::Quote => f.write_str("'\"'"),
            Self::OpenParen => f.write_str("'('"),
            Self::CloseParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// Splits a literal into punctuation tokens and the text runs between them.
struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn punctuation(c: char) -> Option<Token<'static>> {
        match c {
            '{' => Some(Token::OpenBrace),
            '}' => Some(Token::CloseBrace),
            '"' => Some(Token::Quote),
            '(' => Some(Token::OpenParen),
            ')' => Some(Token::CloseParen),
            ',' => Some(Token::Comma),
            _ => None,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.input.get(self.position..)?;
        let first = rest.chars().next()?;
        let start = self.position;

        if let Some(token) = Self::punctuation(first) {
            self.position += first.len_utf8();
            return Some((start, token));
        }

        // Punctuation is ASCII, so the split point is always a char boundary.
        let len = rest
            .find(|c: char| Self::punctuation(c).is_some())
            .unwrap_or(rest.len());
        self.position += len;
        rest.get(..len).map(|text| (start, Token::Text(text)))
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    tokens: Peekable<Tokenizer<'a>>,
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(input).peekable(),
            end: input.len(),
        }
    }

    fn next_token(&mut self) -> CodecResult<(usize, Token<'a>)> {
        self.tokens.next().ok_or(CodecError::UnexpectedEnd(self.end))
    }

    fn expect(&mut self, expected: Token<'static>) -> CodecResult<()> {
        let (position, token) = self.next_token()?;
        if token == expected {
            Ok(())
        } else {
            Err(unexpected(expected, token, position))
        }
    }

    /// Consumes the next token if it equals `token`.
    fn eat(&mut self, token: Token<'static>) -> bool {
        self.tokens.next_if(|(_, next)| *next == token).is_some()
    }

    fn finish(&mut self) -> CodecResult<()> {
        match self.tokens.next() {
            Some((position, _)) => Err(CodecError::TrailingInput(position)),
            None => Ok(()),
        }
    }

    fn array(&mut self) -> CodecResult<Vec<DepthOrder>> {
        self.expect(Token::OpenBrace)?;

        let mut orders = Vec::new();
        if self.eat(Token::CloseBrace) {
            self.finish()?;
            return Ok(orders);
        }

        loop {
            orders.push(self.element()?);
            match self.next_token()? {
                (_, Token::Comma) => {}
                (_, Token::CloseBrace) => break,
                (position, token) => {
                    return Err(CodecError::UnexpectedToken {
                        expected: "',' or '}'",
                        found: token.to_string(),
                        position,
                    });
                }
            }
        }

        self.finish()?;
        Ok(orders)
    }

    fn element(&mut self) -> CodecResult<DepthOrder> {
        self.expect(Token::Quote)?;
        self.expect(Token::OpenParen)?;
        let price = self.field(DepthOrderField::Price, Token::Comma)?;
        let base_qty = self.field(DepthOrderField::BaseQty, Token::CloseParen)?;
        self.expect(Token::Quote)?;
        Ok(DepthOrder::new(price, base_qty))
    }

    fn field(&mut self, field: DepthOrderField, terminator: Token<'static>) -> CodecResult<f64> {
        match self.next_token()? {
            (_, Token::Text(text)) => {
                let value = text
                    .parse::<f64>()
                    .map_err(|source| CodecError::InvalidField {
                        field,
                        text: text.to_string(),
                        source,
                    })?;
                self.expect(terminator)?;
                Ok(value)
            }
            (_, token) if token == terminator => Err(CodecError::MissingField(field)),
            (position, token) => Err(CodecError::UnexpectedToken {
                expected: "a number",
                found: token.to_string(),
                position,
            }),
        }
    }
}

fn unexpected(expected: Token<'static>, found: Token<'_>, position: usize) -> CodecError {
    let expected = match expected {
        Token::OpenBrace => "'{'",
        Token::CloseBrace => "'}'",
        Token::Quote => "'\"'",
        Token::OpenParen => "'('",
        Token::CloseParen => "')'",
        Token::Comma => "','",
        Token::Text(_) => "text",
    };
    CodecError::UnexpectedToken {
        expected,
        found: found.to_string(),
        position,
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Decodes a `depth_order[]` text literal into depth orders, preserving order.
///
/// # Errors
///
/// Returns a [`CodecError`] if the literal does not follow the array grammar
/// or if a field is not a valid float.
///
/// # Examples
///
/// ```
/// use market_info_storage::domain::value_objects::DepthOrder;
/// use market_info_storage::infrastructure::persistence::codec::decode;
///
/// let orders = decode(r#"{"(0.010782342,24)","(0.010765101,11.5)"}"#).unwrap();
/// assert_eq!(
///     orders,
///     vec![DepthOrder::new(0.010782342, 24.0), DepthOrder::new(0.010765101, 11.5)]
/// );
///
/// assert!(decode("{}").unwrap().is_empty());
/// ```
pub fn decode(literal: &str) -> CodecResult<Vec<DepthOrder>> {
    Parser::new(literal).array()
}

/// Decodes a nullable column value.
///
/// # Errors
///
/// Returns [`CodecError::NullValue`] for `None`, otherwise as [`decode`].
pub fn decode_column(value: Option<&str>) -> CodecResult<Vec<DepthOrder>> {
    value.map_or(Err(CodecError::NullValue), decode)
}

/// Renders depth orders as the text literal Postgres produces for them.
///
/// [`decode`] reverses this exactly.
#[must_use]
pub fn encode_literal(orders: &[DepthOrder]) -> String {
    let elements: Vec<String> = orders
        .iter()
        .map(|order| format!("\"({},{})\"", order.price, order.base_qty))
        .collect();
    format!("{{{}}}", elements.join(","))
}

/// Appends a parameterized `type_name[]` array constructor for `orders`.
///
/// Each order becomes `ROW($n, $n+1)::type_name` with price and base
/// quantity bound as separate parameters. The trailing cast keeps the
/// expression typed when `orders` is empty.
pub fn push_array_expr<'args>(
    builder: &mut QueryBuilder<'args, Postgres>,
    type_name: &str,
    orders: &[DepthOrder],
) {
    builder.push("ARRAY[");
    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder
            .push("ROW(")
            .push_bind(order.price)
            .push(", ")
            .push_bind(order.base_qty)
            .push(")::")
            .push(type_name);
    }
    builder.push("]::").push(type_name).push("[]");
}
