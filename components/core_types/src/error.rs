//! Drake front-end error types.
//!
//! There are exactly two error kinds: [`LexError`] for malformed character
//! sequences and [`ParseError`] for token streams that match no grammar
//! alternative. Both are terminal to the current parse; [`DrakeError`] wraps
//! either for callers that drive the whole pipeline.

use crate::SourcePosition;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of error, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed character sequence
    LexError,
    /// Token stream does not match the grammar
    ParseError,
}

/// What exactly went wrong while lexing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum LexErrorKind {
    /// A character that cannot start any token
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// A string literal without its closing quote on the same line
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A `/*` comment without its closing `*/`
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A digit (or identifier character) not valid for the literal's base
    #[error("invalid digit '{digit}' in {base} literal")]
    InvalidDigit {
        /// The offending character
        digit: char,
        /// Human-readable base name
        base: &'static str,
    },
    /// A base prefix (`0b`, `0o`, `0x`) not followed by any digit
    #[error("{base} literal has no digits")]
    MissingDigits {
        /// Human-readable base name
        base: &'static str,
    },
    /// A `_` separator at the end of a literal or next to another `_`
    #[error("digit separator '_' must sit between two digits")]
    MisplacedSeparator,
    /// An exponent marker with no digits after it
    #[error("exponent has no digits")]
    MissingExponent,
}

/// Malformed character sequence in the source text.
///
/// # Examples
///
/// ```
/// use core_types::{LexError, LexErrorKind, SourcePosition};
///
/// let err = LexError::new(LexErrorKind::UnterminatedString, SourcePosition::new(1, 5, 4));
/// assert_eq!(err.to_string(), "unterminated string literal at 1:5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at {position}")]
pub struct LexError {
    /// What went wrong
    pub kind: LexErrorKind,
    /// Position of the offending character (the opening quote for strings)
    pub position: SourcePosition,
}

impl LexError {
    /// Create a lex error
    pub fn new(kind: LexErrorKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    /// The character that could not be lexed, when there is one
    pub fn unexpected_character(&self) -> Option<char> {
        match self.kind {
            LexErrorKind::UnexpectedCharacter(ch) => Some(ch),
            LexErrorKind::InvalidDigit { digit, .. } => Some(digit),
            _ => None,
        }
    }
}

/// Token stream that does not match any grammar alternative.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub struct ParseError {
    /// Position of the token that could not be consumed
    pub position: SourcePosition,
    /// Descriptions of what would have been accepted
    pub expected: Vec<String>,
    /// Description of the token that was found
    pub found: String,
    /// Structural message that replaces the expected/found wording
    pub message: Option<String>,
}

impl ParseError {
    /// Create an error listing what was expected
    pub fn expected(
        expected: Vec<String>,
        found: impl Into<String>,
        position: SourcePosition,
    ) -> Self {
        Self {
            position,
            expected,
            found: found.into(),
            message: None,
        }
    }

    /// Create an error carrying a structural message
    pub fn message(
        message: impl Into<String>,
        found: impl Into<String>,
        position: SourcePosition,
    ) -> Self {
        Self {
            position,
            expected: vec![],
            found: found.into(),
            message: Some(message.into()),
        }
    }

    /// The error wording without its position
    pub fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match self.expected.as_slice() {
            [] => format!("unexpected {}", self.found),
            [only] => format!("expected {}, found {}", only, self.found),
            [init @ .., last] => format!(
                "expected {} or {}, found {}",
                init.join(", "),
                last,
                self.found
            ),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.summary(), self.position)
    }
}

/// Any error produced by the Drake front end.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum DrakeError {
    /// Lexing failed
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    /// Parsing failed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl DrakeError {
    /// The kind of the wrapped error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DrakeError::Lex(_) => ErrorKind::LexError,
            DrakeError::Parse(_) => ErrorKind::ParseError,
        }
    }

    /// The error wording without its position
    pub fn summary(&self) -> String {
        match self {
            DrakeError::Lex(e) => e.kind.to_string(),
            DrakeError::Parse(e) => e.summary(),
        }
    }

    /// Where the error occurred
    pub fn position(&self) -> SourcePosition {
        match self {
            DrakeError::Lex(e) => e.position,
            DrakeError::Parse(e) => e.position,
        }
    }
}

/// Result type for the Drake front end
pub type DrakeResult<T> = Result<T, DrakeError>;
