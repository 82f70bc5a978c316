//! Parser error helpers

use crate::lexer::SpannedToken;
use core_types::ParseError;

/// Create an error listing the alternatives that would have been accepted
pub fn unexpected_token(expected: &[&str], found: &SpannedToken) -> ParseError {
    ParseError::expected(
        expected.iter().map(|e| e.to_string()).collect(),
        found.token.describe(),
        found.position,
    )
}

/// Create an error carrying a structural message
pub fn syntax_error(message: impl Into<String>, found: &SpannedToken) -> ParseError {
    ParseError::message(message, found.token.describe(), found.position)
}
