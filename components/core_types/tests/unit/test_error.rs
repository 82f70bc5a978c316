//! Unit tests for LexError, ParseError and DrakeError

use core_types::{DrakeError, ErrorKind, LexError, LexErrorKind, ParseError, SourcePosition};

#[cfg(test)]
mod lex_error_tests {
    use super::*;

    #[test]
    fn test_unexpected_character_is_reported() {
        let err = LexError::new(
            LexErrorKind::UnexpectedCharacter('$'),
            SourcePosition::new(1, 3, 2),
        );
        assert_eq!(err.unexpected_character(), Some('$'));
        assert_eq!(err.to_string(), "unexpected character '$' at 1:3");
    }

    #[test]
    fn test_invalid_digit_names_base() {
        let err = LexError::new(
            LexErrorKind::InvalidDigit {
                digit: '2',
                base: "binary",
            },
            SourcePosition::new(1, 4, 3),
        );
        assert_eq!(err.unexpected_character(), Some('2'));
        assert!(err.to_string().contains("binary"));
    }

    #[test]
    fn test_unterminated_string_has_no_character() {
        let err = LexError::new(LexErrorKind::UnterminatedString, SourcePosition::START);
        assert_eq!(err.unexpected_character(), None);
    }
}

#[cfg(test)]
mod parse_error_tests {
    use super::*;

    #[test]
    fn test_single_expectation() {
        let err = ParseError::expected(
            vec!["'then'".to_string()],
            "integer '1'",
            SourcePosition::new(1, 6, 5),
        );
        assert_eq!(err.to_string(), "expected 'then', found integer '1' at 1:6");
    }

    #[test]
    fn test_no_expectation() {
        let err = ParseError::expected(vec![], "')'", SourcePosition::new(2, 1, 10));
        assert_eq!(err.to_string(), "unexpected ')' at 2:1");
    }

    #[test]
    fn test_message_keeps_found_token() {
        let err = ParseError::message("try requires catch or finally", "newline", SourcePosition::START);
        assert_eq!(err.found, "newline");
        assert!(err.expected.is_empty());
    }

    #[test]
    fn test_summary_omits_position() {
        let err = ParseError::expected(
            vec!["')'".to_string(), "','".to_string()],
            "newline",
            SourcePosition::new(3, 1, 12),
        );
        assert_eq!(err.summary(), "expected ')' or ',', found newline");
    }
}

#[cfg(test)]
mod drake_error_tests {
    use super::*;

    #[test]
    fn test_from_lex_error() {
        let err: DrakeError =
            LexError::new(LexErrorKind::UnterminatedComment, SourcePosition::START).into();
        assert!(matches!(err, DrakeError::Lex(_)));
        assert_eq!(err.kind(), ErrorKind::LexError);
    }

    #[test]
    fn test_from_parse_error() {
        let position = SourcePosition::new(5, 2, 44);
        let err: DrakeError =
            ParseError::expected(vec!["expression".to_string()], "end of input", position).into();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.position(), position);
        assert!(err.to_string().starts_with("parse error: "));
    }
}
