//! Drake lexer - tokenizes source text into spanned tokens

use core_types::{LexError, LexErrorKind, SourcePosition};
use log::trace;
use num_bigint::BigInt;
use num_traits::Num;
use serde::Serialize;
use std::fmt;

/// Drake keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    /// and keyword
    And,
    /// as keyword
    As,
    /// break keyword
    Break,
    /// case keyword
    Case,
    /// catch keyword
    Catch,
    /// const keyword
    Const,
    /// continue keyword
    Continue,
    /// do keyword
    Do,
    /// else keyword
    Else,
    /// enum keyword
    Enum,
    /// exception keyword
    Exception,
    /// false keyword
    False,
    /// finally keyword
    Finally,
    /// flags keyword
    Flags,
    /// for keyword
    For,
    /// from keyword
    From,
    /// if keyword
    If,
    /// in keyword
    In,
    /// is keyword
    Is,
    /// iter keyword
    Iter,
    /// module keyword
    Module,
    /// mutable keyword
    Mutable,
    /// none keyword
    None,
    /// nonlocal keyword
    Nonlocal,
    /// not keyword
    Not,
    /// object keyword
    Object,
    /// or keyword
    Or,
    /// pass keyword
    Pass,
    /// return keyword
    Return,
    /// then keyword
    Then,
    /// throw keyword
    Throw,
    /// true keyword
    True,
    /// try keyword
    Try,
    /// while keyword
    While,
    /// xor keyword
    Xor,
    /// yield keyword
    Yield,
}

impl Keyword {
    /// Look up a word in the keyword set
    pub fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "and" => Keyword::And,
            "as" => Keyword::As,
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "enum" => Keyword::Enum,
            "exception" => Keyword::Exception,
            "false" => Keyword::False,
            "finally" => Keyword::Finally,
            "flags" => Keyword::Flags,
            "for" => Keyword::For,
            "from" => Keyword::From,
            "if" => Keyword::If,
            "in" => Keyword::In,
            "is" => Keyword::Is,
            "iter" => Keyword::Iter,
            "module" => Keyword::Module,
            "mutable" => Keyword::Mutable,
            "none" => Keyword::None,
            "nonlocal" => Keyword::Nonlocal,
            "not" => Keyword::Not,
            "object" => Keyword::Object,
            "or" => Keyword::Or,
            "pass" => Keyword::Pass,
            "return" => Keyword::Return,
            "then" => Keyword::Then,
            "throw" => Keyword::Throw,
            "true" => Keyword::True,
            "try" => Keyword::Try,
            "while" => Keyword::While,
            "xor" => Keyword::Xor,
            "yield" => Keyword::Yield,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling of the keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::And => "and",
            Keyword::As => "as",
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Catch => "catch",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Do => "do",
            Keyword::Else => "else",
            Keyword::Enum => "enum",
            Keyword::Exception => "exception",
            Keyword::False => "false",
            Keyword::Finally => "finally",
            Keyword::Flags => "flags",
            Keyword::For => "for",
            Keyword::From => "from",
            Keyword::If => "if",
            Keyword::In => "in",
            Keyword::Is => "is",
            Keyword::Iter => "iter",
            Keyword::Module => "module",
            Keyword::Mutable => "mutable",
            Keyword::None => "none",
            Keyword::Nonlocal => "nonlocal",
            Keyword::Not => "not",
            Keyword::Object => "object",
            Keyword::Or => "or",
            Keyword::Pass => "pass",
            Keyword::Return => "return",
            Keyword::Then => "then",
            Keyword::Throw => "throw",
            Keyword::True => "true",
            Keyword::Try => "try",
            Keyword::While => "while",
            Keyword::Xor => "xor",
            Keyword::Yield => "yield",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drake punctuators (operators and delimiters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Comma
    Comma,
    /// Colon
    Colon,
    /// Dot
    Dot,
    /// Range operator
    DotDot,
    /// Lambda arrow
    Arrow,
    /// Assignment
    Assign,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Multiply
    Star,
    /// Divide
    Slash,
    /// Modulo
    Percent,
    /// Exponentiation
    StarStar,
    /// Bitwise AND
    And,
    /// Bitwise OR
    Or,
    /// Bitwise XOR
    Xor,
    /// Left shift
    LtLt,
    /// Right shift
    GtGt,
    /// Bitwise NOT
    Not,
    /// Equality
    EqEq,
    /// Inequality
    NotEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Plus equals
    PlusEq,
    /// Minus equals
    MinusEq,
    /// Multiply equals
    StarEq,
    /// Divide equals
    SlashEq,
    /// Modulo equals
    PercentEq,
    /// Exponentiation equals
    StarStarEq,
    /// Bitwise AND equals
    AndEq,
    /// Bitwise OR equals
    OrEq,
    /// Bitwise XOR equals
    XorEq,
    /// Left shift equals
    LtLtEq,
    /// Right shift equals
    GtGtEq,
}

impl Punctuator {
    /// Source spelling of the punctuator
    pub fn as_str(self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::Comma => ",",
            Punctuator::Colon => ":",
            Punctuator::Dot => ".",
            Punctuator::DotDot => "..",
            Punctuator::Arrow => "->",
            Punctuator::Assign => "=",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::StarStar => "**",
            Punctuator::And => "&",
            Punctuator::Or => "|",
            Punctuator::Xor => "^",
            Punctuator::LtLt => "<<",
            Punctuator::GtGt => ">>",
            Punctuator::Not => "!",
            Punctuator::EqEq => "==",
            Punctuator::NotEq => "!=",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
            Punctuator::StarEq => "*=",
            Punctuator::SlashEq => "/=",
            Punctuator::PercentEq => "%=",
            Punctuator::StarStarEq => "**=",
            Punctuator::AndEq => "&=",
            Punctuator::OrEq => "|=",
            Punctuator::XorEq => "^=",
            Punctuator::LtLtEq => "<<=",
            Punctuator::GtGtEq => ">>=",
        }
    }
}

impl fmt::Display for Punctuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Radix a number literal was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumberBase {
    /// `0b` prefix
    Binary,
    /// `0o` prefix
    Octal,
    /// `0x` prefix
    Hexadecimal,
    /// No prefix
    Decimal,
}

impl NumberBase {
    /// Numeric radix
    pub fn radix(self) -> u32 {
        match self {
            NumberBase::Binary => 2,
            NumberBase::Octal => 8,
            NumberBase::Hexadecimal => 16,
            NumberBase::Decimal => 10,
        }
    }

    /// Human-readable name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            NumberBase::Binary => "binary",
            NumberBase::Octal => "octal",
            NumberBase::Hexadecimal => "hexadecimal",
            NumberBase::Decimal => "decimal",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            NumberBase::Binary => "0b",
            NumberBase::Octal => "0o",
            NumberBase::Hexadecimal => "0x",
            NumberBase::Decimal => "",
        }
    }

    fn accepts(self, ch: char) -> bool {
        ch.is_digit(self.radix())
    }
}

/// A number literal as written in the source.
///
/// `text` holds the digits without prefix or `_` separators. Decimal literals
/// keep their fraction, exponent and imaginary suffix verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NumberLiteral {
    /// Digit text
    pub text: String,
    /// Radix of the literal
    pub base: NumberBase,
}

impl NumberLiteral {
    /// Create a number literal
    pub fn new(text: impl Into<String>, base: NumberBase) -> Self {
        Self {
            text: text.into(),
            base,
        }
    }

    /// Whether the literal denotes an integer (no fraction, exponent or `j`)
    pub fn is_integer(&self) -> bool {
        self.base != NumberBase::Decimal || self.text.chars().all(|c| c.is_ascii_digit())
    }

    /// Integer value of the literal in its declared base.
    ///
    /// Returns `None` for decimal literals with a fraction, an exponent or
    /// an imaginary suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use drake_parser::{NumberBase, NumberLiteral};
    /// use num_bigint::BigInt;
    ///
    /// let hex = NumberLiteral::new("ff", NumberBase::Hexadecimal);
    /// assert_eq!(hex.to_integer(), Some(BigInt::from(255)));
    ///
    /// let float = NumberLiteral::new("1.5", NumberBase::Decimal);
    /// assert_eq!(float.to_integer(), None);
    /// ```
    pub fn to_integer(&self) -> Option<BigInt> {
        if !self.is_integer() {
            return None;
        }
        BigInt::from_str_radix(&self.text, self.base.radix()).ok()
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base.prefix(), self.text)
    }
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    /// Identifier
    Identifier(String),
    /// Keyword
    Keyword(Keyword),
    /// String literal with escapes decoded
    String(String),
    /// Number literal
    Number(NumberLiteral),
    /// Punctuator/operator
    Punctuator(Punctuator),
    /// One or more line breaks
    Newline,
    /// End of file
    EOF,
}

impl Token {
    /// Short description used in parse diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Keyword(keyword) => format!("keyword '{}'", keyword),
            Token::String(value) => format!("string {:?}", value),
            Token::Number(number) => format!("number '{}'", number),
            Token::Punctuator(punct) => format!("'{}'", punct),
            Token::Newline => "newline".to_string(),
            Token::EOF => "end of input".to_string(),
        }
    }
}

/// A token together with the position of its first character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpannedToken {
    /// The token
    pub token: Token,
    /// Where the token starts
    pub position: SourcePosition,
}

impl SpannedToken {
    /// Pair a token with its position
    pub fn new(token: Token, position: SourcePosition) -> Self {
        Self { token, position }
    }
}

/// Lexer for Drake source code
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    position: usize,
    offset: usize,
    line: u32,
    column: u32,
    current_token: Option<SpannedToken>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            current_token: None,
        }
    }

    /// The source text being lexed
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        if let Some(token) = self.current_token.take() {
            return Ok(token);
        }
        self.scan_token()
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&mut self) -> Result<&SpannedToken, LexError> {
        let token = match self.current_token.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        Ok(self.current_token.insert(token))
    }

    /// Lex the whole source, ending with exactly one EOF token
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token == Token::EOF;
            tokens.push(token);
            if done {
                break;
            }
        }
        trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    fn scan_token(&mut self) -> Result<SpannedToken, LexError> {
        if let Some(newline_pos) = self.skip_whitespace_and_comments()? {
            return Ok(SpannedToken::new(Token::Newline, newline_pos));
        }

        let start_pos = self.current_position();
        if self.is_at_end() {
            return Ok(SpannedToken::new(Token::EOF, start_pos));
        }

        let ch = self.advance();
        let token = match ch {
            '(' => Token::Punctuator(Punctuator::LParen),
            ')' => Token::Punctuator(Punctuator::RParen),
            '[' => Token::Punctuator(Punctuator::LBracket),
            ']' => Token::Punctuator(Punctuator::RBracket),
            '{' => Token::Punctuator(Punctuator::LBrace),
            '}' => Token::Punctuator(Punctuator::RBrace),
            ',' => Token::Punctuator(Punctuator::Comma),
            ':' => Token::Punctuator(Punctuator::Colon),

            '.' => {
                if self.match_char('.') {
                    Token::Punctuator(Punctuator::DotDot)
                } else {
                    Token::Punctuator(Punctuator::Dot)
                }
            }

            '-' => {
                if self.match_char('>') {
                    Token::Punctuator(Punctuator::Arrow)
                } else {
                    self.with_eq(Punctuator::Minus, Punctuator::MinusEq)
                }
            }

            '*' => {
                if self.match_char('*') {
                    self.with_eq(Punctuator::StarStar, Punctuator::StarStarEq)
                } else {
                    self.with_eq(Punctuator::Star, Punctuator::StarEq)
                }
            }

            '<' => {
                if self.match_char('<') {
                    self.with_eq(Punctuator::LtLt, Punctuator::LtLtEq)
                } else {
                    self.with_eq(Punctuator::Lt, Punctuator::LtEq)
                }
            }

            '>' => {
                if self.match_char('>') {
                    self.with_eq(Punctuator::GtGt, Punctuator::GtGtEq)
                } else {
                    self.with_eq(Punctuator::Gt, Punctuator::GtEq)
                }
            }

            '+' => self.with_eq(Punctuator::Plus, Punctuator::PlusEq),
            '/' => self.with_eq(Punctuator::Slash, Punctuator::SlashEq),
            '%' => self.with_eq(Punctuator::Percent, Punctuator::PercentEq),
            '&' => self.with_eq(Punctuator::And, Punctuator::AndEq),
            '|' => self.with_eq(Punctuator::Or, Punctuator::OrEq),
            '^' => self.with_eq(Punctuator::Xor, Punctuator::XorEq),
            '=' => self.with_eq(Punctuator::Assign, Punctuator::EqEq),
            '!' => self.with_eq(Punctuator::Not, Punctuator::NotEq),

            '"' | '\'' => self.scan_string(ch, start_pos)?,

            c if c.is_ascii_digit() => self.scan_number(c, start_pos)?,

            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(c),

            c => {
                return Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    start_pos,
                ))
            }
        };

        Ok(SpannedToken::new(token, start_pos))
    }

    /// Pick the `=`-suffixed form of a punctuator when a `=` follows
    fn with_eq(&mut self, plain: Punctuator, assigned: Punctuator) -> Token {
        if self.match_char('=') {
            Token::Punctuator(assigned)
        } else {
            Token::Punctuator(plain)
        }
    }

    fn scan_string(&mut self, quote: char, start_pos: SourcePosition) -> Result<Token, LexError> {
        let unterminated = || LexError::new(LexErrorKind::UnterminatedString, start_pos);
        let mut value = String::new();

        loop {
            if self.is_at_end() || is_line_break(self.peek()) {
                return Err(unterminated());
            }
            let ch = self.advance();
            if ch == quote {
                break;
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            if self.is_at_end() || is_line_break(self.peek()) {
                return Err(unterminated());
            }
            let escaped = self.advance();
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '0' => value.push('\0'),
                _ => value.push(escaped),
            }
        }

        Ok(Token::String(value))
    }

    fn scan_number(&mut self, first: char, start_pos: SourcePosition) -> Result<Token, LexError> {
        if first == '0' {
            let base = match self.peek() {
                'b' => Some(NumberBase::Binary),
                'o' => Some(NumberBase::Octal),
                'x' => Some(NumberBase::Hexadecimal),
                _ => None,
            };
            if let Some(base) = base {
                self.advance();
                let mut digits = String::new();
                // A separator may directly follow the prefix: 0x_ff
                self.scan_digit_run(base, &mut digits, true)?;
                if digits.is_empty() {
                    if self.peek().is_ascii_alphanumeric() {
                        return Err(self.invalid_digit(base));
                    }
                    return Err(LexError::new(
                        LexErrorKind::MissingDigits { base: base.name() },
                        start_pos,
                    ));
                }
                self.reject_glued(base)?;
                return Ok(Token::Number(NumberLiteral::new(digits, base)));
            }
        }

        let base = NumberBase::Decimal;
        let mut text = String::new();
        text.push(first);
        self.scan_digit_run(base, &mut text, true)?;

        // Fraction only when a digit follows the dot, so 1..5 stays a range
        if self.peek() == '.' && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            text.push(self.advance());
            self.scan_digit_run(base, &mut text, false)?;
        }

        if matches!(self.peek(), 'e' | 'E') {
            text.push(self.advance());
            if matches!(self.peek(), '+' | '-') {
                text.push(self.advance());
            }
            if !self.peek().is_ascii_digit() || self.is_at_end() {
                return Err(LexError::new(
                    LexErrorKind::MissingExponent,
                    self.current_position(),
                ));
            }
            self.scan_digit_run(base, &mut text, false)?;
        }

        if matches!(self.peek(), 'j' | 'J') {
            text.push(self.advance());
        }

        self.reject_glued(base)?;
        Ok(Token::Number(NumberLiteral::new(text, base)))
    }

    /// Consume digits of `base` with single `_` separators between them
    fn scan_digit_run(
        &mut self,
        base: NumberBase,
        text: &mut String,
        mut after_digit: bool,
    ) -> Result<(), LexError> {
        while !self.is_at_end() {
            let ch = self.peek();
            if base.accepts(ch) {
                text.push(self.advance());
                after_digit = true;
            } else if ch == '_' {
                let next_is_digit = self.peek_next().map_or(false, |c| base.accepts(c));
                if !after_digit || !next_is_digit {
                    return Err(LexError::new(
                        LexErrorKind::MisplacedSeparator,
                        self.current_position(),
                    ));
                }
                self.advance();
                after_digit = false;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn reject_glued(&self, base: NumberBase) -> Result<(), LexError> {
        if !self.is_at_end() && (self.peek().is_alphanumeric() || self.peek() == '_') {
            return Err(self.invalid_digit(base));
        }
        Ok(())
    }

    fn invalid_digit(&self, base: NumberBase) -> LexError {
        LexError::new(
            LexErrorKind::InvalidDigit {
                digit: self.peek(),
                base: base.name(),
            },
            self.current_position(),
        )
    }

    fn scan_identifier(&mut self, first: char) -> Token {
        let mut name = String::new();
        name.push(first);
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_') {
            name.push(self.advance());
        }
        match Keyword::lookup(&name) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(name),
        }
    }

    /// Skip whitespace and comments.
    ///
    /// Returns the position of the first line break crossed, if any. Every
    /// run of blank lines and comments collapses into that one break.
    fn skip_whitespace_and_comments(&mut self) -> Result<Option<SourcePosition>, LexError> {
        let mut first_break = None;
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\u{000B}' | '\u{000C}' => {
                    self.advance();
                }
                '\n' | '\r' => {
                    first_break.get_or_insert(self.current_position());
                    self.consume_line_break();
                }
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && !is_line_break(self.peek()) {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => {
                    let comment_start = self.current_position();
                    self.advance(); // /
                    self.advance(); // *
                    loop {
                        if self.is_at_end() {
                            return Err(LexError::new(
                                LexErrorKind::UnterminatedComment,
                                comment_start,
                            ));
                        }
                        if self.peek() == '*' && self.peek_next() == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        if is_line_break(self.peek()) {
                            first_break.get_or_insert(self.current_position());
                            self.consume_line_break();
                        } else {
                            self.advance();
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(first_break)
    }

    /// Consume `\n`, `\r\n` or `\r` as a single line break
    fn consume_line_break(&mut self) {
        if self.advance() == '\r' && self.peek() == '\n' {
            self.advance();
        }
        self.line += 1;
        self.column = 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.position]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.position];
        self.position += 1;
        self.offset += ch.len_utf8();
        self.column += 1;
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.position] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Tokenize a whole source text.
///
/// Fails on the first malformed character sequence; the returned vector
/// always ends with exactly one [`Token::EOF`].
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn lex_error(source: &str) -> LexError {
        tokenize(source).unwrap_err()
    }

    #[test]
    fn test_lexer_empty_source() {
        let mut lexer = Lexer::new("");
        assert!(matches!(lexer.next_token().unwrap().token, Token::EOF));
    }

    #[test]
    fn test_lexer_identifier() {
        let mut lexer = Lexer::new("foo_1");
        let token = lexer.next_token().unwrap();
        assert!(matches!(token.token, Token::Identifier(s) if s == "foo_1"));
    }

    #[test]
    fn test_lexer_keywords() {
        assert_eq!(
            kinds("if then else nonlocal yield"),
            vec![
                Token::Keyword(Keyword::If),
                Token::Keyword(Keyword::Then),
                Token::Keyword(Keyword::Else),
                Token::Keyword(Keyword::Nonlocal),
                Token::Keyword(Keyword::Yield),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            kinds("iterate"),
            vec![Token::Identifier("iterate".to_string()), Token::EOF]
        );
    }

    #[test]
    fn test_lexer_punctuators() {
        use Punctuator::*;
        let expected: Vec<Token> = [
            LParen, RParen, LBracket, RBracket, LBrace, RBrace, Comma, Colon, Dot, DotDot,
            Arrow, Assign, Plus, Minus, Star, Slash, Percent, StarStar, And, Or, Xor, LtLt,
            GtGt, Not, EqEq, NotEq, Lt, LtEq, Gt, GtEq,
        ]
        .into_iter()
        .map(Token::Punctuator)
        .chain(std::iter::once(Token::EOF))
        .collect();
        assert_eq!(
            kinds("( ) [ ] { } , : . .. -> = + - * / % ** & | ^ << >> ! == != < <= > >="),
            expected
        );
    }

    #[test]
    fn test_augmented_assignment_punctuators() {
        use Punctuator::*;
        let expected: Vec<Token> = [
            PlusEq, MinusEq, StarEq, SlashEq, PercentEq, StarStarEq, AndEq, OrEq, XorEq,
            LtLtEq, GtGtEq,
        ]
        .into_iter()
        .map(Token::Punctuator)
        .chain(std::iter::once(Token::EOF))
        .collect();
        assert_eq!(kinds("+= -= *= /= %= **= &= |= ^= <<= >>="), expected);
    }

    #[test]
    fn test_lexer_string_escapes() {
        let tokens = kinds(r#""a\nb\t\"q\"" 'it\'s' '\z'"#);
        assert_eq!(tokens[0], Token::String("a\nb\t\"q\"".to_string()));
        assert_eq!(tokens[1], Token::String("it's".to_string()));
        assert_eq!(tokens[2], Token::String("z".to_string()));
    }

    #[test]
    fn test_unterminated_string_points_at_quote() {
        let err = lex_error("x = \"unterminated");
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.position, SourcePosition::new(1, 5, 4));
    }

    #[test]
    fn test_string_cannot_span_lines() {
        let err = lex_error("'abc\ndef'");
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.position.column, 1);
    }

    #[test]
    fn test_number_bases() {
        assert_eq!(
            kinds("0b1010 0o17 0xFF 42"),
            vec![
                Token::Number(NumberLiteral::new("1010", NumberBase::Binary)),
                Token::Number(NumberLiteral::new("17", NumberBase::Octal)),
                Token::Number(NumberLiteral::new("FF", NumberBase::Hexadecimal)),
                Token::Number(NumberLiteral::new("42", NumberBase::Decimal)),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_number_separators_are_stripped() {
        assert_eq!(
            kinds("1_000_000 0x_dead_beef"),
            vec![
                Token::Number(NumberLiteral::new("1000000", NumberBase::Decimal)),
                Token::Number(NumberLiteral::new("deadbeef", NumberBase::Hexadecimal)),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_decimal_fraction_exponent_imaginary() {
        assert_eq!(
            kinds("3.14 1e10 2.5E-3 4j"),
            vec![
                Token::Number(NumberLiteral::new("3.14", NumberBase::Decimal)),
                Token::Number(NumberLiteral::new("1e10", NumberBase::Decimal)),
                Token::Number(NumberLiteral::new("2.5E-3", NumberBase::Decimal)),
                Token::Number(NumberLiteral::new("4j", NumberBase::Decimal)),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_range_is_not_a_fraction() {
        assert_eq!(
            kinds("1..5"),
            vec![
                Token::Number(NumberLiteral::new("1", NumberBase::Decimal)),
                Token::Punctuator(Punctuator::DotDot),
                Token::Number(NumberLiteral::new("5", NumberBase::Decimal)),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_invalid_digit_for_base() {
        let err = lex_error("0b102");
        assert_eq!(
            err.kind,
            LexErrorKind::InvalidDigit {
                digit: '2',
                base: "binary"
            }
        );
        assert_eq!(err.position.column, 5);
    }

    #[test]
    fn test_base_prefixes_are_lowercase() {
        for (source, digit) in [("0X1F", 'X'), ("0B10", 'B'), ("0O17", 'O')] {
            let err = lex_error(source);
            assert_eq!(
                err.kind,
                LexErrorKind::InvalidDigit {
                    digit,
                    base: "decimal"
                },
                "{:?}",
                source
            );
            assert_eq!(err.position.column, 2);
        }
    }

    #[test]
    fn test_prefix_without_digits() {
        let err = lex_error("0x");
        assert_eq!(
            err.kind,
            LexErrorKind::MissingDigits {
                base: "hexadecimal"
            }
        );
        assert_eq!(err.position.column, 1);
    }

    #[test]
    fn test_misplaced_separator() {
        assert_eq!(lex_error("1__0").kind, LexErrorKind::MisplacedSeparator);
        assert_eq!(lex_error("10_").kind, LexErrorKind::MisplacedSeparator);
    }

    #[test]
    fn test_missing_exponent() {
        assert_eq!(lex_error("1e+").kind, LexErrorKind::MissingExponent);
    }

    #[test]
    fn test_identifier_glued_to_number() {
        assert!(matches!(
            lex_error("12abc").kind,
            LexErrorKind::InvalidDigit { digit: 'a', .. }
        ));
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex_error("a $ b");
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('$'));
        assert_eq!(err.position, SourcePosition::new(1, 3, 2));
        assert_eq!(err.unexpected_character(), Some('$'));
    }

    #[test]
    fn test_newlines_coalesce() {
        assert_eq!(
            kinds("a\n\n  \r\n// note\nb"),
            vec![
                Token::Identifier("a".to_string()),
                Token::Newline,
                Token::Identifier("b".to_string()),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_newline_position_is_first_break() {
        let tokens = tokenize("a\n\nb").unwrap();
        assert_eq!(tokens[1].position, SourcePosition::new(1, 2, 1));
        assert_eq!(tokens[2].position, SourcePosition::new(3, 1, 3));
    }

    #[test]
    fn test_block_comments() {
        assert_eq!(
            kinds("a /* inline */ b /* spans\nlines */ c"),
            vec![
                Token::Identifier("a".to_string()),
                Token::Identifier("b".to_string()),
                Token::Newline,
                Token::Identifier("c".to_string()),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = lex_error("a /* never closed");
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.position.column, 3);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("x y");
        let peeked = lexer.peek_token().unwrap().clone();
        let next = lexer.next_token().unwrap();
        assert_eq!(peeked, next);
        assert!(matches!(lexer.next_token().unwrap().token, Token::Identifier(s) if s == "y"));
    }

    #[test]
    fn test_offsets_count_bytes() {
        let tokens = tokenize("'é' x").unwrap();
        assert_eq!(tokens[1].position, SourcePosition::new(1, 5, 5));
    }

    #[test]
    fn test_exactly_one_eof() {
        let tokens = tokenize("a\n").unwrap();
        let eofs = tokens.iter().filter(|t| t.token == Token::EOF).count();
        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::EOF));
    }

    #[test]
    fn test_number_literal_to_integer() {
        assert_eq!(
            NumberLiteral::new("1010", NumberBase::Binary).to_integer(),
            Some(BigInt::from(10))
        );
        assert_eq!(
            NumberLiteral::new("777", NumberBase::Octal).to_integer(),
            Some(BigInt::from(511))
        );
        assert_eq!(NumberLiteral::new("2e3", NumberBase::Decimal).to_integer(), None);
        assert_eq!(NumberLiteral::new("4j", NumberBase::Decimal).to_integer(), None);
    }

    #[test]
    fn test_token_descriptions() {
        assert_eq!(Token::Punctuator(Punctuator::Arrow).describe(), "'->'");
        assert_eq!(Token::Keyword(Keyword::Then).describe(), "keyword 'then'");
        assert_eq!(Token::EOF.describe(), "end of input");
        assert_eq!(
            Token::Number(NumberLiteral::new("ff", NumberBase::Hexadecimal)).describe(),
            "number '0xff'"
        );
    }
}
