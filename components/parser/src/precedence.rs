//! Binary and unary operator precedence cascade
//!
//! Each level parses its operands with the next tighter level. `or`, `xor`,
//! `and` and `**` are right chains; every other binary level is a left
//! chain.

use crate::ast::{BinaryOperator, Node, NodeKind, UnaryOperator};
use crate::lexer::{Keyword, Punctuator, Token};
use crate::parser::Parser;
use core_types::ParseError;

const OR: &[BinaryOperator] = &[BinaryOperator::Or];
const XOR: &[BinaryOperator] = &[BinaryOperator::Xor];
const AND: &[BinaryOperator] = &[BinaryOperator::And];
const INCLUSION: &[BinaryOperator] = &[BinaryOperator::In, BinaryOperator::NotIn];
const IDENTITY: &[BinaryOperator] = &[BinaryOperator::Is, BinaryOperator::IsNot];
const COMPARISON: &[BinaryOperator] = &[
    BinaryOperator::Less,
    BinaryOperator::LessEqual,
    BinaryOperator::Greater,
    BinaryOperator::GreaterEqual,
    BinaryOperator::Equal,
    BinaryOperator::NotEqual,
];
const BIT_OR: &[BinaryOperator] = &[BinaryOperator::BitOr];
const BIT_XOR: &[BinaryOperator] = &[BinaryOperator::BitXor];
const BIT_AND: &[BinaryOperator] = &[BinaryOperator::BitAnd];
const SHIFT: &[BinaryOperator] = &[BinaryOperator::ShiftLeft, BinaryOperator::ShiftRight];
const ADD: &[BinaryOperator] = &[BinaryOperator::Add, BinaryOperator::Subtract];
const MULT: &[BinaryOperator] = &[BinaryOperator::Multiply, BinaryOperator::Divide];
const MODULO: &[BinaryOperator] = &[BinaryOperator::Modulo];
const POWER: &[BinaryOperator] = &[BinaryOperator::Power];

impl Parser {
    /// Loosest binary level, `or`
    pub(crate) fn parse_boolor(&mut self) -> Result<Node, ParseError> {
        self.parse_right_chain(OR, Self::parse_boolxor)
    }

    fn parse_boolxor(&mut self) -> Result<Node, ParseError> {
        self.parse_right_chain(XOR, Self::parse_booland)
    }

    fn parse_booland(&mut self) -> Result<Node, ParseError> {
        self.parse_right_chain(AND, Self::parse_inclusion)
    }

    fn parse_inclusion(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(INCLUSION, Self::parse_identity)
    }

    /// `is` / `is not`; also the level of a `case` subject, which leaves
    /// `in` to the case syntax
    pub(crate) fn parse_identity(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(IDENTITY, Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(COMPARISON, Self::parse_bitor)
    }

    fn parse_bitor(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(BIT_OR, Self::parse_bitxor)
    }

    fn parse_bitxor(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(BIT_XOR, Self::parse_bitand)
    }

    fn parse_bitand(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(BIT_AND, Self::parse_shift)
    }

    fn parse_shift(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(SHIFT, Self::parse_add)
    }

    fn parse_add(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(ADD, Self::parse_mult)
    }

    fn parse_mult(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(MULT, Self::parse_modulo)
    }

    fn parse_modulo(&mut self) -> Result<Node, ParseError> {
        self.parse_left_chain(MODULO, Self::parse_exponent)
    }

    fn parse_exponent(&mut self) -> Result<Node, ParseError> {
        self.parse_right_chain(POWER, Self::parse_unary)
    }

    /// Prefix `not`, `!` and `-`, repeated and right-nested
    pub(crate) fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let operator = match self.peek().token {
            Token::Keyword(Keyword::Not) => UnaryOperator::Not,
            Token::Punctuator(Punctuator::Not) => UnaryOperator::Invert,
            Token::Punctuator(Punctuator::Minus) => UnaryOperator::Negate,
            _ => return self.parse_primary(),
        };
        let position = self.advance().position;
        let operand = self.parse_unary()?;
        Ok(Node::new(
            NodeKind::UnaryOp {
                operator,
                operand: operand.boxed(),
            },
            position,
        ))
    }

    /// The binary operator at the cursor and how many tokens it spans
    pub(crate) fn peek_binary_operator(&self) -> Option<(BinaryOperator, usize)> {
        let operator = match &self.peek().token {
            Token::Keyword(Keyword::Or) => BinaryOperator::Or,
            Token::Keyword(Keyword::Xor) => BinaryOperator::Xor,
            Token::Keyword(Keyword::And) => BinaryOperator::And,
            Token::Keyword(Keyword::In) => BinaryOperator::In,
            Token::Keyword(Keyword::Not) => {
                return match self.peek_nth(1) {
                    Token::Keyword(Keyword::In) => Some((BinaryOperator::NotIn, 2)),
                    _ => None,
                };
            }
            Token::Keyword(Keyword::Is) => {
                return match self.peek_nth(1) {
                    Token::Keyword(Keyword::Not) => Some((BinaryOperator::IsNot, 2)),
                    _ => Some((BinaryOperator::Is, 1)),
                };
            }
            Token::Punctuator(punct) => match punct {
                Punctuator::Lt => BinaryOperator::Less,
                Punctuator::LtEq => BinaryOperator::LessEqual,
                Punctuator::Gt => BinaryOperator::Greater,
                Punctuator::GtEq => BinaryOperator::GreaterEqual,
                Punctuator::EqEq => BinaryOperator::Equal,
                Punctuator::NotEq => BinaryOperator::NotEqual,
                Punctuator::Or => BinaryOperator::BitOr,
                Punctuator::Xor => BinaryOperator::BitXor,
                Punctuator::And => BinaryOperator::BitAnd,
                Punctuator::LtLt => BinaryOperator::ShiftLeft,
                Punctuator::GtGt => BinaryOperator::ShiftRight,
                Punctuator::Plus => BinaryOperator::Add,
                Punctuator::Minus => BinaryOperator::Subtract,
                Punctuator::Star => BinaryOperator::Multiply,
                Punctuator::Slash => BinaryOperator::Divide,
                Punctuator::Percent => BinaryOperator::Modulo,
                Punctuator::StarStar => BinaryOperator::Power,
                _ => return None,
            },
            _ => return None,
        };
        Some((operator, 1))
    }
}
