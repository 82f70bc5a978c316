//! Node builders shared by the unit tests

use crate::ast::*;
use crate::lexer::{NumberBase, NumberLiteral};
use core_types::SourcePosition;

pub(crate) fn node(kind: NodeKind) -> Node {
    Node::new(kind, SourcePosition::START)
}

pub(crate) fn ident(name: &str) -> Node {
    node(NodeKind::Identifier(name.to_string()))
}

pub(crate) fn number(text: &str) -> Node {
    node(NodeKind::Literal(Literal::Number(NumberLiteral::new(
        text,
        NumberBase::Decimal,
    ))))
}

pub(crate) fn string(value: &str) -> Node {
    node(NodeKind::Literal(Literal::String(value.to_string())))
}

pub(crate) fn binary(operator: BinaryOperator, operands: Vec<Node>) -> Node {
    node(NodeKind::BinaryOp { operator, operands })
}

pub(crate) fn unary(operator: UnaryOperator, operand: Node) -> Node {
    node(NodeKind::UnaryOp {
        operator,
        operand: operand.boxed(),
    })
}

pub(crate) fn hint(name: &str) -> TypeHint {
    TypeHint::simple(name, SourcePosition::START)
}

pub(crate) fn target(name: &str) -> Target {
    Target {
        modifier: None,
        type_hint: None,
        name: name.to_string(),
        position: SourcePosition::START,
    }
}
