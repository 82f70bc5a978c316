//! Abstract Syntax Tree node definitions
//!
//! Every node carries the position of its leading token. Equality ignores
//! positions, so a parenthesised expression compares equal to the same
//! expression written without parentheses.

use crate::lexer::NumberLiteral;
use core_types::SourcePosition;
use serde::Serialize;
use std::fmt;

/// Root of a parsed source text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// Top-level expressions in source order
    pub body: Vec<Node>,
}

/// A positioned AST node
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// What the node is
    pub kind: NodeKind,
    /// Position of the node's leading token
    pub position: SourcePosition,
}

impl Node {
    /// Create a node
    pub fn new(kind: NodeKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    /// Wrap the node in a box at the same position
    pub fn boxed(self) -> Box<Node> {
        Box::new(self)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Drake expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    /// String, number, boolean or none literal
    Literal(Literal),
    /// Identifier reference
    Identifier(String),
    /// Typed name introduced without a value
    Declaration(Declaration),
    /// Assignment to one or more targets
    Assignment {
        /// Targets; more than one only in the parenthesised form
        targets: Vec<Target>,
        /// `=` or an augmented operator
        operator: AssignmentOperator,
        /// Assigned expression
        value: Box<Node>,
    },
    /// Binary operation
    BinaryOp {
        /// Operator
        operator: BinaryOperator,
        /// Operands, at least two
        operands: Vec<Node>,
    },
    /// Prefix operation
    UnaryOp {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        operand: Box<Node>,
    },
    /// Atom followed by attribute, call and index operations
    Primary {
        /// The atom
        base: Box<Node>,
        /// Postfix operations in source order, at least one
        postfix: Vec<Postfix>,
    },
    /// Lambda expression
    Lambda(Lambda),
    /// Conditional expression
    If {
        /// Condition
        condition: Box<Node>,
        /// Value when the condition holds
        then: Box<Node>,
        /// Value otherwise
        otherwise: Option<Box<Node>>,
    },
    /// Branch table lookup
    Case {
        /// Value being matched
        subject: Box<Node>,
        /// Branches of the mapping
        branches: Vec<Pair>,
        /// Fallback branch
        otherwise: Option<Box<Node>>,
    },
    /// Exception handling
    Try {
        /// Protected expression
        body: Box<Node>,
        /// Catch clauses in source order
        handlers: Vec<CatchClause>,
        /// Cleanup expression
        finally: Option<Box<Node>>,
    },
    /// For loop
    For {
        /// Loop binders
        targets: Vec<Target>,
        /// Iterated expression
        iterable: Box<Node>,
        /// Loop body block
        body: Box<Node>,
    },
    /// While loop
    While {
        /// Loop condition
        condition: Box<Node>,
        /// Loop body block
        body: Box<Node>,
    },
    /// Lazy iteration over a list, for or while
    Iter(Box<Node>),
    /// Block evaluated in place
    Do(Vec<Node>),
    /// Object literal
    Object(Vec<Node>),
    /// Module literal
    Module(Vec<Node>),
    /// Exception type literal
    Exception(Vec<Node>),
    /// Enumeration
    Enum {
        /// Whether members combine as bit flags
        flags: bool,
        /// Members in source order
        members: Vec<EnumMember>,
    },
    /// Mutable version of an object, mapping, list, tuple or string
    Mutable(Box<Node>),
    /// Raise an exception
    Throw(Box<Node>),
    /// Return from a lambda
    Return(Option<Box<Node>>),
    /// Yield a value
    Yield(Option<Box<Node>>),
    /// Yield every value of an iterable
    YieldFrom(Box<Node>),
    /// Leave a loop
    Break,
    /// Skip to the next loop iteration
    Continue,
    /// Do nothing
    Pass,
    /// Mapping literal
    Mapping(Vec<Pair>),
    /// List literal or range
    List(ListLiteral),
    /// Tuple literal
    Tuple(Vec<Node>),
    /// Braced sequence of expressions
    Block(Vec<Node>),
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// String literal
    String(String),
    /// Number literal with its base
    Number(NumberLiteral),
    /// `true` or `false`
    Boolean(bool),
    /// `none`
    None,
}

/// `const? <type> name`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// Declared with `const`
    pub constant: bool,
    /// Declared type
    pub type_hint: TypeHint,
    /// Declared name
    pub name: String,
}

/// Type annotation, `<Name>` or `<Name[Param, ...]>`
#[derive(Debug, Clone, Serialize)]
pub struct TypeHint {
    /// Type name
    pub name: String,
    /// Generic parameters
    pub parameters: Vec<TypeHint>,
    /// Position of the type name
    pub position: SourcePosition,
}

impl TypeHint {
    /// A type hint without parameters
    pub fn simple(name: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            position,
        }
    }
}

impl PartialEq for TypeHint {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parameters == other.parameters
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
            write!(f, "[{}]", params.join(", "))?;
        }
        Ok(())
    }
}

/// Modifier in front of an assignment target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetModifier {
    /// Rebind a name from an enclosing scope
    Nonlocal,
    /// Bind a constant
    Const,
}

/// Assignable slot of an assignment or loop
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    /// `nonlocal` or `const`
    pub modifier: Option<TargetModifier>,
    /// Optional type annotation
    pub type_hint: Option<TypeHint>,
    /// Bound name
    pub name: String,
    /// Position of the target's first token
    pub position: SourcePosition,
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.modifier == other.modifier
            && self.type_hint == other.type_hint
            && self.name == other.name
    }
}

/// Operation applied after an atom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Postfix {
    /// `.name`
    Attribute(String),
    /// `(args)`
    Call {
        /// Positional arguments
        positional: Vec<Node>,
        /// Keyword arguments, after all positional ones
        keyword: Vec<KeywordArgument>,
    },
    /// `[index]`; the node is a list literal or a range
    Index(Box<Node>),
}

/// `name: value` in a call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordArgument {
    /// Parameter name
    pub name: String,
    /// Argument value
    pub value: Node,
}

/// Lambda expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    /// Positional parameters
    pub positional: Vec<PositionalParam>,
    /// Keyword parameters, after all positional ones
    pub keyword: Vec<KeywordParam>,
    /// Body expression
    pub body: Box<Node>,
}

/// `*? <type> name`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalParam {
    /// Parameter type
    pub type_hint: TypeHint,
    /// Collects remaining positional arguments
    pub variadic: bool,
    /// Parameter name
    pub name: String,
}

/// `<type> name`, `<type> name: default` or `** <type> name`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordParam {
    /// Parameter type
    pub type_hint: TypeHint,
    /// Parameter name
    pub name: String,
    /// How the parameter receives its value
    pub kind: KeywordParamKind,
}

/// Keyword parameter flavours
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum KeywordParamKind {
    /// Must be passed by keyword
    Required,
    /// Falls back to the expression when omitted
    Default(Box<Node>),
    /// Collects remaining keyword arguments
    Collector,
}

/// `catch Type (as name)? handler`
#[derive(Debug, Clone, Serialize)]
pub struct CatchClause {
    /// Caught exception type name
    pub exception_type: String,
    /// Name bound to the caught exception
    pub binding: Option<String>,
    /// Handler expression
    pub handler: Box<Node>,
    /// Position of the `catch` keyword
    pub position: SourcePosition,
}

impl PartialEq for CatchClause {
    fn eq(&self, other: &Self) -> bool {
        self.exception_type == other.exception_type
            && self.binding == other.binding
            && self.handler == other.handler
    }
}

/// `name (= number)?` inside an enum
#[derive(Debug, Clone, Serialize)]
pub struct EnumMember {
    /// Member name
    pub name: String,
    /// Explicit value
    pub value: Option<NumberLiteral>,
    /// Position of the member name
    pub position: SourcePosition,
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

/// `key: value` in a mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pair {
    /// Key expression
    pub key: Node,
    /// Value expression
    pub value: Node,
}

/// Contents of a `[...]` literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ListLiteral {
    /// Plain list of expressions
    Items(Vec<Node>),
    /// `[start..end, step]`
    Range {
        /// First value
        start: Box<Node>,
        /// Bound, open-ended when absent
        end: Option<Box<Node>>,
        /// Increment
        step: Option<Box<Node>>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    /// or
    Or,
    /// xor
    Xor,
    /// and
    And,
    /// in
    In,
    /// not in
    NotIn,
    /// is
    Is,
    /// is not
    IsNot,
    /// <
    Less,
    /// <=
    LessEqual,
    /// >
    Greater,
    /// >=
    GreaterEqual,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// &
    BitAnd,
    /// <<
    ShiftLeft,
    /// >>
    ShiftRight,
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Modulo,
    /// **
    Power,
}

impl BinaryOperator {
    /// Source spelling
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::Xor => "xor",
            BinaryOperator::And => "and",
            BinaryOperator::In => "in",
            BinaryOperator::NotIn => "not in",
            BinaryOperator::Is => "is",
            BinaryOperator::IsNot => "is not",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "**",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    /// not
    Not,
    /// !
    Invert,
    /// -
    Negate,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignmentOperator {
    /// =
    Assign,
    /// +=
    AddAssign,
    /// -=
    SubtractAssign,
    /// *=
    MultiplyAssign,
    /// /=
    DivideAssign,
    /// %=
    ModuloAssign,
    /// **=
    PowerAssign,
    /// &=
    BitAndAssign,
    /// |=
    BitOrAssign,
    /// ^=
    BitXorAssign,
    /// <<=
    ShiftLeftAssign,
    /// >>=
    ShiftRightAssign,
}

impl AssignmentOperator {
    /// Whether the operator combines with the old value
    pub fn is_augmented(self) -> bool {
        self != AssignmentOperator::Assign
    }
}
