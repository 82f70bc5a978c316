//! Recursive descent parser for Drake
//!
//! The parser works over a fully lexed token vector. Speculative parses
//! save and restore the cursor, so a failed alternative leaves no trace.

use crate::ast::*;
use crate::combinators::ListOutcome;
use crate::error::{syntax_error, unexpected_token};
use crate::lexer::{tokenize, Keyword, Punctuator, SpannedToken, Token};
use core_types::{LexError, ParseError, SourcePosition};
use log::{debug, trace};
use std::collections::HashMap;

type LambdaHead = (Vec<PositionalParam>, Vec<KeywordParam>);

/// Outcome of a bracket literal and the cursor just past it
type BracketEntry = (Result<Node, ParseError>, usize);

struct AssignmentHead {
    targets: Vec<Target>,
    operator: AssignmentOperator,
    operator_token: SpannedToken,
}

/// Drake parser
#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<SpannedToken>,
    cursor: usize,
    /// Bracket literals already parsed, keyed by the cursor of their `[`
    brackets: HashMap<usize, BracketEntry>,
}

impl Parser {
    /// Lex the source and create a parser over its tokens
    pub fn new(source: &str) -> Result<Self, LexError> {
        Ok(Self::from_tokens(tokenize(source)?))
    }

    /// Create a parser over already lexed tokens.
    ///
    /// An EOF token is appended when the vector does not end with one.
    pub fn from_tokens(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last(), Some(last) if last.token == Token::EOF) {
            let position = tokens.last().map(|t| t.position).unwrap_or_default();
            tokens.push(SpannedToken::new(Token::EOF, position));
        }
        Self {
            tokens,
            cursor: 0,
            brackets: HashMap::new(),
        }
    }

    /// Parse the whole token stream into a program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        debug!("parsing {} tokens", self.tokens.len());
        let outcome = self.parse_list(Self::parse_expression)?;
        if !self.check_eof() {
            return Err(self.expected(&["','", "newline", "end of input"]));
        }
        debug!("parsed {} top-level expressions", outcome.items.len());
        Ok(Program {
            body: outcome.items,
        })
    }

    /// Parse one expression at the cursor
    pub fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.peek().clone();

        if let Token::Keyword(keyword) = start.token {
            if let Some(node) = self.parse_keyword_form(keyword)? {
                return Ok(node);
            }
        }

        if self.can_start_lambda() {
            if let Ok(head) = self.speculate(Self::parse_lambda_head) {
                trace!("committed to lambda at {}", start.position);
                return self.finish_lambda(head, start.position);
            }
        }

        if self.can_start_target() {
            if let Ok(head) = self.speculate(Self::parse_assignment_head) {
                trace!("committed to assignment at {}", start.position);
                return self.finish_assignment(head, start.position);
            }
        }

        match start.token {
            Token::Keyword(Keyword::Const) | Token::Punctuator(Punctuator::Lt) => {
                self.parse_declaration()
            }
            Token::Keyword(Keyword::Nonlocal) => {
                let head = self.parse_assignment_head()?;
                self.finish_assignment(head, start.position)
            }
            _ => self.parse_boolor(),
        }
    }

    fn parse_keyword_form(&mut self, keyword: Keyword) -> Result<Option<Node>, ParseError> {
        let node = match keyword {
            Keyword::If => self.parse_if()?,
            Keyword::Case => self.parse_case()?,
            Keyword::Try => self.parse_try()?,
            Keyword::For => self.parse_for()?,
            Keyword::While => self.parse_while()?,
            Keyword::Iter => self.parse_iter()?,
            Keyword::Do => self.parse_block_form(Keyword::Do, NodeKind::Do)?,
            Keyword::Object => self.parse_block_form(Keyword::Object, NodeKind::Object)?,
            Keyword::Module => self.parse_block_form(Keyword::Module, NodeKind::Module)?,
            Keyword::Exception => {
                self.parse_block_form(Keyword::Exception, NodeKind::Exception)?
            }
            Keyword::Enum => self.parse_enum()?,
            Keyword::Mutable => self.parse_mutable()?,
            Keyword::Throw => {
                let position = self.advance().position;
                let value = self.parse_expression()?;
                Node::new(NodeKind::Throw(value.boxed()), position)
            }
            Keyword::Return => {
                let position = self.advance().position;
                let value = self.parse_optional_expression()?;
                Node::new(NodeKind::Return(value), position)
            }
            Keyword::Yield => self.parse_yield()?,
            Keyword::Break => Node::new(NodeKind::Break, self.advance().position),
            Keyword::Continue => Node::new(NodeKind::Continue, self.advance().position),
            Keyword::Pass => Node::new(NodeKind::Pass, self.advance().position),
            _ => return Ok(None),
        };
        Ok(Some(node))
    }

    // Lambdas, assignments and declarations

    fn can_start_lambda(&self) -> bool {
        matches!(
            self.peek().token,
            Token::Punctuator(Punctuator::LParen)
                | Token::Punctuator(Punctuator::Lt)
                | Token::Punctuator(Punctuator::Star)
                | Token::Punctuator(Punctuator::StarStar)
        )
    }

    fn can_start_target(&self) -> bool {
        matches!(
            self.peek().token,
            Token::Punctuator(Punctuator::LParen)
                | Token::Punctuator(Punctuator::Lt)
                | Token::Identifier(_)
                | Token::Keyword(Keyword::Const)
                | Token::Keyword(Keyword::Nonlocal)
        )
    }

    fn parse_lambda_head(&mut self) -> Result<LambdaHead, ParseError> {
        let params = self.parse_delimited2(Self::parse_positional_param, Self::parse_keyword_param)?;
        self.expect_punctuator(Punctuator::Arrow)?;
        Ok(params)
    }

    fn finish_lambda(
        &mut self,
        (positional, keyword): LambdaHead,
        position: SourcePosition,
    ) -> Result<Node, ParseError> {
        let body = self.parse_expression()?;
        Ok(Node::new(
            NodeKind::Lambda(Lambda {
                positional,
                keyword,
                body: body.boxed(),
            }),
            position,
        ))
    }

    fn parse_positional_param(&mut self) -> Result<PositionalParam, ParseError> {
        let variadic = self.eat_punctuator(Punctuator::Star);
        let type_hint = self.parse_type_hint()?;
        let (name, _) = self.expect_identifier()?;
        Ok(PositionalParam {
            type_hint,
            variadic,
            name,
        })
    }

    fn parse_keyword_param(&mut self) -> Result<KeywordParam, ParseError> {
        if self.eat_punctuator(Punctuator::StarStar) {
            let type_hint = self.parse_type_hint()?;
            let (name, _) = self.expect_identifier()?;
            return Ok(KeywordParam {
                type_hint,
                name,
                kind: KeywordParamKind::Collector,
            });
        }

        let type_hint = self.parse_type_hint()?;
        let (name, _) = self.expect_identifier()?;
        let kind = if self.eat_punctuator(Punctuator::Colon) {
            KeywordParamKind::Default(self.parse_expression()?.boxed())
        } else {
            KeywordParamKind::Required
        };
        Ok(KeywordParam {
            type_hint,
            name,
            kind,
        })
    }

    fn parse_assignment_head(&mut self) -> Result<AssignmentHead, ParseError> {
        let targets = self.parse_delimited(Self::parse_target)?;
        if targets.is_empty() {
            return Err(self.expected(&["assignment target"]));
        }
        let operator_token = self.peek().clone();
        let operator = match &operator_token.token {
            Token::Punctuator(punct) => assignment_operator(*punct),
            _ => None,
        };
        let operator = operator.ok_or_else(|| self.expected(&["'='", "augmented assignment"]))?;
        self.advance();
        Ok(AssignmentHead {
            targets,
            operator,
            operator_token,
        })
    }

    fn finish_assignment(
        &mut self,
        head: AssignmentHead,
        position: SourcePosition,
    ) -> Result<Node, ParseError> {
        let AssignmentHead {
            targets,
            operator,
            operator_token,
        } = head;

        if operator.is_augmented() {
            if targets.len() > 1 {
                return Err(syntax_error(
                    "multiple assignment cannot be augmented",
                    &operator_token,
                ));
            }
            if targets
                .iter()
                .any(|t| t.modifier == Some(TargetModifier::Const))
            {
                return Err(syntax_error(
                    "const assignment cannot be augmented",
                    &operator_token,
                ));
            }
        }

        let value = self.parse_expression()?;
        Ok(Node::new(
            NodeKind::Assignment {
                targets,
                operator,
                value: value.boxed(),
            },
            position,
        ))
    }

    fn parse_target(&mut self) -> Result<Target, ParseError> {
        let position = self.position();
        let modifier = if self.eat_keyword(Keyword::Nonlocal) {
            Some(TargetModifier::Nonlocal)
        } else if self.eat_keyword(Keyword::Const) {
            Some(TargetModifier::Const)
        } else {
            None
        };
        let type_hint = if self.check_punctuator(Punctuator::Lt) {
            Some(self.parse_type_hint()?)
        } else {
            None
        };
        let (name, _) = self.expect_identifier()?;
        Ok(Target {
            modifier,
            type_hint,
            name,
            position,
        })
    }

    fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let position = self.position();
        let constant = self.eat_keyword(Keyword::Const);
        let type_hint = self.parse_type_hint()?;
        let (name, _) = self.expect_identifier()?;
        Ok(Node::new(
            NodeKind::Declaration(Declaration {
                constant,
                type_hint,
                name,
            }),
            position,
        ))
    }

    /// `"<" type ">"`
    fn parse_type_hint(&mut self) -> Result<TypeHint, ParseError> {
        self.expect_punctuator(Punctuator::Lt)?;
        let hint = self.parse_type()?;
        self.expect_punctuator(Punctuator::Gt)?;
        Ok(hint)
    }

    fn parse_type(&mut self) -> Result<TypeHint, ParseError> {
        let (name, position) = self.expect_identifier()?;
        let parameters = if self.eat_punctuator(Punctuator::LBracket) {
            let outcome = self.parse_list(Self::parse_type)?;
            self.expect_punctuator(Punctuator::RBracket)?;
            outcome.items
        } else {
            vec![]
        };
        Ok(TypeHint {
            name,
            parameters,
            position,
        })
    }

    // Keyword forms

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::If)?;
        let condition = self.parse_expression()?;
        self.skip_newline_before(Keyword::Then);
        self.expect_keyword(Keyword::Then)?;
        let then = self.parse_expression()?;
        let otherwise = self.parse_else_branch()?;
        Ok(Node::new(
            NodeKind::If {
                condition: condition.boxed(),
                then: then.boxed(),
                otherwise,
            },
            position,
        ))
    }

    fn parse_case(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::Case)?;
        let subject = self.parse_identity()?;
        self.expect_keyword(Keyword::In)?;

        let table_token = self.peek().clone();
        if !self.check_punctuator(Punctuator::LBrace) {
            return Err(self.expected(&["'{'"]));
        }
        let branches = match self.parse_brace()?.kind {
            NodeKind::Mapping(pairs) => pairs,
            NodeKind::Block(items) if items.is_empty() => vec![],
            _ => {
                return Err(syntax_error(
                    "case requires a mapping of branches",
                    &table_token,
                ))
            }
        };

        let otherwise = self.parse_else_branch()?;
        Ok(Node::new(
            NodeKind::Case {
                subject: subject.boxed(),
                branches,
                otherwise,
            },
            position,
        ))
    }

    fn parse_else_branch(&mut self) -> Result<Option<Box<Node>>, ParseError> {
        if !self.skip_newline_before(Keyword::Else) {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.parse_expression()?.boxed()))
    }

    fn parse_try(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::Try)?;
        let body = self.parse_expression()?;

        let mut handlers = Vec::new();
        while self.skip_newline_before(Keyword::Catch) {
            let catch_position = self.advance().position;
            let (exception_type, _) = self.expect_identifier()?;
            let binding = if self.eat_keyword(Keyword::As) {
                Some(self.expect_identifier()?.0)
            } else {
                None
            };
            let handler = self.parse_expression()?;
            handlers.push(CatchClause {
                exception_type,
                binding,
                handler: handler.boxed(),
                position: catch_position,
            });
        }

        let finally = if self.skip_newline_before(Keyword::Finally) {
            self.advance();
            Some(self.parse_expression()?.boxed())
        } else {
            None
        };

        if handlers.is_empty() && finally.is_none() {
            return Err(self.syntax_error("try requires catch or finally"));
        }

        Ok(Node::new(
            NodeKind::Try {
                body: body.boxed(),
                handlers,
                finally,
            },
            position,
        ))
    }

    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::For)?;
        let targets = self.parse_delimited(Self::parse_target)?;
        if targets.is_empty() {
            return Err(self.expected(&["loop target"]));
        }
        self.expect_keyword(Keyword::In)?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Node::new(
            NodeKind::For {
                targets,
                iterable: iterable.boxed(),
                body: body.boxed(),
            },
            position,
        ))
    }

    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::While)?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Node::new(
            NodeKind::While {
                condition: condition.boxed(),
                body: body.boxed(),
            },
            position,
        ))
    }

    fn parse_iter(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::Iter)?;
        let inner = match self.peek().token {
            Token::Punctuator(Punctuator::LBracket) => self.parse_list_literal()?,
            Token::Keyword(Keyword::For) => self.parse_for()?,
            Token::Keyword(Keyword::While) => self.parse_while()?,
            _ => return Err(self.expected(&["'['", "keyword 'for'", "keyword 'while'"])),
        };
        Ok(Node::new(NodeKind::Iter(inner.boxed()), position))
    }

    /// `keyword block` for `do`, `object`, `module` and `exception`
    fn parse_block_form(
        &mut self,
        keyword: Keyword,
        build: fn(Vec<Node>) -> NodeKind,
    ) -> Result<Node, ParseError> {
        let position = self.expect_keyword(keyword)?;
        let items = self.parse_block_items()?;
        Ok(Node::new(build(items), position))
    }

    fn parse_enum(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::Enum)?;
        let flags = self.eat_keyword(Keyword::Flags);
        self.expect_punctuator(Punctuator::LBrace)?;
        let outcome = self.parse_list(Self::parse_enum_member)?;
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Node::new(
            NodeKind::Enum {
                flags,
                members: outcome.items,
            },
            position,
        ))
    }

    fn parse_enum_member(&mut self) -> Result<EnumMember, ParseError> {
        let (name, position) = self.expect_identifier()?;
        let value = if self.eat_punctuator(Punctuator::Assign) {
            match &self.peek().token {
                Token::Number(number) => {
                    let number = number.clone();
                    self.advance();
                    Some(number)
                }
                _ => return Err(self.expected(&["number"])),
            }
        } else {
            None
        };
        Ok(EnumMember {
            name,
            value,
            position,
        })
    }

    fn parse_mutable(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::Mutable)?;
        let operand_token = self.peek().clone();
        let inner = match &operand_token.token {
            Token::Keyword(Keyword::Object) => {
                self.parse_block_form(Keyword::Object, NodeKind::Object)?
            }
            Token::Punctuator(Punctuator::LBrace) => {
                let node = self.parse_brace()?;
                let empty = matches!(&node.kind, NodeKind::Block(items) if items.is_empty());
                if empty {
                    Node::new(NodeKind::Mapping(vec![]), node.position)
                } else if matches!(node.kind, NodeKind::Mapping(_)) {
                    node
                } else {
                    return Err(syntax_error(
                        "mutable requires a mapping, not a block",
                        &operand_token,
                    ));
                }
            }
            Token::Punctuator(Punctuator::LBracket) => self.parse_list_literal()?,
            Token::Punctuator(Punctuator::LParen) => self.parse_tuple()?,
            Token::String(_) => self.parse_atom()?,
            _ => {
                return Err(self.expected(&[
                    "keyword 'object'",
                    "'{'",
                    "'['",
                    "'('",
                    "string",
                ]))
            }
        };
        Ok(Node::new(NodeKind::Mutable(inner.boxed()), position))
    }

    fn parse_yield(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_keyword(Keyword::Yield)?;
        if self.eat_keyword(Keyword::From) {
            let source = self.parse_expression()?;
            return Ok(Node::new(NodeKind::YieldFrom(source.boxed()), position));
        }
        let value = self.parse_optional_expression()?;
        Ok(Node::new(NodeKind::Yield(value), position))
    }

    /// An expression, unless the next token ends the enclosing one
    fn parse_optional_expression(&mut self) -> Result<Option<Box<Node>>, ParseError> {
        let ends = matches!(
            self.peek().token,
            Token::Newline
                | Token::EOF
                | Token::Punctuator(Punctuator::RParen)
                | Token::Punctuator(Punctuator::RBracket)
                | Token::Punctuator(Punctuator::RBrace)
                | Token::Punctuator(Punctuator::Comma)
                | Token::Punctuator(Punctuator::Colon)
                | Token::Keyword(Keyword::Then)
                | Token::Keyword(Keyword::Else)
                | Token::Keyword(Keyword::Catch)
                | Token::Keyword(Keyword::Finally)
        );
        if ends {
            Ok(None)
        } else {
            Ok(Some(self.parse_expression()?.boxed()))
        }
    }

    // Atoms and postfix chains

    /// Atom followed by any run of attribute, call and index operations
    pub(crate) fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_atom()?;
        let position = base.position;
        let mut postfix = Vec::new();

        loop {
            if self.eat_punctuator(Punctuator::Dot) {
                let (name, _) = self.expect_identifier()?;
                postfix.push(Postfix::Attribute(name));
            } else if self.eat_punctuator(Punctuator::LParen) {
                let (positional, keyword) =
                    self.parse_list2(Self::parse_expression, Self::parse_keyword_argument)?;
                self.expect_punctuator(Punctuator::RParen)?;
                postfix.push(Postfix::Call {
                    positional,
                    keyword,
                });
            } else if self.check_punctuator(Punctuator::LBracket) {
                let index = self.parse_list_literal()?;
                postfix.push(Postfix::Index(index.boxed()));
            } else {
                break;
            }
        }

        if postfix.is_empty() {
            Ok(base)
        } else {
            Ok(Node::new(
                NodeKind::Primary {
                    base: base.boxed(),
                    postfix,
                },
                position,
            ))
        }
    }

    fn parse_keyword_argument(&mut self) -> Result<KeywordArgument, ParseError> {
        let (name, _) = self.expect_identifier()?;
        self.expect_punctuator(Punctuator::Colon)?;
        let value = self.parse_expression()?;
        Ok(KeywordArgument { name, value })
    }

    fn parse_atom(&mut self) -> Result<Node, ParseError> {
        let token = self.peek().clone();
        let kind = match token.token {
            Token::String(value) => NodeKind::Literal(Literal::String(value)),
            Token::Number(number) => NodeKind::Literal(Literal::Number(number)),
            Token::Keyword(Keyword::True) => NodeKind::Literal(Literal::Boolean(true)),
            Token::Keyword(Keyword::False) => NodeKind::Literal(Literal::Boolean(false)),
            Token::Keyword(Keyword::None) => NodeKind::Literal(Literal::None),
            Token::Identifier(name) => NodeKind::Identifier(name),
            Token::Punctuator(Punctuator::LBrace) => return self.parse_brace(),
            Token::Punctuator(Punctuator::LBracket) => return self.parse_list_literal(),
            Token::Punctuator(Punctuator::LParen) => return self.parse_paren(),
            _ => return Err(self.expected(&["expression"])),
        };
        self.advance();
        Ok(Node::new(kind, token.position))
    }

    /// `{` starts a block or a mapping; a `:` after the first expression
    /// commits to a mapping
    fn parse_brace(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_punctuator(Punctuator::LBrace)?;
        self.eat_newline();
        if self.eat_punctuator(Punctuator::RBrace) {
            return Ok(Node::new(NodeKind::Block(vec![]), position));
        }

        let first = self.parse_expression()?;
        let kind = if self.eat_punctuator(Punctuator::Colon) {
            let value = self.parse_expression()?;
            let pair = Pair { key: first, value };
            let outcome = self.parse_list_from(pair, Self::parse_pair)?;
            NodeKind::Mapping(outcome.items)
        } else {
            let outcome = self.parse_list_from(first, Self::parse_expression)?;
            NodeKind::Block(outcome.items)
        };
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(Node::new(kind, position))
    }

    fn parse_pair(&mut self) -> Result<Pair, ParseError> {
        let key = self.parse_expression()?;
        self.expect_punctuator(Punctuator::Colon)?;
        let value = self.parse_expression()?;
        Ok(Pair { key, value })
    }

    /// `"{" List[expression] "}"`
    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let position = self.position();
        let items = self.parse_block_items()?;
        Ok(Node::new(NodeKind::Block(items), position))
    }

    fn parse_block_items(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punctuator(Punctuator::LBrace)?;
        let outcome = self.parse_list(Self::parse_expression)?;
        self.expect_punctuator(Punctuator::RBrace)?;
        Ok(outcome.items)
    }

    /// `[` starts a range when a unary is followed by `..`, a list otherwise.
    ///
    /// Each literal is parsed once per start token. The range check and the
    /// enclosing list both reach nested literals at the same cursor.
    fn parse_list_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.mark();
        if let Some((result, end)) = self.brackets.get(&start) {
            let (result, end) = (result.clone(), *end);
            trace!("reusing bracket literal at token {}", start);
            self.reset(end);
            return result;
        }
        let result = self.parse_bracket_contents();
        self.brackets.insert(start, (result.clone(), self.mark()));
        result
    }

    fn parse_bracket_contents(&mut self) -> Result<Node, ParseError> {
        let position = self.expect_punctuator(Punctuator::LBracket)?;
        self.eat_newline();
        let saved = self.mark();

        if !self.at_list_closer() {
            if let Ok(first) = self.speculate(Self::parse_unary) {
                if self.eat_punctuator(Punctuator::DotDot) {
                    return self.finish_range(first, position);
                }
                // A unary that ends the item is the whole first expression
                let item_ends = self.check_punctuator(Punctuator::Comma)
                    || self.check_punctuator(Punctuator::RBracket)
                    || self.check_newline();
                if item_ends {
                    let outcome = self.parse_list_from(first, Self::parse_expression)?;
                    self.expect_punctuator(Punctuator::RBracket)?;
                    return Ok(Node::new(
                        NodeKind::List(ListLiteral::Items(outcome.items)),
                        position,
                    ));
                }
                self.reset(saved);
            }
        }

        let outcome = self.parse_list(Self::parse_expression)?;
        self.expect_punctuator(Punctuator::RBracket)?;
        Ok(Node::new(
            NodeKind::List(ListLiteral::Items(outcome.items)),
            position,
        ))
    }

    /// `".." unary? ("," unary)? "\n"? "]"` after the range start
    fn finish_range(&mut self, start: Node, position: SourcePosition) -> Result<Node, ParseError> {
        let end = if self.check_punctuator(Punctuator::Comma)
            || self.check_punctuator(Punctuator::RBracket)
            || self.check_newline()
        {
            None
        } else {
            Some(self.parse_unary()?.boxed())
        };
        let step = if self.eat_punctuator(Punctuator::Comma) {
            self.eat_newline();
            Some(self.parse_unary()?.boxed())
        } else {
            None
        };
        self.eat_newline();
        self.expect_punctuator(Punctuator::RBracket)?;
        Ok(Node::new(
            NodeKind::List(ListLiteral::Range {
                start: start.boxed(),
                end,
                step,
            }),
            position,
        ))
    }

    fn parse_parenthesized(&mut self) -> Result<(ListOutcome<Node>, SourcePosition), ParseError> {
        let position = self.expect_punctuator(Punctuator::LParen)?;
        let outcome = self.parse_list(Self::parse_expression)?;
        self.expect_punctuator(Punctuator::RParen)?;
        Ok((outcome, position))
    }

    /// One expression without trailing comma is a grouping; anything else
    /// is a tuple
    fn parse_paren(&mut self) -> Result<Node, ParseError> {
        let (outcome, position) = self.parse_parenthesized()?;
        let ListOutcome {
            mut items,
            trailing_comma,
        } = outcome;
        if items.len() == 1 && !trailing_comma {
            if let Some(inner) = items.pop() {
                return Ok(inner);
            }
        }
        Ok(Node::new(NodeKind::Tuple(items), position))
    }

    fn parse_tuple(&mut self) -> Result<Node, ParseError> {
        let (outcome, position) = self.parse_parenthesized()?;
        Ok(Node::new(NodeKind::Tuple(outcome.items), position))
    }

    // Token helpers

    pub(crate) fn peek(&self) -> &SpannedToken {
        &self.tokens[self.cursor]
    }

    /// Token `n` places after the cursor, clamped to EOF
    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let index = (self.cursor + n).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    /// Consume the current token; EOF is never consumed
    pub(crate) fn advance(&mut self) -> SpannedToken {
        let token = self.tokens[self.cursor].clone();
        if token.token != Token::EOF {
            self.cursor += 1;
        }
        token
    }

    pub(crate) fn mark(&self) -> usize {
        self.cursor
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.cursor = mark;
    }

    fn position(&self) -> SourcePosition {
        self.peek().position
    }

    pub(crate) fn check_punctuator(&self, p: Punctuator) -> bool {
        matches!(self.peek().token, Token::Punctuator(x) if x == p)
    }

    fn check_keyword(&self, k: Keyword) -> bool {
        matches!(self.peek().token, Token::Keyword(x) if x == k)
    }

    pub(crate) fn check_newline(&self) -> bool {
        self.peek().token == Token::Newline
    }

    pub(crate) fn check_eof(&self) -> bool {
        self.peek().token == Token::EOF
    }

    pub(crate) fn eat_punctuator(&mut self, p: Punctuator) -> bool {
        let found = self.check_punctuator(p);
        if found {
            self.advance();
        }
        found
    }

    fn eat_keyword(&mut self, k: Keyword) -> bool {
        let found = self.check_keyword(k);
        if found {
            self.advance();
        }
        found
    }

    pub(crate) fn eat_newline(&mut self) -> bool {
        let found = self.check_newline();
        if found {
            self.advance();
        }
        found
    }

    /// Skip one newline when `keyword` follows it; true when `keyword` is next
    fn skip_newline_before(&mut self, keyword: Keyword) -> bool {
        if self.check_newline() && matches!(self.peek_nth(1), Token::Keyword(k) if *k == keyword) {
            self.advance();
        }
        self.check_keyword(keyword)
    }

    pub(crate) fn expect_punctuator(&mut self, p: Punctuator) -> Result<SourcePosition, ParseError> {
        if self.check_punctuator(p) {
            return Ok(self.advance().position);
        }
        let expected = format!("'{}'", p);
        Err(self.expected(&[expected.as_str()]))
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<SourcePosition, ParseError> {
        if self.check_keyword(k) {
            return Ok(self.advance().position);
        }
        let expected = format!("keyword '{}'", k);
        Err(self.expected(&[expected.as_str()]))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, SourcePosition), ParseError> {
        if let Token::Identifier(name) = &self.peek().token {
            let name = name.clone();
            let position = self.advance().position;
            return Ok((name, position));
        }
        Err(self.expected(&["identifier"]))
    }

    fn expected(&self, expected: &[&str]) -> ParseError {
        unexpected_token(expected, self.peek())
    }

    pub(crate) fn syntax_error(&self, message: &str) -> ParseError {
        syntax_error(message, self.peek())
    }
}

fn assignment_operator(punct: Punctuator) -> Option<AssignmentOperator> {
    let operator = match punct {
        Punctuator::Assign => AssignmentOperator::Assign,
        Punctuator::PlusEq => AssignmentOperator::AddAssign,
        Punctuator::MinusEq => AssignmentOperator::SubtractAssign,
        Punctuator::StarEq => AssignmentOperator::MultiplyAssign,
        Punctuator::SlashEq => AssignmentOperator::DivideAssign,
        Punctuator::PercentEq => AssignmentOperator::ModuloAssign,
        Punctuator::StarStarEq => AssignmentOperator::PowerAssign,
        Punctuator::AndEq => AssignmentOperator::BitAndAssign,
        Punctuator::OrEq => AssignmentOperator::BitOrAssign,
        Punctuator::XorEq => AssignmentOperator::BitXorAssign,
        Punctuator::LtLtEq => AssignmentOperator::ShiftLeftAssign,
        Punctuator::GtGtEq => AssignmentOperator::ShiftRightAssign,
        _ => return None,
    };
    Some(operator)
}
