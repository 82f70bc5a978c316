//! Generic list, delimiter and operator-chain combinators
//!
//! Every repeated production of the grammar is built from the methods in
//! this module. Item parsers are passed in as closures or method paths
//! (`Self::parse_expression`), operator sets as slices.

use crate::ast::{BinaryOperator, Node, NodeKind};
use crate::lexer::{Punctuator, Token};
use crate::parser::Parser;
use core_types::ParseError;

/// Result of [`Parser::parse_list`]
#[derive(Debug, Clone, PartialEq)]
pub struct ListOutcome<T> {
    /// Items in source order
    pub items: Vec<T>,
    /// Whether the last item was followed by a comma
    pub trailing_comma: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Comma,
    Newline,
}

enum Alternative<A, B> {
    First(A),
    Second(B),
}

const MIXED_SEPARATORS: &str = "cannot mix comma and newline separators";

impl Parser {
    /// Run `parse`, rewinding the cursor if it fails
    pub(crate) fn speculate<T, F>(&mut self, parse: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        let saved = self.mark();
        let result = parse(self);
        if result.is_err() {
            self.reset(saved);
        }
        result
    }

    /// Whether the next token closes a list
    pub(crate) fn at_list_closer(&self) -> bool {
        matches!(
            self.peek().token,
            Token::Punctuator(Punctuator::RParen)
                | Token::Punctuator(Punctuator::RBracket)
                | Token::Punctuator(Punctuator::RBrace)
                | Token::EOF
        )
    }

    /// `"\n"? (item (sep item)* ","?)? "\n"?` where `sep` is either a
    /// newline or a comma with an optional newline, fixed by the first
    /// separator seen
    pub(crate) fn parse_list<T, F>(&mut self, mut item: F) -> Result<ListOutcome<T>, ParseError>
    where
        F: FnMut(&mut Self) -> Result<T, ParseError>,
    {
        self.eat_newline();
        if self.at_list_closer() {
            return Ok(ListOutcome {
                items: vec![],
                trailing_comma: false,
            });
        }
        let first = item(self)?;
        self.parse_list_from(first, item)
    }

    /// Continue a list whose first item has already been parsed
    pub(crate) fn parse_list_from<T, F>(
        &mut self,
        first: T,
        mut item: F,
    ) -> Result<ListOutcome<T>, ParseError>
    where
        F: FnMut(&mut Self) -> Result<T, ParseError>,
    {
        let mut items = vec![first];
        let mut separator = None;
        let mut trailing_comma = false;

        loop {
            if self.check_punctuator(Punctuator::Comma) {
                if separator == Some(Separator::Newline) {
                    return Err(self.syntax_error(MIXED_SEPARATORS));
                }
                separator = Some(Separator::Comma);
                self.advance();
                self.eat_newline();
                if self.at_list_closer() {
                    trailing_comma = true;
                    break;
                }
                items.push(item(self)?);
            } else if self.check_newline() {
                match self.peek_nth(1) {
                    Token::Punctuator(Punctuator::RParen)
                    | Token::Punctuator(Punctuator::RBracket)
                    | Token::Punctuator(Punctuator::RBrace)
                    | Token::EOF => {
                        self.advance();
                        break;
                    }
                    Token::Punctuator(Punctuator::Comma) => {
                        self.advance();
                        return Err(self.syntax_error(MIXED_SEPARATORS));
                    }
                    _ if separator == Some(Separator::Comma) => {
                        return Err(self.syntax_error(MIXED_SEPARATORS));
                    }
                    _ => {}
                }
                separator = Some(Separator::Newline);
                self.advance();
                items.push(item(self)?);
            } else {
                break;
            }
        }

        Ok(ListOutcome {
            items,
            trailing_comma,
        })
    }

    /// A list of `item1` occurrences followed by `item2` occurrences.
    ///
    /// At each position the alternative that consumes more tokens wins,
    /// `item1` on a tie. Once an `item2` has been accepted only `item2` is
    /// tried.
    pub(crate) fn parse_list2<A, B, F, G>(
        &mut self,
        mut item1: F,
        mut item2: G,
    ) -> Result<(Vec<A>, Vec<B>), ParseError>
    where
        F: FnMut(&mut Self) -> Result<A, ParseError>,
        G: FnMut(&mut Self) -> Result<B, ParseError>,
    {
        let mut seen_second = false;
        let outcome = self.parse_list(|parser| {
            let choice = parser.parse_alternative(&mut item1, &mut item2, seen_second)?;
            if matches!(choice, Alternative::Second(_)) {
                seen_second = true;
            }
            Ok(choice)
        })?;

        let mut firsts = Vec::new();
        let mut seconds = Vec::new();
        for choice in outcome.items {
            match choice {
                Alternative::First(a) => firsts.push(a),
                Alternative::Second(b) => seconds.push(b),
            }
        }
        Ok((firsts, seconds))
    }

    /// `"(" list ")"` or a single bare item
    pub(crate) fn parse_delimited<T, F>(&mut self, mut item: F) -> Result<Vec<T>, ParseError>
    where
        F: FnMut(&mut Self) -> Result<T, ParseError>,
    {
        if self.eat_punctuator(Punctuator::LParen) {
            let outcome = self.parse_list(item)?;
            self.expect_punctuator(Punctuator::RParen)?;
            Ok(outcome.items)
        } else {
            Ok(vec![item(self)?])
        }
    }

    /// `"(" list2 ")"` or a single bare item of either kind
    pub(crate) fn parse_delimited2<A, B, F, G>(
        &mut self,
        mut item1: F,
        mut item2: G,
    ) -> Result<(Vec<A>, Vec<B>), ParseError>
    where
        F: FnMut(&mut Self) -> Result<A, ParseError>,
        G: FnMut(&mut Self) -> Result<B, ParseError>,
    {
        if self.eat_punctuator(Punctuator::LParen) {
            let lists = self.parse_list2(item1, item2)?;
            self.expect_punctuator(Punctuator::RParen)?;
            return Ok(lists);
        }
        match self.parse_alternative(&mut item1, &mut item2, false)? {
            Alternative::First(a) => Ok((vec![a], vec![])),
            Alternative::Second(b) => Ok((vec![], vec![b])),
        }
    }

    fn parse_alternative<A, B, F, G>(
        &mut self,
        item1: &mut F,
        item2: &mut G,
        only_second: bool,
    ) -> Result<Alternative<A, B>, ParseError>
    where
        F: FnMut(&mut Self) -> Result<A, ParseError>,
        G: FnMut(&mut Self) -> Result<B, ParseError>,
    {
        if only_second {
            return item2(self).map(Alternative::Second);
        }

        let start = self.mark();
        let first = self.speculate(|parser| item1(parser));
        let first_end = self.mark();
        self.reset(start);
        let second = self.speculate(|parser| item2(parser));
        let second_end = self.mark();

        match (first, second) {
            (Ok(a), Ok(b)) => {
                if second_end > first_end {
                    Ok(Alternative::Second(b))
                } else {
                    self.reset(first_end);
                    Ok(Alternative::First(a))
                }
            }
            (Ok(a), Err(_)) => {
                self.reset(first_end);
                Ok(Alternative::First(a))
            }
            (Err(_), Ok(b)) => Ok(Alternative::Second(b)),
            (Err(e1), Err(e2)) => {
                self.reset(start);
                if e2.position.offset > e1.position.offset {
                    Err(e2)
                } else {
                    Err(e1)
                }
            }
        }
    }

    /// Left-associative chain.
    ///
    /// A run of one operator becomes a single node holding every operand;
    /// when the operator changes, the run so far becomes the first operand
    /// of the next run.
    pub(crate) fn parse_left_chain<F>(
        &mut self,
        operators: &[BinaryOperator],
        mut operand: F,
    ) -> Result<Node, ParseError>
    where
        F: FnMut(&mut Self) -> Result<Node, ParseError>,
    {
        let mut operands = vec![operand(self)?];
        let position = operands[0].position;
        let mut current: Option<BinaryOperator> = None;

        while let Some(operator) = self.match_binary_operator(operators) {
            if let Some(previous) = current.filter(|previous| *previous != operator) {
                let run = std::mem::take(&mut operands);
                operands.push(Node::new(
                    NodeKind::BinaryOp {
                        operator: previous,
                        operands: run,
                    },
                    position,
                ));
            }
            current = Some(operator);
            operands.push(operand(self)?);
        }

        Ok(match current {
            Some(operator) => Node::new(NodeKind::BinaryOp { operator, operands }, position),
            None => operands.swap_remove(0),
        })
    }

    /// Right-associative chain of strictly binary, right-nested nodes
    pub(crate) fn parse_right_chain<F>(
        &mut self,
        operators: &[BinaryOperator],
        mut operand: F,
    ) -> Result<Node, ParseError>
    where
        F: FnMut(&mut Self) -> Result<Node, ParseError>,
    {
        let mut node = operand(self)?;
        let mut pending = Vec::new();
        while let Some(operator) = self.match_binary_operator(operators) {
            pending.push((node, operator));
            node = operand(self)?;
        }

        while let Some((left, operator)) = pending.pop() {
            let position = left.position;
            node = Node::new(
                NodeKind::BinaryOp {
                    operator,
                    operands: vec![left, node],
                },
                position,
            );
        }
        Ok(node)
    }

    /// Consume the next binary operator if it belongs to `operators`
    fn match_binary_operator(&mut self, operators: &[BinaryOperator]) -> Option<BinaryOperator> {
        let (operator, width) = self.peek_binary_operator()?;
        if !operators.contains(&operator) {
            return None;
        }
        for _ in 0..width {
            self.advance();
        }
        Some(operator)
    }
}
