//! Builds the formula tree from the token stream. Grammar:
//!
//! formula -> term*
//! term -> atom | group
//! group -> "(" formula ")" DIGIT*
//! atom -> ("^"? DIGIT+)? UPPER LOWER* ("_"? DIGIT+)?
//!
//! The scanner has already turned atoms and closing parens into single
//! tokens, so all that is left here is matching the parens up. Instead of
//! recursing, the open groups are kept on an explicit stack: an open paren
//! shelves the children collected so far and starts a fresh list, and the
//! matching close paren wraps that list in a [Group] and hands it back to the
//! shelved parent.

use std::mem;

use crate::error::ParseError;

use super::{
    flattener::try_flatten,
    scanner::{Lexeme, Token},
    Group, Leaf, Node,
};

/// the children of an enclosing group, shelved while one of its subgroups is
/// being read
struct Frame {
    children: Vec<Node>,
    /// where the subgroup's open paren was
    open: usize,
}

pub(super) struct Parser {
    tokens: Vec<Lexeme>,
    cur: usize,
}

impl Parser {
    pub(super) fn new(tokens: Vec<Lexeme>) -> Self {
        Self { tokens, cur: 0 }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.peek().token.is_end()
    }

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.cur]
    }

    fn advance(&mut self) -> Lexeme {
        let ret = self.peek().clone();
        if !self.at_end() {
            self.cur += 1;
        }
        ret
    }

    pub(super) fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        // children of the innermost open group, or the top level
        let mut current = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            let Lexeme { token, offset } = self.advance();
            match token {
                Token::Atom {
                    isotope,
                    symbol,
                    amount,
                } => current.push(Node::Leaf(Leaf {
                    symbol,
                    amount,
                    isotope,
                })),
                Token::Open => stack.push(Frame {
                    children: mem::take(&mut current),
                    open: offset,
                }),
                Token::Close(multiplier) => {
                    let Some(parent) = stack.pop() else {
                        return Err(ParseError::UnmatchedClose { offset });
                    };
                    if current.is_empty() {
                        return Err(ParseError::EmptyGroup {
                            offset: parent.open,
                        });
                    }
                    let children = mem::replace(&mut current, parent.children);
                    let group = Node::Group(Group {
                        children,
                        multiplier,
                    });
                    if try_flatten(std::slice::from_ref(&group)).is_none() {
                        return Err(ParseError::CountOverflow { offset });
                    }
                    current.push(group);
                }
                Token::End => {
                    if let Some(frame) = stack.last() {
                        return Err(ParseError::UnclosedGroup { offset: frame.open });
                    }
                    if try_flatten(&current).is_none() {
                        return Err(ParseError::CountOverflow { offset });
                    }
                    return Ok(current);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::formula::scanner::scan;

    use super::*;

    fn parse(s: &str) -> Result<Vec<Node>, ParseError> {
        Parser::new(scan(s)?).parse()
    }

    fn leaf(symbol: &str, amount: u32) -> Node {
        Node::Leaf(Leaf {
            symbol: symbol.to_owned(),
            amount,
            isotope: None,
        })
    }

    fn group(children: Vec<Node>, multiplier: u32) -> Node {
        Node::Group(Group {
            children,
            multiplier,
        })
    }

    #[test]
    fn parse_flat() {
        assert_eq!(parse("H2O").unwrap(), vec![leaf("H", 2), leaf("O", 1)]);
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn parse_group() {
        assert_eq!(
            parse("Mg(OH)2").unwrap(),
            vec![
                leaf("Mg", 1),
                group(vec![leaf("O", 1), leaf("H", 1)], 2)
            ]
        );
    }

    #[test]
    fn parse_nested() {
        assert_eq!(
            parse("((H2)3)2").unwrap(),
            vec![group(vec![group(vec![leaf("H", 2)], 3)], 2)]
        );
        // siblings after a nested group land back in the right parent
        assert_eq!(
            parse("K4(Fe(CN)6)H").unwrap(),
            vec![
                leaf("K", 4),
                group(
                    vec![leaf("Fe", 1), group(vec![leaf("C", 1), leaf("N", 1)], 6)],
                    1
                ),
                leaf("H", 1),
            ]
        );
        assert_eq!(
            parse("(H)(O)").unwrap(),
            vec![group(vec![leaf("H", 1)], 1), group(vec![leaf("O", 1)], 1)]
        );
    }

    #[test]
    fn unmatched_close() {
        assert_eq!(parse("H2)"), Err(ParseError::UnmatchedClose { offset: 2 }));
        assert_eq!(
            parse("(H)O)2"),
            Err(ParseError::UnmatchedClose { offset: 4 })
        );
    }

    #[test]
    fn unclosed_group() {
        assert_eq!(parse("(H2"), Err(ParseError::UnclosedGroup { offset: 0 }));
        assert_eq!(
            parse("Ca(O(H)"),
            Err(ParseError::UnclosedGroup { offset: 2 })
        );
        assert_eq!(
            parse("((O)H"),
            Err(ParseError::UnclosedGroup { offset: 0 })
        );
    }

    #[test]
    fn empty_group() {
        assert_eq!(parse("H()2"), Err(ParseError::EmptyGroup { offset: 1 }));
    }

    #[test]
    fn count_overflow() {
        // u32::MAX squared still fits in a u64
        assert!(parse("(H4294967295)4294967295").is_ok());
        assert_eq!(
            parse("((H4294967295)4294967295)2"),
            Err(ParseError::CountOverflow { offset: 24 })
        );
        assert_eq!(
            parse("(H4294967295)4294967295(H4294967295)4294967295"),
            Err(ParseError::CountOverflow { offset: 46 })
        );
    }
}
