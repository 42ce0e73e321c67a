use std::{iter::Peekable, str::CharIndices};

use crate::error::ParseError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Token {
    Open,
    /// closing paren and the multiplier that followed it
    Close(u32),
    Atom {
        isotope: Option<u32>,
        symbol: String,
        amount: u32,
    },
    End,
}

impl Token {
    /// Returns `true` if the token is [`End`].
    ///
    /// [`End`]: Token::End
    #[must_use]
    pub(super) fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

/// A token and the byte offset where it starts
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Lexeme {
    pub(super) token: Token,
    pub(super) offset: usize,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

/// span of the run of ascii digits at the front of `chars`, if any
fn get_digits(chars: &mut Chars<'_>) -> Option<(usize, usize)> {
    let start = chars.peek().map(|&(i, _)| i)?;
    let mut end = start;
    while let Some((i, _)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
        end = i + 1;
    }
    (end > start).then_some((start, end))
}

/// posint := [1-9][0-9]*
fn number(s: &str, (start, end): (usize, usize)) -> Result<u32, ParseError> {
    let fragment = &s[start..end];
    match fragment.parse() {
        Ok(n) if !fragment.starts_with('0') => Ok(n),
        _ => Err(ParseError::InvalidNumber {
            fragment: fragment.to_owned(),
            offset: start,
        }),
    }
}

/// the offending text starting at `offset`, up to the next space or paren
fn unknown(s: &str, offset: usize) -> ParseError {
    let rest = &s[offset..];
    let end = rest
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c.is_whitespace() || c == '(' || c == ')')
        .map_or(rest.len(), |(i, _)| i);
    ParseError::UnknownToken {
        fragment: rest[..end].to_owned(),
        offset,
    }
}

/// symbol := [A-Z][a-z]*
fn symbol(chars: &mut Chars<'_>) -> Option<(usize, usize)> {
    let (start, _) = chars.next_if(|(_, c)| c.is_ascii_uppercase())?;
    let mut end = start + 1;
    while let Some((i, _)) = chars.next_if(|(_, c)| c.is_ascii_lowercase()) {
        end = i + 1;
    }
    Some((start, end))
}

fn atom(s: &str, start: usize, chars: &mut Chars<'_>) -> Result<Token, ParseError> {
    let caret = chars.next_if(|&(_, c)| c == '^').is_some();
    let isotope = match get_digits(chars) {
        Some(span) => Some(number(s, span)?),
        None if caret => return Err(unknown(s, start)),
        None => None,
    };

    let Some((sym_start, sym_end)) = symbol(chars) else {
        return Err(unknown(s, start));
    };
    let symbol = s[sym_start..sym_end].to_owned();

    let underscore = chars.next_if(|&(_, c)| c == '_');
    let amount = match get_digits(chars) {
        Some(span) => number(s, span)?,
        None => match underscore {
            Some((i, _)) => return Err(unknown(s, i)),
            None => 1,
        },
    };

    Ok(Token::Atom {
        isotope,
        symbol,
        amount,
    })
}

/// every symbol in `s`, with whatever lies between them skipped
pub(super) fn symbols(s: &str) -> Vec<&str> {
    let mut chars = s.char_indices().peekable();
    let mut ret = Vec::new();
    while chars.peek().is_some() {
        match symbol(&mut chars) {
            Some((start, end)) => ret.push(&s[start..end]),
            None => {
                chars.next();
            }
        }
    }
    ret
}

/// Split `s` into tokens, ending with [Token::End]. Whitespace between tokens
/// is dropped. Nesting is not checked here.
pub(super) fn scan(s: &str) -> Result<Vec<Lexeme>, ParseError> {
    use Token as T;
    let mut chars = s.char_indices().peekable();
    let mut ret = Vec::new();
    while let Some(&(offset, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                T::Open
            }
            ')' => {
                chars.next();
                match get_digits(&mut chars) {
                    Some(span) => T::Close(number(s, span)?),
                    None => T::Close(1),
                }
            }
            '^' | '0'..='9' | 'A'..='Z' => atom(s, offset, &mut chars)?,
            _ => return Err(unknown(s, offset)),
        };
        ret.push(Lexeme { token, offset });
    }
    ret.push(Lexeme {
        token: T::End,
        offset: s.len(),
    });
    Ok(ret)
}
