use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::core::ParseResult,
    },
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals, dictionary literals, call
/// arguments and parameter lists. An immediately encountered closing token
/// produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, an unexpected token is
/// encountered, or the line ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    line: usize)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut items = Vec::new();
    if let Some(lexeme) = tokens.peek()
       && lexeme.token == *closing
    {
        tokens.next();
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some(Lexeme { token: Token::Comma, .. }) => {},
            Some(lexeme) if lexeme.token == *closing => break,
            Some(lexeme) => {
                return Err(ParseError::UnexpectedToken { token: format!("'{}' (se esperaba ',' o '{closing}')",
                                                                        lexeme.token),
                                                         line:  lexeme.line, });
            },
            None => return Err(ParseError::UnexpectedEndOfLine { line }),
        }
    }
    Ok(items)
}

/// Consumes the next token, failing unless it equals `expected`.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    line: usize)
                                                    -> ParseResult<&'a Lexeme>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    match tokens.next() {
        Some(lexeme) if lexeme.token == *expected => Ok(lexeme),
        Some(lexeme) => Err(unexpected(lexeme)),
        None => Err(ParseError::UnexpectedEndOfLine { line }),
    }
}

/// Consumes an identifier and returns its name.
pub(in crate::interpreter::parser) fn expect_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                               line: usize)
                                                               -> ParseResult<String>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    match tokens.next() {
        Some(Lexeme { token: Token::Identifier(name),
                      .. }) => Ok(name.clone()),
        Some(lexeme) => Err(unexpected(lexeme)),
        None => Err(ParseError::UnexpectedEndOfLine { line }),
    }
}

/// Builds the error for a token that cannot appear where it was found.
///
/// Unrecognized input is reported as what it is: an unterminated literal, an
/// oversized number or an unknown character.
pub(in crate::interpreter::parser) fn unexpected(lexeme: &Lexeme) -> ParseError {
    match &lexeme.token {
        Token::Unknown(text) if text.starts_with('"') => {
            ParseError::UnterminatedLiteral { line: lexeme.line }
        },
        Token::Unknown(text) if text.bytes().all(|b| b.is_ascii_digit() || b == b'.') => {
            ParseError::LiteralTooLarge { line: lexeme.line }
        },
        Token::Unknown(text) => ParseError::UnknownCharacter { text: text.clone(),
                                                               line: lexeme.line, },
        token => ParseError::UnexpectedToken { token: format!("'{token}'"),
                                               line:  lexeme.line, },
    }
}

/// Returns the first unrecognized token of a line as an error.
pub(in crate::interpreter::parser) fn scan_unknown(tokens: &[Lexeme]) -> Option<ParseError> {
    tokens.iter()
          .find(|lexeme| matches!(lexeme.token, Token::Unknown(_)))
          .map(unexpected)
}

/// Nesting change caused by a token: `+1` for openers, `-1` for closers.
const fn nesting(token: &Token) -> isize {
    match token {
        Token::LParen | Token::LBracket | Token::LBrace => 1,
        Token::RParen | Token::RBracket | Token::RBrace => -1,
        _ => 0,
    }
}

/// Finds the first token at nesting depth zero that satisfies `pred`.
///
/// Strings are single tokens, so quoted separators never match.
pub(in crate::interpreter::parser) fn find_top_level(tokens: &[Lexeme],
                                                     pred: impl Fn(&Token) -> bool)
                                                     -> Option<usize> {
    let mut depth = 0isize;
    for (index, lexeme) in tokens.iter().enumerate() {
        if depth == 0 && pred(&lexeme.token) {
            return Some(index);
        }
        depth += nesting(&lexeme.token);
    }
    None
}

/// Splits a token run on commas at nesting depth zero.
///
/// An empty run yields no pieces.
pub(in crate::interpreter::parser) fn split_top_level_commas(tokens: &[Lexeme]) -> Vec<&[Lexeme]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (index, lexeme) in tokens.iter().enumerate() {
        if depth == 0 && lexeme.token == Token::Comma {
            pieces.push(&tokens[start..index]);
            start = index + 1;
        }
        depth += nesting(&lexeme.token);
    }
    pieces.push(&tokens[start..]);
    pieces
}

/// Index of the token closing the opener at `open`, if it is on this line.
pub(in crate::interpreter::parser) fn closing_index(tokens: &[Lexeme], open: usize) -> Option<usize> {
    let mut depth = 0isize;
    for (index, lexeme) in tokens.iter().enumerate().skip(open) {
        depth += nesting(&lexeme.token);
        if depth == 0 {
            return Some(index);
        }
    }
    None
}

/// `true` when no whitespace separates the two tokens.
pub(in crate::interpreter::parser) const fn adjacent(first: &Lexeme, second: &Lexeme) -> bool {
    first.span.end == second.span.start
}

/// The source text covered by a token run, taken from the line itself.
pub(in crate::interpreter::parser) fn source_text(text: &str, tokens: &[Lexeme]) -> String {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => {
            text.get(first.span.start..last.span.end)
                .map_or_else(|| join_tokens(tokens), str::to_string)
        },
        _ => String::new(),
    }
}

fn join_tokens(tokens: &[Lexeme]) -> String {
    tokens.iter()
          .map(|lexeme| lexeme.token.to_string())
          .collect::<Vec<_>>()
          .join(" ")
}
