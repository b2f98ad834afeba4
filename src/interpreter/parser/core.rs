use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Lexeme,
        parser::{binary::parse_logical_or, utils::unexpected},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, logical OR, and recursively descends through the
/// precedence hierarchy. Parsing stops at the first token that cannot
/// continue the expression, which is left in the stream.
///
/// Grammar: `expression := logical_or`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_logical_or(tokens)
}

/// Parses a token run that must form exactly one expression.
///
/// # Errors
/// `UnexpectedEndOfLine` for an empty run, `UnexpectedToken` (or the matching
/// lexical error) for leftover tokens.
///
/// # Example
/// ```
/// use nepa::{
///     ast::{BinaryOperator, Expr},
///     interpreter::{lexer::tokenize, parser::core::parse_complete_expression},
/// };
///
/// let lexemes = tokenize("1 + 2 * 3");
/// let expr = parse_complete_expression(&lexemes[..lexemes.len() - 1], 1).unwrap();
/// assert!(matches!(expr, Expr::Binary { op: BinaryOperator::Add, .. }));
///
/// let lexemes = tokenize("1 2");
/// assert!(parse_complete_expression(&lexemes[..lexemes.len() - 1], 1).is_err());
/// ```
pub fn parse_complete_expression(tokens: &[Lexeme], line: usize) -> ParseResult<Expr> {
    let mut iter = tokens.iter().peekable();
    if iter.peek().is_none() {
        return Err(ParseError::UnexpectedEndOfLine { line });
    }
    let expr = parse_expression(&mut iter)?;
    match iter.next() {
        Some(extra) => Err(unexpected(extra)),
        None => Ok(expr),
    }
}
