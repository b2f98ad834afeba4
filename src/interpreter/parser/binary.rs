use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses one left-associative precedence level.
///
/// The rule is: `level := next (op next)*` where `op` is one of `operators`.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 next: fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 operators: &[BinaryOperator])
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut left = next(tokens)?;
    while let Some(lexeme) = tokens.peek()
          && let Some(op) = token_to_binary_operator(&lexeme.token)
          && operators.contains(&op)
    {
        let line = lexeme.line;
        tokens.next();
        let right = next(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              line };
    }
    Ok(left)
}

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_left_associative(tokens, parse_logical_and, &[BinaryOperator::Or])
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := equality ("&&" equality)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_left_associative(tokens, parse_equality, &[BinaryOperator::And])
}

/// Parses `==` and `!=`.
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_left_associative(tokens,
                           parse_relational,
                           &[BinaryOperator::Equal, BinaryOperator::NotEqual])
}

/// Parses `<`, `>`, `<=` and `>=`.
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_left_associative(tokens,
                           parse_additive,
                           &[BinaryOperator::Less,
                             BinaryOperator::Greater,
                             BinaryOperator::LessEqual,
                             BinaryOperator::GreaterEqual])
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_left_associative(tokens,
                           parse_multiplicative,
                           &[BinaryOperator::Add, BinaryOperator::Sub])
}

/// Parses multiplication-level expressions: `*`, `/` and `%`.
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_left_associative(tokens,
                           parse_unary,
                           &[BinaryOperator::Mul, BinaryOperator::Div, BinaryOperator::Mod])
}

/// Maps a token to the binary operator it spells, if any.
///
/// # Example
/// ```
/// use nepa::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::AndAnd), Some(BinaryOperator::And));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::Percent => BinaryOperator::Mod,
        Token::Less => BinaryOperator::Less,
        Token::Greater => BinaryOperator::Greater,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::AndAnd => BinaryOperator::And,
        Token::OrOr => BinaryOperator::Or,
        _ => return None,
    })
}
