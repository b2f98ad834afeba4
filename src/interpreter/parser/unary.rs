use std::iter::Peekable;

use crate::{
    ast::{Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect, expect_identifier, parse_comma_separated, unexpected},
        },
        value::{
            core::Value,
            temporal::{Date, Duration, TimeOfDay},
        },
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operators `-`, `+`, `!`, `&` (reference) and `*`
/// (dereference) as well as casts. Prefix operators are right-associative,
/// so `!-x` parses as `!(-x)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "+" | "!" | "&" | "*") unary
///            | cast unary
///            | primary postfix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let Some(lexeme) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfLine { line: 0 });
    };
    let line = lexeme.line;

    let op = match lexeme.token {
        Token::Minus => Some(UnaryOperator::Negate),
        Token::Plus => Some(UnaryOperator::Plus),
        Token::Bang => Some(UnaryOperator::Not),
        _ => None,
    };
    if let Some(op) = op {
        tokens.next();
        let expr = parse_unary(tokens)?;
        return Ok(Expr::Unary { op,
                                expr: Box::new(expr),
                                line });
    }

    match lexeme.token {
        Token::Ampersand => {
            tokens.next();
            let expr = parse_unary(tokens)?;
            Ok(Expr::Reference { expr: Box::new(expr),
                                 line })
        },
        Token::Star => {
            tokens.next();
            let expr = parse_unary(tokens)?;
            Ok(Expr::Deref { expr: Box::new(expr),
                             line })
        },
        Token::LParen => match cast_header(tokens) {
            Some((type_name, pointer)) => {
                let expr = parse_unary(tokens)?;
                Ok(Expr::Cast { type_name,
                                pointer,
                                expr: Box::new(expr),
                                line })
            },
            None => {
                let primary = parse_primary(tokens)?;
                parse_postfix(tokens, primary)
            },
        },
        _ => {
            let primary = parse_primary(tokens)?;
            parse_postfix(tokens, primary)
        },
    }
}

/// Recognizes a cast prefix and consumes it.
///
/// Casts are syntactic: `(tipo)` followed by the start of an operand,
/// `(puntero tipo)` or `(tipo*)`. The stream is left untouched when the
/// parenthesis opens an ordinary group.
fn cast_header<'a, I>(tokens: &mut Peekable<I>) -> Option<(String, bool)>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    let Some(Token::Identifier(first)) = lookahead.next().map(|l| &l.token) else {
        return None;
    };

    let (type_name, pointer) = match lookahead.next().map(|l| &l.token) {
        Some(Token::RParen) => {
            if !lookahead.peek().is_some_and(|next| next.token.starts_operand()) {
                return None;
            }
            (first.clone(), false)
        },
        Some(Token::Identifier(second)) if first == "puntero" => {
            if lookahead.next().map(|l| &l.token) != Some(&Token::RParen) {
                return None;
            }
            (second.clone(), true)
        },
        Some(Token::Star) => {
            if lookahead.next().map(|l| &l.token) != Some(&Token::RParen) {
                return None;
            }
            (first.clone(), true)
        },
        _ => return None,
    };

    *tokens = lookahead;
    Some((type_name, pointer))
}

/// Parses a primary (atomic) expression.
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | date [time] | time | duration
///              | identifier ["(" arguments ")"]
///              | "(" expression ")"
///              | "[" elements "]"
///              | "{" key ":" value, ... "}"
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let lexeme = tokens.next()
                       .ok_or(ParseError::UnexpectedEndOfLine { line: 0 })?;
    let line = lexeme.line;
    let literal = |value: Value| -> ParseResult<Expr> { Ok(Expr::Literal { value, line }) };

    match &lexeme.token {
        Token::Integer(i) => literal(Value::Integer(*i)),
        Token::Real(r) => literal(Value::Real(*r)),
        Token::Str(s) => literal(Value::String(s.clone())),
        Token::Char(c) => literal(Value::Character(*c)),
        Token::Bool(b) => literal(Value::Boolean(*b)),
        Token::Null => literal(Value::Object(None)),
        Token::Date(text) => {
            let date = text.parse::<Date>().map_err(|_| unexpected(lexeme))?;
            if let Some(Lexeme { token: Token::Time(time),
                                 .. }) = tokens.peek()
            {
                let time = time.parse::<TimeOfDay>().map_err(|_| unexpected(lexeme))?;
                tokens.next();
                return literal(Value::Date(date.with_time(time)));
            }
            literal(Value::Date(date))
        },
        Token::Time(text) => {
            literal(Value::Time(text.parse::<TimeOfDay>().map_err(|_| unexpected(lexeme))?))
        },
        Token::Duration(text) => {
            literal(Value::Duration(text.parse::<Duration>().map_err(|_| unexpected(lexeme))?))
        },
        Token::Identifier(name) => {
            if let Some(Lexeme { token: Token::LParen,
                                 .. }) = tokens.peek()
            {
                tokens.next();
                let arguments = parse_arguments(tokens, line)?;
                return Ok(Expr::Call { name: name.clone(),
                                       arguments,
                                       line });
            }
            Ok(Expr::Variable { name: name.clone(),
                                line })
        },
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, line)?;
            Ok(expr)
        },
        Token::LBracket => {
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket, line)?;
            Ok(Expr::List { elements, line })
        },
        Token::LBrace => {
            let entries = parse_comma_separated(tokens, parse_entry, &Token::RBrace, line)?;
            Ok(Expr::Dict { entries, line })
        },
        _ => Err(unexpected(lexeme)),
    }
}

/// Parses one `key: value` dictionary entry.
fn parse_entry<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<(Expr, Expr)>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    let key = parse_expression(tokens)?;
    expect(tokens, &Token::Colon, key.line_number())?;
    let value = parse_expression(tokens)?;
    Ok((key, value))
}

/// Parses call arguments after the opening parenthesis.
pub(crate) fn parse_arguments<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    parse_comma_separated(tokens, parse_expression, &Token::RParen, line)
}

/// Parses postfix operators applied to an expression.
///
/// Handles chained indexing (`m[0][1]`), field access (`d.campo`) and method
/// calls (`xs.agregar(4)`), left to right.
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "[" expression "]"
///              | postfix "." identifier ["(" arguments ")"]
/// ```
pub(crate) fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut expr: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme> + Clone
{
    loop {
        match tokens.peek().map(|l| (&l.token, l.line)) {
            Some((Token::LBracket, line)) => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect(tokens, &Token::RBracket, line)?;
                expr = Expr::Index { target: Box::new(expr),
                                     index: Box::new(index),
                                     line };
            },
            Some((Token::Dot, line)) => {
                tokens.next();
                let name = expect_identifier(tokens, line)?;
                if let Some(Lexeme { token: Token::LParen,
                                     .. }) = tokens.peek()
                {
                    tokens.next();
                    let arguments = parse_arguments(tokens, line)?;
                    expr = Expr::MethodCall { receiver: Box::new(expr),
                                              method: name,
                                              arguments,
                                              line };
                } else {
                    expr = Expr::Field { target: Box::new(expr),
                                         field: name,
                                         line };
                }
            },
            _ => return Ok(expr),
        }
    }
}
