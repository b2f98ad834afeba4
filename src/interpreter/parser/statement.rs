use crate::{
    ast::{Accessor, AssignTarget, DeclarationScope, Expr, ForSource, Param, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{ParseResult, parse_complete_expression, parse_expression},
            declaration::{parse_declaration, starts_with_marker},
            utils::{
                adjacent, closing_index, expect, find_top_level, split_top_level_commas, unexpected,
            },
        },
    },
};

/// One parsed source line: either a complete statement or a block header
/// that still needs its indented body.
#[derive(Debug)]
pub(crate) enum Line {
    /// A statement that owns no block.
    Simple(Statement),
    /// A `...:` header.
    Header(Header),
}

/// A block header, before its body is attached.
#[derive(Debug)]
pub(crate) enum Header {
    /// `si_es cond:`
    If(Expr),
    /// `pero_si cond:`
    ElseIf(Expr),
    /// `si_no:`
    Else,
    /// `mientras cond:`
    While(Expr),
    /// `para x desde .. hasta ..:` or `para x en ..:`
    For { variable: String, source: ForSource },
    /// `funcion nombre(params):`
    Function { name: String, params: Vec<Param> },
}

impl Header {
    /// The keyword that opened the header.
    pub(crate) const fn keyword(&self) -> &'static str {
        match self {
            Self::If(_) => "si_es",
            Self::ElseIf(_) => "pero_si",
            Self::Else => "si_no",
            Self::While(_) => "mientras",
            Self::For { .. } => "para",
            Self::Function { .. } => "funcion",
        }
    }
}

/// Parses the tokens of one line (without its trailing newline).
///
/// Dispatch is by the shape of the line: scope keywords and composite
/// markers start declarations, header keywords need a trailing `:`,
/// `regresa`, `rompe` and `ejecutar` are keywords, a top-level `:=` or `=`
/// makes an assignment, `nombre(args)` spanning the whole line is a call, an
/// identifier followed by an operand is a command-form call and anything else
/// is an expression statement.
///
/// `text` is the source line, used to recover raw initializer text; `types`
/// are the type names a declaration may use.
pub(crate) fn parse_line(tokens: &[Lexeme], text: &str, types: &[String]) -> ParseResult<Line> {
    let Some(first) = tokens.first() else {
        return Err(ParseError::UnexpectedEndOfLine { line: 0 });
    };
    let line = first.line;
    let rest = &tokens[1..];

    let statement = match &first.token {
        Token::Variable => parse_declaration(DeclarationScope::Variable, rest, text, types, line)?,
        Token::Global => parse_declaration(DeclarationScope::Global, rest, text, types, line)?,
        Token::Constant => parse_declaration(DeclarationScope::Constant, rest, text, types, line)?,
        Token::Identifier(_) if starts_with_marker(tokens) => {
            parse_declaration(DeclarationScope::Variable, tokens, text, types, line)?
        },
        Token::If | Token::ElseIf | Token::Else | Token::While | Token::For | Token::Function => {
            return parse_header(tokens, types).map(Line::Header);
        },
        Token::Return => Statement::Return { value: if rest.is_empty() {
                                                 None
                                             } else {
                                                 Some(parse_complete_expression(rest, line)?)
                                             },
                                             line },
        Token::Break => match rest.first() {
            None => Statement::Break { line },
            Some(extra) => return Err(unexpected(extra)),
        },
        Token::Invoke => parse_invoke(rest, line)?,
        _ => parse_simple(tokens, line)?,
    };
    Ok(Line::Simple(statement))
}

fn parse_invoke(tokens: &[Lexeme], line: usize) -> ParseResult<Statement> {
    let mut pieces = split_top_level_commas(tokens).into_iter();
    let path = parse_complete_expression(pieces.next().unwrap_or_default(), line)?;
    let arguments = pieces.map(|piece| parse_complete_expression(piece, line))
                          .collect::<ParseResult<Vec<_>>>()?;
    Ok(Statement::Invoke { path,
                           arguments,
                           line })
}

/// Assignments, calls and expression statements.
fn parse_simple(tokens: &[Lexeme], line: usize) -> ParseResult<Statement> {
    if let Some(index) = find_top_level(tokens, |t| matches!(t, Token::ColonEquals | Token::Equals)) {
        let target = parse_complete_expression(&tokens[..index], line)?;
        let value = parse_complete_expression(&tokens[index + 1..], line)?;
        return Ok(Statement::Assignment { target: to_target(target, &tokens[index])?,
                                          value,
                                          line });
    }

    if let [Lexeme { token: Token::Identifier(name),
                     .. },
            open,
            ..] = tokens
    {
        if open.token == Token::LParen
           && adjacent(&tokens[0], open)
           && closing_index(tokens, 1) == Some(tokens.len() - 1)
        {
            return Ok(Statement::Call { name: name.clone(),
                                        arguments: parse_pieces(&tokens[2..tokens.len() - 1], line)?,
                                        line });
        }
        if is_command_form(tokens) {
            return Ok(Statement::Call { name: name.clone(),
                                        arguments: parse_pieces(&tokens[1..], line)?,
                                        line });
        }
    }

    Ok(Statement::Expression { expr: parse_complete_expression(tokens, line)?,
                               line })
}

fn parse_pieces(tokens: &[Lexeme], line: usize) -> ParseResult<Vec<Expr>> {
    split_top_level_commas(tokens).into_iter()
                                  .map(|piece| parse_complete_expression(piece, line))
                                  .collect()
}

/// An identifier followed by the start of an operand is a command-form
/// call. Prefix `* & - +` only count when written with a space before and
/// none after (`imprimir *p` versus `a * b`); `(` and `[` only when
/// separated from the name (`imprimir (a)` versus `f(a)`).
fn is_command_form(tokens: &[Lexeme]) -> bool {
    let [first, second, ..] = tokens else {
        return false;
    };
    match second.token {
        Token::LParen | Token::LBracket => !adjacent(first, second),
        Token::Star | Token::Ampersand | Token::Minus | Token::Plus => {
            !adjacent(first, second) && tokens.get(2).is_some_and(|third| adjacent(second, third))
        },
        ref token => token.starts_operand(),
    }
}

/// Converts a parsed left-hand side into an assignment target.
fn to_target(expr: Expr, operator: &Lexeme) -> ParseResult<AssignTarget> {
    let invalid = || ParseError::UnexpectedToken { token: format!("'{}' (destino de asignación inválido)",
                                                                  operator.token),
                                                   line:  operator.line, };
    let mut steps = Vec::new();
    let mut current = expr;
    loop {
        match current {
            Expr::Variable { name, .. } if steps.is_empty() => return Ok(AssignTarget::Variable(name)),
            Expr::Variable { name, .. } => {
                steps.reverse();
                return Ok(AssignTarget::Path { root: name,
                                               steps });
            },
            Expr::Deref { expr, .. } if steps.is_empty() => return Ok(AssignTarget::Deref(*expr)),
            Expr::Index { target, index, .. } => {
                steps.push(Accessor::Index(*index));
                current = *target;
            },
            Expr::Field { target, field, .. } => {
                steps.push(Accessor::Field(field));
                current = *target;
            },
            _ => return Err(invalid()),
        }
    }
}

fn parse_header(tokens: &[Lexeme], types: &[String]) -> ParseResult<Header> {
    let first = &tokens[0];
    let line = first.line;
    let keyword = first.token.to_string();
    let body = match tokens[1..].split_last() {
        Some((Lexeme { token: Token::Colon,
                       .. },
              body)) => body,
        _ => {
            return Err(ParseError::ExpectedColon { header: keyword,
                                                   line });
        },
    };

    match first.token {
        Token::If => Ok(Header::If(parse_complete_expression(body, line)?)),
        Token::ElseIf => Ok(Header::ElseIf(parse_complete_expression(body, line)?)),
        Token::While => Ok(Header::While(parse_complete_expression(body, line)?)),
        Token::Else => match body.first() {
            None => Ok(Header::Else),
            Some(extra) => Err(unexpected(extra)),
        },
        Token::For => parse_for_header(body, line),
        _ => parse_function_header(body, types, line),
    }
}

/// `variable (desde start hasta end [incremento step] | en collection)`
fn parse_for_header(tokens: &[Lexeme], line: usize) -> ParseResult<Header> {
    let mut iter = tokens.iter().peekable();
    let variable = match iter.next() {
        Some(Lexeme { token: Token::Identifier(name),
                      .. }) => name.clone(),
        Some(other) => return Err(unexpected(other)),
        None => return Err(ParseError::UnexpectedEndOfLine { line }),
    };

    let source = match iter.next() {
        Some(Lexeme { token: Token::From,
                      .. }) => {
            let start = parse_expression(&mut iter)?;
            expect(&mut iter, &Token::To, line)?;
            let end = parse_expression(&mut iter)?;
            let step = match iter.next() {
                Some(Lexeme { token: Token::Step,
                              .. }) => Some(parse_expression(&mut iter)?),
                Some(other) => return Err(unexpected(other)),
                None => None,
            };
            ForSource::Range { start, end, step }
        },
        Some(Lexeme { token: Token::In,
                      .. }) => {
            let rest: Vec<Lexeme> = iter.cloned().collect();
            ForSource::Collection(parse_complete_expression(&rest, line)?)
        },
        Some(other) => return Err(unexpected(other)),
        None => return Err(ParseError::UnexpectedEndOfLine { line }),
    };

    Ok(Header::For { variable, source })
}

/// `nombre "(" [tipo] param ("," [tipo] param)* ")"`
fn parse_function_header(tokens: &[Lexeme], types: &[String], line: usize) -> ParseResult<Header> {
    let name = match tokens.first() {
        Some(Lexeme { token: Token::Identifier(name),
                      .. }) => name.clone(),
        Some(other) => return Err(unexpected(other)),
        None => return Err(ParseError::UnexpectedEndOfLine { line }),
    };
    match tokens.get(1) {
        Some(Lexeme { token: Token::LParen,
                      .. }) => {},
        Some(other) => return Err(unexpected(other)),
        None => return Err(ParseError::UnexpectedEndOfLine { line }),
    }
    if closing_index(tokens, 1) != Some(tokens.len() - 1) {
        return Err(ParseError::UnexpectedEndOfLine { line });
    }

    let params = split_top_level_commas(&tokens[2..tokens.len() - 1]);
    let params = params.into_iter()
                       .map(|piece| parse_param(piece, types, line))
                       .collect::<ParseResult<_>>()?;
    Ok(Header::Function { name, params })
}

fn parse_param(tokens: &[Lexeme], types: &[String], line: usize) -> ParseResult<Param> {
    match tokens {
        [Lexeme { token: Token::Identifier(name),
                  .. }] => Ok(Param { name:      name.clone(),
                                      type_name: None, }),
        [Lexeme { token: Token::Identifier(type_name),
                  .. },
         Lexeme { token: Token::Identifier(name),
                  .. }] => {
            if !types.iter().any(|t| t == type_name) {
                return Err(ParseError::UnknownType { name: type_name.clone(),
                                                     line });
            }
            Ok(Param { name:      name.clone(),
                       type_name: Some(type_name.clone()), })
        },
        [] => Err(ParseError::UnexpectedEndOfLine { line }),
        [_, .., extra] => Err(unexpected(extra)),
        [other] => Err(unexpected(other)),
    }
}
