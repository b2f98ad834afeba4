use crate::{
    ast::{DeclarationScope, Expr, Statement, TypeSpec},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{ParseResult, parse_complete_expression},
            utils::source_text,
        },
    },
};

/// Words that wrap a base type when followed by another type or by `[]`.
pub const COMPOSITE_MARKERS: &[&str] =
    &["puntero", "matriz", "diccionario", "objeto", "lista", "estructura"];

/// Returns `true` if a line starting with `tokens` is a declaration that
/// begins directly with a composite marker (`lista entero xs`, `puntero p`).
pub(crate) fn starts_with_marker(tokens: &[Lexeme]) -> bool {
    match tokens {
        [Lexeme { token: Token::Identifier(word),
                  .. },
         next,
         ..] => {
            COMPOSITE_MARKERS.contains(&word.as_str())
            && matches!(next.token, Token::Identifier(_) | Token::LBracket)
        },
        _ => false,
    }
}

/// Parses the part of a declaration that follows its scope keyword.
///
/// Grammar:
/// ```text
///     declaration := type_spec? name ("," name)* ((":=" | "=") initializer)?
///     type_spec   := marker* ("[" "]")* base ("[" "]")*
/// ```
/// The type is mandatory for `variable` and optional for `global` and
/// `constante`; a `constante` needs an initializer. An initializer that does
/// not parse as an expression is kept as raw text and read with the literal
/// parser at run time, so `variable fecha f := 2024-01-15` and
/// `variable texto t := hola mundo` both work.
///
/// # Errors
/// `MalformedDeclaration` for a shape mismatch, `UnknownType` for a type
/// token that names no registered type, and `UnterminatedLiteral` or
/// `LiteralTooLarge` from the initializer.
pub(crate) fn parse_declaration(scope: DeclarationScope,
                                tokens: &[Lexeme],
                                text: &str,
                                types: &[String],
                                line: usize)
                                -> ParseResult<Statement> {
    let malformed = |details: &str| ParseError::MalformedDeclaration { details: details.to_string(),
                                                                       line };
    let mut pos = 0;
    let type_spec = parse_type_spec(tokens, &mut pos, scope, types, line)?;

    let mut names = Vec::new();
    loop {
        match tokens.get(pos).map(|l| &l.token) {
            Some(Token::Identifier(name)) => names.push(name.clone()),
            _ => return Err(malformed("se esperaba el nombre de la variable")),
        }
        pos += 1;
        if tokens.get(pos).map(|l| &l.token) == Some(&Token::Comma) {
            pos += 1;
        } else {
            break;
        }
    }

    let value = match tokens.get(pos).map(|l| &l.token) {
        None => None,
        Some(Token::ColonEquals | Token::Equals) => {
            let rest = &tokens[pos + 1..];
            if rest.is_empty() {
                return Err(malformed("falta el valor inicial después de ':='"));
            }
            Some(parse_initializer(rest, text, line)?)
        },
        Some(other) => return Err(malformed(&format!("símbolo inesperado '{other}'"))),
    };

    if scope == DeclarationScope::Constant && value.is_none() {
        return Err(malformed("una constante necesita un valor"));
    }

    Ok(Statement::Declaration { scope,
                                type_spec,
                                names,
                                value,
                                line })
}

fn parse_type_spec(tokens: &[Lexeme],
                   pos: &mut usize,
                   scope: DeclarationScope,
                   types: &[String],
                   line: usize)
                   -> ParseResult<Option<TypeSpec>> {
    let is_type = |name: &str| types.iter().any(|t| t == name);
    let token_at = |index: usize| tokens.get(index).map(|l| &l.token);

    let mut markers = Vec::new();
    let mut dims = 0;
    while let Some(Token::Identifier(word)) = token_at(*pos)
          && COMPOSITE_MARKERS.contains(&word.as_str())
    {
        match token_at(*pos + 1) {
            Some(Token::LBracket) => {
                markers.push(word.clone());
                *pos += 1;
                dims += parse_dims(tokens, pos, line)?;
            },
            Some(Token::Identifier(next)) if is_type(next) => {
                markers.push(word.clone());
                *pos += 1;
            },
            _ => break,
        }
    }
    dims += parse_dims(tokens, pos, line)?;

    match token_at(*pos) {
        Some(Token::Identifier(base)) if is_type(base) => {
            *pos += 1;
            dims += parse_dims(tokens, pos, line)?;
            Ok(Some(TypeSpec { markers,
                               dims,
                               base: base.clone() }))
        },
        Some(Token::Identifier(word)) if matches!(token_at(*pos + 1), Some(Token::Identifier(_))) => {
            Err(ParseError::UnknownType { name: word.clone(),
                                          line })
        },
        _ if markers.is_empty() && dims == 0 && scope != DeclarationScope::Variable => Ok(None),
        _ => Err(ParseError::MalformedDeclaration { details: "falta el tipo de la variable".to_string(),
                                                    line }),
    }
}

/// Consumes `[]` pairs and returns how many there were.
fn parse_dims(tokens: &[Lexeme], pos: &mut usize, line: usize) -> ParseResult<usize> {
    let mut dims = 0;
    while tokens.get(*pos).map(|l| &l.token) == Some(&Token::LBracket) {
        if tokens.get(*pos + 1).map(|l| &l.token) != Some(&Token::RBracket) {
            return Err(ParseError::MalformedDeclaration { details: "se esperaba '[]' en el tipo".to_string(),
                                                          line });
        }
        *pos += 2;
        dims += 1;
    }
    Ok(dims)
}

fn parse_initializer(tokens: &[Lexeme], text: &str, line: usize) -> ParseResult<Expr> {
    match parse_complete_expression(tokens, line) {
        Ok(expr) => Ok(expr),
        Err(error @ (ParseError::UnterminatedLiteral { .. } | ParseError::LiteralTooLarge { .. })) => {
            Err(error)
        },
        Err(_) => Ok(Expr::Raw { text: source_text(text, tokens),
                                 line }),
    }
}
