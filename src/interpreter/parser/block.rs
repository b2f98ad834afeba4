use std::iter::Peekable;

use tracing::trace;

use crate::{
    ast::{Block, Expr, FunctionDef, ReturnKind, Statement},
    error::{ParseError, ParseErrors},
    interpreter::{
        lexer::{Lexeme, Token, Tokenizer},
        parser::{
            statement::{Header, Line, parse_line},
            utils::scan_unknown,
        },
        value::core::Value,
    },
};

/// Parses a whole program into its top-level block.
///
/// Parsing never stops at the first error: a line that fails becomes an
/// inert [`Statement::Error`] node, the error is collected, and sibling lines
/// keep parsing. `types` lists the type names declarations may use.
///
/// # Example
/// ```
/// use nepa::{ast::Statement, interpreter::parser::block::parse_program};
///
/// let types = vec!["entero".to_string()];
/// let (program, errors) = parse_program("variable entero a := 1\nsi_es a > 0:\n    imprimir a\n",
///                                       &types);
/// assert!(errors.is_empty());
/// assert_eq!(program.statements.len(), 2);
/// assert!(matches!(program.statements[1], Statement::Conditional { .. }));
///
/// let (_, errors) = parse_program("  x := 1\nvariable numero y\n", &types);
/// assert_eq!(errors.len(), 2);
/// ```
#[must_use]
pub fn parse_program(source: &str, types: &[String]) -> (Block, ParseErrors) {
    let mut parser = BlockParser { lexemes: Tokenizer::new(source).peekable(),
                                   lines: source.lines().collect(),
                                   types,
                                   errors: Vec::new() };
    let program = parser.parse_block(0, 1);
    (program, ParseErrors(parser.errors))
}

/// Owns the indentation state while turning lexemes into nested blocks.
struct BlockParser<'src, 't, I: Iterator<Item = Lexeme>> {
    lexemes: Peekable<I>,
    lines:   Vec<&'src str>,
    types:   &'t [String],
    errors:  Vec<ParseError>,
}

impl<I: Iterator<Item = Lexeme>> BlockParser<'_, '_, I> {
    /// Parses statements at `depth` until the matching dedent or the end of
    /// input.
    fn parse_block(&mut self, depth: usize, line: usize) -> Block {
        let mut statements = Vec::new();

        while let Some((current, token)) = self.lexemes.peek().map(|l| (l.line, l.token.clone())) {
            match token {
                Token::Dedent => {
                    self.lexemes.next();
                    break;
                },
                Token::Indent => {
                    self.lexemes.next();
                    self.report(&mut statements,
                                ParseError::UnexpectedIndentation { expected: depth,
                                                                    found:    depth + 1,
                                                                    line:     current, });
                    self.parse_block(depth + 1, current);
                },
                Token::IrregularIndent(width) => {
                    self.lexemes.next();
                    let tokens = self.take_line();
                    self.report(&mut statements,
                                ParseError::IrregularIndentation { width,
                                                                   line: current });
                    if ends_with_colon(&tokens) && self.at_indent() {
                        self.lexemes.next();
                        self.parse_block(depth + 1, current);
                    }
                },
                _ => {
                    let tokens = self.take_line();
                    self.parse_line_into(&tokens, depth, &mut statements);
                },
            }
        }

        let line = statements_line(&statements, line);
        Block { statements, line }
    }

    fn parse_line_into(&mut self, tokens: &[Lexeme], depth: usize, statements: &mut Vec<Statement>) {
        let Some(line) = tokens.first().map(|l| l.line) else {
            return;
        };
        let text = self.lines.get(line - 1).copied().unwrap_or_default();
        trace!(line, depth, "parsing line");

        let parsed = match scan_unknown(tokens) {
            Some(error) if !is_declaration(tokens) => Err(error),
            _ => parse_line(tokens, text, self.types),
        };

        match parsed {
            Ok(Line::Simple(statement)) => statements.push(statement),
            Ok(Line::Header(header)) => {
                let keyword = header.keyword();
                if !self.at_indent() {
                    self.report(statements,
                                ParseError::EmptyBlock { header: keyword.to_string(),
                                                         line });
                    return;
                }
                self.lexemes.next();
                let body = self.parse_block(depth + 1, line);
                self.attach(header, body, line, statements);
            },
            Err(error) => {
                let error = match error {
                    ParseError::UnexpectedEndOfLine { line: 0 } => ParseError::UnexpectedEndOfLine { line },
                    other => other,
                };
                self.report(statements, error);
                if ends_with_colon(tokens) && self.at_indent() {
                    self.lexemes.next();
                    self.parse_block(depth + 1, line);
                }
            },
        }
    }

    /// Turns a header and its body into a statement, attaching `pero_si` and
    /// `si_no` to the preceding `si_es`.
    fn attach(&mut self, header: Header, body: Block, line: usize, statements: &mut Vec<Statement>) {
        let statement = match header {
            Header::If(condition) => Statement::Conditional { branches: vec![(condition, body)],
                                                              otherwise: None,
                                                              line },
            Header::ElseIf(condition) => {
                if let Some(Statement::Conditional { branches,
                                                     otherwise: None,
                                                     .. }) = statements.last_mut()
                {
                    branches.push((condition, body));
                    return;
                }
                return self.report(statements,
                                   ParseError::OrphanBranch { keyword: "pero_si".to_string(),
                                                              line });
            },
            Header::Else => {
                if let Some(Statement::Conditional { otherwise: otherwise @ None,
                                                     .. }) = statements.last_mut()
                {
                    *otherwise = Some(body);
                    return;
                }
                return self.report(statements,
                                   ParseError::OrphanBranch { keyword: "si_no".to_string(),
                                                              line });
            },
            Header::While(condition) => Statement::While { condition,
                                                           body,
                                                           line },
            Header::For { variable, source } => Statement::For { variable,
                                                                 source,
                                                                 body,
                                                                 line },
            Header::Function { name, params } => {
                let return_kind = infer_return_kind(&body);
                Statement::Function(FunctionDef { name,
                                                  params,
                                                  body,
                                                  return_kind,
                                                  line })
            },
        };
        statements.push(statement);
    }

    /// Collects the tokens of the current line and consumes its newline.
    fn take_line(&mut self) -> Vec<Lexeme> {
        let mut tokens = Vec::new();
        for lexeme in self.lexemes.by_ref() {
            if lexeme.token == Token::Newline {
                break;
            }
            tokens.push(lexeme);
        }
        tokens
    }

    fn at_indent(&mut self) -> bool {
        self.lexemes.peek().is_some_and(|l| l.token == Token::Indent)
    }

    /// Records an error and leaves an inert node in its place.
    fn report(&mut self, statements: &mut Vec<Statement>, error: ParseError) {
        statements.push(Statement::Error { message: error.to_string(),
                                           line:    error.line(), });
        self.errors.push(error);
    }
}

fn ends_with_colon(tokens: &[Lexeme]) -> bool {
    tokens.last().is_some_and(|l| l.token == Token::Colon)
}

/// Declarations tolerate unknown characters in their initializer, which is
/// then kept as raw text.
fn is_declaration(tokens: &[Lexeme]) -> bool {
    matches!(tokens.first().map(|l| &l.token),
             Some(Token::Variable | Token::Global | Token::Constant))
}

fn statements_line(statements: &[Statement], fallback: usize) -> usize {
    statements.first().map_or(fallback, Statement::line_number)
}

/// Infers a function's return kind from the first `regresa` in its body.
///
/// A dotted numeric literal is real, a quoted literal text, a list of lists
/// a matrix, a list a list, an integer literal or a bare `regresa` an
/// integer; any other expression is returned as computed. A body without
/// `regresa` returns an integer.
///
/// # Example
/// ```
/// use nepa::{
///     ast::{ReturnKind, Statement},
///     interpreter::parser::block::{infer_return_kind, parse_program},
/// };
///
/// let (program, _) = parse_program("funcion f():\n    regresa 1.5\n", &[]);
/// let Statement::Function(def) = &program.statements[0] else { panic!() };
/// assert_eq!(infer_return_kind(&def.body), ReturnKind::Real);
/// ```
#[must_use]
pub fn infer_return_kind(body: &Block) -> ReturnKind {
    match first_return(body) {
        None | Some(None) => ReturnKind::Integer,
        Some(Some(expr)) => match expr {
            Expr::Literal { value: Value::Real(_),
                            .. } => ReturnKind::Real,
            Expr::Literal { value: Value::Integer(_),
                            .. } => ReturnKind::Integer,
            Expr::Literal { value: Value::String(_) | Value::Text(_),
                            .. } => ReturnKind::Text,
            Expr::List { elements, .. }
                if !elements.is_empty() && elements.iter().all(|e| matches!(e, Expr::List { .. })) =>
            {
                ReturnKind::Matrix
            },
            Expr::List { .. } => ReturnKind::List,
            _ => ReturnKind::Dynamic,
        },
    }
}

/// The value of the first `regresa` reached in source order, descending
/// into nested blocks but not into nested function definitions.
fn first_return(block: &Block) -> Option<Option<&Expr>> {
    block.statements.iter().find_map(|statement| match statement {
                                         Statement::Return { value, .. } => Some(value.as_ref()),
                                         Statement::Conditional { branches,
                                                                  otherwise,
                                                                  .. } => {
                                             branches.iter()
                                                     .map(|(_, body)| body)
                                                     .chain(otherwise)
                                                     .find_map(first_return)
                                         },
                                         Statement::While { body, .. }
                                         | Statement::For { body, .. }
                                         | Statement::Block(body) => first_return(body),
                                         _ => None,
                                     })
}

/// Walks every statement with its nesting depth.
///
/// Used to check that block structure mirrors indentation.
pub fn visit_depths(block: &Block, depth: usize, visit: &mut impl FnMut(&Statement, usize)) {
    for statement in &block.statements {
        visit(statement, depth);
        match statement {
            Statement::Conditional { branches,
                                     otherwise,
                                     .. } => {
                for (_, body) in branches {
                    visit_depths(body, depth + 1, visit);
                }
                if let Some(body) = otherwise {
                    visit_depths(body, depth + 1, visit);
                }
            },
            Statement::While { body, .. } | Statement::For { body, .. } => {
                visit_depths(body, depth + 1, visit);
            },
            Statement::Function(def) => visit_depths(&def.body, depth + 1, visit),
            _ => {},
        }
    }
}
