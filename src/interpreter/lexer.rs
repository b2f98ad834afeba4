use std::{
    collections::VecDeque,
    fmt,
    iter::Enumerate,
    ops::Range,
    str::Lines,
};

use logos::{Lexer, Logos};

/// Width in columns of one indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Errors produced by the raw logos lexer.
///
/// The tokenizer never surfaces these directly: they degrade into
/// [`Token::Unknown`] so the parser can decide whether the line is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexError {
    /// A character that starts no token.
    #[default]
    UnknownCharacter,
    /// A `"` without its closing quote on the same line.
    UnterminatedString,
}

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Real literal tokens, such as `3.14` or `2.0`.
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),
    /// Date literal tokens, such as `2024-01-15`.
    #[regex(r"[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]", |lex| lex.slice().to_string())]
    Date(String),
    /// Time of day literal tokens, such as `10:30:00`.
    #[regex(r"[0-9][0-9]:[0-9][0-9]:[0-9][0-9]", |lex| lex.slice().to_string())]
    Time(String),
    /// Duration literal tokens, such as `2h30m` or `45s`.
    #[regex(r"([0-9]+[hms])+", |lex| lex.slice().to_string())]
    Duration(String),
    /// String literal tokens delimited by `"`.
    #[token("\"", lex_string)]
    Str(String),
    /// Character literal tokens, such as `'a'`.
    #[regex(r"'[^'\\]'", |lex| lex.slice().chars().nth(1))]
    Char(char),
    /// `verdadero` or `falso`.
    #[token("verdadero", |_| true)]
    #[token("falso", |_| false)]
    Bool(bool),
    /// `nulo`
    #[token("nulo")]
    Null,
    /// `variable`
    #[token("variable")]
    Variable,
    /// `constante`
    #[token("constante")]
    Constant,
    /// `global`
    #[token("global")]
    Global,
    /// `si_es`
    #[token("si_es")]
    If,
    /// `pero_si`
    #[token("pero_si")]
    ElseIf,
    /// `si_no`
    #[token("si_no")]
    Else,
    /// `mientras`
    #[token("mientras")]
    While,
    /// `para`
    #[token("para")]
    For,
    /// `desde`
    #[token("desde")]
    From,
    /// `hasta`
    #[token("hasta")]
    To,
    /// `incremento`
    #[token("incremento")]
    Step,
    /// `en`
    #[token("en")]
    In,
    /// `funcion`
    #[token("funcion")]
    Function,
    /// `regresa` or `regresa_valor`
    #[token("regresa")]
    #[token("regresa_valor")]
    Return,
    /// `rompe`
    #[token("rompe")]
    Break,
    /// `ejecutar`
    #[token("ejecutar")]
    Invoke,
    /// Identifier tokens; variable, function or type names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `# comments` running to the end of the line.
    #[token("#", skip_comment)]
    Comment,
    /// `:=`
    #[token(":=")]
    ColonEquals,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `!`
    #[token("!")]
    Bang,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// Text the lexer could not recognize. An unterminated string keeps its
    /// opening quote.
    Unknown(String),
    /// Indentation increased by one level.
    Indent,
    /// Indentation decreased by one level.
    Dedent,
    /// Leading whitespace that is not a multiple of [`INDENT_WIDTH`] spaces.
    IrregularIndent(usize),
    /// End of a logical line.
    Newline,
}

/// A token together with its line number and its byte span inside the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token.
    pub token: Token,
    /// 1-based source line.
    pub line:  usize,
    /// Byte range inside the line, indentation included.
    pub span:  Range<usize>,
}

/// Scans a string literal after its opening quote.
///
/// Supports `\n`, `\t`, `\"` and `\\` escapes.
fn lex_string(lex: &mut Lexer<Token>) -> Result<String, LexError> {
    let remainder = lex.remainder();
    let mut value = String::new();
    let mut chars = remainder.char_indices();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => {
                lex.bump(i + 1);
                return Ok(value);
            },
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, other)) => value.push(other),
                None => break,
            },
            _ => value.push(ch),
        }
    }

    lex.bump(remainder.len());
    Err(LexError::UnterminatedString)
}

fn skip_comment(lex: &mut Lexer<Token>) -> logos::Skip {
    lex.bump(lex.remainder().len());
    logos::Skip
}

impl Token {
    /// Returns `true` if the token can begin an operand of an expression.
    ///
    /// Prefix operators are excluded; they are ambiguous with binary ones.
    #[must_use]
    pub const fn starts_operand(&self) -> bool {
        matches!(self,
                 Self::Real(_)
                 | Self::Integer(_)
                 | Self::Date(_)
                 | Self::Time(_)
                 | Self::Duration(_)
                 | Self::Str(_)
                 | Self::Char(_)
                 | Self::Bool(_)
                 | Self::Null
                 | Self::Identifier(_)
                 | Self::LParen
                 | Self::LBracket
                 | Self::LBrace
                 | Self::Bang)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(r) => write!(f, "{r}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Date(s)
            | Self::Time(s)
            | Self::Duration(s)
            | Self::Identifier(s)
            | Self::Unknown(s) => write!(f, "{s}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Bool(true) => write!(f, "verdadero"),
            Self::Bool(false) => write!(f, "falso"),
            Self::Null => write!(f, "nulo"),
            Self::Variable => write!(f, "variable"),
            Self::Constant => write!(f, "constante"),
            Self::Global => write!(f, "global"),
            Self::If => write!(f, "si_es"),
            Self::ElseIf => write!(f, "pero_si"),
            Self::Else => write!(f, "si_no"),
            Self::While => write!(f, "mientras"),
            Self::For => write!(f, "para"),
            Self::From => write!(f, "desde"),
            Self::To => write!(f, "hasta"),
            Self::Step => write!(f, "incremento"),
            Self::In => write!(f, "en"),
            Self::Function => write!(f, "funcion"),
            Self::Return => write!(f, "regresa"),
            Self::Break => write!(f, "rompe"),
            Self::Invoke => write!(f, "ejecutar"),
            Self::Comment => write!(f, "#"),
            Self::ColonEquals => write!(f, ":="),
            Self::Equals => write!(f, "="),
            Self::EqualEqual => write!(f, "=="),
            Self::BangEqual => write!(f, "!="),
            Self::LessEqual => write!(f, "<="),
            Self::GreaterEqual => write!(f, ">="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::AndAnd => write!(f, "&&"),
            Self::OrOr => write!(f, "||"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Bang => write!(f, "!"),
            Self::Ampersand => write!(f, "&"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Colon => write!(f, ":"),
            Self::Dot => write!(f, "."),
            Self::Indent => write!(f, "<indentación>"),
            Self::Dedent => write!(f, "<fin de bloque>"),
            Self::IrregularIndent(width) => write!(f, "<sangría de {width}>"),
            Self::Newline => write!(f, "<fin de línea>"),
        }
    }
}

/// Converts source text into a stream of [`Lexeme`]s.
///
/// Each non-blank line is lexed with logos. Leading whitespace is measured
/// against a stack of indentation widths: a deeper line emits one
/// [`Token::Indent`] per level gained, a shallower one emits one
/// [`Token::Dedent`] per level popped, and every line ends with
/// [`Token::Newline`]. Lines whose indentation is not a multiple of
/// [`INDENT_WIDTH`] spaces are prefixed with [`Token::IrregularIndent`] and
/// leave the stack untouched. Blank and comment-only lines produce nothing.
///
/// # Example
/// ```
/// use nepa::interpreter::lexer::{Token, Tokenizer};
///
/// let tokens: Vec<Token> = Tokenizer::new("si_es x:\n    y\n").map(|l| l.token).collect();
/// assert_eq!(tokens,
///            vec![Token::If,
///                 Token::Identifier("x".into()),
///                 Token::Colon,
///                 Token::Newline,
///                 Token::Indent,
///                 Token::Identifier("y".into()),
///                 Token::Newline,
///                 Token::Dedent]);
/// ```
pub struct Tokenizer<'src> {
    lines:     Enumerate<Lines<'src>>,
    indents:   Vec<usize>,
    pending:   VecDeque<Lexeme>,
    last_line: usize,
    finished:  bool,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { lines:     source.lines().enumerate(),
               indents:   Vec::new(),
               pending:   VecDeque::new(),
               last_line: 0,
               finished:  false, }
    }

    /// Current indentation depth in levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.indents.len()
    }

    fn tokenize_line(&mut self, number: usize, text: &str) {
        let content = text.trim_start_matches([' ', '\t']);
        let offset = text.len() - content.len();
        let prefix = &text[..offset];

        let lexemes = lex_line(content, number, offset);
        if lexemes.is_empty() {
            return;
        }
        self.last_line = number;

        if prefix.contains('\t') || offset % INDENT_WIDTH != 0 {
            self.pending.push_back(Lexeme { token: Token::IrregularIndent(offset),
                                            line:  number,
                                            span:  0..offset, });
        } else {
            let depth = offset / INDENT_WIDTH;
            while self.indents.len() < depth {
                self.indents.push((self.indents.len() + 1) * INDENT_WIDTH);
                self.pending.push_back(Lexeme { token: Token::Indent,
                                                line:  number,
                                                span:  0..offset, });
            }
            while self.indents.len() > depth {
                self.indents.pop();
                self.pending.push_back(Lexeme { token: Token::Dedent,
                                                line:  number,
                                                span:  0..offset, });
            }
        }

        self.pending.extend(lexemes);
        self.pending.push_back(Lexeme { token: Token::Newline,
                                        line:  number,
                                        span:  text.len()..text.len(), });
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(lexeme) = self.pending.pop_front() {
                return Some(lexeme);
            }
            if self.finished {
                return None;
            }
            match self.lines.next() {
                Some((index, text)) => self.tokenize_line(index + 1, text),
                None => {
                    self.finished = true;
                    while self.indents.pop().is_some() {
                        self.pending.push_back(Lexeme { token: Token::Dedent,
                                                        line:  self.last_line,
                                                        span:  0..0, });
                    }
                },
            }
        }
    }
}

/// Lexes the content of one line, degrading unknown input into
/// [`Token::Unknown`].
fn lex_line(content: &str, line: usize, offset: usize) -> Vec<Lexeme> {
    let mut lexer = Token::lexer(content);
    let mut lexemes = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.unwrap_or_else(|_| Token::Unknown(lexer.slice().to_string()));
        lexemes.push(Lexeme { token,
                              line,
                              span: span.start + offset..span.end + offset });
    }
    lexemes
}

/// Tokenizes a whole source buffer.
///
/// # Example
/// ```
/// use nepa::interpreter::lexer::{Token, tokenize};
///
/// let lexemes = tokenize("x := \"hola\" # saludo");
/// let tokens: Vec<Token> = lexemes.into_iter().map(|l| l.token).collect();
/// assert_eq!(tokens,
///            vec![Token::Identifier("x".into()),
///                 Token::ColonEquals,
///                 Token::Str("hola".into()),
///                 Token::Newline]);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    Tokenizer::new(source).collect()
}
