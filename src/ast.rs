use std::fmt;

use crate::interpreter::value::core::{Kind, Value};

/// An abstract syntax tree node representing an expression.
///
/// Every variant carries the source line it was parsed from so evaluation
/// errors can point back at it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, text, boolean, date, `nulo`...).
    Literal {
        /// The constant value.
        value: Value,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a binding by name.
    Variable {
        /// Name of the binding.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A prefix operation (`-x`, `+x`, `!x`).
    Unary {
        /// The operator.
        op:   UnaryOperator,
        /// The operand.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Function call expression (e.g. `suma(1, 2)`).
    Call {
        /// Name of the function being called.
        name:      String,
        /// Unevaluated arguments.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Method call on a receiver (`x.longitud()`), dispatched as
    /// `<tipo>.<metodo>` with the receiver as first argument.
    MethodCall {
        /// The receiver expression.
        receiver:  Box<Self>,
        /// The method name.
        method:    String,
        /// Unevaluated arguments, receiver excluded.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Indexed access (`xs[0]`, `d["k"]`).
    Index {
        /// The indexed value.
        target: Box<Self>,
        /// The index or key.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Dictionary field access (`d.campo`).
    Field {
        /// The dictionary.
        target: Box<Self>,
        /// The key.
        field:  String,
        /// Line number in the source code.
        line:   usize,
    },
    /// `&x`
    Reference {
        /// The referenced expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// `*p`
    Deref {
        /// The pointer expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// An explicit cast through `convertir_<tipo>`.
    Cast {
        /// The target type name.
        type_name: String,
        /// Whether the result is wrapped in a pointer.
        pointer:   bool,
        /// The converted expression.
        expr:      Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// List literal (`[a, b]`).
    List {
        /// The elements.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Dictionary literal (`{"k": v}`).
    Dict {
        /// Key and value expressions.
        entries: Vec<(Self, Self)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Initializer text that did not parse as an expression. It is read with
    /// the literal parser at run time.
    Raw {
        /// The reconstructed source text.
        text: String,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    ///
    /// ## Example
    /// ```
    /// use nepa::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Call { line, .. }
            | Self::MethodCall { line, .. }
            | Self::Index { line, .. }
            | Self::Field { line, .. }
            | Self::Reference { line, .. }
            | Self::Deref { line, .. }
            | Self::Cast { line, .. }
            | Self::List { line, .. }
            | Self::Dict { line, .. }
            | Self::Raw { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Numeric coercion (`+x`).
    Plus,
    /// Logical NOT (`!x`).
    Not,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "&&",
            Or => "||",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Plus => write!(f, "+"),
            Self::Not => write!(f, "!"),
        }
    }
}

/// A parsed declaration type: composite markers, `[]` dimensions and a base
/// type name, e.g. `matriz[][] real` or `puntero entero`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Composite markers in source order (`puntero`, `lista`, ...).
    pub markers: Vec<String>,
    /// Number of `[]` dimension markers.
    pub dims:    usize,
    /// The base type name.
    pub base:    String,
}

impl TypeSpec {
    /// A plain base type without markers.
    #[must_use]
    pub fn base(name: impl Into<String>) -> Self {
        Self { markers: Vec::new(),
               dims:    0,
               base:    name.into(), }
    }

    /// The container kind imposed by the outermost marker, if any.
    ///
    /// A bare `[]` is a list, two or more dimensions a matrix.
    ///
    /// # Example
    /// ```
    /// use nepa::{ast::TypeSpec, interpreter::value::core::Kind};
    ///
    /// let spec = TypeSpec { markers: vec![],
    ///                       dims:    2,
    ///                       base:    "real".into(), };
    /// assert_eq!(spec.container(), Some(Kind::Matrix));
    /// assert_eq!(TypeSpec::base("entero").container(), None);
    /// ```
    #[must_use]
    pub fn container(&self) -> Option<Kind> {
        match self.markers.first() {
            Some(marker) => Kind::from_name(marker),
            None if self.dims == 1 => Some(Kind::List),
            None if self.dims > 1 => Some(Kind::Matrix),
            None => None,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for marker in &self.markers {
            write!(f, "{marker} ")?;
        }
        write!(f, "{}", self.base)?;
        for _ in 0..self.dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Where a declaration stores its bindings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeclarationScope {
    /// `variable`: the registry and the current local frame.
    Variable,
    /// `global`: the shared global map.
    Global,
    /// `constante`: the write-once constant map.
    Constant,
}

/// The left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// A plain name.
    Variable(String),
    /// A path of index and field steps below a named root, e.g. `m[0][1]` or
    /// `d["k"].x`.
    Path {
        /// The root binding.
        root:  String,
        /// The steps, outermost first.
        steps: Vec<Accessor>,
    },
    /// A pointer write (`*p = v`).
    Deref(Expr),
}

/// One step of an [`AssignTarget::Path`].
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    /// `[expr]`
    Index(Expr),
    /// `.campo`
    Field(String),
}

/// The source of a `para` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForSource {
    /// `desde start hasta end [incremento step]`; bounds and step are
    /// re-evaluated on every pass.
    Range {
        /// The first value.
        start: Expr,
        /// The inclusive bound.
        end:   Expr,
        /// The optional explicit increment.
        step:  Option<Expr>,
    },
    /// `en expr`
    Collection(Expr),
}

/// The kind a function's return value is coerced into, inferred from the
/// shape of its first `regresa`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReturnKind {
    /// An integer literal, or no `regresa` at all.
    Integer,
    /// A dotted numeric literal.
    Real,
    /// A quoted literal.
    Text,
    /// A bracketed list.
    List,
    /// A list of lists.
    Matrix,
    /// Any other expression; the value is returned as computed.
    Dynamic,
}

/// A function parameter, optionally typed (`entero x`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The parameter name.
    pub name:      String,
    /// The declared type name, if any.
    pub type_name: Option<String>,
}

/// Represents a user-defined function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:        String,
    /// The parameters.
    pub params:      Vec<Param>,
    /// The body.
    pub body:        Block,
    /// The inferred return kind.
    pub return_kind: ReturnKind,
    /// Line number in the source code.
    pub line:        usize,
}

/// A run of statements sharing one indentation level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
    /// Line of the first statement (or of the header owning the block).
    pub line:       usize,
}

/// Represents a statement.
///
/// The variant fully determines which fields are meaningful; each one maps to
/// a handler name returned by [`Statement::kind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `variable`, `global` or `constante` declaration.
    Declaration {
        /// Which map receives the bindings.
        scope:     DeclarationScope,
        /// The declared type; optional for `global` and `constante`.
        type_spec: Option<TypeSpec>,
        /// One or more names sharing the initializer.
        names:     Vec<String>,
        /// The optional initializer.
        value:     Option<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `target := value` or `target = value`.
    Assignment {
        /// What is assigned.
        target: AssignTarget,
        /// The new value.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// `si_es` with its `pero_si` and `si_no` siblings.
    Conditional {
        /// Conditions and their blocks, in order.
        branches:  Vec<(Expr, Block)>,
        /// The `si_no` block.
        otherwise: Option<Block>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `mientras condition:`
    While {
        /// Re-evaluated before every pass.
        condition: Expr,
        /// The loop body.
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// `para variable ...:`
    For {
        /// The loop variable.
        variable: String,
        /// Range or collection.
        source:   ForSource,
        /// The loop body.
        body:     Block,
        /// Line number in the source code.
        line:     usize,
    },
    /// `funcion nombre(params):`
    Function(FunctionDef),
    /// `regresa [expr]`
    Return {
        /// The returned value.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `rompe`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// A nested block that is not owned by a header.
    Block(Block),
    /// A call statement, in call form or command form.
    Call {
        /// The callee.
        name:      String,
        /// Unevaluated arguments.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `ejecutar ruta, args...`
    Invoke {
        /// The sub-program path expression.
        path:      Expr,
        /// Positional arguments.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A bare expression whose value is printed.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// An inert node standing for a line that failed to parse.
    Error {
        /// The parse error message.
        message: String,
        /// Line number in the source code.
        line:    usize,
    },
}

impl Statement {
    /// The handler name this statement dispatches to.
    ///
    /// ## Example
    /// ```
    /// use nepa::ast::Statement;
    ///
    /// assert_eq!(Statement::Break { line: 1 }.kind(), "rompe");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Declaration { scope: DeclarationScope::Variable, .. } => "declarar",
            Self::Declaration { scope: DeclarationScope::Global, .. } => "global",
            Self::Declaration { scope: DeclarationScope::Constant, .. } => "constante",
            Self::Assignment { .. } => "asignar",
            Self::Conditional { .. } => "si_es",
            Self::While { .. } => "mientras",
            Self::For { .. } => "para",
            Self::Function(_) => "funcion",
            Self::Return { .. } => "regresa",
            Self::Break { .. } => "rompe",
            Self::Block(_) => "bloque",
            Self::Call { .. } => "llamada",
            Self::Invoke { .. } => "ejecutar",
            Self::Expression { .. } => "expresion",
            Self::Error { .. } => "error",
        }
    }

    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Declaration { line, .. }
            | Self::Assignment { line, .. }
            | Self::Conditional { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Return { line, .. }
            | Self::Break { line }
            | Self::Call { line, .. }
            | Self::Invoke { line, .. }
            | Self::Expression { line, .. }
            | Self::Error { line, .. } => *line,
            Self::Function(def) => def.line,
            Self::Block(block) => block.line,
        }
    }
}
