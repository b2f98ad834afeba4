use nepa::{
    ast::{Accessor, AssignTarget, BinaryOperator, Block, Expr, ForSource, ReturnKind, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, tokenize},
        parser::block::parse_program,
        registry::Registry,
        value::core::Value,
    },
};
use pretty_assertions::assert_eq;

fn types() -> Vec<String> {
    Registry::with_builtin_types().type_names()
}

fn tokens(src: &str) -> Vec<Token> {
    tokenize(src).into_iter().map(|l| l.token).collect()
}

/// Parses `src`, failing the test on any parse error.
fn parse_ok(src: &str) -> Block {
    let (program, errors) = parse_program(src, &types());
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    program
}

fn parse_errors(src: &str) -> Vec<ParseError> {
    let (_, errors) = parse_program(src, &types());
    errors.iter().cloned().collect()
}

#[test]
fn temporal_literals_are_single_tokens() {
    assert_eq!(tokens("f := 2024-01-15"),
               vec![Token::Identifier("f".into()),
                    Token::ColonEquals,
                    Token::Date("2024-01-15".into()),
                    Token::Newline]);
    assert_eq!(tokens("10:30:00 2h30m 45s"),
               vec![Token::Time("10:30:00".into()),
                    Token::Duration("2h30m".into()),
                    Token::Duration("45s".into()),
                    Token::Newline]);
}

#[test]
fn unknown_and_unterminated_input_degrades() {
    assert_eq!(tokens("x $"),
               vec![Token::Identifier("x".into()), Token::Unknown("$".into()), Token::Newline]);
    assert!(matches!(tokens("imprimir \"hola").as_slice(),
                     [Token::Identifier(_), Token::Unknown(text), Token::Newline] if text.starts_with('"')));
}

#[test]
fn dedents_close_every_open_level() {
    let src = "si_es a:\n    si_es b:\n        c\nd\n";
    let structure: Vec<Token> = tokens(src).into_iter()
                                           .filter(|t| matches!(t, Token::Indent | Token::Dedent))
                                           .collect();
    assert_eq!(structure, vec![Token::Indent, Token::Indent, Token::Dedent, Token::Dedent]);
    assert!(tokens("  x\n").starts_with(&[Token::IrregularIndent(2)]));
}

#[test]
fn blocks_take_the_line_of_their_first_statement() {
    let program = parse_ok("\n# nota\nsi_es a:\n\n    x\n    y\n");
    assert_eq!(program.line, 3);
    let Statement::Conditional { branches, .. } = &program.statements[0] else {
        panic!("expected a conditional");
    };
    assert_eq!(branches[0].1.line, 5);
    assert_eq!(branches[0].1.statements.len(), 2);
}

#[test]
fn conditional_siblings_attach_to_si_es() {
    let program = parse_ok("si_es a > 1:\n    x\npero_si a == 1:\n    y\nsi_no:\n    z\n");
    assert_eq!(program.statements.len(), 1);
    let Statement::Conditional { branches, otherwise, .. } = &program.statements[0] else {
        panic!("expected a conditional");
    };
    assert_eq!(branches.len(), 2);
    assert!(otherwise.is_some());
}

#[test]
fn orphan_branch_is_reported() {
    let errors = parse_errors("si_no:\n    x\n");
    assert_eq!(errors,
               vec![ParseError::OrphanBranch { keyword: "si_no".into(),
                                               line:    1, }]);
}

#[test]
fn header_without_body_is_reported() {
    let errors = parse_errors("mientras verdadero:\nimprimir 1\n");
    assert_eq!(errors,
               vec![ParseError::EmptyBlock { header: "mientras".into(),
                                             line:   1, }]);
    assert!(matches!(parse_errors("mientras verdadero\n    x\n")[0],
                     ParseError::ExpectedColon { line: 1, .. }));
}

#[test]
fn errors_are_collected_and_siblings_keep_parsing() {
    let (program, errors) = parse_program("variable numero x\nimprimir 2\nimprimir \"sin fin\n",
                                          &types());
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors.iter().next(),
                     Some(ParseError::UnknownType { name, line: 1 }) if name == "numero"));
    assert!(matches!(errors.iter().nth(1), Some(ParseError::UnterminatedLiteral { line: 3 })));

    let kinds: Vec<&str> = program.statements.iter().map(Statement::kind).collect();
    assert_eq!(kinds, vec!["error", "llamada", "error"]);
}

#[test]
fn command_form_needs_a_tight_prefix_operator() {
    let program = parse_ok("imprimir -x\na - x\nf(1, 2)\nimprimir (a)\n");
    let kinds: Vec<&str> = program.statements.iter().map(Statement::kind).collect();
    assert_eq!(kinds, vec!["llamada", "expresion", "llamada", "llamada"]);

    let Statement::Call { name, arguments, .. } = &program.statements[2] else {
        panic!("expected a call");
    };
    assert_eq!(name, "f");
    assert_eq!(arguments.len(), 2);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let program = parse_ok("x := 1 + 2 * 3\ny := a || b && c\n");
    let Statement::Assignment { value: Expr::Binary { op, right, .. }, .. } = &program.statements[0]
    else {
        panic!("expected a binary assignment");
    };
    assert_eq!(*op, BinaryOperator::Add);
    assert!(matches!(**right, Expr::Binary { op: BinaryOperator::Mul, .. }));

    assert!(matches!(&program.statements[1],
                     Statement::Assignment { value: Expr::Binary { op: BinaryOperator::Or, .. }, .. }));
}

#[test]
fn assignment_targets() {
    let program = parse_ok("m[0][1] := 5\n*p = 7\nd[\"k\"].x = 1\n");
    let targets: Vec<&AssignTarget> = program.statements
                                             .iter()
                                             .map(|s| match s {
                                                 Statement::Assignment { target, .. } => target,
                                                 other => panic!("expected an assignment, got {other:?}"),
                                             })
                                             .collect();

    let AssignTarget::Path { root, steps } = targets[0] else {
        panic!("expected a path");
    };
    assert_eq!(root, "m");
    assert!(matches!(&steps[..],
                     [Accessor::Index(Expr::Literal { value: Value::Integer(0), .. }),
                      Accessor::Index(Expr::Literal { value: Value::Integer(1), .. })]));

    assert!(matches!(targets[1], AssignTarget::Deref(Expr::Variable { name, .. }) if name == "p"));
    assert!(matches!(targets[2],
                     AssignTarget::Path { steps, .. }
                         if matches!(&steps[..], [Accessor::Index(_), Accessor::Field(f)] if f == "x")));
}

#[test]
fn declarations_carry_markers_and_dimensions() {
    let program = parse_ok("variable matriz[][] real m := [[1, 2], [3, 4]]\n\
                            variable entero a, b := 2\n\
                            global g := 1\n");
    let Statement::Declaration { type_spec: Some(spec), names, .. } = &program.statements[0] else {
        panic!("expected a typed declaration");
    };
    assert_eq!(spec.markers, vec!["matriz".to_string()]);
    assert_eq!(spec.dims, 2);
    assert_eq!(spec.base, "real");
    assert_eq!(names, &["m"]);

    assert!(matches!(&program.statements[1],
                     Statement::Declaration { names, value: Some(_), .. } if names.len() == 2));
    assert!(matches!(&program.statements[2], Statement::Declaration { type_spec: None, .. }));
    assert!(matches!(parse_errors("constante entero K\n")[0],
                     ParseError::MalformedDeclaration { line: 1, .. }));
}

#[test]
fn for_headers_pick_their_source() {
    let program = parse_ok("para i desde 1 hasta n incremento 2:\n    x\npara c en \"hola\":\n    x\n");
    assert!(matches!(&program.statements[0],
                     Statement::For { source: ForSource::Range { step: Some(_), .. }, variable, .. }
                         if variable == "i"));
    assert!(matches!(&program.statements[1],
                     Statement::For { source: ForSource::Collection(Expr::Literal { .. }), .. }));
}

#[test]
fn return_kinds_are_inferred_from_the_first_regresa() {
    let src = "funcion a():\n    regresa [[1]]\n\
               funcion b():\n    si_es x:\n        regresa \"t\"\n    regresa 1\n\
               funcion c():\n    regresa x + 1\n\
               funcion d():\n    imprimir 1\n";
    let kinds: Vec<ReturnKind> = parse_ok(src).statements
                                              .iter()
                                              .map(|s| match s {
                                                  Statement::Function(def) => def.return_kind,
                                                  other => panic!("expected a function, got {other:?}"),
                                              })
                                              .collect();
    assert_eq!(kinds,
               vec![ReturnKind::Matrix, ReturnKind::Text, ReturnKind::Dynamic, ReturnKind::Integer]);
}
