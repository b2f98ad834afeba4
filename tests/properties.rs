//! Property-based tests for block structure and value coercion.

use nepa::interpreter::{
    parser::block::{parse_program, visit_depths},
    value::core::{Kind, Value},
};
use proptest::prelude::*;

// -- Source generation --

/// A generated statement: a plain line or a header owning a non-empty body.
#[derive(Debug, Clone)]
enum Node {
    Line,
    Header(u8, Vec<Node>),
}

fn node_strategy() -> impl Strategy<Value = Node> {
    Just(Node::Line).prop_recursive(4, 32, 4, |inner| {
                        (0u8..3, prop::collection::vec(inner, 1..4))
                            .prop_map(|(kind, body)| Node::Header(kind, body))
                    })
}

/// Renders `nodes` at `depth`, recording the depth of every statement in
/// source order.
fn render(nodes: &[Node], depth: usize, source: &mut String, depths: &mut Vec<usize>) {
    for node in nodes {
        source.push_str(&" ".repeat(depth * 4));
        depths.push(depth);
        match node {
            Node::Line => source.push_str("x := 1\n"),
            Node::Header(kind, body) => {
                source.push_str(match kind {
                                    0 => "mientras verdadero:\n",
                                    1 => "si_es x > 0:\n",
                                    _ => "para i en [1, 2]:\n",
                                });
                render(body, depth + 1, source, depths);
            },
        }
    }
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![any::<i64>().prop_map(Value::Integer),
                any::<bool>().prop_map(Value::Boolean),
                any::<bool>().prop_map(Value::Bit),
                (-1e12f64..1e12).prop_map(Value::Real),
                (-1e9f64..1e9).prop_map(Value::Decimal),
                any::<char>().prop_map(Value::Character),
                "[a-zA-Z0-9 áéñ]{0,40}".prop_map(Value::Text),
                "[a-zA-Z0-9 áéñ]{0,300}".prop_map(Value::String)]
}

proptest! {
    #[test]
    fn block_depth_mirrors_indentation(program in prop::collection::vec(node_strategy(), 1..5)) {
        let mut source = String::new();
        let mut expected = Vec::new();
        render(&program, 0, &mut source, &mut expected);

        let (block, errors) = parse_program(&source, &[]);
        prop_assert!(errors.is_empty(), "parse errors in:\n{}\n{:?}", source, errors);

        let mut found = Vec::new();
        visit_depths(&block, 0, &mut |_, depth| found.push(depth));
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn assigning_a_value_to_itself_is_a_no_op(value in scalar_strategy()) {
        let mut copy = value.clone();
        prop_assert!(copy.assign_from_any(&value).is_ok());
        prop_assert_eq!(copy.kind(), value.kind());
        prop_assert_eq!(copy, value);
    }

    #[test]
    fn display_form_coerces_back(i in any::<i64>(), quarter in -4_000_000i32..4_000_000, flag in any::<bool>()) {
        let text = |value: &Value| Value::String(value.to_string());

        let integer = Value::Integer(i);
        prop_assert_eq!(Value::coerce_into(Kind::Integer, &text(&integer)).ok(), Some(integer));

        let real = Value::Real(f64::from(quarter) / 4.0);
        prop_assert_eq!(Value::coerce_into(Kind::Real, &text(&real)).ok(), Some(real));

        for value in [Value::Boolean(flag), Value::Bit(flag)] {
            prop_assert_eq!(Value::coerce_into(value.kind(), &text(&value)).ok(), Some(value));
        }
    }

    #[test]
    fn to_real_accepts_numbers_booleans_and_numeric_text(i in any::<i64>(),
                                                          r in -1e15f64..1e15,
                                                          flag in any::<bool>()) {
        prop_assert_eq!(Value::Integer(i).to_real().ok(), Some(i as f64));
        prop_assert_eq!(Value::Real(r).to_real().ok(), Some(r));
        prop_assert!(Value::Boolean(flag).to_real().is_ok());
        prop_assert_eq!(Value::String(r.to_string()).to_real().ok(), Some(r));
    }

    #[test]
    fn to_real_rejects_everything_else(word in "[a-z]{1,12}", items in prop::collection::vec(any::<i64>(), 0..4)) {
        prop_assert!(Value::String(word).to_real().is_err());
        prop_assert!(Value::List(items.into_iter().map(Value::Integer).collect()).to_real().is_err());
        prop_assert!(Value::Object(None).to_real().is_err());
        prop_assert!(Value::Dictionary(Default::default()).to_real().is_err());
    }
}
