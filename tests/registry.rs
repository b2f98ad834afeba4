use nepa::{
    ast::TypeSpec,
    error::RegistryError,
    interpreter::{
        registry::Registry,
        value::{
            core::{Kind, Pointer, Value},
            literal::parse_valor,
        },
    },
};
use pretty_assertions::assert_eq;

#[test]
fn create_twice_is_already_exists() {
    let registry = Registry::with_builtin_types();
    registry.create("entero", "x", Some(&Value::Integer(0))).unwrap();
    let second = registry.create("entero", "x", Some(&Value::Integer(0)));
    assert!(matches!(second, Err(RegistryError::AlreadyExists { ref name }) if name == "x"));
}

#[test]
fn modify_unbound_is_not_found() {
    let registry = Registry::with_builtin_types();
    let result = registry.modify("y", &Value::Integer(1));
    assert!(matches!(result, Err(RegistryError::NotFound { ref name }) if name == "y"));
}

#[test]
fn unknown_type_has_no_constructor() {
    let registry = Registry::with_builtin_types();
    let result = registry.create("numero", "n", None);
    assert!(matches!(result, Err(RegistryError::NoSuchConstructor { .. })));
    assert!(!registry.contains("n"));
}

#[test]
fn modify_coerces_into_the_declared_kind() {
    let registry = Registry::with_builtin_types();
    registry.create("real", "r", None).unwrap();
    registry.modify("r", &Value::String("2.5".into())).unwrap();
    assert_eq!(registry.get("r"), Some(Value::Real(2.5)));

    let rejected = registry.modify("r", &Value::List(vec![]));
    assert!(matches!(rejected, Err(RegistryError::Conversion(_))));
    assert_eq!(registry.get("r"), Some(Value::Real(2.5)));
}

#[test]
fn replace_and_delete() {
    let registry = Registry::with_builtin_types();
    registry.insert("v", Value::Integer(1)).unwrap();
    registry.replace("v", Value::String("otro".into())).unwrap();
    assert_eq!(registry.get("v"), Some(Value::String("otro".into())));
    assert_eq!(registry.delete("v").unwrap(), Value::String("otro".into()));
    assert!(registry.delete("v").is_err());
}

#[test]
fn snapshot_is_sorted() {
    let registry = Registry::with_builtin_types();
    for name in ["c", "a", "b"] {
        registry.create("entero", name, None).unwrap();
    }
    let names: Vec<String> = registry.snapshot().into_keys().collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn registered_constructor_replaces_builtin() {
    fn always_seven(_: &str, _: Option<&Value>) -> Result<Value, nepa::error::ConversionError> {
        Ok(Value::Integer(7))
    }

    let registry = Registry::with_builtin_types();
    registry.register_type("siete", always_seven);
    assert!(registry.has_type("siete"));
    assert_eq!(registry.construct("siete", "s", None).unwrap(), Value::Integer(7));
}

#[test]
fn typed_matrix_coerces_cells() {
    let registry = Registry::with_builtin_types();
    let spec = TypeSpec { markers: vec!["matriz".into()],
                          dims:    0,
                          base:    "real".into(), };
    let value = registry.construct_typed(&spec, "m", Some(&parse_valor("[[1, 2], [3, 4]]")))
                        .unwrap();
    assert_eq!(value.to_string(), "[[1, 2], [3, 4]]");
    let Value::Matrix(rows) = value else {
        panic!("expected a matrix");
    };
    assert_eq!(rows[1][0], Value::Real(3.0));
}

#[test]
fn ragged_matrix_is_rejected() {
    let registry = Registry::with_builtin_types();
    let ragged = parse_valor("[[1, 2], [3]]");
    assert!(registry.construct("matriz", "m", Some(&ragged)).is_err());
}

#[test]
fn texto_is_capped_but_cadena_is_not() {
    let long = Value::String("x".repeat(300));
    assert!(Value::coerce_into(Kind::Text, &long).is_err());
    assert!(Value::coerce_into(Kind::String, &long).is_ok());
}

#[test]
fn bit_accepts_only_binary_values() {
    let mut bit = Value::default_of(Kind::Bit);
    bit.assign_from_any(&Value::Integer(1)).unwrap();
    assert_eq!(bit.to_string(), "1");
    assert!(bit.assign_from_any(&Value::Integer(2)).is_err());
    assert!(bit.assign_from_any(&Value::Real(1.0)).is_err());
}

#[test]
fn pointer_slot_accepts_pointers_and_null() {
    let mut slot = Value::default_of(Kind::Pointer);
    slot.assign_from_any(&Value::Pointer(Pointer::Named("x".into()))).unwrap();
    assert_eq!(slot.to_string(), "&x");
    slot.assign_from_any(&Value::Object(None)).unwrap();
    assert!(slot.is_null());
    assert!(slot.assign_from_any(&Value::Integer(3)).is_err());
}

#[test]
fn temporal_text_coerces_into_temporal_kinds() {
    let text = |s: &str| Value::String(s.into());
    assert_eq!(Value::coerce_into(Kind::Date, &text("2024-02-29")).unwrap().to_string(),
               "2024-02-29");
    assert_eq!(Value::coerce_into(Kind::Time, &text("10:30:00")).unwrap().to_string(),
               "10:30:00");
    assert_eq!(Value::coerce_into(Kind::Duration, &text("150m")).unwrap().to_string(),
               "2h30m");
    assert!(Value::coerce_into(Kind::Date, &text("2023-02-29")).is_err());
    assert!(Value::coerce_into(Kind::Time, &text("24:00:00")).is_err());
}

#[test]
fn json_round_trip_for_config_values() {
    let value = parse_valor("{\"a\": [1, 2.5], \"b\": \"x\"}");
    assert_eq!(Value::from_json(&value.to_json()), value);
}
