use brine_sdp_compiler::{
    compile_schema,
    error::{ErrorCode, SdpError},
    generate,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    types::TypeExpr,
    validate, BackendKind,
};
use brine_sdp_schema::PrimitiveType;
use proptest::prelude::*;

#[test]
fn test_parse_schema() {
    let input = r#"
    /// A colour with alpha.
    struct Color {
      red: u8,
      green: u8,
      blue: u8,
      alpha: u8,
    }

    struct Example {
      clientID: u32,
      // ordinary comments are dropped
      colors: []Color,
      /// Optional highlight.
      highlight: ?Color,
      names: [][]str,
    }
    "#;

    let tokens = tokenize_schema(input).expect("tokenize_schema failed");
    let schema = parse_schema(&tokens).expect("parse_schema failed");

    assert_eq!(schema.structs.len(), 2);

    let color = &schema.structs[0];
    assert_eq!(color.name, "Color");
    assert_eq!(color.doc.as_deref(), Some("A colour with alpha."));
    assert_eq!(color.fields.len(), 4);
    for (field, name) in color.fields.iter().zip(["red", "green", "blue", "alpha"]) {
        assert_eq!(field.name, name);
        assert_eq!(field.type_, TypeExpr::Primitive(PrimitiveType::U8));
        assert!(!field.optional);
    }

    let example = &schema.structs[1];
    assert_eq!(example.name, "Example");
    assert_eq!(example.fields[0].name, "clientID");
    assert_eq!(example.fields[0].type_, TypeExpr::Primitive(PrimitiveType::U32));
    assert_eq!(example.fields[1].type_, TypeExpr::Array(Box::new(TypeExpr::Named("Color".into()))));
    assert!(example.fields[2].optional);
    assert_eq!(example.fields[2].doc.as_deref(), Some("Optional highlight."));
    assert_eq!(example.fields[3].type_.to_string(), "[][]str");

    assert!(validate(&schema).is_empty());
    let files = generate(&schema, BackendKind::Rust).expect("generate failed");
    assert!(files[0].contents.contains("pub client_id: u32,"));
    assert!(files[0].contents.contains("pub highlight: Option<Color>,"));
    assert!(files[0].contents.contains("pub names: Vec<Vec<&'a str>>,"));
}

#[test]
fn test_ast_json() {
    let schema = compile_schema("struct P { xs: []u8, p: ?Q } struct Q { s: str }").unwrap();
    let json: serde_json::Value = serde_json::to_value(&schema).unwrap();
    assert_eq!(json["structs"][0]["name"], "P");
    assert_eq!(
        json["structs"][0]["fields"][0]["type"],
        serde_json::json!({ "kind": "array", "of": { "kind": "primitive", "of": "u8" } })
    );
    assert_eq!(json["structs"][0]["fields"][1]["type"], serde_json::json!({ "kind": "named", "of": "Q" }));
    assert_eq!(json["structs"][0]["fields"][1]["optional"], true);
    assert!(json["structs"][0].get("doc").is_none());
}

#[test]
fn test_all_errors_reported() {
    let err = compile_schema(
        "struct A {}\nstruct B { x: Missing, x: u8 }\nstruct C { d: D }\nstruct D { c: []C, match: u8 }",
    )
    .unwrap_err();

    let SdpError::Validation(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(
        errors.codes(),
        vec![
            ErrorCode::EmptyStruct,
            ErrorCode::UnknownType,
            ErrorCode::DuplicateField,
            ErrorCode::ReservedKeyword,
            ErrorCode::CircularReference,
        ]
    );
    let text = errors.to_string();
    assert!(text.starts_with("Schema validation failed with 5 error(s):\n  [EMPTY_STRUCT]"));
    assert!(text.contains("circular reference detected: C → D → C"));
}

#[test]
fn test_parse_error_position() {
    let err = compile_schema("struct A {\n  x: u8,\n  y: [u8\n}").unwrap_err();
    assert_eq!(err.to_string(), "Parse error at line 3, column 7: Expected \"]\" but found \"u8\"");
}

#[test]
fn prop_front_end_never_panics() {
    proptest!(|(text in "[a-z{}\\[\\]:,?/ \n]{0,64}")| {
        if let Ok(tokens) = tokenize_schema(&text) {
            if let Ok(schema) = parse_schema(&tokens) {
                let _ = validate(&schema);
            }
        }
    });
}

#[test]
fn prop_valid_field_lists_compile() {
    let primitive = prop::sample::select(PrimitiveType::ALL.to_vec());
    proptest!(|(types in prop::collection::vec((primitive, 0usize..3), 1..8))| {
        let fields: Vec<String> = types
            .iter()
            .enumerate()
            .map(|(i, (p, depth))| format!("f{}: {}{}", i, "[]".repeat(*depth), p))
            .collect();
        let text = format!("struct S {{ {} }}", fields.join(", "));
        let schema = compile_schema(&text).unwrap();
        prop_assert_eq!(schema.structs[0].fields.len(), types.len());
        prop_assert!(generate(&schema, BackendKind::Rust).is_ok());
    });
}
