//! Semantic checks over a parsed Schema.
//!
//! Four independent passes run in a fixed order (structure, type references,
//! naming, cycles) and every pass always runs, so one call reports everything
//! that is wrong with a schema.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::{ErrorCode, SdpError, ValidationError, ValidationErrors},
    reserved::{reserved_in, reserved_struct_name_in},
    types::{Schema, TypeExpr},
    utils::quote,
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Runs every pass and concatenates their errors. Empty means valid.
pub fn validate(schema: &Schema) -> Vec<ValidationError> {
    let mut errors = check_structure(schema);
    errors.extend(check_type_references(schema));
    errors.extend(check_naming(schema));
    errors.extend(check_cycles(schema));
    tracing::debug!(structs = schema.structs.len(), errors = errors.len(), "validated schema");
    errors
}

/// Returns `Err(SdpError::Validation(_))` carrying every error when the schema
/// is invalid.
pub fn verify_schema(schema: &Schema) -> Result<(), SdpError> {
    let errors = validate(schema);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SdpError::Validation(ValidationErrors(errors)))
    }
}

pub fn check_structure(schema: &Schema) -> Vec<ValidationError> {
    if schema.structs.is_empty() {
        return vec![ValidationError::new(
            ErrorCode::EmptySchema,
            "schema must define at least one struct",
        )];
    }

    schema
        .structs
        .iter()
        .filter(|s| s.fields.is_empty())
        .map(|s| {
            ValidationError::new(
                ErrorCode::EmptyStruct,
                format!("struct {} cannot be empty (must have at least one field)", quote(&s.name)),
            )
        })
        .collect()
}

pub fn check_type_references(schema: &Schema) -> Vec<ValidationError> {
    let known: HashSet<&str> = schema.structs.iter().map(|s| s.name.as_str()).collect();
    let mut errors = Vec::new();

    for s in &schema.structs {
        for field in &s.fields {
            if let Some(name) = field.type_.named() {
                if !known.contains(name) {
                    errors.push(ValidationError::new(
                        ErrorCode::UnknownType,
                        format!(
                            "struct {} field {}: unknown type {}",
                            quote(&s.name),
                            quote(&field.name),
                            quote(name)
                        ),
                    ));
                }
            }

            if field.optional && !matches!(field.type_, TypeExpr::Named(_)) {
                errors.push(ValidationError::new(
                    ErrorCode::InvalidOptional,
                    format!(
                        "struct {} field {}: only struct types can be optional, found {}",
                        quote(&s.name),
                        quote(&field.name),
                        quote(&field.type_.to_string())
                    ),
                ));
            }
        }
    }

    errors
}

fn identifier_problem(name: &str) -> Option<String> {
    if IDENTIFIER.is_match(name) {
        return None;
    }
    let mut chars = name.chars();
    match chars.next() {
        None => Some("cannot be empty".to_string()),
        Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
            Some(format!("must start with an ASCII letter or underscore, found {}", quote(&first.to_string())))
        }
        _ => {
            let bad = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')).unwrap_or_default();
            Some(format!(
                "contains invalid character {} (only ASCII letters, digits and underscores are allowed)",
                quote(&bad.to_string())
            ))
        }
    }
}

pub fn check_naming(schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut struct_names = HashSet::new();

    for s in &schema.structs {
        if let Some(reason) = identifier_problem(&s.name) {
            errors.push(ValidationError::new(
                ErrorCode::InvalidIdentifier,
                format!("struct name {} is invalid: {}", quote(&s.name), reason),
            ));
        }

        let langs = reserved_struct_name_in(&s.name);
        if !langs.is_empty() {
            errors.push(ValidationError::new(
                ErrorCode::ReservedKeyword,
                format!("struct name {} is reserved in: {}", quote(&s.name), langs.join(", ")),
            ));
        }

        if !struct_names.insert(s.name.as_str()) {
            errors.push(ValidationError::new(
                ErrorCode::DuplicateStruct,
                format!("duplicate struct name {}", quote(&s.name)),
            ));
        }

        let mut field_names = HashSet::new();
        for field in &s.fields {
            if let Some(reason) = identifier_problem(&field.name) {
                errors.push(ValidationError::new(
                    ErrorCode::InvalidIdentifier,
                    format!(
                        "struct {} field name {} is invalid: {}",
                        quote(&s.name),
                        quote(&field.name),
                        reason
                    ),
                ));
            }

            let langs = reserved_in(&field.name);
            if !langs.is_empty() {
                errors.push(ValidationError::new(
                    ErrorCode::ReservedKeyword,
                    format!(
                        "struct {} field name {} is reserved in: {}",
                        quote(&s.name),
                        quote(&field.name),
                        langs.join(", ")
                    ),
                ));
            }

            if !field_names.insert(field.name.as_str()) {
                errors.push(ValidationError::new(
                    ErrorCode::DuplicateField,
                    format!("struct {} has duplicate field name {}", quote(&s.name), quote(&field.name)),
                ));
            }
        }
    }

    errors
}

/// Reports every cycle in the struct reference graph. Edges follow named and
/// array-of-named fields; optional fields count too, since the wire format has
/// no way to terminate a recursive value.
pub fn check_cycles(schema: &Schema) -> Vec<ValidationError> {
    // Intern names to dense indices. The first declaration of a name wins.
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();
    let mut decls = Vec::new();
    for s in &schema.structs {
        if !index_of.contains_key(s.name.as_str()) {
            index_of.insert(s.name.as_str(), names.len());
            names.push(s.name.as_str());
            decls.push(s);
        }
    }

    let edges: Vec<Vec<usize>> = decls
        .iter()
        .map(|s| {
            let mut out = Vec::new();
            for field in &s.fields {
                if let Some(&target) = field.type_.named().and_then(|name| index_of.get(name)) {
                    if !out.contains(&target) {
                        out.push(target);
                    }
                }
            }
            out
        })
        .collect();

    struct Dfs<'s> {
        edges:    &'s [Vec<usize>],
        names:    &'s [&'s str],
        visited:  Vec<bool>,
        on_stack: Vec<bool>,
        stack:    Vec<usize>,
        errors:   Vec<ValidationError>,
    }

    fn visit(dfs: &mut Dfs, node: usize) {
        dfs.visited[node] = true;
        dfs.on_stack[node] = true;
        dfs.stack.push(node);

        let edges = dfs.edges;
        for &next in &edges[node] {
            if dfs.on_stack[next] {
                let start = dfs.stack.iter().position(|&n| n == next).unwrap_or(0);
                let mut path: Vec<&str> = dfs.stack[start..].iter().map(|&n| dfs.names[n]).collect();
                path.push(dfs.names[next]);
                dfs.errors.push(ValidationError::new(
                    ErrorCode::CircularReference,
                    format!("circular reference detected: {}", path.join(" → ")),
                ));
            } else if !dfs.visited[next] {
                visit(dfs, next);
            }
        }

        dfs.stack.pop();
        dfs.on_stack[node] = false;
    }

    let mut dfs = Dfs {
        edges:    &edges,
        names:    &names,
        visited:  vec![false; names.len()],
        on_stack: vec![false; names.len()],
        stack:    Vec::new(),
        errors:   Vec::new(),
    };
    for node in 0..names.len() {
        if !dfs.visited[node] {
            visit(&mut dfs, node);
        }
    }
    dfs.errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;
    use crate::tokenizer::tokenize_schema;

    fn errors_for(text: &str) -> Vec<ValidationError> {
        validate(&parse_schema(&tokenize_schema(text).unwrap()).unwrap())
    }

    fn codes_for(text: &str) -> Vec<ErrorCode> {
        errors_for(text).into_iter().map(|e| e.code).collect()
    }

    #[test]
    fn valid_schema() {
        assert!(errors_for("struct Point { x: f32, y: f32 } struct Line { a: Point, b: ?Point, rest: []Point }").is_empty());
    }

    #[test]
    fn structure() {
        assert_eq!(codes_for(""), vec![ErrorCode::EmptySchema]);
        assert_eq!(codes_for("struct A {} struct B { x: u8 } struct C {}"), vec![ErrorCode::EmptyStruct; 2]);
        assert_eq!(
            errors_for("struct A {}")[0].to_string(),
            "[EMPTY_STRUCT] struct \"A\" cannot be empty (must have at least one field)"
        );
    }

    #[test]
    fn type_references() {
        assert_eq!(codes_for("struct A { x: Missing }"), vec![ErrorCode::UnknownType]);
        assert_eq!(codes_for("struct A { x: [][]Missing }"), vec![ErrorCode::UnknownType]);
        assert_eq!(codes_for("struct A { x: B } struct B { y: u8 }"), vec![]);
        assert_eq!(
            errors_for("struct A { x: Nope }")[0].message,
            "struct \"A\" field \"x\": unknown type \"Nope\""
        );
    }

    #[test]
    fn optional_requires_struct_type() {
        assert_eq!(codes_for("struct A { x: ?u8 }"), vec![ErrorCode::InvalidOptional]);
        assert_eq!(codes_for("struct B { y: u8 } struct A { x: ?[]B }"), vec![ErrorCode::InvalidOptional]);
    }

    #[test]
    fn naming() {
        assert_eq!(codes_for("struct A { x: u8 } struct A { y: u8 }"), vec![ErrorCode::DuplicateStruct]);
        assert_eq!(codes_for("struct A { x: u8, x: u16 }"), vec![ErrorCode::DuplicateField]);
        assert_eq!(codes_for("struct A { x: u8, x: u16, x: u32 }"), vec![ErrorCode::DuplicateField; 2]);
        assert_eq!(codes_for("struct A { 9lives: u8 }"), vec![ErrorCode::InvalidIdentifier]);
        assert_eq!(codes_for("struct Größe { x: u8 }"), vec![ErrorCode::InvalidIdentifier]);
    }

    #[test]
    fn reserved_in_any_one_ecosystem() {
        // Legal in Go, Rust and C, reserved in Swift.
        assert_eq!(codes_for("struct A { guard: u8 }"), vec![ErrorCode::ReservedKeyword]);
        // Legal everywhere but Rust.
        assert_eq!(codes_for("struct A { impl: u8 }"), vec![ErrorCode::ReservedKeyword]);
        assert_eq!(codes_for("struct A { Type: u8 }"), vec![ErrorCode::ReservedKeyword]);
        assert_eq!(codes_for("struct Arena { x: u8 }"), vec![ErrorCode::ReservedKeyword]);

        let message = errors_for("struct A { type: u8 }")[0].message.clone();
        assert_eq!(message, "struct \"A\" field name \"type\" is reserved in: Go, Rust, Swift");
    }

    #[test]
    fn cycles() {
        let self_optional = errors_for("struct A { next: ?A }");
        assert_eq!(self_optional.len(), 1);
        assert_eq!(self_optional[0].to_string(), "[CIRCULAR_REFERENCE] circular reference detected: A → A");

        let mutual = errors_for("struct A { b: B } struct B { a: A }");
        assert_eq!(mutual.len(), 1);
        assert_eq!(mutual[0].message, "circular reference detected: A → B → A");

        assert_eq!(codes_for("struct A { items: []A }"), vec![ErrorCode::CircularReference]);

        let longer = errors_for("struct A { b: B } struct B { c: C } struct C { a: []A }");
        assert_eq!(longer[0].message, "circular reference detected: A → B → C → A");
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        assert_eq!(
            codes_for("struct A { b: B, c: C } struct B { d: D } struct C { d: D } struct D { x: u8 }"),
            vec![]
        );
    }

    #[test]
    fn every_pass_reports() {
        let codes = codes_for("struct A {} struct B { x: Missing, type: u8, a: ?B }");
        assert_eq!(
            codes,
            vec![
                ErrorCode::EmptyStruct,
                ErrorCode::UnknownType,
                ErrorCode::ReservedKeyword,
                ErrorCode::CircularReference,
            ]
        );
    }

    #[test]
    fn verify_wraps_all_errors() {
        let schema = parse_schema(&tokenize_schema("struct A { x: ?u8, y: Nope }").unwrap()).unwrap();
        match verify_schema(&schema) {
            Err(SdpError::Validation(errors)) => {
                assert_eq!(errors.codes(), vec![ErrorCode::InvalidOptional, ErrorCode::UnknownType]);
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }
}
