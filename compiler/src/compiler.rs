use brine_sdp_schema as runtime;

use crate::{
    error::SdpError,
    gen_rust::RustBackend,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    traits::{Backend, BackendKind, SourceFile},
    types::{Schema, TypeExpr},
    validator::verify_schema,
};

/// Tokenize and parse schema text. Performs no semantic checks.
pub fn parse(text: &str) -> Result<Schema, SdpError> {
    let tokens = tokenize_schema(text)?;
    tracing::debug!(tokens = tokens.len(), "tokenized schema");
    let schema = parse_schema(&tokens)?;
    tracing::debug!(structs = schema.structs.len(), "parsed schema");
    Ok(schema)
}

/// Parse and validate a textual schema.
/// Returns `Err(SdpError)` if tokenization, parsing or validation fails.
pub fn compile_schema(text: &str) -> Result<Schema, SdpError> {
    let schema = parse(text)?;
    verify_schema(&schema)?;
    Ok(schema)
}

/// Run a backend over a schema. The schema is validated again first; code is
/// never generated for an invalid schema.
pub fn generate(schema: &Schema, kind: BackendKind) -> Result<Vec<SourceFile>, SdpError> {
    verify_schema(schema)?;
    match kind {
        BackendKind::Rust => RustBackend::default().generate(schema),
    }
}

/// Lower a validated AST to the model the dynamic codec interprets.
pub fn to_runtime_schema(schema: &Schema) -> Result<runtime::Schema, SdpError> {
    verify_schema(schema)?;

    fn lower(schema: &Schema, ty: &TypeExpr) -> Result<runtime::FieldType, SdpError> {
        Ok(match ty {
            TypeExpr::Primitive(p) => runtime::FieldType::Primitive(*p),
            TypeExpr::Named(name) => {
                let index = schema
                    .structs
                    .iter()
                    .position(|s| &s.name == name)
                    .ok_or_else(|| SdpError::Generate(format!("unknown type {}", name)))?;
                runtime::FieldType::Struct(index)
            }
            TypeExpr::Array(element) => runtime::FieldType::Array(Box::new(lower(schema, element)?)),
        })
    }

    let mut defs = Vec::with_capacity(schema.structs.len());
    for s in &schema.structs {
        let mut fields = Vec::with_capacity(s.fields.len());
        for field in &s.fields {
            fields.push(runtime::Field {
                name:       field.name.clone(),
                field_type: lower(schema, &field.type_)?,
                optional:   field.optional,
            });
        }
        defs.push(runtime::Def::new(s.name.clone(), fields));
    }
    Ok(runtime::Schema::new(defs))
}
