//! The Rust backend.
//!
//! For every schema struct `Foo` this emits three types, one per decode tier:
//!
//! * `Foo`: owned (`String`, `Vec`, `Option<Bar>`), implements `Message`
//!   (size calculator, encoder, owned decoder, framing helpers);
//! * `FooRef`: zero-copy (`&'a str`, `ArrayView<'a, T>`), implements
//!   `DecodeRef` and converts with `into_owned()`;
//! * `FooIn`: arena-backed (`ArenaStr`, `ArenaSlice<T>`, `ArenaList<T>`),
//!   implements `DecodeIn` and `ArenaRecord`, so lists of it live in the arena
//!   too. It is `Copy` and owns no heap memory.
//!
//! The file ends with an `AnyMessage` enum and a `decode_message` function
//! that dispatches on the frame header's type id.

use std::collections::{HashMap, HashSet};

use brine_sdp_schema::PrimitiveType;

use crate::{
    error::SdpError,
    traits::{Backend, StructInfo, StructParts},
    types::{Field, Schema, TypeExpr},
    utils::{quote, to_pascal_case, to_snake_case},
};

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn",
];

/// Names the generated file defines or imports itself, plus prelude names it
/// relies on. A schema type may not take any of them.
const TAKEN_NAMES: &[&str] = &[
    "AnyMessage", "Arena", "ArenaContext", "ArenaList", "ArenaRecord", "ArenaSlice", "ArenaStr",
    "ArrayView", "ByteBuffer",
    "ByteBufferMut", "DecodeContext", "DecodeIn", "DecodeRef", "FrameHeader", "Message",
    "Result", "WireError", "Option", "Some", "None", "Ok", "Err", "Vec", "String", "Box",
    "Clone", "Debug", "Default", "PartialEq",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RustOptions {
    /// Path the generated file imports the runtime from.
    pub runtime_path: String,
    pub file_name:    String,
}

impl Default for RustOptions {
    fn default() -> RustOptions {
        RustOptions {
            runtime_path: "brine_sdp::wire".to_string(),
            file_name:    "generated.rs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RustBackend {
    pub options: RustOptions,
}

impl RustBackend {
    pub fn new(options: RustOptions) -> RustBackend {
        RustBackend { options }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Owned,
    Ref,
    Arena,
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
fn escape_rust_keyword(s: String) -> String {
    if RUST_KEYWORDS.contains(&s.as_str()) {
        format!("{}_", s)
    } else {
        s
    }
}

fn type_name(name: &str) -> String {
    escape_rust_keyword(to_pascal_case(name))
}

fn field_name(field: &Field) -> String {
    escape_rust_keyword(to_snake_case(&field.name))
}

/// A fixed-width primitive, i.e. anything but `str`.
fn fixed(ty: &TypeExpr) -> Option<PrimitiveType> {
    match ty {
        TypeExpr::Primitive(PrimitiveType::Str) => None,
        TypeExpr::Primitive(p) => Some(*p),
        _ => None,
    }
}

/// Names of structs whose zero-copy form borrows from the input and so needs
/// a lifetime parameter.
fn borrowing_structs(schema: &Schema) -> HashSet<&str> {
    fn borrows(ty: &TypeExpr, borrowing: &HashSet<&str>) -> bool {
        match ty {
            TypeExpr::Primitive(p) => *p == PrimitiveType::Str,
            TypeExpr::Named(name) => borrowing.contains(name.as_str()),
            TypeExpr::Array(element) => fixed(element).is_some() || borrows(element, borrowing),
        }
    }

    let mut borrowing = HashSet::new();
    loop {
        let before = borrowing.len();
        for s in &schema.structs {
            if !borrowing.contains(s.name.as_str()) && s.fields.iter().any(|f| borrows(&f.type_, &borrowing)) {
                borrowing.insert(s.name.as_str());
            }
        }
        if borrowing.len() == before {
            return borrowing;
        }
    }
}

fn tier_type(ty: &TypeExpr, tier: Tier, borrowing: &HashSet<&str>) -> String {
    match ty {
        TypeExpr::Primitive(PrimitiveType::Str) => match tier {
            Tier::Owned => "String".to_string(),
            Tier::Ref => "&'a str".to_string(),
            Tier::Arena => "ArenaStr".to_string(),
        },
        TypeExpr::Primitive(p) => p.name().to_string(),
        TypeExpr::Named(name) => match tier {
            Tier::Owned => type_name(name),
            Tier::Ref if borrowing.contains(name.as_str()) => format!("{}Ref<'a>", type_name(name)),
            Tier::Ref => format!("{}Ref", type_name(name)),
            Tier::Arena => format!("{}In", type_name(name)),
        },
        TypeExpr::Array(element) => match (fixed(element), tier) {
            (Some(p), Tier::Owned) => format!("Vec<{}>", p.name()),
            (Some(p), Tier::Ref) => format!("ArrayView<'a, {}>", p.name()),
            (Some(p), Tier::Arena) => format!("ArenaSlice<{}>", p.name()),
            (None, Tier::Arena) => format!("ArenaList<{}>", tier_type(element, tier, borrowing)),
            (None, _) => format!("Vec<{}>", tier_type(element, tier, borrowing)),
        },
    }
}

fn field_type(field: &Field, tier: Tier, borrowing: &HashSet<&str>) -> String {
    let ty = tier_type(&field.type_, tier, borrowing);
    if field.optional {
        format!("Option<{}>", ty)
    } else {
        ty
    }
}

/// Encoded size of the value at `place` (a field access or a `&T` binding).
fn size_expr(ty: &TypeExpr, place: &str) -> String {
    match ty {
        TypeExpr::Primitive(PrimitiveType::Str) => format!("4 + {}.len()", place),
        TypeExpr::Primitive(p) => p.fixed_size().unwrap_or(0).to_string(),
        TypeExpr::Named(_) => format!("{}.encoded_size()", place),
        TypeExpr::Array(element) => match fixed(element) {
            Some(p) => format!("4 + {}.len() * {}", place, p.fixed_size().unwrap_or(0)),
            None => format!("4 + {}.iter().map(|v| {}).sum::<usize>()", place, size_expr(element, "v")),
        },
    }
}

/// Writes the value at `place`. `by_ref` is true when `place` is already a
/// reference (a closure binding) rather than a field access.
fn encode_expr(ty: &TypeExpr, place: &str, by_ref: bool) -> String {
    let borrowed = if by_ref { place.to_string() } else { format!("&{}", place) };
    match ty {
        TypeExpr::Primitive(PrimitiveType::Str) => format!("bb.write_str({})", borrowed),
        TypeExpr::Primitive(p) if by_ref => format!("bb.write_{}(*{})", p.name(), place),
        TypeExpr::Primitive(p) => format!("bb.write_{}({})", p.name(), place),
        TypeExpr::Named(_) => format!("{}.encode_to(bb)", place),
        TypeExpr::Array(element) => match fixed(element) {
            Some(_) => format!("bb.write_slice({})", borrowed),
            None => format!("bb.write_array({}, |bb, v| {})", borrowed, encode_expr(element, "v", true)),
        },
    }
}

/// An expression of type `Result<_>` reading one value for `tier`.
fn decode_expr(ty: &TypeExpr, tier: Tier) -> String {
    match ty {
        TypeExpr::Primitive(PrimitiveType::Str) => match tier {
            Tier::Owned => "bb.read_str().map(str::to_owned)".to_string(),
            Tier::Ref => "bb.read_str()".to_string(),
            Tier::Arena => "ctx.read_str(bb)".to_string(),
        },
        TypeExpr::Primitive(p) => format!("bb.read_{}()", p.name()),
        TypeExpr::Named(name) => match tier {
            Tier::Owned => format!("{}::decode_from(bb, ctx)", type_name(name)),
            Tier::Ref => format!("{}Ref::decode_from(bb, ctx)", type_name(name)),
            Tier::Arena => format!("{}In::decode_in(bb, ctx)", type_name(name)),
        },
        TypeExpr::Array(element) => match (fixed(element), tier) {
            (Some(p), Tier::Owned) => format!("bb.read_primitives::<{}, _>(ctx)", p.name()),
            (Some(p), Tier::Ref) => format!("bb.read_view::<{}, _>(ctx)", p.name()),
            (Some(p), Tier::Arena) => format!("ctx.read_primitives::<{}>(bb)", p.name()),
            (None, Tier::Arena) => format!("ctx.read_list(bb, |bb, ctx| {})", decode_expr(element, tier)),
            (None, _) => format!("bb.read_vec(ctx, |bb, ctx| {})", decode_expr(element, tier)),
        },
    }
}

fn field_decode_expr(field: &Field, tier: Tier) -> String {
    let expr = decode_expr(&field.type_, tier);
    if field.optional {
        format!("bb.read_option(ctx, |bb, ctx| {})", expr)
    } else {
        expr
    }
}

/// Converts the zero-copy value at `place` into its owned form.
fn into_owned_expr(ty: &TypeExpr, place: &str) -> String {
    match ty {
        TypeExpr::Primitive(PrimitiveType::Str) => format!("{}.to_owned()", place),
        TypeExpr::Primitive(_) => place.to_string(),
        TypeExpr::Named(_) => format!("{}.into_owned()", place),
        TypeExpr::Array(element) => match fixed(element) {
            Some(_) => format!("{}.to_vec()", place),
            None => format!("{}.into_iter().map(|v| {}).collect()", place, into_owned_expr(element, "v")),
        },
    }
}

fn doc_lines(doc: &Option<String>, indent: &str, lines: &mut Vec<String>) {
    if let Some(doc) = doc {
        for line in doc.lines() {
            if line.is_empty() {
                lines.push(format!("{}///", indent));
            } else {
                lines.push(format!("{}/// {}", indent, line));
            }
        }
    }
}

/// `Ok(Name {` + one `field: expr?,` line per field + `})`, indented for a
/// method body.
fn struct_literal(name: &str, info: StructInfo, tier: Tier) -> Vec<String> {
    let mut lines = vec![format!("        Ok({} {{", name)];
    for field in &info.decl.fields {
        lines.push(format!("            {}: {}?,", field_name(field), field_decode_expr(field, tier)));
    }
    lines.push("        })".to_string());
    lines
}

impl Backend for RustBackend {
    fn file_name(&self) -> String {
        self.options.file_name.clone()
    }

    /// Rejects schemas whose converted Rust names would collide.
    fn check(&self, schema: &Schema) -> Result<(), SdpError> {
        if schema.structs.len() > u16::MAX as usize {
            return Err(SdpError::Generate(format!(
                "{} structs do not fit in a 16-bit frame type id",
                schema.structs.len()
            )));
        }

        let mut taken: HashMap<String, String> =
            TAKEN_NAMES.iter().map(|n| (n.to_string(), "the generated runtime".to_string())).collect();

        for s in &schema.structs {
            let base = type_name(&s.name);
            for generated in [base.clone(), format!("{}Ref", base), format!("{}In", base)] {
                let owner = format!("struct {}", quote(&s.name));
                if let Some(previous) = taken.insert(generated.clone(), owner.clone()) {
                    return Err(SdpError::Generate(format!(
                        "{} and {} both generate the Rust name `{}`",
                        previous, owner, generated
                    )));
                }
            }

            let mut fields: HashMap<String, &str> = HashMap::new();
            for field in &s.fields {
                if let Some(previous) = fields.insert(field_name(field), &field.name) {
                    return Err(SdpError::Generate(format!(
                        "struct {}: fields {} and {} both generate the Rust name `{}`",
                        quote(&s.name),
                        quote(previous),
                        quote(&field.name),
                        field_name(field)
                    )));
                }
            }
        }
        Ok(())
    }

    fn emit_prelude(&self, schema: &Schema) -> String {
        let lines = vec![
            "// Code generated by bsdp. DO NOT EDIT.".to_string(),
            format!("// {} structs; frame type ids follow declaration order.", schema.structs.len()),
            "".to_string(),
            "#![allow(unused_variables, unused_imports)]".to_string(),
            "".to_string(),
            format!("use {}::{{", self.options.runtime_path),
            "    Arena, ArenaContext, ArenaList, ArenaRecord, ArenaSlice, ArenaStr, ArrayView, ByteBuffer,".to_string(),
            "    ByteBufferMut, DecodeContext, DecodeIn, DecodeRef, FrameHeader, Message, Result, WireError,".to_string(),
            "};".to_string(),
            "".to_string(),
        ];
        lines.join("\n") + "\n"
    }

    fn emit_types(&self, info: StructInfo) -> String {
        let borrowing = borrowing_structs(info.schema);
        let name = type_name(&info.decl.name);
        let lifetime = if borrowing.contains(info.decl.name.as_str()) { "<'a>" } else { "" };
        let mut lines = Vec::new();

        doc_lines(&info.decl.doc, "", &mut lines);
        lines.push("#[derive(Debug, Clone, PartialEq, Default)]".to_string());
        lines.push(format!("pub struct {} {{", name));
        for field in &info.decl.fields {
            doc_lines(&field.doc, "    ", &mut lines);
            lines.push(format!("    pub {}: {},", field_name(field), field_type(field, Tier::Owned, &borrowing)));
        }
        lines.push("}".to_string());
        lines.push("".to_string());

        lines.push(format!("/// Zero-copy view of [`{}`].", name));
        lines.push("#[derive(Debug, Clone, PartialEq)]".to_string());
        lines.push(format!("pub struct {}Ref{} {{", name, lifetime));
        for field in &info.decl.fields {
            lines.push(format!("    pub {}: {},", field_name(field), field_type(field, Tier::Ref, &borrowing)));
        }
        lines.push("}".to_string());
        lines.push("".to_string());

        lines.push(format!("/// Arena-backed form of [`{}`].", name));
        lines.push("#[derive(Debug, Clone, Copy, PartialEq)]".to_string());
        lines.push(format!("pub struct {}In {{", name));
        for field in &info.decl.fields {
            lines.push(format!("    pub {}: {},", field_name(field), field_type(field, Tier::Arena, &borrowing)));
        }
        lines.push("}".to_string());

        lines.join("\n") + "\n\n"
    }

    fn emit_size_calculator(&self, info: StructInfo) -> String {
        let mut lines = vec![
            "    fn encoded_size(&self) -> usize {".to_string(),
            "        let mut size = 0;".to_string(),
        ];
        for field in &info.decl.fields {
            let place = format!("self.{}", field_name(field));
            let term = if field.optional {
                format!("1 + {}.as_ref().map_or(0, |v| {})", place, size_expr(&field.type_, "v"))
            } else {
                size_expr(&field.type_, &place)
            };
            lines.push(format!("        size += {};", term));
        }
        lines.push("        size".to_string());
        lines.push("    }".to_string());
        lines.join("\n") + "\n"
    }

    fn emit_encoder(&self, info: StructInfo) -> String {
        let mut lines = vec!["    fn encode_to(&self, bb: &mut ByteBufferMut) {".to_string()];
        for field in &info.decl.fields {
            let place = format!("self.{}", field_name(field));
            let stmt = if field.optional {
                format!(
                    "bb.write_option({}.as_ref(), |bb, v| {})",
                    place,
                    encode_expr(&field.type_, "v", true)
                )
            } else {
                encode_expr(&field.type_, &place, false)
            };
            lines.push(format!("        {};", stmt));
        }
        lines.push("    }".to_string());
        lines.join("\n") + "\n"
    }

    fn emit_decoder(&self, info: StructInfo) -> String {
        let name = type_name(&info.decl.name);
        let mut lines = vec![format!(
            "    fn decode_from(bb: &mut ByteBuffer, ctx: &mut DecodeContext) -> Result<{}> {{",
            name
        )];
        lines.extend(struct_literal(&name, info, Tier::Owned));
        lines.push("    }".to_string());
        lines.join("\n") + "\n"
    }

    fn emit_zero_copy_decoder(&self, info: StructInfo) -> String {
        let borrowing = borrowing_structs(info.schema);
        let name = type_name(&info.decl.name);
        let ref_name = if borrowing.contains(info.decl.name.as_str()) {
            format!("{}Ref<'a>", name)
        } else {
            format!("{}Ref", name)
        };
        let inherent = if borrowing.contains(info.decl.name.as_str()) { "impl<'a>" } else { "impl" };

        let mut lines = vec![
            format!("impl<'a> DecodeRef<'a> for {} {{", ref_name),
            format!(
                "    fn decode_from(bb: &mut ByteBuffer<'a>, ctx: &mut DecodeContext) -> Result<{}> {{",
                ref_name
            ),
        ];
        lines.extend(struct_literal(&format!("{}Ref", name), info, Tier::Ref));
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push("".to_string());

        lines.push(format!("{} {} {{", inherent, ref_name));
        lines.push(format!("    /// Copies borrowed data into an owned [`{}`].", name));
        lines.push(format!("    pub fn into_owned(self) -> {} {{", name));
        lines.push(format!("        {} {{", name));
        for field in &info.decl.fields {
            let place = format!("self.{}", field_name(field));
            let expr = if field.optional {
                format!("{}.map(|v| {})", place, into_owned_expr(&field.type_, "v"))
            } else {
                into_owned_expr(&field.type_, &place)
            };
            lines.push(format!("            {}: {},", field_name(field), expr));
        }
        lines.push("        }".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.join("\n") + "\n\n"
    }

    fn emit_arena_decoder(&self, info: StructInfo) -> String {
        let borrowing = borrowing_structs(info.schema);
        let name = format!("{}In", type_name(&info.decl.name));
        let mut lines = vec![
            format!("impl DecodeIn for {} {{", name),
            format!(
                "    fn decode_in(bb: &mut ByteBuffer, ctx: &mut ArenaContext) -> Result<{}> {{",
                name
            ),
        ];
        lines.extend(struct_literal(&name, info, Tier::Arena));
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push("".to_string());

        // Fixed-width fields are stored inline, everything else as its handle
        // or nested record.
        let sizes: Vec<String> = info
            .decl
            .fields
            .iter()
            .map(|field| match fixed(&field.type_) {
                Some(p) => p.fixed_size().unwrap_or(0).to_string(),
                None => format!("<{}>::RECORD_SIZE", field_type(field, Tier::Arena, &borrowing)),
            })
            .collect();
        lines.push(format!("impl ArenaRecord for {} {{", name));
        lines.push(format!("    const RECORD_SIZE: usize = {};", sizes.join(" + ")));
        lines.push("".to_string());
        lines.push("    fn write_record(&self, bb: &mut ByteBufferMut) {".to_string());
        for field in &info.decl.fields {
            let place = format!("self.{}", field_name(field));
            match fixed(&field.type_) {
                Some(_) => lines.push(format!("        {};", encode_expr(&field.type_, &place, false))),
                None => lines.push(format!("        {}.write_record(bb);", place)),
            }
        }
        lines.push("    }".to_string());
        lines.push("".to_string());
        lines.push(format!("    fn read_record(bb: &mut ByteBuffer) -> Result<{}> {{", name));
        lines.push(format!("        Ok({} {{", name));
        for field in &info.decl.fields {
            let expr = match fixed(&field.type_) {
                Some(_) => decode_expr(&field.type_, Tier::Arena),
                None => format!("<{}>::read_record(bb)", field_type(field, Tier::Arena, &borrowing)),
            };
            lines.push(format!("            {}: {}?,", field_name(field), expr));
        }
        lines.push("        })".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.join("\n") + "\n\n"
    }

    fn emit_framing(&self, schema: &Schema) -> String {
        let names: Vec<String> = schema.structs.iter().map(|s| type_name(&s.name)).collect();
        let mut lines = vec![
            "/// Any message defined by this schema, tagged by frame type id.".to_string(),
            "#[derive(Debug, Clone, PartialEq)]".to_string(),
            "pub enum AnyMessage {".to_string(),
        ];
        for name in &names {
            lines.push(format!("    {}({}),", name, name));
        }
        lines.push("}".to_string());
        lines.push("".to_string());

        lines.push("impl AnyMessage {".to_string());
        lines.push("    pub fn type_id(&self) -> u16 {".to_string());
        lines.push("        match self {".to_string());
        for name in &names {
            lines.push(format!("            AnyMessage::{}(_) => {}::TYPE_ID,", name, name));
        }
        lines.push("        }".to_string());
        lines.push("    }".to_string());
        lines.push("".to_string());
        lines.push("    pub fn encode_message(&self) -> Vec<u8> {".to_string());
        lines.push("        match self {".to_string());
        for name in &names {
            lines.push(format!("            AnyMessage::{}(message) => message.encode_message(),", name));
        }
        lines.push("        }".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push("".to_string());

        lines.push("/// Decodes a framed message of any type in this schema.".to_string());
        lines.push("pub fn decode_message(bytes: &[u8]) -> Result<AnyMessage> {".to_string());
        lines.push("    let (header, payload) = FrameHeader::parse(bytes)?;".to_string());
        lines.push("    match header.type_id {".to_string());
        for (index, name) in names.iter().enumerate() {
            lines.push(format!(
                "        {} => Ok(AnyMessage::{}({}::decode(payload)?)),",
                index + 1,
                name,
                name
            ));
        }
        lines.push("        other => Err(WireError::UnknownTypeId(other)),".to_string());
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn assemble_struct(&self, info: StructInfo, parts: StructParts) -> String {
        format!(
            "{types}impl Message for {name} {{\n    const TYPE_ID: u16 = {id};\n    const NAME: &'static str = {quoted};\n\n{size}\n{encoder}\n{decoder}}}\n\n{zero_copy}{arena}",
            types = parts.types,
            name = type_name(&info.decl.name),
            id = info.type_id,
            quoted = quote(&info.decl.name),
            size = parts.size_calculator,
            encoder = parts.encoder,
            decoder = parts.decoder,
            zero_copy = parts.zero_copy_decoder,
            arena = parts.arena_decoder,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_schema;

    fn generate(text: &str) -> String {
        let schema = compile_schema(text).unwrap();
        RustBackend::default().generate(&schema).unwrap().remove(0).contents
    }

    #[test]
    fn point_struct() {
        let code = generate("/// A point.\nstruct Point { x: f32, y: f32 }");
        assert!(code.starts_with("// Code generated by bsdp. DO NOT EDIT.\n"));
        assert!(code.contains("use brine_sdp::wire::{\n"));
        assert!(code.contains("/// A point.\n#[derive(Debug, Clone, PartialEq, Default)]\npub struct Point {\n    pub x: f32,\n    pub y: f32,\n}\n"));
        assert!(code.contains("pub struct PointRef {\n"));
        assert!(code.contains("impl Message for Point {\n    const TYPE_ID: u16 = 1;\n    const NAME: &'static str = \"Point\";\n"));
        assert!(code.contains("        size += 4;\n        size += 4;\n        size\n"));
        assert!(code.contains("        bb.write_f32(self.x);\n"));
        assert!(code.contains("            x: bb.read_f32()?,\n"));
        assert!(code.contains("impl<'a> DecodeRef<'a> for PointRef {\n"));
        assert!(code.contains("impl PointRef {\n"));
        assert!(code.contains("impl DecodeIn for PointIn {\n"));
        assert!(code.contains("#[derive(Debug, Clone, Copy, PartialEq)]\npub struct PointIn {\n"));
        assert!(code.contains("impl ArenaRecord for PointIn {\n    const RECORD_SIZE: usize = 4 + 4;\n"));
        assert!(code.contains("        1 => Ok(AnyMessage::Point(Point::decode(payload)?)),\n"));
    }

    #[test]
    fn variable_length_fields() {
        let code = generate(
            "struct P { x: f32 }\nstruct S { name: str, tags: []str, grid: [][]u8, at: ?P, ps: []P }",
        );
        assert!(code.contains("pub struct SRef<'a> {\n"));
        assert!(code.contains("    pub name: &'a str,\n    pub tags: Vec<&'a str>,\n    pub grid: Vec<ArrayView<'a, u8>>,\n    pub at: Option<PRef>,\n    pub ps: Vec<PRef>,\n"));
        assert!(code.contains("    pub name: ArenaStr,\n    pub tags: ArenaList<ArenaStr>,\n    pub grid: ArenaList<ArenaSlice<u8>>,\n    pub at: Option<PIn>,\n    pub ps: ArenaList<PIn>,\n"));
        assert!(code.contains("        size += 4 + self.tags.iter().map(|v| 4 + v.len()).sum::<usize>();\n"));
        assert!(code.contains("        size += 4 + self.grid.iter().map(|v| 4 + v.len() * 1).sum::<usize>();\n"));
        assert!(code.contains("        size += 1 + self.at.as_ref().map_or(0, |v| v.encoded_size());\n"));
        assert!(code.contains("        bb.write_array(&self.grid, |bb, v| bb.write_slice(v));\n"));
        assert!(code.contains("        bb.write_option(self.at.as_ref(), |bb, v| v.encode_to(bb));\n"));
        assert!(code.contains("            tags: bb.read_vec(ctx, |bb, ctx| bb.read_str().map(str::to_owned))?,\n"));
        assert!(code.contains("            grid: ctx.read_list(bb, |bb, ctx| ctx.read_primitives::<u8>(bb))?,\n"));
        assert!(code.contains("            ps: ctx.read_list(bb, |bb, ctx| PIn::decode_in(bb, ctx))?,\n"));
        assert!(code.contains(
            "    const RECORD_SIZE: usize = <ArenaStr>::RECORD_SIZE + <ArenaList<ArenaStr>>::RECORD_SIZE + <ArenaList<ArenaSlice<u8>>>::RECORD_SIZE + <Option<PIn>>::RECORD_SIZE + <ArenaList<PIn>>::RECORD_SIZE;\n"
        ));
        assert!(code.contains("        self.at.write_record(bb);\n"));
        assert!(code.contains("            at: <Option<PIn>>::read_record(bb)?,\n"));
        assert!(code.contains("            at: bb.read_option(ctx, |bb, ctx| PRef::decode_from(bb, ctx))?,\n"));
        assert!(code.contains("            ps: self.ps.into_iter().map(|v| v.into_owned()).collect(),\n"));
        assert!(code.contains("        2 => Ok(AnyMessage::S(S::decode(payload)?)),\n"));
    }

    #[test]
    fn lifetime_propagates_through_named_fields() {
        let code = generate("struct Inner { s: str }\nstruct Outer { i: Inner }\nstruct Plain { n: u8 }");
        assert!(code.contains("pub struct OuterRef<'a> {\n    pub i: InnerRef<'a>,\n"));
        assert!(code.contains("pub struct PlainRef {\n"));
    }

    #[test]
    fn converts_names() {
        let code = generate("struct audio_unit { maxValue: u8, sessionID: u16 }");
        assert!(code.contains("pub struct AudioUnit {\n    pub max_value: u8,\n    pub session_id: u16,\n"));
        assert!(code.contains("const NAME: &'static str = \"audio_unit\";"));
    }

    #[test]
    fn rejects_colliding_names() {
        let schema = compile_schema("struct point { x: u8 }\nstruct Point { y: u8 }").unwrap();
        assert!(matches!(RustBackend::default().generate(&schema), Err(SdpError::Generate(_))));

        let schema = compile_schema("struct P { x: u8 }\nstruct PRef { y: u8 }").unwrap();
        assert!(matches!(RustBackend::default().generate(&schema), Err(SdpError::Generate(_))));

        let schema = compile_schema("struct P { maxValue: u8, max_value: u8 }").unwrap();
        assert!(matches!(RustBackend::default().generate(&schema), Err(SdpError::Generate(_))));
    }

    #[test]
    fn custom_runtime_path() {
        let backend = RustBackend::new(RustOptions {
            runtime_path: "brine_sdp_schema".to_string(),
            file_name:    "wire.rs".to_string(),
        });
        let schema = compile_schema("struct P { x: u8 }").unwrap();
        let files = backend.generate(&schema).unwrap();
        assert_eq!(files[0].path, "wire.rs");
        assert!(files[0].contents.contains("use brine_sdp_schema::{\n"));
    }
}
