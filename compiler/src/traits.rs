use crate::error::SdpError;
use crate::types::{Schema, Struct};

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path:     String,
    pub contents: String,
}

/// Targets the compiler can generate code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Rust,
}

/// The struct a backend is currently emitting, with enough context to
/// resolve its references.
#[derive(Debug, Clone, Copy)]
pub struct StructInfo<'s> {
    pub schema:  &'s Schema,
    pub decl:    &'s Struct,
    /// 1-based declaration order, as carried in frame headers.
    pub type_id: u16,
}

/// Every piece a backend emits for one struct.
#[derive(Debug, Clone, Default)]
pub struct StructParts {
    pub types:             String,
    pub size_calculator:   String,
    pub encoder:           String,
    pub decoder:           String,
    pub zero_copy_decoder: String,
    pub arena_decoder:     String,
}

/// A code generation target. Adding a target means adding an implementation
/// of this trait; nothing else in the pipeline changes.
pub trait Backend {
    /// Output path of the generated file, relative to the output directory.
    fn file_name(&self) -> String;

    /// Rejects schemas this target cannot express. Runs after validation.
    fn check(&self, _schema: &Schema) -> Result<(), SdpError> {
        Ok(())
    }

    fn emit_prelude(&self, schema: &Schema) -> String;

    /// Type definitions for every decode tier.
    fn emit_types(&self, info: StructInfo) -> String;

    fn emit_size_calculator(&self, info: StructInfo) -> String;

    fn emit_encoder(&self, info: StructInfo) -> String;

    /// The decoder producing owned values.
    fn emit_decoder(&self, info: StructInfo) -> String;

    fn emit_zero_copy_decoder(&self, info: StructInfo) -> String;

    fn emit_arena_decoder(&self, info: StructInfo) -> String;

    /// Frame-header dispatch over every struct in the schema.
    fn emit_framing(&self, schema: &Schema) -> String;

    /// Joins the parts of one struct into source text.
    fn assemble_struct(&self, _info: StructInfo, parts: StructParts) -> String {
        [
            parts.types,
            parts.size_calculator,
            parts.encoder,
            parts.decoder,
            parts.zero_copy_decoder,
            parts.arena_decoder,
        ]
        .concat()
    }

    fn generate(&self, schema: &Schema) -> Result<Vec<SourceFile>, SdpError> {
        self.check(schema)?;

        let mut contents = self.emit_prelude(schema);
        for (index, decl) in schema.structs.iter().enumerate() {
            let info = StructInfo { schema, decl, type_id: (index + 1) as u16 };
            let parts = StructParts {
                types:             self.emit_types(info),
                size_calculator:   self.emit_size_calculator(info),
                encoder:           self.emit_encoder(info),
                decoder:           self.emit_decoder(info),
                zero_copy_decoder: self.emit_zero_copy_decoder(info),
                arena_decoder:     self.emit_arena_decoder(info),
            };
            contents.push_str(&self.assemble_struct(info, parts));
        }
        contents.push_str(&self.emit_framing(schema));

        tracing::debug!(file = %self.file_name(), bytes = contents.len(), "generated source");
        Ok(vec![SourceFile { path: self.file_name(), contents }])
    }
}
