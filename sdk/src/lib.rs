//! brine-sdp
//!
//! Facade over the Brine SDP runtime and compiler.
//!
//! - `wire`: everything generated code needs (buffers, limits, arena, framing,
//!   the `Message`/`DecodeRef`/`DecodeIn` traits) plus the dynamic `Value` codec
//! - compiler entry points (`compile_schema`, `generate`, `to_runtime_schema`)
//! - JSON rendering of framed messages

use thiserror::Error;

pub use brine_sdp_compiler::{
    compile_schema, generate, parse, to_runtime_schema, validate, BackendKind, SdpError,
    SourceFile,
};

/// The wire runtime. Generated code imports from here by default.
pub mod wire {
    pub use brine_sdp_schema::*;
}

pub mod error {
    pub use brine_sdp_compiler::error::{ParseError, SdpError, ValidationError, ValidationErrors};
    pub use brine_sdp_schema::WireError;
}

#[derive(Debug, Error)]
pub enum JsonError {
    #[error(transparent)]
    Wire(#[from] wire::WireError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a framed message with the dynamic codec and render it as
/// pretty-printed JSON. Objects keep field declaration order.
pub fn decode_message_to_json(schema: &wire::Schema, bytes: &[u8]) -> Result<String, JsonError> {
    let value = wire::Value::decode_message(schema, bytes)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
