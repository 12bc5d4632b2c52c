//! brine-sdp-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for `.sdp` schema files,
//!  2) A validator (structure, type references, naming, cycles) that reports
//!     every problem at once,
//!  3) A `Backend` trait and the Rust reference backend,
//!  4) Lowering to the runtime model used by the dynamic codec,
//!  5) Error types (`SdpError`, `ParseError`, `ValidationError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod reserved;
pub mod validator;
pub mod compiler;
pub mod gen_rust;
pub mod traits;

pub use compiler::{compile_schema, generate, parse, to_runtime_schema};
pub use error::{ErrorCode, ParseError, SdpError, ValidationError, ValidationErrors};
pub use gen_rust::{RustBackend, RustOptions};
pub use traits::{Backend, BackendKind, SourceFile};
pub use types::{Field, Schema, Struct, TypeExpr};
pub use validator::{validate, verify_schema};
