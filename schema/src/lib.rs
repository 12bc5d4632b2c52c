//! Runtime support for the SDP binary wire format: fixed-width little-endian
//! scalars, `u32`-prefixed strings and arrays, one-byte presence flags for
//! optional structs, and an optional 10-byte frame header for type dispatch.
//!
//! Generated code builds on [`ByteBuffer`], [`ByteBufferMut`], the decode
//! limits in [`context`], the [`Arena`] and the traits in [`traits`]. The
//! schema-driven [`Value`] codec reads and writes the same bytes without any
//! generated code.
//!
//! ```
//! use brine_sdp_schema::*;
//!
//! let schema = Schema::new(vec![
//!     Def::new("Point".to_owned(), vec![
//!         Field { name: "x".to_owned(), field_type: FieldType::Primitive(PrimitiveType::F32), optional: false },
//!         Field { name: "y".to_owned(), field_type: FieldType::Primitive(PrimitiveType::F32), optional: false },
//!     ]),
//! ]);
//!
//! let value = Value::decode(&schema, 0, &[0, 0, 0, 63, 0, 0, 0, 191]).unwrap();
//! assert_eq!(format!("{:?}", value), "Point {x: 0.5, y: -0.5}");
//! assert_eq!(value.encode(&schema).unwrap(), [0, 0, 0, 63, 0, 0, 0, 191]);
//! ```

pub mod arena;
pub mod bb;
pub mod context;
pub mod error;
pub mod frame;
pub mod schema;
pub mod traits;
pub mod value;

pub use arena::*;
pub use bb::*;
pub use context::{DecodeContext, Limits};
pub use error::{Result, WireError};
pub use frame::{encode_frame, FrameHeader};
pub use schema::*;
pub use traits::*;
pub use value::*;
