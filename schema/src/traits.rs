//! Traits implemented by generated code.
//!
//! Generated structs only implement the `*_from` / `*_in` hooks and the
//! size calculator. The provided methods apply the top-level checks (size
//! limit, fresh decode context, frame header) so no generated file repeats
//! them.

use crate::arena::{Arena, ArenaContext};
use crate::bb::{ByteBuffer, ByteBufferMut};
use crate::context::{check_serialized_size, DecodeContext};
use crate::error::{Result, WireError};
use crate::frame::{FrameHeader, HEADER_SIZE, VERSION};

/// An owned message type: encodes, and decodes into owned memory.
pub trait Message: Sized {
    /// Framing type id, 1-based by declaration order.
    const TYPE_ID: u16;

    /// Struct name as written in the schema.
    const NAME: &'static str;

    /// Exact number of bytes [`encode_to`](Message::encode_to) writes.
    fn encoded_size(&self) -> usize;

    /// Writes the plain wire encoding at the current index of `bb`.
    fn encode_to(&self, bb: &mut ByteBufferMut);

    /// Reads one value at the current index of `bb`.
    fn decode_from(bb: &mut ByteBuffer, ctx: &mut DecodeContext) -> Result<Self>;

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.encoded_size()];
        self.encode_to(&mut ByteBufferMut::new(&mut out));
        out
    }

    /// Encodes into a caller-owned buffer and returns the number of bytes
    /// written. Nothing is written if `out` is too small.
    fn encode_into(&self, out: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_size();
        if out.len() < needed {
            return Err(WireError::BufferTooSmall { needed, available: out.len() });
        }
        self.encode_to(&mut ByteBufferMut::new(&mut out[..needed]));
        Ok(needed)
    }

    /// Decodes a plain payload. Bytes past the end of the struct are ignored.
    fn decode(bytes: &[u8]) -> Result<Self> {
        check_serialized_size(bytes.len())?;
        let mut ctx = DecodeContext::new();
        Self::decode_from(&mut ByteBuffer::new(bytes), &mut ctx)
    }

    /// Encodes behind a frame header carrying [`TYPE_ID`](Message::TYPE_ID).
    fn encode_message(&self) -> Vec<u8> {
        let size = self.encoded_size();
        let mut out = vec![0u8; HEADER_SIZE + size];
        let mut bb = ByteBufferMut::new(&mut out);
        FrameHeader { version: VERSION, type_id: Self::TYPE_ID, payload_len: size as u32 }.write(&mut bb);
        self.encode_to(&mut bb);
        out
    }

    /// Decodes a framed message that must carry this type's id.
    fn decode_message(bytes: &[u8]) -> Result<Self> {
        let (header, payload) = FrameHeader::parse(bytes)?;
        if header.type_id != Self::TYPE_ID {
            return Err(WireError::TypeIdMismatch {
                expected: Self::TYPE_ID,
                found:    header.type_id,
            });
        }
        Self::decode(payload)
    }
}

/// A zero-copy view type whose strings and primitive arrays borrow from the
/// input buffer.
pub trait DecodeRef<'a>: Sized {
    fn decode_from(bb: &mut ByteBuffer<'a>, ctx: &mut DecodeContext) -> Result<Self>;

    fn decode(bytes: &'a [u8]) -> Result<Self> {
        check_serialized_size(bytes.len())?;
        let mut ctx = DecodeContext::new();
        Self::decode_from(&mut ByteBuffer::new(bytes), &mut ctx)
    }
}

/// An arena type whose variable-length data lives in an [`Arena`].
pub trait DecodeIn: Sized {
    fn decode_in(bb: &mut ByteBuffer, ctx: &mut ArenaContext) -> Result<Self>;

    /// Decodes a plain payload, copying variable-length data into `arena`.
    fn decode(bytes: &[u8], arena: &mut Arena) -> Result<Self> {
        check_serialized_size(bytes.len())?;
        let mut ctx = ArenaContext::new(arena);
        Self::decode_in(&mut ByteBuffer::new(bytes), &mut ctx)
    }
}
