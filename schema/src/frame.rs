//! The optional self-describing message header.
//!
//! ```text
//! offset  size  field
//! 0       3     magic "SDP"
//! 3       1     version (0x32)
//! 4       2     type id, u16 LE, 1-based declaration order
//! 6       4     payload length, u32 LE
//! 10      n     payload in plain wire format
//! ```

use crate::bb::{ByteBuffer, ByteBufferMut};
use crate::context::check_serialized_size;
use crate::error::{Result, WireError};

pub const MAGIC: [u8; 3] = *b"SDP";
pub const VERSION: u8 = b'2';
pub const HEADER_SIZE: usize = 10;

/// A parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version:     u8,
    pub type_id:     u16,
    pub payload_len: u32,
}

impl FrameHeader {
    /// Validates the header at the start of `bytes` and returns it together
    /// with the payload slice. Bytes past the declared payload are ignored.
    pub fn parse(bytes: &[u8]) -> Result<(FrameHeader, &[u8])> {
        if bytes.len() < HEADER_SIZE {
            return Err(WireError::UnexpectedEof {
                needed:    HEADER_SIZE,
                available: bytes.len(),
            });
        }

        let mut bb = ByteBuffer::new(bytes);
        let mut magic = [0u8; 3];
        magic.copy_from_slice(bb.read_bytes(3)?);
        if magic != MAGIC {
            return Err(WireError::InvalidMagic(magic));
        }

        let version = bb.read_u8()?;
        if version != VERSION {
            return Err(WireError::UnsupportedVersion(version));
        }

        let type_id = bb.read_u16()?;
        let payload_len = bb.read_u32()?;
        check_serialized_size(payload_len as usize)?;
        let payload = bb.read_bytes(payload_len as usize)?;

        Ok((FrameHeader { version, type_id, payload_len }, payload))
    }

    /// Writes this header into the first [`HEADER_SIZE`] bytes of `bb`.
    pub fn write(&self, bb: &mut ByteBufferMut) {
        bb.write_bytes(&MAGIC);
        bb.write_u8(self.version);
        bb.write_u16(self.type_id);
        bb.write_u32(self.payload_len);
    }
}

/// Wraps an already encoded payload in a frame header.
pub fn encode_frame(type_id: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; HEADER_SIZE + payload.len()];
    let mut bb = ByteBufferMut::new(&mut out);
    FrameHeader { version: VERSION, type_id, payload_len: payload.len() as u32 }.write(&mut bb);
    bb.write_bytes(payload);
    out
}

#[test]
fn frame_layout() {
    let framed = encode_frame(2, &[0xAA, 0xBB]);
    assert_eq!(framed, [b'S', b'D', b'P', 0x32, 2, 0, 2, 0, 0, 0, 0xAA, 0xBB]);

    let (header, payload) = FrameHeader::parse(&framed).unwrap();
    assert_eq!(header, FrameHeader { version: VERSION, type_id: 2, payload_len: 2 });
    assert_eq!(payload, [0xAA, 0xBB]);
}

#[test]
fn short_header() {
    assert_eq!(
        FrameHeader::parse(b"SDP2"),
        Err(WireError::UnexpectedEof { needed: 10, available: 4 })
    );
}

#[test]
fn checks_magic_before_version() {
    let mut framed = encode_frame(1, &[]);
    framed[0] = b'X';
    framed[3] = b'9';
    assert_eq!(FrameHeader::parse(&framed), Err(WireError::InvalidMagic(*b"XDP")));

    framed[0] = b'S';
    assert_eq!(FrameHeader::parse(&framed), Err(WireError::UnsupportedVersion(b'9')));
}

#[test]
fn truncated_payload() {
    let framed = encode_frame(1, &[1, 2, 3]);
    assert_eq!(
        FrameHeader::parse(&framed[..12]),
        Err(WireError::UnexpectedEof { needed: 13, available: 12 })
    );
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut framed = encode_frame(3, &[7]);
    framed.extend_from_slice(&[9, 9]);
    let (_, payload) = FrameHeader::parse(&framed).unwrap();
    assert_eq!(payload, [7]);
}
