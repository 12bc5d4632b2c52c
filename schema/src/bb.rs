use std::fmt;
use std::marker::PhantomData;
use std::str;

use crate::context::Limits;
use crate::error::{Result, WireError};

/// A scalar with a fixed little-endian wire width.
///
/// Implemented for the eight integer widths, both IEEE-754 widths and `bool`.
pub trait FixedWidth: Copy + fmt::Debug + Sized + 'static {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Rebuilds a value from exactly `SIZE` bytes that already passed
    /// [`validate`](#method.validate).
    fn from_le(bytes: &[u8]) -> Self;

    /// Writes the value into the first `SIZE` bytes of `out`.
    fn write_le(self, out: &mut [u8]);

    /// Rejects byte patterns that do not encode a value. Only `bool` has any.
    fn validate(_bytes: &[u8]) -> Result<()> {
        Ok(())
    }
}

macro_rules! fixed_width {
    ($($ty:ty => $size:expr),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const SIZE: usize = $size;

                #[inline]
                fn from_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; $size];
                    raw.copy_from_slice(&bytes[..$size]);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_le(self, out: &mut [u8]) {
                    out[..$size].copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

fixed_width! {
    u8 => 1, u16 => 2, u32 => 4, u64 => 8,
    i8 => 1, i16 => 2, i32 => 4, i64 => 8,
    f32 => 4, f64 => 8,
}

impl FixedWidth for bool {
    const SIZE: usize = 1;

    #[inline]
    fn from_le(bytes: &[u8]) -> Self {
        bytes[0] == 1
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    // Strict: 0 and 1 are the only booleans.
    fn validate(bytes: &[u8]) -> Result<()> {
        match bytes[0] {
            0 | 1 => Ok(()),
            other => Err(WireError::InvalidBool(other)),
        }
    }
}

/// A zero-copy view over the raw bytes of a fixed-width array.
///
/// Elements are decoded on access, so the view never needs the input to be
/// aligned. Every element was validated when the view was created.
pub struct ArrayView<'a, T> {
    bytes:   &'a [u8],
    _marker: PhantomData<T>,
}

impl<'a, T: FixedWidth> ArrayView<'a, T> {
    /// Wraps `bytes`, which must hold a whole number of valid elements.
    pub fn new(bytes: &'a [u8]) -> Result<ArrayView<'a, T>> {
        if bytes.len() % T::SIZE != 0 {
            let needed = bytes.len() + (T::SIZE - bytes.len() % T::SIZE);
            return Err(WireError::UnexpectedEof { needed, available: bytes.len() });
        }
        for chunk in bytes.chunks_exact(T::SIZE) {
            T::validate(chunk)?;
        }
        Ok(ArrayView { bytes, _marker: PhantomData })
    }

    /// An empty view.
    pub fn empty() -> ArrayView<'a, T> {
        ArrayView { bytes: &[], _marker: PhantomData }
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / T::SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        let start = index.checked_mul(T::SIZE)?;
        let chunk = self.bytes.get(start..start + T::SIZE)?;
        Some(T::from_le(chunk))
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        self.bytes.chunks_exact(T::SIZE).map(T::from_le)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// The little-endian bytes backing this view, exactly as they appeared on
    /// the wire (without the count prefix).
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a, T> Clone for ArrayView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ArrayView<'a, T> {}

impl<'a, T: FixedWidth> fmt::Debug for ArrayView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, 'b, T> PartialEq<ArrayView<'b, T>> for ArrayView<'a, T> {
    fn eq(&self, other: &ArrayView<'b, T>) -> bool {
        self.bytes == other.bytes
    }
}

impl<'a, T: FixedWidth + PartialEq> PartialEq<[T]> for ArrayView<'a, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == *b)
    }
}

impl<'a, T: FixedWidth + PartialEq> PartialEq<Vec<T>> for ArrayView<'a, T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == *other.as_slice()
    }
}

/// A byte buffer meant for reading wire data.
///
/// Every read is bounds-checked against the remaining input and fails with
/// [`WireError::UnexpectedEof`] instead of reading past the end.
///
/// Example usage:
///
/// ```
/// let mut bb = brine_sdp_schema::ByteBuffer::new(&[2, 0, 0, 0, 104, 105, 1]);
/// assert_eq!(bb.read_str(), Ok("hi"));
/// assert_eq!(bb.read_bool(), Ok(true));
/// ```
///
pub struct ByteBuffer<'a> {
    data:  &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. Anything
    /// borrowed out of the buffer (strings, views) lives as long as the slice.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Bytes left between the current index and the end of input.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    /// Try to read `len` raw bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(WireError::UnexpectedEof {
                needed:    self.index.saturating_add(len),
                available: self.data.len(),
            });
        }
        let value = &self.data[self.index..self.index + len];
        self.index += len;
        Ok(value)
    }

    /// Try to read any fixed-width scalar starting at the current index.
    #[inline]
    pub fn read_fixed<T: FixedWidth>(&mut self) -> Result<T> {
        let bytes = self.read_bytes(T::SIZE)?;
        T::validate(bytes)?;
        Ok(T::from_le(bytes))
    }

    /// Try to read a boolean. Only the bytes 0 and 1 are accepted.
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_fixed()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_fixed()
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_fixed()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_fixed()
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_fixed()
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_fixed()
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_fixed()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_fixed()
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_fixed()
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_fixed()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_fixed()
    }

    /// Try to read a length-prefixed UTF-8 string. The result aliases the
    /// underlying memory; nothing is copied.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    /// Reads an array count and vets it through `limits`.
    pub fn read_count<C: Limits>(&mut self, limits: &mut C) -> Result<usize> {
        let count = self.read_u32()?;
        limits.check_array(count)
    }

    /// Try to read a fixed-width array as a zero-copy view.
    pub fn read_view<T: FixedWidth, C: Limits>(&mut self, limits: &mut C) -> Result<ArrayView<'a, T>> {
        let count = self.read_count(limits)?;
        let bytes = self.read_bytes(count * T::SIZE)?;
        ArrayView::new(bytes)
    }

    /// Try to read a fixed-width array into an owned vector.
    pub fn read_primitives<T: FixedWidth, C: Limits>(&mut self, limits: &mut C) -> Result<Vec<T>> {
        Ok(self.read_view(limits)?.to_vec())
    }

    /// Try to read an array whose elements are decoded by `element`.
    ///
    /// Every element occupies at least one byte, so a count larger than the
    /// remaining input is rejected before anything is reserved.
    pub fn read_vec<T, C, F>(&mut self, limits: &mut C, mut element: F) -> Result<Vec<T>>
    where
        C: Limits,
        F: FnMut(&mut ByteBuffer<'a>, &mut C) -> Result<T>,
    {
        let count = self.read_count(limits)?;
        if count > self.remaining() {
            return Err(WireError::UnexpectedEof {
                needed:    self.index.saturating_add(count),
                available: self.data.len(),
            });
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(element(self, limits)?);
        }
        Ok(values)
    }

    /// Try to read a presence flag followed, when set, by a value decoded by
    /// `present`. A flag other than 0 or 1 is rejected like a bad boolean.
    pub fn read_option<T, C, F>(&mut self, limits: &mut C, present: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut ByteBuffer<'a>, &mut C) -> Result<T>,
    {
        if self.read_bool()? {
            Ok(Some(present(self, limits)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
use crate::context::DecodeContext;

#[test]
fn read_bool() {
    let read = |bytes| ByteBuffer::new(bytes).read_bool();
    assert_eq!(read(&[]), Err(WireError::UnexpectedEof { needed: 1, available: 0 }));
    assert_eq!(read(&[0]), Ok(false));
    assert_eq!(read(&[1]), Ok(true));
    assert_eq!(read(&[2]), Err(WireError::InvalidBool(2)));
    assert_eq!(read(&[255]), Err(WireError::InvalidBool(255)));
}

#[test]
fn read_integers() {
    let mut bb = ByteBuffer::new(&[
        0xFE, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F,
    ]);
    assert_eq!(bb.read_i8(), Ok(-2));
    assert_eq!(bb.read_u16(), Ok(0x1234));
    assert_eq!(bb.read_u32(), Ok(0x1234_5678));
    assert_eq!(bb.read_i64(), Ok(i64::MAX));
    assert_eq!(bb.remaining(), 0);
}

#[test]
fn read_floats() {
    let mut bb = ByteBuffer::new(&[0xC3, 0xF5, 0x48, 0x40, 0, 0, 0, 0, 0, 0, 0xF8, 0x3F]);
    assert_eq!(bb.read_f32(), Ok(3.14));
    assert_eq!(bb.read_f64(), Ok(1.5));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert!(read(&[], 1).is_err());
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert!(read(&[0], usize::MAX).is_err());

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(bb.read_bytes(1), Err(WireError::UnexpectedEof { needed: 6, available: 5 }));
}

#[test]
fn read_str() {
    let read = |bytes| ByteBuffer::new(bytes).read_str();
    assert!(read(&[]).is_err());
    assert_eq!(read(&[0, 0, 0, 0]), Ok(""));
    assert_eq!(read(&[1, 0, 0, 0, 97]), Ok("a"));
    assert_eq!(read(&[4, 0, 0, 0, 240, 159, 141, 149]), Ok("🍕"));
    assert_eq!(read(&[3, 0, 0, 0, 97, 98]), Err(WireError::UnexpectedEof { needed: 7, available: 6 }));
    assert_eq!(read(&[3, 0, 0, 0, 97, 237, 160]), Err(WireError::InvalidUtf8));
    assert!(read(&[255, 255, 255, 255, 0]).is_err());
}

#[test]
fn read_view() {
    let mut ctx = DecodeContext::new();
    let mut bb = ByteBuffer::new(&[2, 0, 0, 0, 1, 0, 2, 0]);
    let view = bb.read_view::<u16, _>(&mut ctx).unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(view.get(1), Some(2));
    assert_eq!(view.get(2), None);
    assert_eq!(view, vec![1u16, 2]);
    assert_eq!(ctx.total_elements(), 2);

    let mut bb = ByteBuffer::new(&[2, 0, 0, 0, 1, 7]);
    assert_eq!(bb.read_view::<bool, _>(&mut ctx), Err(WireError::InvalidBool(7)));

    let mut bb = ByteBuffer::new(&[3, 0, 0, 0, 1, 0, 2, 0]);
    assert!(matches!(
        bb.read_view::<u16, _>(&mut ctx),
        Err(WireError::UnexpectedEof { .. })
    ));
}

#[test]
fn read_vec_rejects_counts_larger_than_input() {
    let mut ctx = DecodeContext::new();
    let mut bb = ByteBuffer::new(&[200, 0, 0, 0, 1, 2, 3]);
    let result = bb.read_vec(&mut ctx, |bb, _| bb.read_u8());
    assert_eq!(result, Err(WireError::UnexpectedEof { needed: 204, available: 7 }));
}

#[test]
fn read_vec_nested() {
    let mut ctx = DecodeContext::new();
    let mut bb = ByteBuffer::new(&[2, 0, 0, 0, 1, 0, 0, 0, 9, 0, 0, 0, 0]);
    let grid = bb.read_vec(&mut ctx, |bb, ctx| bb.read_primitives::<u8, _>(ctx)).unwrap();
    assert_eq!(grid, vec![vec![9], vec![]]);
    assert_eq!(ctx.total_elements(), 3);
}

#[test]
fn read_option() {
    let mut ctx = DecodeContext::new();
    let mut bb = ByteBuffer::new(&[0, 1, 42, 2]);
    assert_eq!(bb.read_option(&mut ctx, |bb, _| bb.read_u8()), Ok(None));
    assert_eq!(bb.read_option(&mut ctx, |bb, _| bb.read_u8()), Ok(Some(42)));
    assert_eq!(bb.read_option(&mut ctx, |bb, _| bb.read_u8()), Err(WireError::InvalidBool(2)));
}

/// A byte buffer meant for writing into a caller-sized slice.
///
/// Encoders size the slice up front with a size calculator, then write every
/// field at a tracked offset with no intermediate copies.
///
/// # Panics
///
/// Writing past the end of the slice panics. Public encode entry points check
/// the size before any write happens, so this only fires on a size-calculator
/// bug.
///
/// Example usage:
///
/// ```
/// let mut out = [0u8; 7];
/// let mut bb = brine_sdp_schema::ByteBufferMut::new(&mut out);
/// bb.write_str("hi");
/// bb.write_bool(true);
/// assert_eq!(bb.index(), 7);
/// assert_eq!(out, [2, 0, 0, 0, 104, 105, 1]);
/// ```
///
pub struct ByteBufferMut<'a> {
    data:  &'a mut [u8],
    index: usize,
}

impl<'a> ByteBufferMut<'a> {
    /// Wraps `data` for writing from offset 0.
    pub fn new(data: &'a mut [u8]) -> ByteBufferMut<'a> {
        ByteBufferMut { data, index: 0 }
    }

    /// Returns the number of bytes written so far.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Bytes left before the end of the slice.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    #[inline]
    fn advance(&mut self, len: usize) -> &mut [u8] {
        let start = self.index;
        self.index += len;
        &mut self.data[start..start + len]
    }

    /// Write raw bytes with no prefix.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.advance(value.len()).copy_from_slice(value);
    }

    /// Write any fixed-width scalar.
    #[inline]
    pub fn write_fixed<T: FixedWidth>(&mut self, value: T) {
        value.write_le(self.advance(T::SIZE));
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_fixed(value);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_fixed(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_fixed(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_fixed(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_fixed(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write_fixed(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_fixed(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_fixed(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_fixed(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_fixed(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_fixed(value);
    }

    /// Write a `u32` byte length followed by the UTF-8 bytes. No terminator.
    pub fn write_str(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.write_bytes(value.as_bytes());
    }

    /// Write a `u32` count followed by fixed-width elements back to back.
    pub fn write_slice<T: FixedWidth>(&mut self, values: &[T]) {
        self.write_u32(values.len() as u32);
        for value in values {
            self.write_fixed(*value);
        }
    }

    /// Write a `u32` count followed by each element as written by `element`.
    pub fn write_array<T, F>(&mut self, values: &[T], mut element: F)
    where
        F: FnMut(&mut ByteBufferMut<'a>, &T),
    {
        self.write_u32(values.len() as u32);
        for value in values {
            element(self, value);
        }
    }

    /// Write a presence flag and, when present, the value written by `present`.
    pub fn write_option<T, F>(&mut self, value: Option<&T>, present: F)
    where
        F: FnOnce(&mut ByteBufferMut<'a>, &T),
    {
        match value {
            Some(value) => {
                self.write_bool(true);
                present(self, value);
            }
            None => self.write_bool(false),
        }
    }
}

#[cfg(test)]
fn write_once(len: usize, cb: fn(&mut ByteBufferMut)) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let mut bb = ByteBufferMut::new(&mut out);
    cb(&mut bb);
    assert_eq!(bb.remaining(), 0, "callback must fill the buffer exactly");
    out
}

#[test]
fn write_bool() {
    assert_eq!(write_once(1, |bb| bb.write_bool(false)), [0]);
    assert_eq!(write_once(1, |bb| bb.write_bool(true)), [1]);
}

#[test]
fn write_integers() {
    assert_eq!(write_once(2, |bb| bb.write_u16(0x1234)), [0x34, 0x12]);
    assert_eq!(write_once(4, |bb| bb.write_i32(-1)), [0xFF; 4]);
    assert_eq!(write_once(8, |bb| bb.write_u64(1)), [1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(write_once(1, |bb| bb.write_i8(-128)), [0x80]);
    assert_eq!(
        write_once(8, |bb| bb.write_i64(i64::MIN)),
        [0, 0, 0, 0, 0, 0, 0, 0x80]
    );
}

#[test]
fn write_floats() {
    assert_eq!(write_once(4, |bb| bb.write_f32(3.14)), [0xC3, 0xF5, 0x48, 0x40]);
    assert_eq!(write_once(4, |bb| bb.write_f32(2.71)), [0xA4, 0x70, 0x2D, 0x40]);
    assert_eq!(write_once(8, |bb| bb.write_f64(1.5)), [0, 0, 0, 0, 0, 0, 0xF8, 0x3F]);
}

#[test]
fn write_str() {
    assert_eq!(write_once(4, |bb| bb.write_str("")), [0, 0, 0, 0]);
    assert_eq!(write_once(7, |bb| bb.write_str("abc")), [3, 0, 0, 0, 97, 98, 99]);
    assert_eq!(
        write_once(8, |bb| bb.write_str("🍕")),
        [4, 0, 0, 0, 240, 159, 141, 149]
    );
}

#[test]
fn write_arrays() {
    assert_eq!(
        write_once(8, |bb| bb.write_slice(&[1u16, 2])),
        [2, 0, 0, 0, 1, 0, 2, 0]
    );
    assert_eq!(
        write_once(13, |bb| bb.write_array(&[vec![9u8], vec![]], |bb, v| bb.write_slice(v))),
        [2, 0, 0, 0, 1, 0, 0, 0, 9, 0, 0, 0, 0]
    );
}

#[test]
fn write_option() {
    assert_eq!(write_once(1, |bb| bb.write_option(None::<&u8>, |bb, v| bb.write_u8(*v))), [0]);
    assert_eq!(write_once(2, |bb| bb.write_option(Some(&7u8), |bb, v| bb.write_u8(*v))), [1, 7]);
}

#[test]
#[should_panic]
fn write_past_end_panics() {
    let mut out = [0u8; 3];
    ByteBufferMut::new(&mut out).write_u32(1);
}
