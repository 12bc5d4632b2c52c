//! Bump allocation for the arena decode tier.
//!
//! An [`Arena`] owns one contiguous, growable region. Values decoded into it
//! hold [`ArenaStr`] / [`ArenaSlice`] / [`ArenaList`] handles (offset, length,
//! generation) rather than references, so growing the region never
//! invalidates anything already decoded. Lists of strings, structs or nested
//! arrays are stored in the region as fixed-size [`ArenaRecord`]s, so an arena
//! decode touches no heap memory besides the region itself.
//! [`Arena::reset`] rewinds the region for reuse and makes every earlier
//! handle stale.

use std::fmt;
use std::marker::PhantomData;
use std::str;

use crate::bb::{ArrayView, ByteBuffer, ByteBufferMut, FixedWidth};
use crate::context::{DecodeContext, Limits};
use crate::error::{Result, WireError};

/// Alignment of every allocation.
pub const ARENA_ALIGN: usize = 8;

const MIN_GROWTH: usize = 64;

pub struct Arena {
    buf:        Vec<u8>,
    used:       usize,
    generation: u32,
}

impl Arena {
    pub fn new() -> Arena {
        Arena::with_capacity(0)
    }

    /// Creates an arena whose region starts at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Arena {
        Arena {
            buf:        vec![0; capacity],
            used:       0,
            generation: 0,
        }
    }

    /// Bytes handed out since creation or the last reset, including padding.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Size of the backing region.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of resets so far. Handles remember the generation they were
    /// allocated in.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Rewinds the used offset to 0. The backing region is kept.
    pub fn reset(&mut self) {
        self.used = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Reserves `size` bytes, rounded up to a multiple of 8, and returns their
    /// offset. Grows the region by doubling when it runs out; existing bytes
    /// are preserved.
    pub fn alloc(&mut self, size: usize) -> usize {
        let start = self.used;
        let end = start + ((size + ARENA_ALIGN - 1) & !(ARENA_ALIGN - 1));
        if end > self.buf.len() {
            let mut capacity = self.buf.len().max(MIN_GROWTH);
            while capacity < end {
                capacity *= 2;
            }
            tracing::trace!(from = self.buf.len(), to = capacity, "arena grew");
            self.buf.resize(capacity, 0);
        }
        self.used = end;
        start
    }

    /// Copies raw bytes into the arena.
    pub fn alloc_bytes(&mut self, bytes: &[u8]) -> ArenaSlice<u8> {
        let offset = self.alloc(bytes.len());
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        ArenaSlice {
            offset,
            len: bytes.len(),
            generation: self.generation,
            _marker: PhantomData,
        }
    }

    /// Copies a string into the arena.
    pub fn alloc_str(&mut self, value: &str) -> ArenaStr {
        let slice = self.alloc_bytes(value.as_bytes());
        ArenaStr {
            offset:     slice.offset,
            len:        slice.len,
            generation: slice.generation,
        }
    }

    /// Copies fixed-width values into the arena in wire order.
    pub fn alloc_primitives<T: FixedWidth>(&mut self, values: &[T]) -> ArenaSlice<T> {
        let offset = self.alloc(values.len() * T::SIZE);
        for (i, value) in values.iter().enumerate() {
            value.write_le(&mut self.buf[offset + i * T::SIZE..]);
        }
        ArenaSlice {
            offset,
            len: values.len(),
            generation: self.generation,
            _marker: PhantomData,
        }
    }

    /// Copies the bytes behind an already validated view.
    pub fn alloc_view<T: FixedWidth>(&mut self, view: ArrayView<T>) -> ArenaSlice<T> {
        let bytes = view.as_bytes();
        let offset = self.alloc(bytes.len());
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        ArenaSlice {
            offset,
            len: view.len(),
            generation: self.generation,
            _marker: PhantomData,
        }
    }

    fn region(&self, offset: usize, len: usize, generation: u32) -> Result<&[u8]> {
        if generation != self.generation || offset + len > self.used {
            return Err(WireError::StaleArenaHandle);
        }
        Ok(&self.buf[offset..offset + len])
    }

    /// Resolves a string handle.
    pub fn get_str(&self, handle: ArenaStr) -> Result<&str> {
        let bytes = self.region(handle.offset, handle.len, handle.generation)?;
        str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    /// Resolves an array handle to a view over its elements.
    pub fn get_slice<T: FixedWidth>(&self, handle: ArenaSlice<T>) -> Result<ArrayView<T>> {
        let bytes = self.region(handle.offset, handle.len * T::SIZE, handle.generation)?;
        ArrayView::new(bytes)
    }

    /// Resolves a list handle to a view over its records.
    pub fn get_list<T: ArenaRecord>(&self, handle: ArenaList<T>) -> Result<ArenaRecords<T>> {
        let bytes = self.region(handle.offset, handle.len * T::RECORD_SIZE, handle.generation)?;
        Ok(ArenaRecords { bytes, _marker: PhantomData })
    }

    fn write_record<T: ArenaRecord>(&mut self, offset: usize, value: &T) {
        value.write_record(&mut ByteBufferMut::new(&mut self.buf[offset..offset + T::RECORD_SIZE]));
    }
}

impl Default for Arena {
    fn default() -> Arena {
        Arena::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Arena")
            .field("used", &self.used)
            .field("capacity", &self.buf.len())
            .field("generation", &self.generation)
            .finish()
    }
}

/// A string living in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaStr {
    offset:     usize,
    len:        usize,
    generation: u32,
}

impl ArenaStr {
    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn resolve<'r>(&self, arena: &'r Arena) -> Result<&'r str> {
        arena.get_str(*self)
    }
}

/// A fixed-width array living in an [`Arena`].
pub struct ArenaSlice<T> {
    offset:     usize,
    len:        usize,
    generation: u32,
    _marker:    PhantomData<T>,
}

impl<T: FixedWidth> ArenaSlice<T> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn resolve<'r>(&self, arena: &'r Arena) -> Result<ArrayView<'r, T>> {
        arena.get_slice(*self)
    }
}

impl<T> Clone for ArenaSlice<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaSlice<T> {}

impl<T> PartialEq for ArenaSlice<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.len == other.len && self.generation == other.generation
    }
}

impl<T> Eq for ArenaSlice<T> {}

impl<T> fmt::Debug for ArenaSlice<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArenaSlice")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("generation", &self.generation)
            .finish()
    }
}

/// A list whose elements are records stored in an [`Arena`].
pub struct ArenaList<T> {
    offset:     usize,
    len:        usize,
    generation: u32,
    _marker:    PhantomData<T>,
}

impl<T: ArenaRecord> ArenaList<T> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn resolve<'r>(&self, arena: &'r Arena) -> Result<ArenaRecords<'r, T>> {
        arena.get_list(*self)
    }
}

impl<T> Clone for ArenaList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaList<T> {}

impl<T> PartialEq for ArenaList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.len == other.len && self.generation == other.generation
    }
}

impl<T> Eq for ArenaList<T> {}

impl<T> fmt::Debug for ArenaList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArenaList")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("generation", &self.generation)
            .finish()
    }
}

/// The records behind a resolved [`ArenaList`].
pub struct ArenaRecords<'r, T> {
    bytes:   &'r [u8],
    _marker: PhantomData<T>,
}

impl<'r, T: ArenaRecord> ArenaRecords<'r, T> {
    pub fn len(&self) -> usize {
        self.bytes.len() / T::RECORD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Result<T>> {
        let start = index.checked_mul(T::RECORD_SIZE)?;
        let record = self.bytes.get(start..start + T::RECORD_SIZE)?;
        Some(T::read_record(&mut ByteBuffer::new(record)))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + 'r {
        self.bytes
            .chunks_exact(T::RECORD_SIZE)
            .map(|record| T::read_record(&mut ByteBuffer::new(record)))
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

/// A value stored inline in the arena as a fixed-size record: handles,
/// optional records, and the arena form of generated structs.
pub trait ArenaRecord: Copy + Sized + 'static {
    /// Bytes one record occupies.
    const RECORD_SIZE: usize;

    fn write_record(&self, bb: &mut ByteBufferMut);

    fn read_record(bb: &mut ByteBuffer) -> Result<Self>;
}

// offset: u64, len: u64, generation: u32
const HANDLE_RECORD_SIZE: usize = 20;

fn write_handle(bb: &mut ByteBufferMut, offset: usize, len: usize, generation: u32) {
    bb.write_u64(offset as u64);
    bb.write_u64(len as u64);
    bb.write_u32(generation);
}

fn read_handle(bb: &mut ByteBuffer) -> Result<(usize, usize, u32)> {
    Ok((bb.read_u64()? as usize, bb.read_u64()? as usize, bb.read_u32()?))
}

impl ArenaRecord for ArenaStr {
    const RECORD_SIZE: usize = HANDLE_RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        write_handle(bb, self.offset, self.len, self.generation);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<ArenaStr> {
        let (offset, len, generation) = read_handle(bb)?;
        Ok(ArenaStr { offset, len, generation })
    }
}

impl<T: FixedWidth> ArenaRecord for ArenaSlice<T> {
    const RECORD_SIZE: usize = HANDLE_RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        write_handle(bb, self.offset, self.len, self.generation);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<ArenaSlice<T>> {
        let (offset, len, generation) = read_handle(bb)?;
        Ok(ArenaSlice { offset, len, generation, _marker: PhantomData })
    }
}

impl<T: ArenaRecord> ArenaRecord for ArenaList<T> {
    const RECORD_SIZE: usize = HANDLE_RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        write_handle(bb, self.offset, self.len, self.generation);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<ArenaList<T>> {
        let (offset, len, generation) = read_handle(bb)?;
        Ok(ArenaList { offset, len, generation, _marker: PhantomData })
    }
}

/// A presence byte followed by the record, zeroed when absent.
impl<T: ArenaRecord> ArenaRecord for Option<T> {
    const RECORD_SIZE: usize = 1 + T::RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        match self {
            Some(value) => {
                bb.write_bool(true);
                value.write_record(bb);
            }
            None => {
                bb.write_bool(false);
                for _ in 0..T::RECORD_SIZE {
                    bb.write_u8(0);
                }
            }
        }
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<Option<T>> {
        if bb.read_bool()? {
            Ok(Some(T::read_record(bb)?))
        } else {
            bb.read_bytes(T::RECORD_SIZE)?;
            Ok(None)
        }
    }
}

/// Everything one arena decode call owns: its limit counters and the arena
/// that receives variable-length data.
pub struct ArenaContext<'r> {
    limits: DecodeContext,
    arena:  &'r mut Arena,
}

impl<'r> ArenaContext<'r> {
    pub fn new(arena: &'r mut Arena) -> ArenaContext<'r> {
        ArenaContext { limits: DecodeContext::new(), arena }
    }

    pub fn arena(&mut self) -> &mut Arena {
        self.arena
    }

    pub fn limits(&self) -> &DecodeContext {
        &self.limits
    }

    /// Reads a string from `bb` and copies it into the arena.
    pub fn read_str(&mut self, bb: &mut ByteBuffer) -> Result<ArenaStr> {
        let value = bb.read_str()?;
        Ok(self.arena.alloc_str(value))
    }

    /// Reads a fixed-width array from `bb` and copies it into the arena.
    pub fn read_primitives<T: FixedWidth>(&mut self, bb: &mut ByteBuffer) -> Result<ArenaSlice<T>> {
        let view = bb.read_view::<T, _>(&mut self.limits)?;
        Ok(self.arena.alloc_view(view))
    }

    /// Reads an array whose elements are decoded by `element` and stores
    /// their records in the arena. The record block is reserved up front, so
    /// data the elements allocate follows it.
    pub fn read_list<'b, T, F>(&mut self, bb: &mut ByteBuffer<'b>, mut element: F) -> Result<ArenaList<T>>
    where
        T: ArenaRecord,
        F: FnMut(&mut ByteBuffer<'b>, &mut ArenaContext<'r>) -> Result<T>,
    {
        let count = bb.read_count(self)?;
        if count > bb.remaining() {
            return Err(WireError::UnexpectedEof {
                needed:    bb.index().saturating_add(count),
                available: bb.data().len(),
            });
        }

        let offset = self.arena.alloc(count * T::RECORD_SIZE);
        let generation = self.arena.generation;
        for i in 0..count {
            let value = element(bb, self)?;
            self.arena.write_record(offset + i * T::RECORD_SIZE, &value);
        }
        Ok(ArenaList { offset, len: count, generation, _marker: PhantomData })
    }
}

impl<'r> Limits for ArenaContext<'r> {
    fn check_array(&mut self, count: u32) -> Result<usize> {
        self.limits.check_array(count)
    }
}

#[test]
fn alloc_aligns_to_eight() {
    let mut arena = Arena::with_capacity(64);
    assert_eq!(arena.alloc(3), 0);
    assert_eq!(arena.used(), 8);
    assert_eq!(arena.alloc(1), 8);
    assert_eq!(arena.alloc(0), 16);
    assert_eq!(arena.alloc(8), 16);
    assert_eq!(arena.used(), 24);
}

#[test]
fn growth_preserves_contents() {
    let mut arena = Arena::with_capacity(8);
    let first = arena.alloc_str("hello");
    let second = arena.alloc_primitives(&[1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert!(arena.capacity() >= 56);
    assert_eq!(arena.get_str(first), Ok("hello"));
    assert_eq!(arena.get_slice(second).unwrap(), vec![1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn growth_doubles() {
    let mut arena = Arena::with_capacity(64);
    arena.alloc(65);
    assert_eq!(arena.capacity(), 128);
    arena.alloc(300);
    assert_eq!(arena.capacity(), 512);
}

#[test]
fn reset_keeps_capacity_and_stales_handles() {
    let mut arena = Arena::new();
    let handle = arena.alloc_str("gone");
    let capacity = arena.capacity();

    arena.reset();
    assert_eq!(arena.used(), 0);
    assert_eq!(arena.capacity(), capacity);
    assert_eq!(arena.get_str(handle), Err(WireError::StaleArenaHandle));

    let fresh = arena.alloc_str("here");
    assert_eq!(fresh.resolve(&arena), Ok("here"));
}

#[test]
fn context_counts_arena_arrays() {
    let mut arena = Arena::new();
    let mut ctx = ArenaContext::new(&mut arena);
    let mut bb = ByteBuffer::new(&[2, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 120]);
    let flags = ctx.read_primitives::<u16>(&mut bb).unwrap();
    let name = ctx.read_str(&mut bb).unwrap();
    assert_eq!(ctx.limits().total_elements(), 2);
    assert_eq!(flags.len(), 2);
    assert_eq!(arena.get_slice(flags).unwrap(), vec![1u16, 0]);
    assert_eq!(arena.get_str(name), Ok("x"));
}

#[test]
fn lists_live_in_the_arena() {
    let mut arena = Arena::with_capacity(256);
    let mut ctx = ArenaContext::new(&mut arena);
    // ["ab", "c"] then [[7], []]
    let mut bb = ByteBuffer::new(&[
        2, 0, 0, 0, 2, 0, 0, 0, b'a', b'b', 1, 0, 0, 0, b'c',
        2, 0, 0, 0, 1, 0, 0, 0, 7, 0, 0, 0, 0,
    ]);
    let names = ctx.read_list(&mut bb, |bb, ctx| ctx.read_str(bb)).unwrap();
    let rows = ctx.read_list(&mut bb, |bb, ctx| ctx.read_primitives::<u8>(bb)).unwrap();
    assert_eq!(ctx.limits().total_elements(), 5);
    assert_eq!(bb.remaining(), 0);

    // Two records, then "ab" and "c" padded to 8 each, then two more records
    // and the single row byte.
    assert_eq!(arena.used(), 40 + 16 + 40 + 8);
    assert_eq!(arena.capacity(), 256);

    let names = names.resolve(&arena).unwrap();
    assert_eq!(names.len(), 2);
    let names: Vec<&str> = names.iter().map(|n| n.unwrap().resolve(&arena).unwrap()).collect();
    assert_eq!(names, ["ab", "c"]);

    let rows = rows.resolve(&arena).unwrap().to_vec().unwrap();
    assert_eq!(rows[0].resolve(&arena).unwrap(), vec![7u8]);
    assert!(rows[1].is_empty());
}

#[test]
fn list_count_cannot_exceed_input() {
    let mut arena = Arena::new();
    let mut ctx = ArenaContext::new(&mut arena);
    let mut bb = ByteBuffer::new(&[9, 0, 0, 0, 0, 0]);
    assert_eq!(
        ctx.read_list(&mut bb, |bb, ctx| ctx.read_str(bb)),
        Err(WireError::UnexpectedEof { needed: 13, available: 6 })
    );
    assert_eq!(arena.used(), 0);
}

#[test]
fn optional_record_keeps_its_size() {
    let mut arena = Arena::new();
    let name = arena.alloc_str("n");
    let mut out = [0xAAu8; 42];

    let mut bb = ByteBufferMut::new(&mut out[..21]);
    None::<ArenaStr>.write_record(&mut bb);
    assert_eq!(bb.remaining(), 0);
    let mut bb = ByteBufferMut::new(&mut out[21..]);
    Some(name).write_record(&mut bb);
    assert_eq!(bb.remaining(), 0);
    assert!(out[..21].iter().all(|b| *b == 0));

    let mut bb = ByteBuffer::new(&out);
    assert_eq!(Option::<ArenaStr>::read_record(&mut bb), Ok(None));
    assert_eq!(Option::<ArenaStr>::read_record(&mut bb), Ok(Some(name)));
}

#[test]
fn reset_stales_list_handles() {
    let mut arena = Arena::new();
    let mut ctx = ArenaContext::new(&mut arena);
    let list = ctx
        .read_list(&mut ByteBuffer::new(&[1, 0, 0, 0, 0, 0, 0, 0]), |bb, ctx| ctx.read_str(bb))
        .unwrap();
    arena.reset();
    assert!(matches!(list.resolve(&arena), Err(WireError::StaleArenaHandle)));
}
