//! Decode-time resource limits.
//!
//! Limits are only enforced while decoding. Encoders trust the caller.

use crate::error::{Result, WireError};

/// Largest plain payload a top-level decode accepts (128 MiB).
pub const MAX_SERIALIZED_SIZE: usize = 128 * 1024 * 1024;

/// Largest element count a single array may declare.
pub const MAX_ARRAY_ELEMENTS: u32 = 1_000_000;

/// Largest number of array elements, summed over every array, in one message.
pub const MAX_TOTAL_ELEMENTS: u64 = 10_000_000;

/// Rejects inputs above [`MAX_SERIALIZED_SIZE`].
pub fn check_serialized_size(len: usize) -> Result<()> {
    if len > MAX_SERIALIZED_SIZE {
        return Err(WireError::DataTooLarge {
            size: len,
            max:  MAX_SERIALIZED_SIZE,
        });
    }
    Ok(())
}

/// Anything that can vet an array count before the decoder allocates for it.
///
/// Every array read in every decode tier funnels its count through this trait,
/// so the cumulative total covers arrays nested at any depth.
pub trait Limits {
    /// Checks `count` against the per-array and cumulative limits and records
    /// it. Returns the count as a `usize` on success.
    fn check_array(&mut self, count: u32) -> Result<usize>;
}

/// Running totals for one decode call.
///
/// A context belongs to exactly one decode; sharing one across threads or
/// across messages is a caller error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    total_elements: u64,
}

impl DecodeContext {
    pub fn new() -> DecodeContext {
        DecodeContext { total_elements: 0 }
    }

    /// Elements recorded so far across all arrays.
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }
}

impl Limits for DecodeContext {
    fn check_array(&mut self, count: u32) -> Result<usize> {
        if count > MAX_ARRAY_ELEMENTS {
            return Err(WireError::ArrayTooLarge {
                count,
                max: MAX_ARRAY_ELEMENTS,
            });
        }

        self.total_elements += u64::from(count);
        if self.total_elements > MAX_TOTAL_ELEMENTS {
            return Err(WireError::TooManyElements {
                total: self.total_elements,
                max:   MAX_TOTAL_ELEMENTS,
            });
        }

        Ok(count as usize)
    }
}

#[test]
fn per_array_boundary() {
    let mut ctx = DecodeContext::new();
    assert_eq!(ctx.check_array(MAX_ARRAY_ELEMENTS), Ok(1_000_000));

    let mut ctx = DecodeContext::new();
    assert_eq!(
        ctx.check_array(MAX_ARRAY_ELEMENTS + 1),
        Err(WireError::ArrayTooLarge { count: 1_000_001, max: 1_000_000 })
    );
}

#[test]
fn cumulative_boundary() {
    let mut ctx = DecodeContext::new();
    for _ in 0..10 {
        assert!(ctx.check_array(MAX_ARRAY_ELEMENTS).is_ok());
    }
    assert_eq!(ctx.total_elements(), 10_000_000);
    assert_eq!(ctx.check_array(0), Ok(0));
    assert_eq!(
        ctx.check_array(1),
        Err(WireError::TooManyElements { total: 10_000_001, max: 10_000_000 })
    );
}

#[test]
fn many_small_arrays_hit_the_cumulative_cap() {
    let mut ctx = DecodeContext::new();
    let mut failed_at = None;
    for i in 0..20_001u32 {
        if ctx.check_array(500).is_err() {
            failed_at = Some(i);
            break;
        }
    }
    assert_eq!(failed_at, Some(20_000));
}

#[test]
fn serialized_size_boundary() {
    assert_eq!(check_serialized_size(MAX_SERIALIZED_SIZE), Ok(()));
    assert_eq!(
        check_serialized_size(MAX_SERIALIZED_SIZE + 1),
        Err(WireError::DataTooLarge { size: MAX_SERIALIZED_SIZE + 1, max: MAX_SERIALIZED_SIZE })
    );
}
