//! Aligned scratch buffer for direct IO
//!
//! O_DIRECT requires the caller's buffer to start on a multiple of the
//! device's logical block size. The copy engine over-aligns to its own block
//! size (1 MiB by default), which covers every common device geometry.
//!
//! The buffer over-allocates `2 × block_size` bytes from the heap and exposes
//! a `block_size`-long view that starts at the next aligned address inside
//! that allocation, so the base alignment of the raw allocation never matters.

use crate::error::CopyError;

/// Heap buffer with a block-size-aligned usable view
///
/// Owned by exactly one worker. The backing allocation is released on drop,
/// which covers every exit path of the worker.
pub struct AlignedBuffer {
    raw: Vec<u8>,
    offset: usize,
    size: usize,
}

#[allow(clippy::len_without_is_empty)]
impl AlignedBuffer {
    /// Allocate a buffer whose usable view is `size` bytes long and aligned to `size`
    ///
    /// # Panics
    /// Panics if `size` is not a power of 2.
    ///
    /// # Errors
    /// Returns [`CopyError::AllocationFailure`] if the backing allocation
    /// cannot be obtained.
    pub fn new(size: usize) -> Result<Self, CopyError> {
        assert!(size.is_power_of_two(), "Buffer size must be a power of 2");

        let capacity = size
            .checked_mul(2)
            .ok_or(CopyError::AllocationFailure { bytes: usize::MAX })?;

        let mut raw = Vec::new();
        raw.try_reserve_exact(capacity)
            .map_err(|_| CopyError::AllocationFailure { bytes: capacity })?;
        raw.resize(capacity, 0);

        let offset = aligned_offset(raw.as_ptr() as usize, size);

        Ok(AlignedBuffer { raw, offset, size })
    }

    /// Get the aligned view
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.raw[self.offset..self.offset + self.size]
    }

    /// Get the aligned view mutably
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.raw[self.offset..self.offset + self.size]
    }

    /// Length of the aligned view in bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Verify that the view starts on a multiple of its length
    #[inline(always)]
    pub fn is_aligned(&self) -> bool {
        (self.as_slice().as_ptr() as usize) % self.size == 0
    }
}

/// Distance from `base` to the first `alignment`-aligned address after it.
///
/// Always in `1..=alignment`, so an aligned view of `alignment` bytes fits in
/// a `2 × alignment` allocation.
fn aligned_offset(base: usize, alignment: usize) -> usize {
    alignment - base % alignment
}
