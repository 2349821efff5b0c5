//! All-zero block detection for sparse-skip
//!
//! The scan walks the block in machine-word strides. Trailing bytes that do
//! not fill a whole word are checked one by one, so a short final read is
//! classified by its full contents.

const WORD: usize = std::mem::size_of::<u64>();

/// Returns true iff every byte of `buf` is zero
///
/// An empty buffer is all-zero.
#[inline]
pub fn is_all_zero(buf: &[u8]) -> bool {
    let mut words = buf.chunks_exact(WORD);

    let words_zero = words
        .by_ref()
        .all(|w| <[u8; WORD]>::try_from(w).map_or(false, |w| u64::from_ne_bytes(w) == 0));

    words_zero && words.remainder().iter().all(|&b| b == 0)
}
