//! jsonb-buffers - byte buffers for the jsonb container format.
//!
//! [`Writer`] appends, pads and backpatches little-endian words while a
//! container is being assembled. [`Reader`] reads words and sub-slices out of
//! an immutable buffer with every access bounds-checked.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer reads.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("read of {len} bytes at offset {offset} runs past end of buffer ({size} bytes)")]
    EndOfBuffer {
        offset: usize,
        len: usize,
        size: usize,
    },
}

/// Rounds `offset` up to the next multiple of `align` (a power of two).
#[inline]
pub fn align_up(offset: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}
