//! Bounds-checked reader over an immutable byte slice.

use crate::BufferError;

/// A binary reader over a borrowed byte slice.
///
/// Unlike a cursor-based reader, every method takes an absolute offset.
/// Container decoding jumps around descriptors and payloads, so random
/// access is the natural shape. All reads return [`BufferError`] instead
/// of panicking when they would run past the end.
///
/// # Example
///
/// ```
/// use jsonb_buffers::Reader;
///
/// let data = [0x04, 0x03, 0x02, 0x01, 0xff];
/// let reader = Reader::new(&data);
///
/// assert_eq!(reader.u32(0), Ok(0x01020304));
/// assert!(reader.u32(2).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8 }
    }

    #[inline]
    fn check(&self, offset: usize, len: usize) -> Result<(), BufferError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.uint8.len() => Ok(()),
            _ => Err(BufferError::EndOfBuffer {
                offset,
                len,
                size: self.uint8.len(),
            }),
        }
    }

    /// Reads an unsigned 32-bit integer (little-endian) at `offset`.
    #[inline]
    pub fn u32(&self, offset: usize) -> Result<u32, BufferError> {
        self.check(offset, 4)?;
        let b = &self.uint8[offset..offset + 4];
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a signed 64-bit integer (little-endian) at `offset`.
    #[inline]
    pub fn i64(&self, offset: usize) -> Result<i64, BufferError> {
        let b = self.buf(offset, 8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(b);
        Ok(i64::from_le_bytes(word))
    }

    /// Returns `len` bytes starting at `offset`.
    #[inline]
    pub fn buf(&self, offset: usize, len: usize) -> Result<&'a [u8], BufferError> {
        self.check(offset, len)?;
        Ok(&self.uint8[offset..offset + len])
    }

    /// Returns everything from `offset` to the end.
    pub fn tail(&self, offset: usize) -> Result<&'a [u8], BufferError> {
        self.check(offset, 0)?;
        Ok(&self.uint8[offset..])
    }
}
