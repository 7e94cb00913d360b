//! Growable little-endian buffer writer with reserve and backpatch support.

use crate::align_up;

/// A binary buffer writer that grows automatically as needed.
///
/// Besides plain appends, the writer can reserve a region up front and fill
/// it in later with [`Writer::u32_at`]. The jsonb
/// assembler uses this to lay out descriptor slots before the payloads they
/// describe have been written.
///
/// # Example
///
/// ```
/// use jsonb_buffers::Writer;
///
/// let mut writer = Writer::new();
/// let slot = writer.reserve(4);
/// writer.buf(b"ab");
/// writer.u32_at(slot, 2);
/// assert_eq!(writer.into_inner(), [2, 0, 0, 0, b'a', b'b']);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    /// The underlying byte buffer; its length is the cursor position.
    pub uint8: Vec<u8>,
}

impl Writer {
    /// Creates a new, empty writer.
    pub fn new() -> Self {
        Self { uint8: Vec::new() }
    }

    /// Creates a new writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Current cursor position (number of bytes written).
    #[inline]
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Reserves `len` zeroed bytes at the cursor and returns their offset.
    pub fn reserve(&mut self, len: usize) -> usize {
        let offset = self.uint8.len();
        self.uint8.resize(offset + len, 0);
        offset
    }

    /// Pads with zero bytes up to a multiple of `align`, returning the
    /// number of padding bytes written.
    pub fn pad_to(&mut self, align: usize) -> usize {
        let x = self.uint8.len();
        let padded = align_up(x, align);
        self.uint8.resize(padded, 0);
        padded - x
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a byte slice.
    #[inline]
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Overwrites a previously written or reserved 32-bit word.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` lies beyond the cursor; callers only patch
    /// slots they reserved themselves.
    #[inline]
    pub fn u32_at(&mut self, offset: usize, val: u32) {
        self.uint8[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
    }

    /// Consumes the writer, returning the written data.
    pub fn into_inner(self) -> Vec<u8> {
        self.uint8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_little_endian() {
        let mut writer = Writer::new();
        writer.u32(0x01020304);
        assert_eq!(writer.into_inner(), [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_reserve_then_patch() {
        let mut writer = Writer::new();
        writer.buf(&[0xaa]);
        let slot = writer.reserve(8);
        assert_eq!(slot, 1);
        assert_eq!(writer.len(), 9);
        writer.u32_at(slot + 4, 7);
        writer.u32_at(slot, 0x0201);
        assert_eq!(writer.into_inner(), [0xaa, 1, 2, 0, 0, 7, 0, 0, 0]);
    }

    #[test]
    fn test_pad_to() {
        let mut writer = Writer::new();
        assert_eq!(writer.pad_to(4), 0);
        writer.buf(&[1]);
        assert_eq!(writer.pad_to(4), 3);
        assert_eq!(writer.len(), 4);
        assert_eq!(writer.pad_to(4), 0);
    }

    #[test]
    fn test_i64_roundtrip() {
        let mut writer = Writer::new();
        writer.i64(-9_999_999_999i64);
        let data = writer.into_inner();
        assert_eq!(data.len(), 8);
        assert_eq!(
            i64::from_le_bytes(data.try_into().unwrap()),
            -9_999_999_999i64
        );
    }
}
