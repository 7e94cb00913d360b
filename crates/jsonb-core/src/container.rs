//! Container reader: random access into one encoded array or object.
//!
//! Layout of a container (all words little-endian):
//!
//! ```text
//! +--------+-----------------------------+------------------------------+
//! | header | descriptors (4 bytes each)  | payload region               |
//! +--------+-----------------------------+------------------------------+
//! ```
//!
//! The header holds the child count (pairs for an object) in its low 28
//! bits and the container kind in the bits above. An array has one
//! descriptor per element. An object has all of its key descriptors, in
//! canonical key order, followed by the value descriptors in the same order.

use jsonb_buffers::{align_up, Reader};

use crate::entry::{Entry, EntryTag};
use crate::error::{JsonbError, Result};
use crate::iterator::JsonbIterator;
use crate::numeric::Numeric;
use crate::value::Value;

pub const JB_CMASK: u32 = 0x0FFF_FFFF;
pub const JB_FSCALAR: u32 = 0x1000_0000;
pub const JB_FOBJECT: u32 = 0x2000_0000;
pub const JB_FARRAY: u32 = 0x4000_0000;

/// Largest child count (object: pair count) a header can record.
pub const MAX_CHILDREN: usize = JB_CMASK as usize;

/// Deepest container nesting the builder, assembler and JSON bridge accept.
/// The top-level container is at depth 1.
pub const MAX_DEPTH: usize = 512;

/// Alignment of nested containers within a payload region.
pub const CONTAINER_ALIGN: usize = 4;

const HEADER_LEN: usize = 4;
const ENTRY_LEN: usize = 4;

/// A borrowed view of one encoded container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    data: &'a [u8],
    header: u32,
}

impl<'a> Container<'a> {
    /// Wraps `data`, which must hold exactly one container.
    ///
    /// Checks the header and that the descriptor array fits. Descriptors
    /// and payloads are checked lazily when children are decoded.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let reader = Reader::new(data);
        let header = reader.u32(0)?;
        let kind = header & (JB_FARRAY | JB_FOBJECT);
        if header & 0x8000_0000 != 0 || (kind != JB_FARRAY && kind != JB_FOBJECT) {
            return Err(JsonbError::InvalidHeader(header));
        }
        if header & JB_FSCALAR != 0 && (kind != JB_FARRAY || header & JB_CMASK != 1) {
            return Err(JsonbError::InvalidHeader(header));
        }
        let container = Container { data, header };
        reader.buf(0, container.payload_start())?;
        Ok(container)
    }

    /// The container's bytes, header included.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Child count: elements of an array, pairs of an object.
    #[inline]
    pub fn len(&self) -> usize {
        (self.header & JB_CMASK) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.header & JB_FARRAY != 0
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        self.header & JB_FOBJECT != 0
    }

    /// True for the one-element array wrapping a bare scalar.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.header & JB_FSCALAR != 0
    }

    /// Number of descriptors.
    #[inline]
    pub fn num_entries(&self) -> usize {
        if self.is_object() {
            self.len() * 2
        } else {
            self.len()
        }
    }

    #[inline]
    fn payload_start(&self) -> usize {
        HEADER_LEN + self.num_entries() * ENTRY_LEN
    }

    /// The payload region that descriptor offsets are measured from.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.payload_start()..]
    }

    /// Descriptor at `index`.
    pub fn entry(&self, index: usize) -> Result<Entry> {
        if index >= self.num_entries() {
            return Err(JsonbError::EntryOutOfRange {
                index,
                end: (index + 1) * ENTRY_LEN,
                payload_len: self.num_entries() * ENTRY_LEN,
            });
        }
        let raw = Reader::new(self.data).u32(HEADER_LEN + index * ENTRY_LEN)?;
        Entry::decode(raw)
    }

    /// Start offset of child `index` within the payload region.
    pub fn start_offset(&self, index: usize) -> Result<usize> {
        self.offset_walk(index).map(|(offset, _)| offset)
    }

    /// Walks back from `index - 1` to the nearest descriptor holding an
    /// end offset. Returns the start offset and how many descriptors were
    /// read, which never exceeds [`OFFSET_STRIDE`](crate::entry::OFFSET_STRIDE)
    /// for buffers written by the assembler.
    fn offset_walk(&self, index: usize) -> Result<(usize, usize)> {
        let mut offset = 0usize;
        let mut touched = 0usize;
        for i in (0..index).rev() {
            let entry = self.entry(i)?;
            touched += 1;
            offset += entry.field() as usize;
            if entry.has_offset() {
                break;
            }
        }
        Ok((offset, touched))
    }

    /// Number of descriptors read to recover the start offset of child
    /// `index`.
    #[doc(hidden)]
    pub fn offset_walk_len(&self, index: usize) -> Result<usize> {
        self.offset_walk(index).map(|(_, touched)| touched)
    }

    /// Payload length of child `index` (alignment padding included).
    pub fn length(&self, index: usize) -> Result<usize> {
        let entry = self.entry(index)?;
        if entry.has_offset() {
            let start = self.start_offset(index)?;
            (entry.field() as usize)
                .checked_sub(start)
                .ok_or_else(|| self.out_of_range(index, entry.field() as usize))
        } else {
            Ok(entry.field() as usize)
        }
    }

    fn out_of_range(&self, index: usize, end: usize) -> JsonbError {
        tracing::debug!(index, end, "container entry out of range");
        JsonbError::EntryOutOfRange {
            index,
            end,
            payload_len: self.data.len().saturating_sub(self.payload_start()),
        }
    }

    /// Decodes child `index`, whose payload starts at `offset`.
    ///
    /// Callers walking children in order track `offset` themselves with
    /// [`Entry::advance_offset`]; random access goes through
    /// [`Container::child`]. Nested containers are returned as
    /// [`Value::Binary`] and are not expanded.
    pub fn decode_child(&self, index: usize, offset: usize) -> Result<Value<'a>> {
        let entry = self.entry(index)?;
        let end = entry.advance_offset(offset);
        let payload = self.payload();
        if end < offset || end > payload.len() {
            return Err(self.out_of_range(index, end));
        }
        let value = match entry.tag() {
            EntryTag::Null => Value::Null,
            EntryTag::True => Value::Bool(true),
            EntryTag::False => Value::Bool(false),
            EntryTag::String => Value::bytes(&payload[offset..end]),
            EntryTag::Numeric => {
                let start = align_up(offset, Numeric::ALIGN);
                if start > end {
                    return Err(self.out_of_range(index, end));
                }
                Value::Number(Numeric::from_bytes(&payload[start..end])?)
            }
            EntryTag::Container => {
                // Padding belongs to the entry, not to the nested container.
                let start = align_up(offset, CONTAINER_ALIGN);
                if start > end {
                    return Err(self.out_of_range(index, end));
                }
                Value::Binary(Container::from_bytes(&payload[start..end])?)
            }
        };
        Ok(value)
    }

    /// Decodes child `index` by descriptor position.
    pub fn child(&self, index: usize) -> Result<Value<'a>> {
        let offset = self.start_offset(index)?;
        self.decode_child(index, offset)
    }

    /// The scalar wrapped by a raw-scalar container, `None` for real
    /// arrays and objects.
    pub fn extract_scalar(&self) -> Result<Option<Value<'a>>> {
        if !self.is_scalar() {
            return Ok(None);
        }
        self.child(0).map(Some)
    }

    /// Event iterator over this container.
    pub fn iter(&self) -> JsonbIterator<'a> {
        JsonbIterator::new(*self)
    }
}

/// An owned, immutable container buffer.
///
/// Produced by the assembler (see [`Jsonb::from_value`]) or wrapped around
/// bytes read from storage with [`Jsonb::from_bytes`]. Readers borrow it
/// through [`Jsonb::as_container`]; share it across threads behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jsonb {
    data: Vec<u8>,
    header: u32,
}

impl Jsonb {
    /// Takes ownership of encoded bytes, checking the root header.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header = Container::from_bytes(&data)?.header;
        Ok(Jsonb { data, header })
    }

    /// Decodes every node once, surfacing any format violation.
    pub fn validate(&self) -> Result<()> {
        let mut it = self.as_container().iter();
        while it.next_event()? != crate::event::Event::Done {}
        Ok(())
    }

    pub fn as_container(&self) -> Container<'_> {
        Container {
            data: &self.data,
            header: self.header,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Serialized size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    fn word(v: u32) -> [u8; 4] {
        v.to_le_bytes()
    }

    // ["ab", null, true] laid out by hand.
    fn small_array() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&word(JB_FARRAY | 3));
        data.extend_from_slice(&word(Entry::encode(EntryTag::String, 2, true).unwrap().raw()));
        data.extend_from_slice(&word(Entry::encode(EntryTag::Null, 0, false).unwrap().raw()));
        data.extend_from_slice(&word(Entry::encode(EntryTag::True, 0, false).unwrap().raw()));
        data.extend_from_slice(b"ab");
        data
    }

    #[test]
    fn read_hand_built_array() {
        let data = small_array();
        let c = Container::from_bytes(&data).unwrap();
        assert!(c.is_array());
        assert!(!c.is_object());
        assert_eq!(c.len(), 3);
        assert_eq!(c.start_offset(0).unwrap(), 0);
        assert_eq!(c.length(0).unwrap(), 2);
        assert_eq!(c.start_offset(1).unwrap(), 2);
        assert_eq!(c.child(0).unwrap(), Value::str("ab"));
        assert_eq!(c.child(1).unwrap(), Value::Null);
        assert_eq!(c.child(2).unwrap(), Value::Bool(true));
        assert_eq!(c.extract_scalar().unwrap(), None);
    }

    #[test]
    fn bad_headers() {
        assert!(matches!(
            Container::from_bytes(&word(0)),
            Err(JsonbError::InvalidHeader(0))
        ));
        let both = JB_FARRAY | JB_FOBJECT;
        assert!(Container::from_bytes(&word(both)).is_err());
        // Scalar flag on an object, and on a two-element array.
        assert!(Container::from_bytes(&word(JB_FOBJECT | JB_FSCALAR | 1)).is_err());
        assert!(Container::from_bytes(&word(JB_FARRAY | JB_FSCALAR | 2)).is_err());
    }

    #[test]
    fn truncated_descriptors() {
        let mut data = word(JB_FARRAY | 2).to_vec();
        data.extend_from_slice(&word(0));
        assert!(matches!(
            Container::from_bytes(&data),
            Err(JsonbError::Truncated(_))
        ));
        assert!(matches!(
            Container::from_bytes(&[1, 2]),
            Err(JsonbError::Truncated(_))
        ));
    }

    #[test]
    fn truncated_payload() {
        let mut data = small_array();
        data.pop();
        let c = Container::from_bytes(&data).unwrap();
        assert!(matches!(
            c.child(0),
            Err(JsonbError::EntryOutOfRange { index: 0, end: 2, payload_len: 1 })
        ));
    }

    #[test]
    fn offset_behind_start_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&word(JB_FARRAY | 2));
        data.extend_from_slice(&word(Entry::encode(EntryTag::String, 4, true).unwrap().raw()));
        data.extend_from_slice(&word(Entry::encode(EntryTag::String, 1, true).unwrap().raw()));
        data.extend_from_slice(b"abcd");
        let c = Container::from_bytes(&data).unwrap();
        assert!(c.length(1).is_err());
        assert!(c.child(1).is_err());
    }

    #[test]
    fn entry_index_is_bounds_checked() {
        let data = small_array();
        let c = Container::from_bytes(&data).unwrap();
        assert!(c.entry(2).is_ok());
        assert_eq!(
            c.entry(3),
            Err(JsonbError::EntryOutOfRange {
                index: 3,
                end: 16,
                payload_len: 12
            })
        );
        assert!(c.child(3).is_err());
    }

    #[test]
    fn jsonb_wraps_bytes() {
        let jb = Jsonb::from_bytes(small_array()).unwrap();
        assert_eq!(jb.len(), 18);
        assert_eq!(jb.as_container().len(), 3);
        assert!(jb.validate().is_ok());
        assert!(Jsonb::from_bytes(vec![0, 0, 0, 0]).is_err());
    }
}
