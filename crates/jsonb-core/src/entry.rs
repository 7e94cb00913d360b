//! Entry descriptors: one packed 32-bit word per container child.
//!
//! ```text
//!  31   30..28   27..0
//! +---+--------+----------------------+
//! |off|  tag   | length or end offset |
//! +---+--------+----------------------+
//! ```
//!
//! With `off` clear the low bits hold the byte length of the child's
//! payload; with `off` set they hold the end offset of the payload,
//! measured from the start of the container's payload region. Every
//! [`OFFSET_STRIDE`]-th descriptor carries an offset, so a start offset is
//! always recoverable by summing at most `OFFSET_STRIDE` fields.

use crate::error::{JsonbError, Result};

pub const JENTRY_OFFLENMASK: u32 = 0x0FFF_FFFF;
pub const JENTRY_TYPEMASK: u32 = 0x7000_0000;
pub const JENTRY_HAS_OFF: u32 = 0x8000_0000;

const JENTRY_TYPE_SHIFT: u32 = 28;
const JENTRY_FIELD_BITS: u32 = 28;

/// Descriptor index interval at which end offsets are stored.
pub const OFFSET_STRIDE: usize = 32;

/// Type tag stored in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EntryTag {
    String = 0,
    Numeric = 1,
    False = 2,
    True = 3,
    Null = 4,
    Container = 5,
}

impl EntryTag {
    fn from_bits(bits: u32) -> Result<Self> {
        Ok(match bits {
            0 => EntryTag::String,
            1 => EntryTag::Numeric,
            2 => EntryTag::False,
            3 => EntryTag::True,
            4 => EntryTag::Null,
            5 => EntryTag::Container,
            other => return Err(JsonbError::InvalidEntryTag(other)),
        })
    }
}

/// A decoded entry descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry(u32);

impl Entry {
    /// Packs a descriptor. Fails if `field` does not fit in 28 bits.
    pub fn encode(tag: EntryTag, field: usize, has_offset: bool) -> Result<Entry> {
        if field > JENTRY_OFFLENMASK as usize {
            return Err(JsonbError::FieldOverflow(field, JENTRY_FIELD_BITS));
        }
        let mut raw = ((tag as u32) << JENTRY_TYPE_SHIFT) | field as u32;
        if has_offset {
            raw |= JENTRY_HAS_OFF;
        }
        Ok(Entry(raw))
    }

    /// Unpacks a raw word, rejecting unknown type tags.
    pub fn decode(raw: u32) -> Result<Entry> {
        EntryTag::from_bits((raw & JENTRY_TYPEMASK) >> JENTRY_TYPE_SHIFT)?;
        Ok(Entry(raw))
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn tag(self) -> EntryTag {
        // Validated in `encode`/`decode`.
        match (self.0 & JENTRY_TYPEMASK) >> JENTRY_TYPE_SHIFT {
            0 => EntryTag::String,
            1 => EntryTag::Numeric,
            2 => EntryTag::False,
            3 => EntryTag::True,
            4 => EntryTag::Null,
            _ => EntryTag::Container,
        }
    }

    /// The length or end-offset field.
    #[inline]
    pub fn field(self) -> u32 {
        self.0 & JENTRY_OFFLENMASK
    }

    #[inline]
    pub fn has_offset(self) -> bool {
        self.0 & JENTRY_HAS_OFF != 0
    }

    /// Returns the same descriptor with its field replaced by an absolute
    /// end offset.
    pub fn with_end_offset(self, end: usize) -> Result<Entry> {
        Entry::encode(self.tag(), end, true)
    }

    /// Given this entry's start offset, returns its end offset.
    #[inline]
    pub fn advance_offset(self, offset: usize) -> usize {
        if self.has_offset() {
            self.field() as usize
        } else {
            offset + self.field() as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_length() {
        let e = Entry::encode(EntryTag::String, 5, false).unwrap();
        assert_eq!(e.raw(), 5);
        let d = Entry::decode(e.raw()).unwrap();
        assert_eq!(d.tag(), EntryTag::String);
        assert_eq!(d.field(), 5);
        assert!(!d.has_offset());
    }

    #[test]
    fn encode_decode_offset() {
        let e = Entry::encode(EntryTag::Container, 1024, true).unwrap();
        assert_eq!(e.raw(), 0x8000_0000 | 0x5000_0000 | 1024);
        assert_eq!(e.tag(), EntryTag::Container);
        assert!(e.has_offset());
        assert_eq!(e.field(), 1024);
    }

    #[test]
    fn every_tag_survives() {
        for tag in [
            EntryTag::String,
            EntryTag::Numeric,
            EntryTag::False,
            EntryTag::True,
            EntryTag::Null,
            EntryTag::Container,
        ] {
            let e = Entry::encode(tag, JENTRY_OFFLENMASK as usize, false).unwrap();
            assert_eq!(Entry::decode(e.raw()).unwrap().tag(), tag);
        }
    }

    #[test]
    fn field_overflow() {
        let too_big = JENTRY_OFFLENMASK as usize + 1;
        assert_eq!(
            Entry::encode(EntryTag::String, too_big, false),
            Err(JsonbError::FieldOverflow(too_big, 28))
        );
    }

    #[test]
    fn unknown_tags_rejected() {
        assert_eq!(Entry::decode(0x6000_0000), Err(JsonbError::InvalidEntryTag(6)));
        assert_eq!(Entry::decode(0xF000_0000), Err(JsonbError::InvalidEntryTag(7)));
    }

    #[test]
    fn advance_offset() {
        let len = Entry::encode(EntryTag::String, 3, false).unwrap();
        assert_eq!(len.advance_offset(10), 13);
        let off = Entry::encode(EntryTag::String, 40, true).unwrap();
        assert_eq!(off.advance_offset(10), 40);
        assert_eq!(len.with_end_offset(13).unwrap().field(), 13);
    }
}
