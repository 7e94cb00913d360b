//! Assembler: serializes a [`Value`] tree into one contiguous container.
//!
//! Each container reserves its header and descriptor slots, appends the
//! payload of every child in descriptor order and then backpatches the
//! descriptors. Numbers and nested containers are padded to a 4-byte
//! boundary first; the padding is counted in the child's stored length.

use jsonb_buffers::Writer;

use crate::builder::sort_and_dedup;
use crate::container::{
    Container, Jsonb, CONTAINER_ALIGN, JB_FARRAY, JB_FOBJECT, JB_FSCALAR, MAX_CHILDREN, MAX_DEPTH,
};
use crate::entry::{Entry, EntryTag, JENTRY_OFFLENMASK, OFFSET_STRIDE};
use crate::error::{JsonbError, Result};
use crate::numeric::Numeric;
use crate::value::{Pair, Value};

/// Serializes `value` into a new container buffer.
///
/// A bare scalar is wrapped in a one-element raw-scalar array. Objects are
/// written in canonical key order; an object that was not built by the
/// [`Builder`](crate::Builder) is sorted and de-duplicated on the way out.
/// `Binary` values are copied verbatim, except that a nested raw scalar is
/// stored as the scalar it wraps. Nothing is returned on error.
pub fn assemble(value: &Value<'_>) -> Result<Jsonb> {
    let mut writer = Writer::new();
    match value {
        Value::Binary(container) => writer.buf(container.as_bytes()),
        v if v.is_scalar() => {
            convert_array(&mut writer, std::slice::from_ref(v), true, 0)?;
        }
        v => {
            convert_value(&mut writer, v, 0)?;
        }
    }
    Jsonb::from_bytes(writer.into_inner())
}

impl Jsonb {
    /// Assembles `value`; see [`assemble`].
    pub fn from_value(value: &Value<'_>) -> Result<Jsonb> {
        assemble(value)
    }
}

fn convert_value(writer: &mut Writer, value: &Value<'_>, level: usize) -> Result<Entry> {
    match value {
        Value::Array(arr) if arr.raw_scalar && level > 0 => match arr.elems.as_slice() {
            [only] => convert_value(writer, only, level + 1),
            _ => Err(JsonbError::unexpected(
                "BeginArray",
                "a raw scalar array holds exactly one element",
            )),
        },
        Value::Array(arr) => convert_array(writer, &arr.elems, arr.raw_scalar, level),
        Value::Object(obj) => convert_object(writer, &obj.pairs, level),
        Value::Binary(container) => convert_binary(writer, container, level),
        Value::Null => Entry::encode(EntryTag::Null, 0, false),
        Value::Bool(true) => Entry::encode(EntryTag::True, 0, false),
        Value::Bool(false) => Entry::encode(EntryTag::False, 0, false),
        Value::String(s) => {
            let entry = Entry::encode(EntryTag::String, s.len(), false)?;
            writer.buf(s);
            Ok(entry)
        }
        Value::Number(n) => {
            if !n.is_storable() {
                tracing::debug!("numeric scale out of range");
                return Err(JsonbError::InvalidNumeric);
            }
            let pad = writer.pad_to(Numeric::ALIGN);
            let bytes = n.to_bytes();
            writer.buf(&bytes);
            Entry::encode(EntryTag::Numeric, pad + bytes.len(), false)
        }
    }
}

fn convert_array(
    writer: &mut Writer,
    elems: &[Value<'_>],
    raw_scalar: bool,
    level: usize,
) -> Result<Entry> {
    check_depth(level)?;
    let n = elems.len();
    if n > MAX_CHILDREN {
        tracing::debug!(n, "array too large to assemble");
        return Err(JsonbError::TooManyElements(n, MAX_CHILDREN));
    }
    if raw_scalar {
        match elems {
            [only] if holds_scalar(only) => {}
            [_] => {
                return Err(JsonbError::unexpected(
                    "BeginArray",
                    "a raw scalar array cannot hold a container",
                ))
            }
            _ => {
                return Err(JsonbError::unexpected(
                    "BeginArray",
                    "a raw scalar array holds exactly one element",
                ))
            }
        }
    }

    let base = writer.len();
    writer.pad_to(CONTAINER_ALIGN);

    let mut header = JB_FARRAY | n as u32;
    if raw_scalar {
        header |= JB_FSCALAR;
    }
    writer.u32(header);
    let entries_at = writer.reserve(n * 4);

    let mut total = 0usize;
    for (i, elem) in elems.iter().enumerate() {
        let mut entry = convert_value(writer, elem, level + 1)?;
        total += entry.field() as usize;
        if total > JENTRY_OFFLENMASK as usize {
            return Err(JsonbError::ArrayTooLarge(JENTRY_OFFLENMASK));
        }
        if i % OFFSET_STRIDE == 0 {
            entry = entry.with_end_offset(total)?;
        }
        writer.u32_at(entries_at + i * 4, entry.raw());
    }

    let total = writer.len() - base;
    if total > JENTRY_OFFLENMASK as usize {
        return Err(JsonbError::ArrayTooLarge(JENTRY_OFFLENMASK));
    }
    Entry::encode(EntryTag::Container, total, false)
}

fn convert_object(writer: &mut Writer, pairs: &[Pair<'_>], level: usize) -> Result<Entry> {
    check_depth(level)?;
    let mut ordered: Vec<&Pair<'_>> = pairs.iter().collect();
    sort_and_dedup(&mut ordered, |p| p.key.as_ref());

    let n = ordered.len();
    if n > MAX_CHILDREN {
        tracing::debug!(n, "object too large to assemble");
        return Err(JsonbError::TooManyPairs(n, MAX_CHILDREN));
    }

    let base = writer.len();
    writer.pad_to(CONTAINER_ALIGN);
    writer.u32(JB_FOBJECT | n as u32);
    let entries_at = writer.reserve(n * 2 * 4);

    // Keys first, then values, both in key order.
    let mut total = 0usize;
    for (i, pair) in ordered.iter().enumerate() {
        writer.buf(&pair.key);
        let mut entry = Entry::encode(EntryTag::String, pair.key.len(), false)?;
        total += pair.key.len();
        if total > JENTRY_OFFLENMASK as usize {
            return Err(JsonbError::ObjectTooLarge(JENTRY_OFFLENMASK));
        }
        if i % OFFSET_STRIDE == 0 {
            entry = entry.with_end_offset(total)?;
        }
        writer.u32_at(entries_at + i * 4, entry.raw());
    }
    for (i, pair) in ordered.iter().enumerate() {
        let mut entry = convert_value(writer, &pair.value, level + 1)?;
        total += entry.field() as usize;
        if total > JENTRY_OFFLENMASK as usize {
            return Err(JsonbError::ObjectTooLarge(JENTRY_OFFLENMASK));
        }
        if (i + n) % OFFSET_STRIDE == 0 {
            entry = entry.with_end_offset(total)?;
        }
        writer.u32_at(entries_at + (i + n) * 4, entry.raw());
    }

    let total = writer.len() - base;
    if total > JENTRY_OFFLENMASK as usize {
        return Err(JsonbError::ObjectTooLarge(JENTRY_OFFLENMASK));
    }
    Entry::encode(EntryTag::Container, total, false)
}

fn convert_binary(writer: &mut Writer, container: &Container<'_>, level: usize) -> Result<Entry> {
    if let Some(scalar) = container.extract_scalar()? {
        return convert_value(writer, &scalar, level + 1);
    }
    let pad = writer.pad_to(CONTAINER_ALIGN);
    writer.buf(container.as_bytes());
    Entry::encode(EntryTag::Container, pad + container.as_bytes().len(), false)
}

fn check_depth(level: usize) -> Result<()> {
    if level >= MAX_DEPTH {
        tracing::debug!(max = MAX_DEPTH, "container nesting too deep to assemble");
        return Err(JsonbError::TooDeep(MAX_DEPTH));
    }
    Ok(())
}

/// Whether `value` ends up stored as a scalar once nested raw-scalar
/// wrappers are removed.
fn holds_scalar(mut value: &Value<'_>) -> bool {
    loop {
        match value {
            Value::Array(arr) if arr.raw_scalar => match arr.elems.as_slice() {
                [only] => value = only,
                _ => return false,
            },
            Value::Binary(container) => return container.is_scalar(),
            v => return v.is_scalar(),
        }
    }
}
