//! Structural hashing consistent with [`compare`](crate::compare).
//!
//! Containers that compare equal hash equal: numbers hash their normalized
//! form, and objects are stored in canonical key order.

use jsonb_util::{hash_bytes, rotate_mix};

use crate::container::{Container, JB_FARRAY, JB_FOBJECT};
use crate::error::Result;
use crate::event::Event;
use crate::value::Value;

/// Folds one scalar into `acc`. Containers are ignored.
pub fn hash_scalar(value: &Value<'_>, acc: &mut u32) {
    let item = match value {
        Value::Null => 0x01,
        Value::Bool(true) => 0x02,
        Value::Bool(false) => 0x04,
        Value::String(s) => hash_bytes(s),
        Value::Number(n) => hash_bytes(&n.normalized_bytes()),
        Value::Array(_) | Value::Object(_) | Value::Binary(_) => return,
    };
    *acc = rotate_mix(*acc, item);
}

/// Hash of a whole container: every key and scalar in iteration order, with
/// a marker for each array and object entered.
pub fn hash_container(container: &Container<'_>) -> Result<u32> {
    let mut acc = 0u32;
    let mut it = container.iter();
    loop {
        match it.next_event()? {
            Event::BeginArray { .. } => acc ^= JB_FARRAY,
            Event::BeginObject { .. } => acc ^= JB_FOBJECT,
            Event::Key(k) => hash_scalar(&Value::String(k), &mut acc),
            Event::Elem(v) | Event::Value(v) => hash_scalar(&v, &mut acc),
            Event::EndArray | Event::EndObject => {}
            Event::Done => return Ok(acc),
        }
    }
}
