//! Packed binary container format for semi-structured values.
//!
//! A value tree (null, bool, number, string, array, object) is stored in one
//! contiguous buffer that supports random access to children, binary search
//! by object key and a total order for indexing.
//!
//! - [`Builder`]: events to a canonical [`Value`] (sorted, de-duplicated keys).
//! - [`assemble`]: a [`Value`] to an owned [`Jsonb`] buffer.
//! - [`Container`]: borrowed random-access view of a buffer.
//! - [`JsonbIterator`]: a buffer back to events.
//! - [`compare`], [`find_key_in_object`], [`find_in_array`], [`get_by_index`].
//! - [`json`]: `serde_json` bridge.
//!
//! ```
//! use jsonb_core::{find_key_in_object, BuilderOptions, Jsonb, Value};
//! use serde_json::json;
//!
//! let jb = Jsonb::from_json(&json!({"b": 2, "a": 1}), BuilderOptions::default()).unwrap();
//! let c = jb.as_container();
//! assert_eq!(find_key_in_object(&c, b"a").unwrap(), Some(Value::from(1)));
//! assert_eq!(jb.to_json().unwrap(), json!({"a": 1, "b": 2}));
//! ```

mod assemble;
mod builder;
mod compare;
mod container;
mod entry;
mod error;
mod event;
mod iterator;
mod lookup;
mod numeric;
mod value;

pub mod hash;
pub mod json;

pub use assemble::assemble;
pub use builder::{build, Builder, BuilderOptions};
pub use compare::{compare, compare_scalars, scalar_eq};
pub use container::{
    Container, Jsonb, CONTAINER_ALIGN, JB_CMASK, JB_FARRAY, JB_FOBJECT, JB_FSCALAR, MAX_CHILDREN,
    MAX_DEPTH,
};
pub use entry::{
    Entry, EntryTag, JENTRY_HAS_OFF, JENTRY_OFFLENMASK, JENTRY_TYPEMASK, OFFSET_STRIDE,
};
pub use error::{JsonbError, Result};
pub use event::{Event, Token};
pub use iterator::JsonbIterator;
pub use lookup::{find_in_array, find_key_in_object, get_by_index};
pub use numeric::Numeric;
pub use value::{Array, Kind, Object, Pair, Value};
