//! [`Value`]: the in-memory tagged tree.
//!
//! A value is either a scalar, a materialized array or object, or a
//! [`Value::Binary`] view of a container that is still encoded. Decoding a
//! container child never recurses: nested containers come back as
//! `Binary`, borrowing the parent buffer.

use std::borrow::Cow;

use crate::container::Container;
use crate::numeric::Numeric;

/// A semi-structured value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Number(Numeric),
    /// Immutable byte string, borrowed when decoded from a buffer.
    String(Cow<'a, [u8]>),
    Array(Array<'a>),
    Object(Object<'a>),
    /// An encoded container, not yet expanded.
    Binary(Container<'a>),
}

/// A materialized array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array<'a> {
    pub elems: Vec<Value<'a>>,
    /// Marks the one-element wrapper around a bare top-level scalar.
    pub raw_scalar: bool,
}

/// A materialized object. Canonical once it has passed through the
/// builder: keys sorted by [`jsonb_util::obj_key_cmp`] and unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object<'a> {
    pub pairs: Vec<Pair<'a>>,
}

/// One key/value member of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair<'a> {
    pub key: Cow<'a, [u8]>,
    pub value: Value<'a>,
}

/// Kind of a value, in cross-kind sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl<'a> Value<'a> {
    /// String value from UTF-8 text.
    pub fn str(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s.as_bytes()))
    }

    /// String value from raw bytes.
    pub fn bytes(b: &'a [u8]) -> Self {
        Value::String(Cow::Borrowed(b))
    }

    pub fn number(n: impl Into<Numeric>) -> Self {
        Value::Number(n.into())
    }

    /// Array of `elems`.
    pub fn array(elems: Vec<Value<'a>>) -> Self {
        Value::Array(Array {
            elems,
            raw_scalar: false,
        })
    }

    /// Object from `(key, value)` pairs, in the given (not necessarily
    /// canonical) order.
    pub fn object<K>(pairs: Vec<(K, Value<'a>)>) -> Self
    where
        K: Into<Cow<'a, [u8]>>,
    {
        Value::Object(Object {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| Pair {
                    key: key.into(),
                    value,
                })
                .collect(),
        })
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::Binary(c) if c.is_object() => Kind::Object,
            Value::Binary(_) => Kind::Array,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// The string bytes, if this is a string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string as UTF-8 text, if this is a valid UTF-8 string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_number(&self) -> Option<&Numeric> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl<'a> Object<'a> {
    /// Value of `key`, scanning the pairs linearly.
    pub fn get(&self, key: &[u8]) -> Option<&Value<'a>> {
        self.pairs
            .iter()
            .find(|p| p.key.as_ref() == key)
            .map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Number(Numeric::from(n))
    }
}

impl From<Numeric> for Value<'_> {
    fn from(n: Numeric) -> Self {
        Value::Number(n)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_order() {
        assert!(Kind::Null < Kind::String);
        assert!(Kind::String < Kind::Number);
        assert!(Kind::Number < Kind::Bool);
        assert!(Kind::Bool < Kind::Array);
        assert!(Kind::Array < Kind::Object);
    }

    #[test]
    fn constructors() {
        let v = Value::object(vec![(&b"a"[..], Value::from(1)), (&b"b"[..], Value::str("x"))]);
        let Value::Object(obj) = &v else {
            panic!("expected object");
        };
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get(b"b").and_then(Value::as_str), Some("x"));
        assert_eq!(obj.get(b"c"), None);
        assert_eq!(v.kind(), Kind::Object);
        assert!(!v.is_scalar());
        assert!(Value::Null.is_scalar());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7).as_number(), Some(&Numeric::from(7)));
        assert_eq!(Value::bytes(&[0xff]).as_str(), None);
        assert_eq!(Value::bytes(&[0xff]).as_bytes(), Some(&[0xff][..]));
        assert_eq!(Value::from(String::from("hi")).as_str(), Some("hi"));
    }
}
