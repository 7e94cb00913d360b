//! Structural events shared by the builder and the iterator.

use std::borrow::Cow;

use crate::value::Value;

/// Kind of an [`Event`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    BeginArray,
    Elem,
    EndArray,
    BeginObject,
    Key,
    Value,
    EndObject,
    Done,
}

/// One step of a value's structure.
///
/// A textual reader drives the [`Builder`](crate::Builder) with these, and
/// the [`JsonbIterator`](crate::JsonbIterator) replays a container as the
/// same sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// Start of an array of `len` elements. When building, `len` is only a
    /// capacity hint.
    BeginArray { len: usize, raw_scalar: bool },
    Elem(Value<'a>),
    EndArray,
    /// Start of an object of `len` pairs (a hint when building).
    BeginObject { len: usize },
    Key(Cow<'a, [u8]>),
    Value(Value<'a>),
    EndObject,
    Done,
}

impl<'a> Event<'a> {
    pub fn token(&self) -> Token {
        match self {
            Event::BeginArray { .. } => Token::BeginArray,
            Event::Elem(_) => Token::Elem,
            Event::EndArray => Token::EndArray,
            Event::BeginObject { .. } => Token::BeginObject,
            Event::Key(_) => Token::Key,
            Event::Value(_) => Token::Value,
            Event::EndObject => Token::EndObject,
            Event::Done => Token::Done,
        }
    }

    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self.token() {
            Token::BeginArray => "BeginArray",
            Token::Elem => "Elem",
            Token::EndArray => "EndArray",
            Token::BeginObject => "BeginObject",
            Token::Key => "Key",
            Token::Value => "Value",
            Token::EndObject => "EndObject",
            Token::Done => "Done",
        }
    }

    /// `Key` event for UTF-8 text.
    pub fn key(k: &'a str) -> Self {
        Event::Key(Cow::Borrowed(k.as_bytes()))
    }

    /// `BeginArray` for an ordinary array.
    pub fn begin_array() -> Self {
        Event::BeginArray {
            len: 0,
            raw_scalar: false,
        }
    }

    pub fn begin_object() -> Self {
        Event::BeginObject { len: 0 }
    }
}
