//! Builder: turns a stream of [`Event`]s into a canonical [`Value`].
//!
//! The builder keeps an explicit stack of open containers. Arrays collect
//! elements; objects collect pairs and remember a pending key between a
//! `Key` and its `Value`. Closing an object sorts its pairs into canonical
//! key order and removes duplicate keys, keeping the last one written.
//!
//! Materialized arrays and objects handed in as an `Elem` or `Value` are
//! re-emitted event by event, and `Binary` values are replayed through an
//! iterator, so every object takes the same canonicalization path no matter
//! how it arrived.

use std::borrow::Cow;

use jsonb_util::obj_key_cmp;

use crate::container::{Container, MAX_CHILDREN, MAX_DEPTH};
use crate::error::{JsonbError, Result};
use crate::event::Event;
use crate::value::{Array, Object, Pair, Value};

/// Builder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Fail with [`JsonbError::DuplicateKey`] instead of keeping the last
    /// value of a repeated key.
    pub unique_keys: bool,
    /// Drop object pairs whose value is `null` (after duplicate removal).
    pub skip_nulls: bool,
    /// Child limit per container. Values above [`MAX_CHILDREN`] are clamped.
    pub max_children: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            unique_keys: false,
            skip_nulls: false,
            max_children: MAX_CHILDREN,
        }
    }
}

// Capacity hints from the event stream are not trusted beyond this.
const MAX_PREALLOC: usize = 1024;

#[derive(Debug)]
enum Frame<'a> {
    Array(Array<'a>),
    Object {
        object: Object<'a>,
        key: Option<Cow<'a, [u8]>>,
    },
}

/// Incremental value builder.
///
/// ```
/// use jsonb_core::{Builder, Event, Value};
///
/// let mut b = Builder::new();
/// b.push(Event::begin_object()).unwrap();
/// b.push(Event::key("b")).unwrap();
/// b.push(Event::Value(Value::from(2))).unwrap();
/// b.push(Event::key("a")).unwrap();
/// b.push(Event::Value(Value::from(1))).unwrap();
/// let done = b.push(Event::EndObject).unwrap().unwrap();
///
/// let Value::Object(obj) = done else { unreachable!() };
/// assert_eq!(obj.pairs[0].key.as_ref(), b"a");
/// ```
#[derive(Debug)]
pub struct Builder<'a> {
    frames: Vec<Frame<'a>>,
    options: BuilderOptions,
    done: bool,
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Builder<'a> {
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    pub fn with_options(mut options: BuilderOptions) -> Self {
        options.max_children = options.max_children.min(MAX_CHILDREN);
        Self {
            frames: Vec::new(),
            options,
            done: false,
        }
    }

    /// Number of currently open containers.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Feeds one event. Returns the finished value when the event closes
    /// the top-level container.
    ///
    /// An error means the event stream or the value is invalid; the
    /// builder should be discarded afterwards.
    pub fn push(&mut self, event: Event<'a>) -> Result<Option<Value<'a>>> {
        if self.done {
            return Err(JsonbError::unexpected(
                event.name(),
                "top-level container already complete",
            ));
        }
        match event {
            Event::Elem(value) => self.push_member(value, true),
            Event::Value(value) => self.push_member(value, false),
            other => self.push_structural(other),
        }
    }

    /// Routes an `Elem` or `Value`, flattening containers first.
    fn push_member(&mut self, value: Value<'a>, elem: bool) -> Result<Option<Value<'a>>> {
        let wrap = |v| if elem { Event::Elem(v) } else { Event::Value(v) };
        match (self.frames.last(), elem) {
            (Some(Frame::Array(_)), true) | (Some(Frame::Object { .. }), false) => {}
            (_, true) => return Err(JsonbError::unexpected("Elem", "no open array")),
            (_, false) => return Err(JsonbError::unexpected("Value", "no open object")),
        }
        match value {
            Value::Array(arr) if arr.raw_scalar && arr.elems.len() != 1 => {
                Err(JsonbError::unexpected(
                    if elem { "Elem" } else { "Value" },
                    "a raw scalar array holds exactly one element",
                ))
            }
            Value::Array(mut arr) if arr.raw_scalar => {
                let scalar = arr.elems.pop().unwrap_or(Value::Null);
                self.push_member(scalar, elem)
            }
            Value::Array(arr) => {
                self.push_structural(Event::BeginArray {
                    len: arr.elems.len(),
                    raw_scalar: false,
                })?;
                for e in arr.elems {
                    self.push_member(e, true)?;
                }
                self.push_structural(Event::EndArray)
            }
            Value::Object(obj) => {
                self.push_structural(Event::BeginObject {
                    len: obj.pairs.len(),
                })?;
                for pair in obj.pairs {
                    self.push_structural(Event::Key(pair.key))?;
                    self.push_member(pair.value, false)?;
                }
                self.push_structural(Event::EndObject)
            }
            Value::Binary(container) => self.push_binary(container, elem),
            scalar => self.push_structural(wrap(scalar)),
        }
    }

    /// Replays an encoded container into the stack.
    fn push_binary(&mut self, container: Container<'a>, elem: bool) -> Result<Option<Value<'a>>> {
        if let Some(scalar) = container.extract_scalar()? {
            return self.push_member(scalar, elem);
        }
        let mut it = container.iter();
        let mut last = None;
        loop {
            match it.next_event()? {
                Event::Done => return Ok(last),
                event => last = self.push_structural(event)?,
            }
        }
    }

    fn push_structural(&mut self, event: Event<'a>) -> Result<Option<Value<'a>>> {
        match event {
            Event::BeginArray { len, raw_scalar } => {
                if raw_scalar && !self.frames.is_empty() {
                    return Err(JsonbError::unexpected(
                        "BeginArray",
                        "a raw scalar array must be the top-level container",
                    ));
                }
                self.check_value_slot("BeginArray")?;
                self.check_depth()?;
                self.frames.push(Frame::Array(Array {
                    elems: Vec::with_capacity(len.min(MAX_PREALLOC)),
                    raw_scalar,
                }));
                Ok(None)
            }
            Event::BeginObject { len } => {
                self.check_value_slot("BeginObject")?;
                self.check_depth()?;
                self.frames.push(Frame::Object {
                    object: Object {
                        pairs: Vec::with_capacity(len.min(MAX_PREALLOC)),
                    },
                    key: None,
                });
                Ok(None)
            }
            Event::Elem(value) => match self.frames.last_mut() {
                Some(Frame::Array(arr)) => {
                    if arr.raw_scalar && !arr.elems.is_empty() {
                        return Err(JsonbError::unexpected(
                            "Elem",
                            "a raw scalar array holds exactly one element",
                        ));
                    }
                    append_element(arr, value, self.options.max_children)?;
                    Ok(None)
                }
                _ => Err(JsonbError::unexpected("Elem", "no open array")),
            },
            Event::Key(k) => match self.frames.last_mut() {
                Some(Frame::Object { key, .. }) if key.is_none() => {
                    *key = Some(k);
                    Ok(None)
                }
                Some(Frame::Object { .. }) => {
                    Err(JsonbError::unexpected("Key", "a value was expected"))
                }
                _ => Err(JsonbError::unexpected("Key", "no open object")),
            },
            Event::Value(value) => match self.frames.last_mut() {
                Some(Frame::Object { object, key }) => match key.take() {
                    Some(k) => {
                        append_pair(object, k, value, self.options.max_children)?;
                        Ok(None)
                    }
                    None => Err(JsonbError::unexpected("Value", "a key was expected")),
                },
                _ => Err(JsonbError::unexpected("Value", "no open object")),
            },
            Event::EndArray => match self.frames.last() {
                Some(Frame::Array(arr)) => {
                    if arr.raw_scalar && arr.elems.len() != 1 {
                        return Err(JsonbError::unexpected(
                            "EndArray",
                            "a raw scalar array holds exactly one element",
                        ));
                    }
                    let Some(Frame::Array(arr)) = self.frames.pop() else {
                        unreachable!("top frame checked above")
                    };
                    self.finish_container(Value::Array(arr))
                }
                _ => Err(JsonbError::unexpected("EndArray", "no open array")),
            },
            Event::EndObject => match self.frames.last() {
                Some(Frame::Object { key: None, .. }) => {
                    let Some(Frame::Object { mut object, .. }) = self.frames.pop() else {
                        unreachable!("top frame checked above")
                    };
                    canonicalize(&mut object, &self.options)?;
                    self.finish_container(Value::Object(object))
                }
                Some(Frame::Object { .. }) => Err(JsonbError::unexpected(
                    "EndObject",
                    "key has no value",
                )),
                _ => Err(JsonbError::unexpected("EndObject", "no open object")),
            },
            Event::Done => Err(JsonbError::unexpected("Done", "not accepted by the builder")),
        }
    }

    /// A nested container may only start where a value is expected.
    fn check_value_slot(&self, event: &'static str) -> Result<()> {
        match self.frames.last() {
            None => Ok(()),
            Some(Frame::Array(arr)) if arr.raw_scalar => Err(JsonbError::unexpected(
                event,
                "a raw scalar array cannot hold a container",
            )),
            Some(Frame::Array(_)) => Ok(()),
            Some(Frame::Object { key: Some(_), .. }) => Ok(()),
            Some(Frame::Object { key: None, .. }) => {
                Err(JsonbError::unexpected(event, "a key was expected"))
            }
        }
    }

    fn check_depth(&self) -> Result<()> {
        if self.frames.len() >= MAX_DEPTH {
            tracing::debug!(max = MAX_DEPTH, "container nesting limit reached");
            return Err(JsonbError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    /// Hands a closed container to its parent, or returns it at top level.
    fn finish_container(&mut self, value: Value<'a>) -> Result<Option<Value<'a>>> {
        let max = self.options.max_children;
        match self.frames.last_mut() {
            None => {
                self.done = true;
                Ok(Some(value))
            }
            Some(Frame::Array(arr)) => {
                append_element(arr, value, max)?;
                Ok(None)
            }
            Some(Frame::Object { object, key }) => {
                // `check_value_slot` guaranteed the pending key.
                let k = key.take().unwrap_or_default();
                append_pair(object, k, value, max)?;
                Ok(None)
            }
        }
    }
}

fn append_element<'a>(arr: &mut Array<'a>, value: Value<'a>, max: usize) -> Result<()> {
    if arr.elems.len() >= max {
        tracing::debug!(max, "array element limit reached");
        return Err(JsonbError::TooManyElements(arr.elems.len() + 1, max));
    }
    arr.elems.push(value);
    Ok(())
}

fn append_pair<'a>(
    object: &mut Object<'a>,
    key: Cow<'a, [u8]>,
    value: Value<'a>,
    max: usize,
) -> Result<()> {
    if object.pairs.len() >= max {
        tracing::debug!(max, "object pair limit reached");
        return Err(JsonbError::TooManyPairs(object.pairs.len() + 1, max));
    }
    object.pairs.push(Pair { key, value });
    Ok(())
}

/// Sorts `items` by key (length first) and removes items with duplicate
/// keys, keeping the one that came last. Returns the number removed.
pub(crate) fn sort_and_dedup<T, F>(items: &mut Vec<T>, key: F) -> usize
where
    F: Fn(&T) -> &[u8],
{
    // Stable: equal keys stay in insertion order.
    items.sort_by(|a, b| obj_key_cmp(key(a), key(b)));

    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items.drain(..) {
        match kept.last_mut() {
            Some(last) if key(last) == key(&item) => {
                *last = item;
                dropped += 1;
            }
            _ => kept.push(item),
        }
    }
    *items = kept;
    dropped
}

fn canonicalize(object: &mut Object<'_>, options: &BuilderOptions) -> Result<()> {
    let dropped = sort_and_dedup(&mut object.pairs, |p| p.key.as_ref());
    if dropped > 0 {
        if options.unique_keys {
            return Err(JsonbError::DuplicateKey);
        }
        tracing::trace!(dropped, "duplicate object keys replaced");
    }
    if options.skip_nulls {
        object.pairs.retain(|p| !matches!(p.value, Value::Null));
    }
    Ok(())
}

/// Builds a value from a complete event stream.
///
/// The stream must describe exactly one top-level container; a trailing
/// [`Event::Done`] is allowed and ignored.
pub fn build<'a, I>(events: I, options: BuilderOptions) -> Result<Value<'a>>
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut builder = Builder::with_options(options);
    let mut result = None;
    for event in events {
        if event == Event::Done && result.is_some() {
            break;
        }
        if let Some(value) = builder.push(event)? {
            result = Some(value);
        }
    }
    result.ok_or(JsonbError::unexpected("Done", "event stream ended inside a container"))
}
