//! Bridge to `serde_json`: JSON documents in, JSON documents out.
//!
//! Input drives the [`Builder`] with events, so objects are canonicalized
//! exactly as for any other producer. Output consumes a [`JsonbIterator`].
//! Numbers keep their exact digits in both directions.

use std::borrow::Cow;

use serde_json::{Map, Number, Value as Json};

use crate::assemble::assemble;
use crate::builder::{Builder, BuilderOptions};
use crate::container::{Container, Jsonb, MAX_DEPTH};
use crate::error::{JsonbError, Result};
use crate::event::Event;
use crate::iterator::JsonbIterator;
use crate::numeric::Numeric;
use crate::value::Value;

/// Encodes a JSON document. A top-level scalar is stored as a raw scalar.
pub fn from_json(json: &Json, options: BuilderOptions) -> Result<Jsonb> {
    let mut builder = Builder::with_options(options);
    let value = match json {
        Json::Array(_) | Json::Object(_) => feed(&mut builder, json, true)?,
        scalar => {
            builder.push(Event::BeginArray {
                len: 1,
                raw_scalar: true,
            })?;
            builder.push(Event::Elem(scalar_value(scalar)?))?;
            builder.push(Event::EndArray)?
        }
    };
    let value =
        value.ok_or(JsonbError::unexpected("Done", "event stream ended inside a container"))?;
    assemble(&value)
}

/// Feeds one JSON node. `elem` selects `Elem` over `Value` for scalars.
fn feed<'j>(builder: &mut Builder<'j>, json: &'j Json, elem: bool) -> Result<Option<Value<'j>>> {
    match json {
        Json::Array(items) => {
            builder.push(Event::BeginArray {
                len: items.len(),
                raw_scalar: false,
            })?;
            for item in items {
                feed(builder, item, true)?;
            }
            builder.push(Event::EndArray)
        }
        Json::Object(map) => {
            builder.push(Event::BeginObject { len: map.len() })?;
            for (key, item) in map {
                builder.push(Event::Key(Cow::Borrowed(key.as_bytes())))?;
                feed(builder, item, false)?;
            }
            builder.push(Event::EndObject)
        }
        scalar => {
            let value = scalar_value(scalar)?;
            builder.push(if elem {
                Event::Elem(value)
            } else {
                Event::Value(value)
            })
        }
    }
}

fn scalar_value(json: &Json) -> Result<Value<'_>> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            let parsed = n
                .to_string()
                .parse::<Numeric>()
                .map_err(|_| JsonbError::InvalidNumeric)?;
            Value::Number(parsed)
        }
        Json::String(s) => Value::str(s),
        Json::Array(_) | Json::Object(_) => {
            return Err(JsonbError::unexpected("Elem", "expected a scalar"))
        }
    })
}

/// Decodes a container into a JSON document, unwrapping raw scalars.
pub fn to_json(container: &Container<'_>) -> Result<Json> {
    let mut it = container.iter();
    let root = match it.next_event()? {
        Event::BeginArray { raw_scalar: true, .. } => {
            let scalar = match it.next_event()? {
                Event::Elem(v) => scalar_json(&v)?,
                other => return Err(JsonbError::unexpected(other.name(), "expected a scalar")),
            };
            it.next_event()?;
            return Ok(scalar);
        }
        event => event,
    };
    read_node(&mut it, root)
}

fn read_node(it: &mut JsonbIterator<'_>, event: Event<'_>) -> Result<Json> {
    if it.depth() > MAX_DEPTH {
        tracing::debug!(max = MAX_DEPTH, "container nesting too deep to decode");
        return Err(JsonbError::TooDeep(MAX_DEPTH));
    }
    match event {
        Event::BeginArray { len, .. } => {
            let mut items = Vec::with_capacity(len);
            loop {
                match it.next_event()? {
                    Event::EndArray => return Ok(Json::Array(items)),
                    Event::Elem(v) => items.push(scalar_json(&v)?),
                    nested => items.push(read_node(it, nested)?),
                }
            }
        }
        Event::BeginObject { .. } => {
            let mut map = Map::new();
            loop {
                let key = match it.next_event()? {
                    Event::EndObject => return Ok(Json::Object(map)),
                    Event::Key(k) => utf8(&k)?.to_owned(),
                    other => {
                        return Err(JsonbError::unexpected(other.name(), "expected a key"))
                    }
                };
                let value = match it.next_event()? {
                    Event::Value(v) => scalar_json(&v)?,
                    nested => read_node(it, nested)?,
                };
                map.insert(key, value);
            }
        }
        other => Err(JsonbError::unexpected(other.name(), "expected a container")),
    }
}

fn scalar_json(value: &Value<'_>) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::String(s) => Json::String(utf8(s)?.to_owned()),
        Value::Number(n) => {
            let number: Number = n.to_string().parse().map_err(|_| JsonbError::InvalidNumeric)?;
            Json::Number(number)
        }
        Value::Binary(c) => to_json(c)?,
        Value::Array(_) | Value::Object(_) => {
            return Err(JsonbError::unexpected("Elem", "expected a scalar"))
        }
    })
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| JsonbError::InvalidUtf8)
}

impl Jsonb {
    /// See [`from_json`].
    pub fn from_json(json: &Json, options: BuilderOptions) -> Result<Jsonb> {
        from_json(json, options)
    }

    /// See [`to_json`].
    pub fn to_json(&self) -> Result<Json> {
        to_json(&self.as_container())
    }
}
