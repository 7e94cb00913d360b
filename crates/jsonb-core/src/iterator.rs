//! Lazy replay of a container as the [`Event`] stream that built it.
//!
//! The iterator keeps a stack of cursors, one per container it is inside.
//! Entering a nested container pushes a cursor; reaching its end pops it
//! and the parent picks up where it stopped. With `skip_nested` set, nested
//! containers are not entered and come back as [`Value::Binary`] instead.

use crate::container::Container;
use crate::error::{JsonbError, Result};
use crate::event::Event;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ArrayStart,
    ArrayElem,
    ObjectStart,
    ObjectKey,
    ObjectValue,
}

#[derive(Debug, Clone)]
struct Cursor<'a> {
    container: Container<'a>,
    len: usize,
    index: usize,
    /// Start offset of the next element, or of the next key.
    data_offset: usize,
    /// Start offset of the next object value.
    value_offset: usize,
    state: State,
}

impl<'a> Cursor<'a> {
    fn new(container: Container<'a>) -> Self {
        let state = if container.is_object() {
            State::ObjectStart
        } else {
            State::ArrayStart
        };
        Cursor {
            container,
            len: container.len(),
            index: 0,
            data_offset: 0,
            value_offset: 0,
            state,
        }
    }
}

/// Forward-only, single-pass event iterator over a container.
///
/// [`JsonbIterator::next_event`] returns [`Event::Done`] once the root
/// container is closed, and keeps returning it. The [`Iterator`]
/// implementation stops before `Done` instead. After an error the iterator
/// is left mid-stream and should be dropped.
#[derive(Debug, Clone)]
pub struct JsonbIterator<'a> {
    stack: Vec<Cursor<'a>>,
    skip_nested: bool,
}

impl<'a> JsonbIterator<'a> {
    pub fn new(container: Container<'a>) -> Self {
        Self {
            stack: vec![Cursor::new(container)],
            skip_nested: false,
        }
    }

    /// Yield nested containers as [`Value::Binary`] instead of entering them.
    pub fn skip_nested(mut self, skip: bool) -> Self {
        self.skip_nested = skip;
        self
    }

    /// Nesting depth of the container currently being read.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn next_event(&mut self) -> Result<Event<'a>> {
        let skip_nested = self.skip_nested;
        loop {
            let Some(cur) = self.stack.last_mut() else {
                return Ok(Event::Done);
            };
            match cur.state {
                State::ArrayStart => {
                    cur.state = State::ArrayElem;
                    return Ok(Event::BeginArray {
                        len: cur.len,
                        raw_scalar: cur.container.is_scalar(),
                    });
                }
                State::ArrayElem => {
                    if cur.index >= cur.len {
                        self.stack.pop();
                        return Ok(Event::EndArray);
                    }
                    let value = cur.container.decode_child(cur.index, cur.data_offset)?;
                    cur.data_offset = cur
                        .container
                        .entry(cur.index)?
                        .advance_offset(cur.data_offset);
                    cur.index += 1;
                    match value {
                        Value::Binary(nested) if !skip_nested => {
                            self.stack.push(Cursor::new(nested));
                        }
                        value => return Ok(Event::Elem(value)),
                    }
                }
                State::ObjectStart => {
                    cur.value_offset = cur.container.start_offset(cur.len)?;
                    cur.state = State::ObjectKey;
                    return Ok(Event::BeginObject { len: cur.len });
                }
                State::ObjectKey => {
                    if cur.index >= cur.len {
                        self.stack.pop();
                        return Ok(Event::EndObject);
                    }
                    match cur.container.decode_child(cur.index, cur.data_offset)? {
                        Value::String(key) => {
                            cur.state = State::ObjectValue;
                            return Ok(Event::Key(key));
                        }
                        _ => return Err(JsonbError::NonStringKey(cur.index)),
                    }
                }
                State::ObjectValue => {
                    let value_index = cur.index + cur.len;
                    let value = cur.container.decode_child(value_index, cur.value_offset)?;
                    cur.data_offset = cur
                        .container
                        .entry(cur.index)?
                        .advance_offset(cur.data_offset);
                    cur.value_offset = cur
                        .container
                        .entry(value_index)?
                        .advance_offset(cur.value_offset);
                    cur.index += 1;
                    cur.state = State::ObjectKey;
                    match value {
                        Value::Binary(nested) if !skip_nested => {
                            self.stack.push(Cursor::new(nested));
                        }
                        value => return Ok(Event::Value(value)),
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for JsonbIterator<'a> {
    type Item = Result<Event<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Event::Done) => None,
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}
