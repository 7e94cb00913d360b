//! Error type shared by every jsonb operation.

use jsonb_buffers::BufferError;
use thiserror::Error;

/// Errors raised while building, assembling or decoding containers.
///
/// A lookup miss is never an error; lookups return `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonbError {
    // Format violations: the buffer is corrupt or was not produced by us.
    #[error("container data truncated: {0}")]
    Truncated(#[from] BufferError),
    #[error("invalid container header 0x{0:08x}")]
    InvalidHeader(u32),
    #[error("invalid entry type tag {0} in descriptor")]
    InvalidEntryTag(u32),
    #[error("entry {index} ends at {end}, beyond payload of {payload_len} bytes")]
    EntryOutOfRange {
        index: usize,
        end: usize,
        payload_len: usize,
    },
    #[error("invalid numeric payload")]
    InvalidNumeric,
    #[error("object key at index {0} is not a string")]
    NonStringKey(usize),
    #[error("string value is not valid UTF-8")]
    InvalidUtf8,

    // Contract violations: the event stream is malformed.
    #[error("unexpected {event} event: {reason}")]
    UnexpectedEvent {
        event: &'static str,
        reason: &'static str,
    },

    // Capacity.
    #[error("number of array elements ({0}) exceeds the maximum allowed ({1})")]
    TooManyElements(usize, usize),
    #[error("number of object pairs ({0}) exceeds the maximum allowed ({1})")]
    TooManyPairs(usize, usize),
    #[error("total size of array elements exceeds the maximum of {0} bytes")]
    ArrayTooLarge(u32),
    #[error("total size of object elements exceeds the maximum of {0} bytes")]
    ObjectTooLarge(u32),
    #[error("entry field value {0} does not fit in {1} bits")]
    FieldOverflow(usize, u32),
    #[error("nesting depth exceeds the maximum of {0}")]
    TooDeep(usize),

    // Policy.
    #[error("duplicate object key value")]
    DuplicateKey,
    #[error("container is not an array")]
    NotAnArray,
}

pub type Result<T> = std::result::Result<T, JsonbError>;

impl JsonbError {
    pub(crate) fn unexpected(event: &'static str, reason: &'static str) -> Self {
        JsonbError::UnexpectedEvent { event, reason }
    }

    /// True for errors caused by a corrupt or foreign buffer.
    pub fn is_format_violation(&self) -> bool {
        matches!(
            self,
            JsonbError::Truncated(_)
                | JsonbError::InvalidHeader(_)
                | JsonbError::InvalidEntryTag(_)
                | JsonbError::EntryOutOfRange { .. }
                | JsonbError::InvalidNumeric
                | JsonbError::NonStringKey(_)
                | JsonbError::InvalidUtf8
        )
    }
}
