//! Error types for Bencode decoding and JSON conversion.

use bytes::Bytes;
use thiserror::Error;

/// The reason a document was rejected by the decoder.
///
/// Variants that concern a specific piece of the input carry the offending raw
/// bytes so callers can report them without re-slicing the buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The value handed to [`decode_value`](crate::decode_value) is not a byte string.
    #[error("object cannot be decoded")]
    Type,

    #[error("empty input")]
    EmptyInput,

    /// The byte at the cursor does not start any Bencode item.
    #[error("unknown selector 0x{0:02x}")]
    UnknownSelector(u8),

    #[error("missing ':' after byte string size")]
    MissingSizeDelimiter,

    /// The byte string size is not a canonical non-negative decimal.
    #[error("malformed size \"{}\"", .0.escape_ascii())]
    MalformedSize(Bytes),

    /// The declared byte string size runs past the end of the input.
    #[error("wrong data size: declared {declared}, {available} bytes available")]
    SizeOutOfRange { declared: usize, available: usize },

    #[error("missing 'e' after integer")]
    MissingIntTerminator,

    /// The integer text is not canonical or does not fit in an `i64`.
    #[error("malformed integer \"{}\"", .0.escape_ascii())]
    MalformedInt(Bytes),

    #[error("missing 'e' after list")]
    MissingListTerminator,

    #[error("dictionary key is not a byte string")]
    InvalidKeyType,

    /// Keys were requested as text but this key is not valid UTF-8.
    #[error("dictionary key \"{}\" is not valid UTF-8", .0.escape_ascii())]
    NonTextKey(Bytes),

    #[error("duplicate dictionary key \"{}\"", .0.escape_ascii())]
    DuplicateKey(Bytes),

    #[error("missing 'e' after dictionary")]
    MissingMapTerminator,

    #[error("trailing data: {remaining} bytes after value")]
    TrailingData { remaining: usize },

    #[error("nesting deeper than {limit} containers")]
    NestingTooDeep { limit: usize },
}

/// A rejected document: what went wrong and the byte offset where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub offset: usize,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Errors from operations layered on top of the codec.
#[derive(Error, Debug)]
pub enum Error {
    /// The input was not valid canonical Bencode.
    #[error("bencode decode error: {0}")]
    Decode(#[from] DecodeError),

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON node has no Bencode counterpart (null, booleans, floats,
    /// integers outside the `i64` range). `path` is a JSON pointer.
    #[error("JSON {found} at '{path}' has no bencode representation")]
    Unrepresentable { path: String, found: &'static str },
}

/// Convenience alias used throughout bencode-core.
pub type Result<T> = std::result::Result<T, Error>;
