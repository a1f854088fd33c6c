//! Bencode Decoder — converts a byte buffer into a [`Value`] tree.
//!
//! The decoder is a single-pass recursive descent over the input. Item
//! boundaries come only from the embedded markers: the size prefix of byte
//! strings and the `e` terminator of integers, lists and dictionaries.
//!
//! Only canonical documents are accepted:
//!
//! - Sizes and integers have no leading zeros, no `+`, no whitespace, no `-0`
//! - Dictionary keys are byte strings and appear at most once
//! - Exactly one item spans the whole input
//!
//! # Key design decisions
//!
//! - **Cursor owned by a parser**: `Parser` holds the input slice and the read
//!   position; sub-parses index into the same buffer instead of copying it.
//! - **Errors built once**: a [`DecodeError`] is created at the detection site
//!   with the offset known there and returned unchanged through `?`.
//! - **Selector passed in**: containers peek before recursing, so
//!   `parse_value` is never entered at end of input and the missing-terminator
//!   error can name the offset of the opening `l`/`d`.

use std::collections::HashSet;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{DecodeError, DecodeErrorKind};
use crate::value::{Dict, Value};

/// Default limit on nested lists/dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Ceiling for [`DecodeOptions::max_depth`]. Larger settings are clamped so
/// that recursion stays well inside a default thread stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Decoder settings.
///
/// ```
/// use bencode_core::{decode_with, DecodeOptions};
///
/// let options = DecodeOptions::new().keys_as_text(true).max_depth(8);
/// assert!(decode_with(b"d3:key5:valuee", &options).is_ok());
/// assert!(decode_with(b"d1:\xffi1ee", &options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Require every dictionary key to be valid UTF-8 so it can be presented as text.
    pub keys_as_text: bool,
    /// Maximum number of containers that may enclose an item, clamped to
    /// [`MAX_DEPTH_LIMIT`].
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            keys_as_text: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys_as_text(mut self, enabled: bool) -> Self {
        self.keys_as_text = enabled;
        self
    }

    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit.min(MAX_DEPTH_LIMIT);
        self
    }
}

/// Decode a complete Bencode document with default options.
///
/// ```
/// use bencode_core::{decode, DecodeErrorKind, Value};
///
/// assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
///
/// let err = decode(b"i1ei2e").unwrap_err();
/// assert_eq!(err.kind, DecodeErrorKind::TrailingData { remaining: 3 });
/// assert_eq!(err.offset, 3);
/// ```
pub fn decode(input: &[u8]) -> Result<Value, DecodeError> {
    decode_with(input, &DecodeOptions::default())
}

/// Decode a complete Bencode document. Byte strings in the result are copied
/// out of `input`.
pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    run(Parser::new(input, None, options))
}

/// Decode a complete Bencode document without copying: every byte string in
/// the result is a slice of `input`.
pub fn decode_bytes(input: Bytes, options: &DecodeOptions) -> Result<Value, DecodeError> {
    run(Parser::new(&input, Some(&input), options))
}

/// Decode a Bencode document carried inside a byte string value.
///
/// Any other variant fails with [`DecodeErrorKind::Type`] at offset 0.
///
/// ```
/// use bencode_core::{decode_value, DecodeErrorKind, DecodeOptions, Value};
///
/// let wrapped = Value::string("li1ei2ee");
/// let inner = decode_value(&wrapped, &DecodeOptions::default()).unwrap();
/// assert_eq!(inner, Value::List(vec![Value::Integer(1), Value::Integer(2)]));
///
/// let err = decode_value(&Value::Integer(7), &DecodeOptions::default()).unwrap_err();
/// assert_eq!(err.kind, DecodeErrorKind::Type);
/// ```
pub fn decode_value(value: &Value, options: &DecodeOptions) -> Result<Value, DecodeError> {
    match value {
        Value::ByteString(bytes) => decode_bytes(bytes.clone(), options),
        other => {
            debug!(found = other.kind(), "refusing to decode a non-byte-string value");
            Err(DecodeError::new(DecodeErrorKind::Type, 0))
        }
    }
}

fn run(parser: Parser<'_>) -> Result<Value, DecodeError> {
    let len = parser.input.len();
    let result = parser.parse_document();
    match &result {
        Ok(value) => trace!(len, kind = value.kind(), "decoded bencode document"),
        Err(err) => debug!(
            len,
            offset = err.offset,
            error = %err.kind,
            "rejected bencode document"
        ),
    }
    result
}

struct Parser<'a> {
    input: &'a [u8],
    /// Set when `input` is backed by a shared buffer that can be sliced.
    shared: Option<&'a Bytes>,
    pos: usize,
    depth: usize,
    options: &'a DecodeOptions,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8], shared: Option<&'a Bytes>, options: &'a DecodeOptions) -> Self {
        Self {
            input,
            shared,
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn parse_document(mut self) -> Result<Value, DecodeError> {
        let Some(selector) = self.peek() else {
            return Err(self.fail(DecodeErrorKind::EmptyInput));
        };
        let value = self.parse_value(selector)?;

        if self.pos != self.input.len() {
            let remaining = self.input.len() - self.pos;
            return Err(self.fail(DecodeErrorKind::TrailingData { remaining }));
        }
        Ok(value)
    }

    /// Dispatch on the byte at the cursor. `selector` must equal `input[pos]`.
    fn parse_value(&mut self, selector: u8) -> Result<Value, DecodeError> {
        match selector {
            b'0'..=b'9' => self.parse_byte_string().map(Value::ByteString),
            b'i' => self.parse_integer().map(Value::Integer),
            b'l' => self.parse_list(),
            b'd' => self.parse_map(),
            other => Err(self.fail(DecodeErrorKind::UnknownSelector(other))),
        }
    }

    /// `<size>:<bytes>`
    fn parse_byte_string(&mut self) -> Result<Bytes, DecodeError> {
        let start = self.pos;
        let colon = self
            .find(b':', start)
            .ok_or_else(|| self.fail(DecodeErrorKind::MissingSizeDelimiter))?;

        let digits = &self.input[start..colon];
        let size = parse_size(digits).ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::MalformedSize(Bytes::copy_from_slice(digits)),
                start,
            )
        })?;

        self.pos = colon + 1;
        let available = self.input.len() - self.pos;
        if size > available {
            return Err(self.fail(DecodeErrorKind::SizeOutOfRange {
                declared: size,
                available,
            }));
        }

        let bytes = self.take(self.pos, self.pos + size);
        self.pos += size;
        Ok(bytes)
    }

    /// `i<digits>e`
    fn parse_integer(&mut self) -> Result<i64, DecodeError> {
        let start = self.pos;
        let end = self
            .find(b'e', start + 1)
            .ok_or_else(|| self.fail(DecodeErrorKind::MissingIntTerminator))?;

        let text = &self.input[start + 1..end];
        let value = parse_int(text).ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::MalformedInt(Bytes::copy_from_slice(text)),
                start,
            )
        })?;

        self.pos = end + 1;
        Ok(value)
    }

    /// `l<item>*e`
    fn parse_list(&mut self) -> Result<Value, DecodeError> {
        let open = self.pos;
        self.enter()?;
        self.pos += 1;

        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(DecodeError::new(
                        DecodeErrorKind::MissingListTerminator,
                        open,
                    ))
                }
                Some(b'e') => break,
                Some(selector) => items.push(self.parse_value(selector)?),
            }
        }

        self.pos += 1;
        self.depth -= 1;
        Ok(Value::List(items))
    }

    /// `d(<key><value>)*e`
    fn parse_map(&mut self) -> Result<Value, DecodeError> {
        let open = self.pos;
        self.enter()?;
        self.pos += 1;

        let unterminated = || DecodeError::new(DecodeErrorKind::MissingMapTerminator, open);
        let mut dict = Dict::new();
        let mut seen: HashSet<Bytes> = HashSet::new();

        loop {
            let selector = match self.peek() {
                None => return Err(unterminated()),
                Some(b'e') => break,
                Some(selector) => selector,
            };

            let key_offset = self.pos;
            let key = match self.parse_value(selector)? {
                Value::ByteString(key) => key,
                _ => {
                    return Err(DecodeError::new(
                        DecodeErrorKind::InvalidKeyType,
                        key_offset,
                    ))
                }
            };

            // Text presentation is a check only; the stored key stays raw bytes.
            if self.options.keys_as_text && std::str::from_utf8(&key).is_err() {
                return Err(DecodeError::new(
                    DecodeErrorKind::NonTextKey(key),
                    key_offset,
                ));
            }
            if !seen.insert(key.clone()) {
                return Err(DecodeError::new(
                    DecodeErrorKind::DuplicateKey(key),
                    key_offset,
                ));
            }

            let selector = self.peek().ok_or_else(unterminated)?;
            let value = self.parse_value(selector)?;
            dict.push_unique(key, value);
        }

        self.pos += 1;
        self.depth -= 1;
        Ok(Value::Map(dict))
    }

    /// Account for one more enclosing container, failing at the opening byte
    /// when the configured limit would be exceeded.
    fn enter(&mut self) -> Result<(), DecodeError> {
        let limit = self.options.max_depth.min(MAX_DEPTH_LIMIT);
        if self.depth >= limit {
            return Err(self.fail(DecodeErrorKind::NestingTooDeep { limit }));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn find(&self, needle: u8, from: usize) -> Option<usize> {
        self.input
            .get(from..)?
            .iter()
            .position(|&b| b == needle)
            .map(|i| from + i)
    }

    fn take(&self, start: usize, end: usize) -> Bytes {
        match self.shared {
            Some(buf) => buf.slice(start..end),
            None => Bytes::copy_from_slice(&self.input[start..end]),
        }
    }

    fn fail(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos)
    }
}

/// A byte string size: one or more ASCII digits, no leading zero unless the
/// size is exactly `0`.
fn parse_size(digits: &[u8]) -> Option<usize> {
    if !is_canonical_magnitude(digits) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// An integer body: optional `-` then a canonical magnitude; `-0` is rejected
/// and the value must fit in an `i64`.
fn parse_int(text: &[u8]) -> Option<i64> {
    let magnitude = text.strip_prefix(b"-").unwrap_or(text);
    if !is_canonical_magnitude(magnitude) || text == b"-0" {
        return None;
    }
    std::str::from_utf8(text).ok()?.parse().ok()
}

/// Exactly the strings that re-render unchanged from their parsed value.
fn is_canonical_magnitude(digits: &[u8]) -> bool {
    match digits {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => digits.iter().all(u8::is_ascii_digit),
    }
}
