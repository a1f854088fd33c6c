//! Bencode Encoder — converts a [`Value`] tree into bytes.
//!
//! Output is canonical for everything the encoder controls: sizes and integers
//! are written in shortest decimal form. Dictionary pairs are written in the
//! order the [`Dict`](crate::Dict) stores them, so `decode` and `encode` are
//! exact inverses; sort first with [`Value::into_canonical`] when
//! byte-for-byte comparable output is needed.
//!
//! # Example
//! ```
//! use bencode_core::{encode, Dict, Value};
//!
//! let mut dict = Dict::new();
//! dict.insert("cow", Value::string("moo"));
//! dict.insert("spam", Value::List(vec![Value::Integer(-1)]));
//! assert_eq!(encode(&Value::Map(dict)), b"d3:cow3:moo4:spamli-1eee");
//! ```

use crate::value::Value;

/// Encode a value into a new buffer sized exactly for the output.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut out);
    out
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::ByteString(bytes) => encode_byte_string(bytes, out),
        Value::Integer(n) => {
            out.push(b'i');
            out.extend_from_slice(n.to_string().as_bytes());
            out.push(b'e');
        }
        Value::List(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        Value::Map(dict) => {
            out.push(b'd');
            for (key, item) in dict {
                encode_byte_string(key, out);
                encode_into(item, out);
            }
            out.push(b'e');
        }
    }
}

/// Number of bytes [`encode`] produces for `value`.
///
/// ```
/// use bencode_core::{encode, encoded_len, Value};
///
/// let value = Value::List(vec![Value::string("spam"), Value::Integer(-42)]);
/// assert_eq!(encoded_len(&value), encode(&value).len());
/// ```
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::ByteString(bytes) => byte_string_len(bytes.len()),
        Value::Integer(n) => 2 + int_width(*n),
        Value::List(items) => 2 + items.iter().map(encoded_len).sum::<usize>(),
        Value::Map(dict) => {
            2 + dict
                .iter()
                .map(|(key, item)| byte_string_len(key.len()) + encoded_len(item))
                .sum::<usize>()
        }
    }
}

fn encode_byte_string(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

fn byte_string_len(len: usize) -> usize {
    decimal_width(len as u64) + 1 + len
}

fn int_width(n: i64) -> usize {
    let sign = usize::from(n < 0);
    sign + decimal_width(n.unsigned_abs())
}

fn decimal_width(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}
