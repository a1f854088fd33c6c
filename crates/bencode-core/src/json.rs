//! JSON presentation of Bencode values.
//!
//! Bencode has no text type, so the mapping is only lossless for documents
//! whose byte strings are UTF-8:
//!
//! | Bencode | JSON |
//! |---------|------|
//! | UTF-8 byte string | string |
//! | other byte string | array of byte values |
//! | integer | number |
//! | list | array |
//! | dictionary | object, keys in document order |
//!
//! Dictionary keys are always rendered as text. Keys that are not UTF-8 are
//! converted lossily; when two distinct keys render to the same text the
//! conversion fails instead of dropping a pair. Decode with `keys_as_text` set
//! in [`DecodeOptions`](crate::DecodeOptions) to reject such documents up front.

use std::collections::HashSet;

use bytes::Bytes;
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::value::{Dict, Value};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::ByteString(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => serializer.serialize_str(text),
                Err(_) => serializer.serialize_bytes(bytes),
            },
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(dict) => dict.serialize(serializer),
        }
    }
}

impl Serialize for Dict {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        let mut rendered = HashSet::with_capacity(self.len());
        for (key, value) in self {
            let text = String::from_utf8_lossy(key);
            if !rendered.insert(text.clone()) {
                return Err(S::Error::custom(format!(
                    "dictionary key \"{}\" collides with another key once rendered as text",
                    key.escape_ascii()
                )));
            }
            map.serialize_entry(&text, value)?;
        }
        map.end()
    }
}

/// Render a value as JSON.
///
/// ```
/// use bencode_core::{decode, to_json};
/// use serde_json::json;
///
/// let value = decode(b"d4:name4:spam6:lengthi42e4:tagsl1:a1:bee").unwrap();
/// assert_eq!(
///     to_json(&value).unwrap(),
///     json!({"name": "spam", "length": 42, "tags": ["a", "b"]})
/// );
/// ```
pub fn to_json(value: &Value) -> Result<Json> {
    Ok(serde_json::to_value(value)?)
}

/// Build a value from JSON.
///
/// Strings become byte strings, integral numbers become integers, arrays
/// become lists and objects become dictionaries in document order. `null`,
/// booleans, floats and integers outside the `i64` range have no Bencode form
/// and fail with [`Error::Unrepresentable`].
///
/// ```
/// use bencode_core::{encode, from_json};
/// use serde_json::json;
///
/// let value = from_json(&json!({"spam": ["a", 1]})).unwrap();
/// assert_eq!(encode(&value), b"d4:spaml1:ai1eee");
///
/// let err = from_json(&json!({"spam": [true]})).unwrap_err();
/// assert_eq!(err.to_string(), "JSON boolean at '/spam/0' has no bencode representation");
/// ```
pub fn from_json(json: &Json) -> Result<Value> {
    let mut path = String::new();
    convert(json, &mut path)
}

fn convert(json: &Json, path: &mut String) -> Result<Value> {
    match json {
        Json::String(s) => Ok(Value::string(s)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Integer(i)),
            None if n.is_f64() => Err(unrepresentable(path, "float")),
            None => Err(unrepresentable(path, "integer out of range")),
        },
        Json::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                list.push(descend(path, &i.to_string(), |p| convert(item, p))?);
            }
            Ok(Value::List(list))
        }
        Json::Object(map) => {
            let mut dict = Dict::with_capacity(map.len());
            for (key, item) in map {
                let value = descend(path, key, |p| convert(item, p))?;
                dict.push_unique(Bytes::from(key.clone()), value);
            }
            Ok(Value::Map(dict))
        }
        Json::Bool(_) => Err(unrepresentable(path, "boolean")),
        Json::Null => Err(unrepresentable(path, "null")),
    }
}

/// Run `f` with `segment` appended to the JSON pointer `path`.
fn descend<T>(
    path: &mut String,
    segment: &str,
    f: impl FnOnce(&mut String) -> Result<T>,
) -> Result<T> {
    let len = path.len();
    path.push('/');
    path.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    let result = f(path);
    path.truncate(len);
    result
}

fn unrepresentable(path: &str, found: &'static str) -> Error {
    Error::Unrepresentable {
        path: path.to_string(),
        found,
    }
}
