//! The in-memory Bencode value tree.
//!
//! [`Value`] mirrors the four wire types. Dictionaries are backed by [`Dict`],
//! which keeps pairs in insertion (document) order and never holds the same
//! raw key twice. Sorting keys is an explicit step ([`Dict::sort_keys`],
//! [`Value::into_canonical`]) because the encoder writes pairs exactly in the
//! order they are stored.

use bytes::Bytes;

/// A Bencode value.
///
/// # Examples
///
/// ```
/// use bencode_core::Value;
///
/// let int: Value = 42i64.into();
/// let string: Value = "hello".into();
/// let list = Value::List(vec![int.clone(), string.clone()]);
///
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A byte string (may or may not be valid UTF-8).
    ByteString(Bytes),
    /// A signed integer, bounded to the `i64` range.
    Integer(i64),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with unique byte string keys in document order.
    Map(Dict),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::ByteString(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a byte string value from raw bytes.
    pub fn bytes(b: impl Into<Bytes>) -> Self {
        Value::ByteString(b.into())
    }

    /// Human-readable name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::ByteString(_) => "byte string",
            Value::Integer(_) => "integer",
            Value::List(_) => "list",
            Value::Map(_) => "dictionary",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a byte string holding valid UTF-8.
    ///
    /// ```
    /// use bencode_core::Value;
    ///
    /// assert_eq!(Value::string("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::bytes(vec![0xff]).as_str(), None);
    /// assert_eq!(Value::Integer(1).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::ByteString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Map(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    ///
    /// ```
    /// use bencode_core::{decode, Value};
    ///
    /// let info = decode(b"d4:name8:file.bin6:lengthi1024ee").unwrap().into_dict().unwrap();
    /// assert_eq!(info.get_str("length"), Some(&Value::Integer(1024)));
    /// assert!(Value::Integer(1).into_dict().is_none());
    /// ```
    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Map(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key if this value is a dictionary.
    ///
    /// ```
    /// use bencode_core::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    /// Recursively sorts every dictionary by raw key bytes.
    ///
    /// Two documents with the same logical content encode to identical bytes
    /// once both have been through this.
    ///
    /// ```
    /// use bencode_core::{decode, encode};
    ///
    /// let value = decode(b"d1:bi2e1:ai1ee").unwrap();
    /// assert_eq!(encode(&value), b"d1:bi2e1:ai1ee");
    /// assert_eq!(encode(&value.into_canonical()), b"d1:ai1e1:bi2ee");
    /// ```
    pub fn into_canonical(self) -> Value {
        match self {
            Value::List(items) => {
                Value::List(items.into_iter().map(Value::into_canonical).collect())
            }
            Value::Map(dict) => {
                let mut dict: Dict = dict
                    .into_iter()
                    .map(|(k, v)| (k, v.into_canonical()))
                    .collect();
                dict.sort_keys();
                Value::Map(dict)
            }
            scalar => scalar,
        }
    }

    /// True when every dictionary in the tree already has sorted keys.
    pub fn is_canonical(&self) -> bool {
        match self {
            Value::List(items) => items.iter().all(Value::is_canonical),
            Value::Map(dict) => dict.is_sorted() && dict.values().all(Value::is_canonical),
            _ => true,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::ByteString(Bytes::from(s))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::ByteString(Bytes::from(b))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::ByteString(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Map(d)
    }
}

/// An ordered dictionary with unique byte string keys.
///
/// Equality is order-sensitive: two dictionaries are equal when they hold the
/// same pairs in the same order, which is what decode/encode preserve.
///
/// ```
/// use bencode_core::{Dict, Value};
///
/// let mut dict = Dict::new();
/// dict.insert("spam", Value::string("eggs"));
/// dict.insert("cow", Value::string("moo"));
/// assert_eq!(dict.keys().collect::<Vec<_>>(), [&b"spam"[..], &b"cow"[..]]);
///
/// // Re-inserting a key replaces the value in place.
/// let old = dict.insert("spam", Value::Integer(1));
/// assert_eq!(old, Some(Value::string("eggs")));
/// assert_eq!(dict.len(), 2);
///
/// dict.sort_keys();
/// assert_eq!(dict.keys().next(), Some(&b"cow"[..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: Vec<(Bytes, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Looks up a key given as text.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.get(key.as_bytes())
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.position(key).is_some()
    }

    /// Inserts a pair. An existing key keeps its position and its old value is returned.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes a key, preserving the order of the remaining pairs.
    pub fn remove(&mut self, key: &[u8]) -> Option<Value> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Value)> {
        self.entries.iter().map(entry_refs)
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|(k, _)| k.as_ref())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// True when keys are in strictly ascending raw byte order.
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].0 < w[1].0)
    }

    /// Sorts pairs by raw key bytes (the BEP-3 dictionary order).
    pub fn sort_keys(&mut self) {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Appends a pair whose key the caller has already checked is absent.
    pub(crate) fn push_unique(&mut self, key: Bytes, value: Value) {
        debug_assert!(!self.contains_key(&key));
        self.entries.push((key, value));
    }

    fn position(&self, key: &[u8]) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.as_ref() == key)
    }
}

impl<K: Into<Bytes>> FromIterator<(K, Value)> for Dict {
    /// Collects pairs in order; a repeated key replaces the earlier value in place.
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl IntoIterator for Dict {
    type Item = (Bytes, Value);
    type IntoIter = std::vec::IntoIter<(Bytes, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Bytes, &'a Value);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (Bytes, Value)>,
        fn(&'a (Bytes, Value)) -> (&'a Bytes, &'a Value),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(entry_refs as fn(&'a (Bytes, Value)) -> (&'a Bytes, &'a Value))
    }
}

fn entry_refs((k, v): &(Bytes, Value)) -> (&Bytes, &Value) {
    (k, v)
}
