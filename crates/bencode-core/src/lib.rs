//! # bencode-core
//!
//! Pure-Rust decoder and encoder for **Bencode**, the serialization format of
//! BitTorrent metainfo files, tracker responses and DHT messages ([BEP-3]).
//!
//! The decoder accepts only canonical documents and reports every rejection
//! as a [`DecodeError`] carrying the exact byte offset of the violation. The
//! encoder is its inverse: `decode(&encode(&v)) == Ok(v)` for every value.
//!
//! ## Quick start
//!
//! ```rust
//! use bencode_core::{decode, encode, DecodeErrorKind, Value};
//!
//! let value = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
//! assert_eq!(value.get(b"cow"), Some(&Value::string("moo")));
//! assert_eq!(encode(&value), b"d3:cow3:moo4:spam4:eggse");
//!
//! let err = decode(b"d1:ai1e1:ai2ee").unwrap_err();
//! assert_eq!(err.kind, DecodeErrorKind::DuplicateKey("a".into()));
//! assert_eq!(err.offset, 7);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value` tree and the ordered, unique-key `Dict`
//! - [`decoder`] — bytes → `Value`, with `DecodeOptions`
//! - [`encoder`] — `Value` → bytes
//! - [`json`] — JSON presentation (`to_json`, `from_json`)
//! - [`error`] — Error types for decode failures and JSON conversion
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod value;

pub use decoder::{
    decode, decode_bytes, decode_value, decode_with, DecodeOptions, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_LIMIT,
};
pub use encoder::{encode, encode_into, encoded_len};
pub use error::{DecodeError, DecodeErrorKind, Error, Result};
pub use json::{from_json, to_json};
pub use value::{Dict, Value};
