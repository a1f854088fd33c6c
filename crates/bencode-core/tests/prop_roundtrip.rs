/// Property-Based Roundtrip Tests for Bencode
///
/// Uses the `proptest` crate to generate random value trees and verify that
/// `decode(encode(v)) == v` holds for all generated inputs, plus a handful of
/// properties that follow from the format being self-delimiting and canonical.
///
/// Strategies generate:
/// - Byte strings (binary, UTF-8 text, empty)
/// - Integers across the whole `i64` range, with the edges weighted in
/// - Lists and dictionaries nested up to 4 levels deep
use bencode_core::{decode, decode_bytes, encode, encoded_len, DecodeOptions, Dict, Value};
use bytes::Bytes;
use proptest::prelude::*;

// ============================================================================
// Strategies for generating values
// ============================================================================

/// Generate a byte string: arbitrary bytes or printable text.
fn arb_bytes() -> impl Strategy<Value = Bytes> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Bytes::from),
        "[a-zA-Z0-9 :ield\u{e9}]{0,16}".prop_map(Bytes::from),
        Just(Bytes::new()),
    ]
}

/// Generate an integer, biased towards zero, sign changes and the `i64` edges.
fn arb_integer() -> impl Strategy<Value = i64> {
    prop_oneof![
        3 => -1000i64..1000,
        2 => any::<i64>(),
        1 => Just(i64::MIN),
        1 => Just(i64::MAX),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_bytes().prop_map(Value::ByteString),
        arb_integer().prop_map(Value::Integer),
    ]
}

/// Generate a value with limited nesting (recursive).
fn arb_value_inner(depth: u32) -> BoxedStrategy<Value> {
    if depth == 0 {
        arb_scalar().boxed()
    } else {
        prop_oneof![
            3 => arb_scalar(),
            2 => prop::collection::vec(arb_value_inner(depth - 1), 0..5).prop_map(Value::List),
            2 => prop::collection::vec((arb_bytes(), arb_value_inner(depth - 1)), 0..5)
                .prop_map(|pairs| Value::Map(pairs.into_iter().collect::<Dict>())),
        ]
        .boxed()
    }
}

/// Top-level strategy for generating random values (up to 4 levels deep).
fn arb_value() -> impl Strategy<Value = Value> {
    arb_value_inner(4)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Core roundtrip property: decode(encode(v)) == v for any value.
    #[test]
    fn roundtrip_preserves_value(value in arb_value()) {
        let encoded = encode(&value);
        let decoded = decode(&encoded);
        prop_assert_eq!(
            decoded.as_ref(),
            Ok(&value),
            "Roundtrip failed!\n  bencode: {}",
            encoded.escape_ascii()
        );
    }

    /// `encoded_len` predicts the output size exactly.
    #[test]
    fn encoded_len_matches_output(value in arb_value()) {
        prop_assert_eq!(encoded_len(&value), encode(&value).len());
    }

    /// Encoding is a pure function of the value.
    #[test]
    fn encode_is_deterministic(value in arb_value()) {
        prop_assert_eq!(encode(&value), encode(&value));
    }

    /// Zero-copy decoding produces the same tree as copying decoding.
    #[test]
    fn decode_bytes_agrees_with_decode(value in arb_value()) {
        let encoded = Bytes::from(encode(&value));
        let shared = decode_bytes(encoded.clone(), &DecodeOptions::new().max_depth(16)).unwrap();
        prop_assert_eq!(shared, decode(&encoded).unwrap());
    }

    /// Canonicalization sorts every dictionary and survives a roundtrip.
    #[test]
    fn canonical_form_is_stable(value in arb_value()) {
        let canonical = value.into_canonical();
        prop_assert!(canonical.is_canonical());
        let again = decode(&encode(&canonical)).unwrap();
        prop_assert!(again.is_canonical());
        prop_assert_eq!(again, canonical);
    }

    /// Items are self-delimiting: no proper prefix of a document is accepted.
    #[test]
    fn truncated_documents_are_rejected(value in arb_value(), cut in any::<prop::sample::Index>()) {
        let encoded = encode(&value);
        let len = cut.index(encoded.len());
        prop_assert!(decode(&encoded[..len]).is_err());
    }

    /// Appending anything to a document is rejected as trailing data.
    #[test]
    fn extended_documents_are_rejected(value in arb_value(), extra in prop::collection::vec(any::<u8>(), 1..8)) {
        let mut encoded = encode(&value);
        let end = encoded.len();
        encoded.extend_from_slice(&extra);
        let err = decode(&encoded).unwrap_err();
        prop_assert_eq!(err.offset, end);
    }

    /// The decoder never panics, and whatever it accepts is already canonical:
    /// re-encoding reproduces the input byte for byte.
    #[test]
    fn accepted_input_is_canonical(input in prop::collection::vec(
        prop_oneof![
            Just(b'i'), Just(b'l'), Just(b'd'), Just(b'e'), Just(b':'),
            Just(b'-'), Just(b'0'), Just(b'1'), Just(b'2'), any::<u8>(),
        ],
        0..48,
    )) {
        if let Ok(value) = decode(&input) {
            prop_assert_eq!(encode(&value), input);
        }
    }
}
