use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{
    de::{self, SeqAccess, Visitor},
    Deserialize, Deserializer,
};
use zkv_utils::{decode_hex, has_hex_prefix};

/// A byte sequence as written in an artifact file: either an array of integers in `0..=255` or an
/// encoded string.
pub(crate) struct ByteField(Vec<u8>);

impl ByteField {
    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

/// Decodes an encoded byte string.
///
/// A `0x` prefix selects hex; anything else must be standard base64.
pub fn decode_encoded_bytes(value: &str) -> Result<Vec<u8>, String> {
    if has_hex_prefix(value) {
        return decode_hex(value).map_err(|e| format!("invalid hex byte string: {e}"));
    }
    STANDARD
        .decode(value.trim())
        .map_err(|e| format!("byte string without 0x prefix is not valid base64: {e}"))
}

struct ByteFieldVisitor;

impl<'de> Visitor<'de> for ByteFieldVisitor {
    type Value = ByteField;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of integers 0-255, a 0x-prefixed hex string or a base64 string")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<u64>()? {
            let byte = u8::try_from(value).map_err(|_| {
                de::Error::invalid_value(de::Unexpected::Unsigned(value), &"an integer 0-255")
            })?;
            bytes.push(byte);
        }
        Ok(ByteField(bytes))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        decode_encoded_bytes(value).map(ByteField).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for ByteField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ByteFieldVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_prefixed_hex() {
        assert_eq!(decode_encoded_bytes("0x010203").unwrap(), vec![1, 2, 3]);
        assert!(decode_encoded_bytes("0x0102z3").is_err());
    }

    #[test]
    fn test_decode_unprefixed_is_base64() {
        // Valid hex characters, but without a prefix the string is base64.
        assert_eq!(decode_encoded_bytes("abcd").unwrap(), vec![0x69, 0xb7, 0x1d]);
        assert_eq!(decode_encoded_bytes("AAAA").unwrap(), vec![0, 0, 0]);
        assert!(decode_encoded_bytes("0xAAA").is_err());
    }

    #[test]
    fn test_decode_base64() {
        assert_eq!(decode_encoded_bytes("AQID").unwrap(), vec![1, 2, 3]);
        assert!(decode_encoded_bytes("!!not-encoded!!").is_err());
    }

    #[test]
    fn test_deserialize_array_and_string() {
        let field: ByteField = serde_json::from_str("[0, 127, 255]").unwrap();
        assert_eq!(field.into_inner(), vec![0, 127, 255]);

        let field: ByteField = serde_json::from_str("\"0xff00\"").unwrap();
        assert_eq!(field.into_inner(), vec![0xff, 0x00]);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_and_wrong_types() {
        assert!(serde_json::from_str::<ByteField>("[256]").is_err());
        assert!(serde_json::from_str::<ByteField>("[-1]").is_err());
        assert!(serde_json::from_str::<ByteField>("[1.5]").is_err());
        assert!(serde_json::from_str::<ByteField>("{}").is_err());
        assert!(serde_json::from_str::<ByteField>("42").is_err());
    }
}
