use std::{fmt, str::FromStr};

use blake2::{digest::consts::U32, Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use zkv_utils::{encode_hex_prefixed, has_hex_prefix, strip_hex_prefix};

/// The length in bytes of a Sui address or object id.
pub const SUI_ADDRESS_LENGTH: usize = 32;

/// The length in bytes of an object or transaction digest.
pub const DIGEST_LENGTH: usize = 32;

/// The version of an object on the ledger.
pub type SequenceNumber = u64;

/// A reference to a specific version of an owned object.
pub type ObjectRef = (ObjectId, SequenceNumber, ObjectDigest);

type Blake2b256 = Blake2b<U32>;

/// Hashes the concatenation of `parts` with Blake2b-256.
#[must_use]
pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Errors that can occur when parsing ledger identifiers from their text form.
#[derive(Debug, Error, PartialEq)]
#[allow(missing_docs)]
pub enum ParseError {
    #[error("address must be 0x-prefixed hex: {0}")]
    MissingPrefix(String),

    #[error("address is longer than {SUI_ADDRESS_LENGTH} bytes: {0}")]
    TooLong(String),

    #[error("invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid base58 digest: {0}")]
    InvalidBase58(#[from] bs58::decode::Error),

    #[error("digest must be {DIGEST_LENGTH} bytes, got {0}")]
    InvalidDigestLength(usize),
}

/// Parses a `0x`-prefixed hex address, left-padding short forms such as `0x2`.
fn parse_address_bytes(value: &str) -> Result<[u8; SUI_ADDRESS_LENGTH], ParseError> {
    if !has_hex_prefix(value) {
        return Err(ParseError::MissingPrefix(value.to_string()));
    }
    let digits = strip_hex_prefix(value);
    if digits.len() > SUI_ADDRESS_LENGTH * 2 {
        return Err(ParseError::TooLong(value.to_string()));
    }
    let padded = format!("{digits:0>width$}", width = SUI_ADDRESS_LENGTH * 2);
    let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
    hex::decode_to_slice(padded, &mut bytes)?;
    Ok(bytes)
}

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name([u8; SUI_ADDRESS_LENGTH]);

        impl $name {
            /// Creates a new value from raw bytes.
            #[must_use]
            pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_address_bytes(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&encode_hex_prefixed(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }
    };
}

address_type!(
    /// The address of an account on the Sui ledger.
    SuiAddress
);

address_type!(
    /// The id of an object (including Move packages) on the Sui ledger.
    ObjectId
);

/// The digest of an object version.
///
/// Encoded in BCS as a length-prefixed byte vector and rendered as base58 in JSON-RPC.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectDigest([u8; DIGEST_LENGTH]);

impl ObjectDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }
}

impl FromStr for ObjectDigest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s).into_vec()?;
        let bytes: [u8; DIGEST_LENGTH] =
            bytes.as_slice().try_into().map_err(|_| ParseError::InvalidDigestLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDigest({self})")
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let bytes: [u8; DIGEST_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            serde::de::Error::custom(ParseError::InvalidDigestLength(bytes.len()))
        })?;
        Ok(Self(bytes))
    }
}

/// The digest of a transaction, rendered as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionDigest([u8; DIGEST_LENGTH]);

impl TransactionDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for TransactionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionDigest({self})")
    }
}
