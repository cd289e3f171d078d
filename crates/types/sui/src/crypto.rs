use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;
use zeroize::Zeroizing;
use zkv_utils::decode_hex;

use crate::{blake2b256, SuiAddress, TransactionData};

/// The length in bytes of an Ed25519 secret key.
pub const SECRET_KEY_LENGTH: usize = 32;

/// The signature scheme flag for Ed25519.
pub const ED25519_FLAG: u8 = 0x00;

/// The length of a serialized Ed25519 signature: flag, signature and public key.
pub const SERIALIZED_SIGNATURE_LENGTH: usize = 1 + 64 + 32;

/// Errors that can occur when deriving or using key material.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum KeyError {
    #[error("secret key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("secret key must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("failed to encode transaction for signing: {0}")]
    Encode(#[from] bcs::Error),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// An Ed25519 keypair used to sign transactions.
///
/// The secret is zeroized when the keypair is dropped and is never printed.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Creates a keypair from a raw 32-byte secret.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, KeyError> {
        let seed: Zeroizing<[u8; SECRET_KEY_LENGTH]> =
            Zeroizing::new(secret.try_into().map_err(|_| KeyError::InvalidLength {
                expected: SECRET_KEY_LENGTH,
                actual: secret.len(),
            })?);
        Ok(Self { signing_key: SigningKey::from_bytes(&seed) })
    }

    /// The raw Ed25519 public key.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The address controlled by this keypair: `blake2b256(flag || public_key)`.
    #[must_use]
    pub fn address(&self) -> SuiAddress {
        SuiAddress::new(blake2b256(&[&[ED25519_FLAG][..], &self.public_key()[..]]))
    }

    /// Signs the intent message of the given transaction data.
    pub fn sign_transaction(&self, data: &TransactionData) -> Result<SuiSignature, KeyError> {
        let digest = data.signing_digest()?;
        let signature = self.signing_key.sign(&digest);

        let mut bytes = Vec::with_capacity(SERIALIZED_SIGNATURE_LENGTH);
        bytes.push(ED25519_FLAG);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.extend_from_slice(&self.public_key());
        Ok(SuiSignature(bytes))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair").field("address", &self.address()).finish_non_exhaustive()
    }
}

/// Derives a keypair from a hex-encoded secret, optionally `0x`-prefixed.
///
/// The same secret always yields the same keypair and address.
pub fn derive_keypair(secret_hex: &str) -> Result<Keypair, KeyError> {
    let secret = Zeroizing::new(decode_hex(secret_hex)?);
    Keypair::from_secret_bytes(&secret)
}

/// A serialized signature: `flag || signature || public_key`.
#[derive(Clone, PartialEq, Eq)]
pub struct SuiSignature(Vec<u8>);

impl SuiSignature {
    /// The raw serialized bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The base64 form expected by the JSON-RPC API.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// The address of the embedded public key.
    #[must_use]
    pub fn signer(&self) -> SuiAddress {
        SuiAddress::new(blake2b256(&[&self.0[..1], &self.0[65..]]))
    }

    /// Verifies the signature against the given transaction data.
    pub fn verify(&self, data: &TransactionData) -> Result<(), KeyError> {
        if self.0.len() != SERIALIZED_SIGNATURE_LENGTH || self.0[0] != ED25519_FLAG {
            return Err(KeyError::InvalidSignature("unexpected layout".to_string()));
        }
        let signature = Signature::from_slice(&self.0[1..65])
            .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
        let public_key: [u8; 32] = self.0[65..]
            .try_into()
            .map_err(|_| KeyError::InvalidSignature("bad public key length".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&public_key)
            .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
        verifying_key
            .verify(&data.signing_digest()?, &signature)
            .map_err(|e| KeyError::InvalidSignature(e.to_string()))
    }
}

impl fmt::Debug for SuiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiSignature({})", self.to_base64())
    }
}
