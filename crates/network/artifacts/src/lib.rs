//! ZKV Artifacts.
//!
//! Loading of the proof artifacts (verifying key, public inputs and proof points) produced by the
//! external proving toolchain.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![warn(missing_docs)]

mod bytes;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

pub use bytes::decode_encoded_bytes;
use bytes::ByteField;

/// The fields of a proof artifact document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactField {
    /// The serialized verifying key.
    VerifyingKey,
    /// The serialized public inputs.
    PublicInputs,
    /// The serialized proof points.
    ProofPoints,
}

impl ArtifactField {
    /// All fields, in call-argument order.
    pub const ALL: [ArtifactField; 3] =
        [ArtifactField::VerifyingKey, ArtifactField::PublicInputs, ArtifactField::ProofPoints];

    /// The JSON key of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            ArtifactField::VerifyingKey => "vk_bytes",
            ArtifactField::PublicInputs => "public_inputs_bytes",
            ArtifactField::ProofPoints => "proof_points_bytes",
        }
    }
}

impl fmt::Display for ArtifactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors that can occur while loading an artifact.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("failed to read artifact file {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed artifact file {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("artifact file {} is missing required field `{field}`", path.display())]
    MissingField { path: PathBuf, field: ArtifactField },
}

#[derive(Deserialize)]
struct ArtifactDocument {
    #[serde(default)]
    vk_bytes: Option<ByteField>,
    #[serde(default)]
    public_inputs_bytes: Option<ByteField>,
    #[serde(default)]
    proof_points_bytes: Option<ByteField>,
}

/// A proof artifact loaded from disk.
///
/// The verifying key is always present. Public inputs and proof points are present whenever the
/// artifact was loaded with them marked as required, or the file happened to carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofArtifact {
    verifying_key: Vec<u8>,
    public_inputs: Option<Vec<u8>>,
    proof_points: Option<Vec<u8>>,
}

/// The size and hex rendering of one artifact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSummary {
    /// The field.
    pub field: ArtifactField,
    /// The number of bytes in the field.
    pub len: usize,
    /// The hex rendering of the field.
    pub hex: String,
}

impl ProofArtifact {
    /// Creates an artifact from its parts.
    #[must_use]
    pub fn new(
        verifying_key: Vec<u8>,
        public_inputs: Option<Vec<u8>>,
        proof_points: Option<Vec<u8>>,
    ) -> Self {
        Self { verifying_key, public_inputs, proof_points }
    }

    /// Loads an artifact from a JSON file, failing if any of the `required` fields is absent.
    ///
    /// The verifying key is always required. Nothing is returned unless the whole file parses.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, required: &[ArtifactField]) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        debug!(bytes = contents.len(), "read artifact file");
        Self::parse(&contents, path, required)
    }

    /// Parses an artifact from a JSON string.
    pub fn from_json_str(contents: &str, required: &[ArtifactField]) -> Result<Self, LoadError> {
        Self::parse(contents, Path::new("<inline>"), required)
    }

    fn parse(contents: &str, path: &Path, required: &[ArtifactField]) -> Result<Self, LoadError> {
        let document: ArtifactDocument = serde_json::from_str(contents)
            .map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })?;

        let missing = |field| LoadError::MissingField { path: path.to_path_buf(), field };
        let verifying_key =
            document.vk_bytes.ok_or_else(|| missing(ArtifactField::VerifyingKey))?.into_inner();
        let public_inputs = document.public_inputs_bytes.map(ByteField::into_inner);
        let proof_points = document.proof_points_bytes.map(ByteField::into_inner);

        let artifact = Self { verifying_key, public_inputs, proof_points };
        if let Some(field) = required.iter().find(|field| artifact.field(**field).is_none()) {
            return Err(missing(*field));
        }
        Ok(artifact)
    }

    /// The serialized verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> &[u8] {
        &self.verifying_key
    }

    /// The serialized public inputs, if present.
    #[must_use]
    pub fn public_inputs(&self) -> Option<&[u8]> {
        self.public_inputs.as_deref()
    }

    /// The serialized proof points, if present.
    #[must_use]
    pub fn proof_points(&self) -> Option<&[u8]> {
        self.proof_points.as_deref()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, field: ArtifactField) -> Option<&[u8]> {
        match field {
            ArtifactField::VerifyingKey => Some(self.verifying_key()),
            ArtifactField::PublicInputs => self.public_inputs(),
            ArtifactField::ProofPoints => self.proof_points(),
        }
    }

    /// Summarizes the fields that are present, for display.
    #[must_use]
    pub fn summary(&self) -> Vec<FieldSummary> {
        ArtifactField::ALL
            .iter()
            .filter_map(|field| {
                self.field(*field).map(|bytes| FieldSummary {
                    field: *field,
                    len: bytes.len(),
                    hex: hex::encode(bytes),
                })
            })
            .collect()
    }
}
