use std::fmt;

use zkv_artifacts::ArtifactField;

/// The Move module exposing both entry points.
pub const VERIFIER_MODULE: &str = "verifier";

/// The deployed package exposing `parse_pvk_from_vk`.
pub const DEFAULT_REGISTRATION_PACKAGE: &str =
    "0x550b6cc5e577fdab7b3a65e6e6beaef5594488ff13bb3c67b929d86059b0a15f";

/// The deployed package exposing `verify_proof`.
pub const DEFAULT_VERIFICATION_PACKAGE: &str =
    "0xd0cb8699235e0785e6aba7b19e1065efbd359eea0ed702dc68228ecbda3de3e0";

/// The call a run submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallVariant {
    /// Prepares a verifying key on chain. Dry-run only.
    Registration,
    /// Verifies a proof against a verifying key. Dry-run, then executed.
    Verification,
}

impl CallVariant {
    /// The Move function called by this variant.
    #[must_use]
    pub const fn entry_point(self) -> &'static str {
        match self {
            CallVariant::Registration => "parse_pvk_from_vk",
            CallVariant::Verification => "verify_proof",
        }
    }

    /// The artifact fields passed as call arguments, in order.
    #[must_use]
    pub const fn required_fields(self) -> &'static [ArtifactField] {
        match self {
            CallVariant::Registration => &[ArtifactField::VerifyingKey],
            CallVariant::Verification => &ArtifactField::ALL,
        }
    }

    /// Whether a passed dry run is followed by signing and execution.
    #[must_use]
    pub const fn executes(self) -> bool {
        matches!(self, CallVariant::Verification)
    }

    /// Where the proving toolchain writes the artifact for this variant.
    #[must_use]
    pub const fn default_artifact_path(self) -> &'static str {
        match self {
            CallVariant::Registration => "../utils/output_data.json",
            CallVariant::Verification => "../prover/output_data.json",
        }
    }
}

impl fmt::Display for CallVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallVariant::Registration => f.write_str("registration"),
            CallVariant::Verification => f.write_str("verification"),
        }
    }
}
