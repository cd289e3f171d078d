use std::{fmt, path::PathBuf};

use config::{Config, Environment};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;
use zkv_sui_types::ObjectId;
use zkv_utils::LogFormat;

use crate::{
    CallVariant, ConfigError, PipelineConfig, SecretString, DEFAULT_REGISTRATION_PACKAGE,
    DEFAULT_VERIFICATION_PACKAGE,
};

/// The default JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://sui-testnet.nodeinfra.com";

/// The default gas budget in MIST.
pub const DEFAULT_GAS_BUDGET: u64 = 100_000_000;

/// The default base URL for transaction links.
pub const DEFAULT_EXPLORER_URL: &str = "https://suiscan.xyz/testnet/tx";

/// Settings for the submitter, read from `SUI_`-prefixed environment variables.
#[derive(Deserialize)]
pub struct Settings {
    /// The hex-encoded Ed25519 secret used to sign transactions.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub private_key: Option<SecretString>,
    /// The JSON-RPC endpoint.
    pub rpc_url: String,
    /// The package exposing `parse_pvk_from_vk`.
    pub registration_package: String,
    /// The package exposing `verify_proof`.
    pub verification_package: String,
    /// The gas budget in MIST.
    pub gas_budget: u64,
    /// The format for logging.
    pub log_format: LogFormat,
    /// The base URL for transaction links.
    pub explorer_url: String,
}

fn deserialize_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|secret| !secret.trim().is_empty())
        .map(Zeroizing::new))
}

impl Settings {
    /// Create a new Settings instance from environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("SUI"))
    }

    /// Create a new Settings instance from the given environment source.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("rpc_url", DEFAULT_RPC_URL)?
            .set_default("registration_package", DEFAULT_REGISTRATION_PACKAGE)?
            .set_default("verification_package", DEFAULT_VERIFICATION_PACKAGE)?
            .set_default("gas_budget", DEFAULT_GAS_BUDGET.to_string())?
            .set_default("log_format", "Minimal")?
            .set_default("explorer_url", DEFAULT_EXPLORER_URL)?
            .add_source(environment)
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// The configured package for `variant`.
    pub fn package(&self, variant: CallVariant) -> Result<ObjectId, ConfigError> {
        let (name, value) = match variant {
            CallVariant::Registration => ("registration", &self.registration_package),
            CallVariant::Verification => ("verification", &self.verification_package),
        };
        value.parse().map_err(|source| ConfigError::InvalidPackage {
            name,
            value: value.clone(),
            source,
        })
    }

    /// Builds the configuration of a run of `variant`, reading the artifact at `artifact_path`
    /// or at the variant's default location.
    pub fn pipeline_config(
        &self,
        variant: CallVariant,
        artifact_path: Option<PathBuf>,
    ) -> Result<PipelineConfig, ConfigError> {
        Ok(PipelineConfig {
            variant,
            artifact_path: artifact_path
                .unwrap_or_else(|| PathBuf::from(variant.default_artifact_path())),
            package: self.package(variant)?,
            gas_budget: self.gas_budget,
        })
    }

    /// The explorer link for a transaction digest.
    #[must_use]
    pub fn explorer_link(&self, digest: &str) -> String {
        format!("{}/{digest}", self.explorer_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("rpc_url", &self.rpc_url)
            .field("registration_package", &self.registration_package)
            .field("verification_package", &self.verification_package)
            .field("gas_budget", &self.gas_budget)
            .field("log_format", &self.log_format)
            .field("explorer_url", &self.explorer_url)
            .finish()
    }
}
