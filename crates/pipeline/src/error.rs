use thiserror::Error;
use zkv_artifacts::{ArtifactField, LoadError};
use zkv_rpc::NetworkError;
use zkv_sui_types::{KeyError, ParseError, TransactionError};

use crate::CallVariant;

/// Errors in the operator configuration.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("SUI_PRIVATE_KEY is not set")]
    MissingSecret,

    #[error("SUI_PRIVATE_KEY is invalid: {0}")]
    InvalidSecret(#[from] KeyError),

    #[error("invalid {name} package address {value}: {source}")]
    InvalidPackage { name: &'static str, value: String, source: ParseError },

    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

/// Errors that can occur while building a transaction descriptor.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BuildError {
    #[error("{variant} call requires artifact field `{field}`")]
    MissingField { variant: CallVariant, field: ArtifactField },

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Errors that abort a pipeline run.
///
/// Network failures are split by stage: anything up to and including the dry run is a
/// [`PipelineError::DryRun`], and nothing was submitted. A [`PipelineError::Execute`] means a
/// signed transaction was handed to the node.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("dry run failed: {0}")]
    DryRun(NetworkError),

    #[error("execution failed: {0}")]
    Execute(NetworkError),
}
