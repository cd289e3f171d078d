use std::{fmt, path::PathBuf};

use tracing::{error, info};
use zkv_artifacts::ProofArtifact;
use zkv_rpc::{DryRunResult, ExecutionResult, RpcTransport, SuiClient};
use zkv_sui_types::{ObjectId, SuiAddress, TransactionDescriptor, TransactionDigest};

use crate::{build, keypair_from_secret, CallVariant, PipelineError, SecretString};

const PIPELINE_TAG: &str = "\x1b[34m[Pipeline]\x1b[0m";

/// The configuration of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// The call to submit.
    pub variant: CallVariant,
    /// The artifact file to read.
    pub artifact_path: PathBuf,
    /// The package exposing the entry point.
    pub package: ObjectId,
    /// The gas budget in MIST.
    pub gas_budget: u64,
}

/// The stages of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Stage {
    Idle,
    ArtifactLoaded,
    KeypairReady,
    TransactionBuilt,
    DryRunPassed,
    Executed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ArtifactLoaded => "artifact loaded",
            Stage::KeypairReady => "keypair ready",
            Stage::TransactionBuilt => "transaction built",
            Stage::DryRunPassed => "dry run passed",
            Stage::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    /// The call that was submitted.
    pub variant: CallVariant,
    /// The loaded artifact.
    pub artifact: ProofArtifact,
    /// The sender address.
    pub address: SuiAddress,
    /// The Move call.
    pub descriptor: TransactionDescriptor,
    /// The digest of the dry-run transaction.
    pub digest: TransactionDigest,
    /// The dry-run result.
    pub dry_run: DryRunResult,
    /// The execution result, as returned by the node. Only set for variants that execute.
    pub execution: Option<ExecutionResult>,
}

/// Runs load, derive, build, dry run and (for the verification variant) execute, in order.
///
/// The first failure aborts the run. Nothing is submitted unless the dry run of the same
/// transaction passed.
#[derive(Debug)]
pub struct Pipeline<T> {
    client: SuiClient<T>,
    config: PipelineConfig,
}

impl<T: RpcTransport> Pipeline<T> {
    /// Create a new [`Pipeline`].
    pub fn new(client: SuiClient<T>, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// The network client.
    pub fn client(&self) -> &SuiClient<T> {
        &self.client
    }

    /// The run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline once, signing with `secret` if the variant executes.
    pub async fn run(&self, secret: Option<&SecretString>) -> Result<RunReport, PipelineError> {
        let mut stage = Stage::Idle;
        let result = self.run_stages(secret, &mut stage).await;
        if let Err(e) = &result {
            error!(stage = %stage, variant = %self.config.variant, "{PIPELINE_TAG} Aborted: {e}");
        }
        result
    }

    async fn run_stages(
        &self,
        secret: Option<&SecretString>,
        stage: &mut Stage,
    ) -> Result<RunReport, PipelineError> {
        let variant = self.config.variant;

        // Load the artifact.
        let artifact =
            ProofArtifact::load(&self.config.artifact_path, variant.required_fields())?;
        *stage = Stage::ArtifactLoaded;
        info!(
            path = %self.config.artifact_path.display(),
            vk_len = artifact.verifying_key().len(),
            "{PIPELINE_TAG} Loaded artifact."
        );

        // Derive the keypair.
        let keypair = keypair_from_secret(secret)?;
        let address = self.client.address(&keypair);
        *stage = Stage::KeypairReady;
        info!(address = %address, "{PIPELINE_TAG} Derived keypair.");

        // Build the call.
        let descriptor = build(variant, self.config.package, &artifact)?;
        *stage = Stage::TransactionBuilt;
        info!(
            target = %descriptor.target(),
            arguments = descriptor.arguments().len(),
            "{PIPELINE_TAG} Built transaction."
        );

        // Dry run.
        let prepared = self
            .client
            .prepare(&descriptor, address, self.config.gas_budget)
            .await
            .map_err(PipelineError::DryRun)?;
        let digest = prepared.digest();
        let simulated = self.client.dry_run(prepared).await.map_err(PipelineError::DryRun)?;
        let dry_run = simulated.dry_run_result().clone();
        *stage = Stage::DryRunPassed;
        info!(
            digest = %digest,
            computation_cost = dry_run.effects.gas_used.computation_cost,
            net_gas_usage = %dry_run.effects.gas_used.net_gas_usage(),
            "{PIPELINE_TAG} Dry run passed."
        );

        if !variant.executes() {
            info!(variant = %variant, "{PIPELINE_TAG} Dry run only, not executing.");
            return Ok(RunReport {
                variant,
                artifact,
                address,
                descriptor,
                digest,
                dry_run,
                execution: None,
            });
        }

        // Sign and execute.
        let execution = self
            .client
            .sign_and_execute(simulated, &keypair)
            .await
            .map_err(PipelineError::Execute)?;
        *stage = Stage::Executed;
        info!(digest = %execution.digest, "{PIPELINE_TAG} Executed transaction.");

        Ok(RunReport {
            variant,
            artifact,
            address,
            descriptor,
            digest,
            dry_run,
            execution: Some(execution),
        })
    }
}
