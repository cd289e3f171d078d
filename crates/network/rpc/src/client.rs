use std::{future::Future, time::Duration};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use tracing::{debug, info, warn};
use zkv_sui_types::{
    GasData, Keypair, SuiAddress, TransactionData, TransactionDescriptor, TransactionDigest,
};

use crate::{
    fetch_gas_coins, fetch_reference_gas_price, retry_operation, select_gas_coins, Coin,
    DryRunResult, EffectsSummary, ExecutionResult, HttpTransport, NetworkError, RetryableRpc,
    RpcTransport, DEFAULT_RETRY_TIMEOUT,
};

/// Returns the reference gas price of the current epoch.
pub const METHOD_GET_REFERENCE_GAS_PRICE: &str = "suix_getReferenceGasPrice";
/// Returns a page of coins owned by an address.
pub const METHOD_GET_COINS: &str = "suix_getCoins";
/// Simulates transaction data without committing it.
pub const METHOD_DRY_RUN: &str = "sui_dryRunTransactionBlock";
/// Submits a signed transaction.
pub const METHOD_EXECUTE: &str = "sui_executeTransactionBlock";

/// Transaction data with sender and gas attached, encoded and ready to be simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTransaction {
    data: TransactionData,
    tx_bytes: String,
    digest: TransactionDigest,
}

impl PreparedTransaction {
    /// Encodes the given transaction data.
    pub fn new(data: TransactionData) -> Result<Self, NetworkError> {
        let bytes = data.to_bytes().map_err(|e| NetworkError::Encode(e.to_string()))?;
        let digest = data.digest().map_err(|e| NetworkError::Encode(e.to_string()))?;
        Ok(Self { tx_bytes: STANDARD.encode(bytes), data, digest })
    }

    /// The transaction data.
    #[must_use]
    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    /// The base64-encoded BCS bytes sent to the node.
    #[must_use]
    pub fn tx_bytes(&self) -> &str {
        &self.tx_bytes
    }

    /// The digest the ledger will assign to the transaction.
    #[must_use]
    pub fn digest(&self) -> TransactionDigest {
        self.digest
    }
}

/// A transaction whose dry run succeeded.
///
/// Values of this type are only produced by [`SuiClient::dry_run`], and
/// [`SuiClient::sign_and_execute`] only accepts this type. A transaction therefore cannot be
/// submitted without a successful dry run of exactly the same bytes.
#[derive(Debug)]
pub struct SimulatedTransaction {
    prepared: PreparedTransaction,
    result: DryRunResult,
}

impl SimulatedTransaction {
    /// The simulated transaction.
    #[must_use]
    pub fn prepared(&self) -> &PreparedTransaction {
        &self.prepared
    }

    /// The dry-run result.
    #[must_use]
    pub fn dry_run_result(&self) -> &DryRunResult {
        &self.result
    }
}

/// A client for the Sui JSON-RPC API.
#[derive(Debug)]
pub struct SuiClient<T> {
    transport: T,
    retry_timeout: Duration,
}

impl SuiClient<HttpTransport> {
    /// Creates a client talking JSON-RPC over HTTP to `url`.
    pub fn connect(url: &str) -> Result<Self, NetworkError> {
        Ok(Self::new(HttpTransport::new(url)?))
    }
}

impl<T: RpcTransport> SuiClient<T> {
    /// Creates a client over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport, retry_timeout: DEFAULT_RETRY_TIMEOUT }
    }

    /// Sets how long read-only requests are retried before giving up.
    #[must_use]
    pub fn retry_timeout(mut self, timeout: Duration) -> Self {
        self.retry_timeout = timeout;
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The address controlled by `keypair`. Derived locally.
    #[allow(clippy::unused_self)]
    pub fn address(&self, keypair: &Keypair) -> SuiAddress {
        keypair.address()
    }

    /// Fetches the reference gas price.
    pub async fn reference_gas_price(&self) -> Result<u64, NetworkError> {
        fetch_reference_gas_price(self).await
    }

    /// Fetches the SUI coins owned by `owner`.
    pub async fn gas_coins(&self, owner: SuiAddress) -> Result<Vec<Coin>, NetworkError> {
        fetch_gas_coins(self, owner).await
    }

    /// Attaches sender, gas price and gas payment to a descriptor.
    pub async fn prepare(
        &self,
        descriptor: &TransactionDescriptor,
        sender: SuiAddress,
        gas_budget: u64,
    ) -> Result<PreparedTransaction, NetworkError> {
        let price = self.reference_gas_price().await?;
        let coins = self.gas_coins(sender).await?;
        let payment = select_gas_coins(&coins, gas_budget)?;
        debug!(price, coins = payment.len(), budget = gas_budget, "selected gas payment");

        let gas_data = GasData { payment, owner: sender, price, budget: gas_budget };
        PreparedTransaction::new(descriptor.to_transaction_data(sender, gas_data))
    }

    /// Simulates a prepared transaction.
    ///
    /// Any rejection by the node, and any failure status in the simulated effects, is returned
    /// as [`NetworkError::Simulation`]. Nothing is committed to the ledger.
    pub async fn dry_run(
        &self,
        prepared: PreparedTransaction,
    ) -> Result<SimulatedTransaction, NetworkError> {
        let params = json!([prepared.tx_bytes()]);
        let value = self
            .with_retry(
                || {
                    let params = params.clone();
                    async move { self.transport.request(METHOD_DRY_RUN, params).await }
                },
                "dry running transaction",
            )
            .await
            .map_err(|e| match e {
                NetworkError::Rpc { message, .. } => NetworkError::Simulation(message),
                other => other,
            })?;

        let result = DryRunResult::from_value(value)?;
        if let Some(reason) = result.effects.failure() {
            return Err(NetworkError::Simulation(reason));
        }
        Ok(SimulatedTransaction { prepared, result })
    }

    /// Signs a simulated transaction and submits it, waiting for local execution.
    ///
    /// The submission is attempted exactly once. If it fails, the error carries the transaction
    /// digest so the operator can check the ledger before deciding to resubmit. If the node
    /// executed the transaction and reported a failure, the error also carries its response.
    pub async fn sign_and_execute(
        &self,
        simulated: SimulatedTransaction,
        keypair: &Keypair,
    ) -> Result<ExecutionResult, NetworkError> {
        let prepared = simulated.prepared;
        let digest = prepared.digest().to_string();
        let broadcast = |reason: String, result: Option<ExecutionResult>| NetworkError::Broadcast {
            digest: digest.clone(),
            reason,
            result: result.map(Box::new),
        };

        if keypair.address() != prepared.data().sender() {
            return Err(NetworkError::Encode(format!(
                "signer {} is not the transaction sender {}",
                keypair.address(),
                prepared.data().sender()
            )));
        }
        let signature = keypair
            .sign_transaction(prepared.data())
            .map_err(|e| NetworkError::Encode(e.to_string()))?;

        info!(digest = %digest, "submitting transaction");
        let params = json!([
            prepared.tx_bytes(),
            [signature.to_base64()],
            { "showEffects": true, "showEvents": true },
            "WaitForLocalExecution"
        ]);
        let value = self.transport.request(METHOD_EXECUTE, params).await.map_err(|e| match e {
            NetworkError::Rpc { message, .. } => broadcast(message, None),
            other => {
                warn!(digest = %digest, "submission outcome unknown, check the ledger");
                broadcast(other.to_string(), None)
            }
        })?;

        let result = ExecutionResult::from_value(value).map_err(|e| {
            warn!(digest = %digest, "unreadable execution response, check the ledger");
            broadcast(e.to_string(), None)
        })?;
        if let Some(reason) = result.effects.as_ref().and_then(EffectsSummary::failure) {
            return Err(broadcast(reason, Some(result)));
        }
        Ok(result)
    }
}

#[async_trait]
impl<T: RpcTransport> RetryableRpc for SuiClient<T> {
    async fn with_retry<'a, R, F, Fut>(
        &'a self,
        operation: F,
        operation_name: &str,
    ) -> Result<R, NetworkError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<R, NetworkError>> + Send,
        R: Send,
    {
        self.with_retry_timeout(operation, self.retry_timeout, operation_name).await
    }

    async fn with_retry_timeout<'a, R, F, Fut>(
        &'a self,
        operation: F,
        timeout: Duration,
        operation_name: &str,
    ) -> Result<R, NetworkError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<R, NetworkError>> + Send,
        R: Send,
    {
        retry_operation(operation, Some(timeout), operation_name).await
    }
}
