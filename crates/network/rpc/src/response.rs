//! Typed views over JSON-RPC results.
//!
//! Only the parts of a response the client acts on are typed. The full response is kept as raw
//! JSON so callers can report it unmodified.

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use zkv_sui_types::{ObjectDigest, ObjectId, ObjectRef};

use crate::NetworkError;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// Deserializes a `u64` that the node may render either as a JSON string or number.
pub(crate) fn u64_from_str_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<u64, D::Error> {
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.parse().map_err(de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
}

/// Parses the result of `suix_getReferenceGasPrice`.
pub fn parse_gas_price(value: Value) -> Result<u64, NetworkError> {
    #[derive(Deserialize)]
    struct GasPrice(#[serde(deserialize_with = "u64_from_str_or_number")] u64);

    serde_json::from_value::<GasPrice>(value)
        .map(|price| price.0)
        .map_err(|e| NetworkError::invalid_response("suix_getReferenceGasPrice", e))
}

/// A coin owned by the sender.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// The coin object.
    #[serde(deserialize_with = "from_str")]
    pub coin_object_id: ObjectId,
    /// The object version.
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub version: u64,
    /// The object digest.
    #[serde(deserialize_with = "from_str")]
    pub digest: ObjectDigest,
    /// The balance in MIST.
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub balance: u64,
}

impl Coin {
    /// The object reference used to pay for gas.
    #[must_use]
    pub fn object_ref(&self) -> ObjectRef {
        (self.coin_object_id, self.version, self.digest)
    }
}

/// One page of `suix_getCoins`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    /// The coins on this page.
    pub data: Vec<Coin>,
    /// The cursor of the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether another page follows.
    #[serde(default)]
    pub has_next_page: bool,
}

/// The execution status reported in transaction effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum StatusKind {
    Success,
    Failure,
}

/// The status block of transaction effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    /// Success or failure.
    pub status: StatusKind,
    /// The failure reason, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Gas charged for a transaction, in MIST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct GasCostSummary {
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub computation_cost: u64,
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub storage_cost: u64,
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub storage_rebate: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_number")]
    pub non_refundable_storage_fee: u64,
}

impl GasCostSummary {
    /// Computation plus storage, minus the storage rebate.
    #[must_use]
    pub fn net_gas_usage(&self) -> i128 {
        i128::from(self.computation_cost) + i128::from(self.storage_cost)
            - i128::from(self.storage_rebate)
    }
}

/// The parts of transaction effects the client inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsSummary {
    /// The execution status.
    pub status: ExecutionStatus,
    /// The gas charged.
    pub gas_used: GasCostSummary,
}

impl EffectsSummary {
    /// The failure reason, if the effects report a failure.
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        match self.status.status {
            StatusKind::Success => None,
            StatusKind::Failure => Some(
                self.status.error.clone().unwrap_or_else(|| "unknown failure".to_string()),
            ),
        }
    }
}

/// The result of a dry run.
#[derive(Debug, Clone, PartialEq)]
pub struct DryRunResult {
    /// The simulated effects.
    pub effects: EffectsSummary,
    /// The full response as returned by the node.
    pub raw: Value,
}

impl DryRunResult {
    /// Parses the result of `sui_dryRunTransactionBlock`.
    pub fn from_value(raw: Value) -> Result<Self, NetworkError> {
        let method = "sui_dryRunTransactionBlock";
        let effects = raw
            .get("effects")
            .cloned()
            .ok_or_else(|| NetworkError::invalid_response(method, "missing effects"))?;
        let effects = serde_json::from_value(effects)
            .map_err(|e| NetworkError::invalid_response(method, e))?;
        Ok(Self { effects, raw })
    }
}

/// The result of executing a signed transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// The digest assigned by the ledger.
    pub digest: String,
    /// The effects, if the node returned them.
    pub effects: Option<EffectsSummary>,
    /// The full response as returned by the node.
    pub raw: Value,
}

impl ExecutionResult {
    /// Parses the result of `sui_executeTransactionBlock`.
    pub fn from_value(raw: Value) -> Result<Self, NetworkError> {
        let method = "sui_executeTransactionBlock";
        let digest = raw
            .get("digest")
            .and_then(Value::as_str)
            .ok_or_else(|| NetworkError::invalid_response(method, "missing digest"))?
            .to_string();
        let effects = match raw.get("effects") {
            Some(effects) if !effects.is_null() => Some(
                serde_json::from_value(effects.clone())
                    .map_err(|e| NetworkError::invalid_response(method, e))?,
            ),
            _ => None,
        };
        Ok(Self { digest, effects, raw })
    }
}
