#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use zkv_pipeline::{
    CallVariant, Pipeline, PipelineConfig, SecretString, DEFAULT_REGISTRATION_PACKAGE,
    DEFAULT_VERIFICATION_PACKAGE,
};
use zkv_rpc::{NetworkError, RpcTransport, SuiClient};
use zkv_sui_types::ObjectDigest;

pub const GAS_BUDGET: u64 = 100_000_000;

pub fn secret() -> SecretString {
    SecretString::new("0x2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a".to_string())
}

/// Writes `contents` to a unique file under the system temp directory.
pub fn write_artifact(contents: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let name = format!(
        "zkv-pipeline-{}-{}.json",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    let path = std::env::temp_dir().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Value),
    Rpc(i64, String),
}

#[derive(Default)]
struct State {
    replies: HashMap<String, VecDeque<Reply>>,
    calls: Vec<(String, Value)>,
}

/// A transport that answers from canned replies and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn reply(self, method: &str, reply: Reply) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|(m, _)| m == method).count()
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, NetworkError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((method.to_string(), params));
        let queue = state
            .replies
            .get_mut(method)
            .unwrap_or_else(|| panic!("unexpected request {method}"));
        let reply = if queue.len() > 1 { queue.pop_front().unwrap() } else { queue[0].clone() };
        match reply {
            Reply::Ok(value) => Ok(value),
            Reply::Rpc(code, message) => Err(NetworkError::Rpc { code, message, data: None }),
        }
    }
}

fn effects(status: &str, error: Option<&str>) -> Value {
    let mut status = json!({ "status": status });
    if let Some(error) = error {
        status["error"] = json!(error);
    }
    json!({
        "status": status,
        "gasUsed": {
            "computationCost": "750000",
            "storageCost": "1976000",
            "storageRebate": "978120",
            "nonRefundableStorageFee": "9880"
        }
    })
}

pub fn dry_run_success() -> Value {
    json!({ "effects": effects("success", None), "events": [] })
}

pub fn dry_run_failure(error: &str) -> Value {
    json!({ "effects": effects("failure", Some(error)), "events": [] })
}

pub fn execution_success() -> Value {
    json!({
        "digest": "3s9vXjRkX1ThR7VmgMjb2mD9wYq4p6hBvGvXU3hPdU5t",
        "effects": effects("success", None),
        "events": [{ "type": "verifier::ProofVerified", "parsedJson": { "valid": true } }],
        "confirmedLocalExecution": true
    })
}

/// A transport with a gas price, one funded coin and a passing dry run.
pub fn funded_transport() -> MockTransport {
    let coin = json!({
        "coinType": "0x2::sui::SUI",
        "coinObjectId": "0x77",
        "version": "3",
        "digest": ObjectDigest::new([3u8; 32]).to_string(),
        "balance": "1000000000"
    });
    MockTransport::default()
        .reply("suix_getReferenceGasPrice", Reply::Ok(json!("1000")))
        .reply(
            "suix_getCoins",
            Reply::Ok(json!({ "data": [coin], "nextCursor": null, "hasNextPage": false })),
        )
}

pub fn pipeline(
    transport: MockTransport,
    variant: CallVariant,
    artifact_path: PathBuf,
) -> Pipeline<MockTransport> {
    let package = match variant {
        CallVariant::Registration => DEFAULT_REGISTRATION_PACKAGE,
        CallVariant::Verification => DEFAULT_VERIFICATION_PACKAGE,
    };
    let config = PipelineConfig {
        variant,
        artifact_path,
        package: package.parse().unwrap(),
        gas_budget: GAS_BUDGET,
    };
    Pipeline::new(SuiClient::new(transport).retry_timeout(Duration::from_millis(100)), config)
}
