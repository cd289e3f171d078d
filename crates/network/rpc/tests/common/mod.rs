#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{json, Value};
use zkv_rpc::{NetworkError, RpcTransport};
use zkv_sui_types::{derive_keypair, Keypair, ObjectDigest};

pub const SECRET: &str = "0x4242424242424242424242424242424242424242424242424242424242424242";

pub fn keypair() -> Keypair {
    derive_keypair(SECRET).unwrap()
}

/// A canned reply to one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Value),
    Rpc(i64, String),
    Http(u16),
}

impl Reply {
    fn into_result(self) -> Result<Value, NetworkError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Rpc(code, message) => Err(NetworkError::Rpc { code, message, data: None }),
            Reply::Http(status) => Err(NetworkError::Http { status, body: String::new() }),
        }
    }
}

#[derive(Default)]
struct State {
    replies: HashMap<String, VecDeque<Reply>>,
    calls: Vec<(String, Value)>,
}

/// A transport that answers from canned replies and records every request.
///
/// Replies for a method are consumed in order; the last one is repeated.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

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
        reply.into_result()
    }
}

pub fn coin_page(balances: &[u64], next_cursor: Option<&str>) -> Value {
    let data: Vec<Value> = balances
        .iter()
        .enumerate()
        .map(|(i, balance)| {
            let id = u8::try_from(i + 1).unwrap();
            json!({
                "coinType": "0x2::sui::SUI",
                "coinObjectId": format!("0x{id:x}"),
                "version": id.to_string(),
                "digest": ObjectDigest::new([id; 32]).to_string(),
                "balance": balance.to_string(),
            })
        })
        .collect();
    json!({ "data": data, "nextCursor": next_cursor, "hasNextPage": next_cursor.is_some() })
}

pub fn effects(status: &str, error: Option<&str>) -> Value {
    let mut status = json!({ "status": status });
    if let Some(error) = error {
        status["error"] = json!(error);
    }
    json!({
        "status": status,
        "gasUsed": {
            "computationCost": "1000000",
            "storageCost": "1976000",
            "storageRebate": "978120",
            "nonRefundableStorageFee": "9880"
        }
    })
}

pub fn dry_run_success() -> Value {
    json!({ "effects": effects("success", None), "events": [], "balanceChanges": [] })
}

pub fn dry_run_failure(error: &str) -> Value {
    json!({ "effects": effects("failure", Some(error)), "events": [] })
}

pub fn execution_success(digest: &str) -> Value {
    json!({
        "digest": digest,
        "effects": effects("success", None),
        "events": [],
        "confirmedLocalExecution": true
    })
}

/// A transport with a gas price and one well-funded coin.
pub fn funded_transport() -> MockTransport {
    MockTransport::new()
        .reply("suix_getReferenceGasPrice", Reply::Ok(json!("1000")))
        .reply("suix_getCoins", Reply::Ok(coin_page(&[5_000_000_000], None)))
}
