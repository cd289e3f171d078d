use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::NetworkError;

/// A transport that can send a JSON-RPC request and return its `result`.
///
/// Implementations resolve the JSON-RPC envelope: an `error` member becomes
/// [`NetworkError::Rpc`], a non-success HTTP status becomes [`NetworkError::Http`].
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Sends `method` with positional `params` and returns the `result` member of the response.
    async fn request(&self, method: &str, params: Value) -> Result<Value, NetworkError>;
}

/// Build an HTTP client with appropriate timeouts and keep-alive settings.
pub fn configure_client() -> Result<Client, NetworkError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(15))
        .pool_idle_timeout(Duration::from_secs(15))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .build()?)
}

/// A JSON-RPC 2.0 transport over HTTP.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Creates a transport for the given endpoint.
    pub fn new(url: &str) -> Result<Self, NetworkError> {
        let parsed = Url::parse(url)
            .map_err(|e| NetworkError::InvalidUrl { url: url.to_string(), reason: e.to_string() })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Ok(Self { client: configure_client()?, url: parsed, next_id: AtomicU64::new(1) })
    }

    /// The endpoint this transport talks to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    fn into_result(self, method: &str) -> Result<Value, NetworkError> {
        if let Some(error) = self.error {
            return Err(NetworkError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }
        self.result.ok_or_else(|| NetworkError::invalid_response(method, "missing result"))
    }
}

/// Resolves a raw JSON-RPC response body.
pub fn parse_response(method: &str, body: &str) -> Result<Value, NetworkError> {
    let response: JsonRpcResponse =
        serde_json::from_str(body).map_err(|e| NetworkError::invalid_response(method, e))?;
    response.into_result(method)
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, NetworkError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        debug!(method, id, "sending rpc request");

        let response = self.client.post(self.url.clone()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(NetworkError::Http { status: status.as_u16(), body: text });
        }
        parse_response(method, &text)
    }
}
