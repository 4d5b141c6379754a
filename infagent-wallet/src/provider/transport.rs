//! Provider transport
//!
//! The only methods ever sent are `eth_requestAccounts`,
//! `wallet_requestPermissions` and `personal_sign`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// Transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Provider endpoint URL
    pub url: String,
    /// API key (if required)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// A channel to a wallet provider, per the standard Ethereum provider
/// convention
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    /// Submit a single provider request and return its result payload
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

/// JSON-RPC 2.0 transport over HTTP
pub struct RpcTransport {
    config: TransportConfig,
    client: reqwest::Client,
}

impl RpcTransport {
    /// Create a new transport for the configured endpoint
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Network(format!("Failed to create provider transport: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The endpoint this transport talks to
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl ProviderTransport for RpcTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let mut request = self.client.post(&self.config.url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Provider request failed: {}", e)))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Invalid provider response: {}", e)))?;

        if let Some(error) = payload.get("error") {
            return Err(Error::Provider(error.to_string()));
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| Error::Provider("Provider response missing result".to_string()))
    }
}
