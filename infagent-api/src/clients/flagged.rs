//! Flagged-address check client

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::models::transactions::{CheckStatus, RiskLevel};

/// One verdict from the risk backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCheckRecord {
    pub address: String,
    pub status: CheckStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

/// Flagged-address check backend
#[async_trait]
pub trait FlagCheckClient: Send + Sync {
    /// Check a batch of addresses in a single call
    async fn check(&self, addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError>;
}

/// HTTP implementation against the risk backend
pub struct HttpFlagCheckClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFlagCheckClient {
    pub fn new(base_url: String, timeout: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ServiceError::Storage(format!("Failed to create client: {}", e)))?;
        Ok(Self { base_url, client })
    }

    async fn check_once(&self, addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError> {
        let url = format!("{}/check", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&json!({ "addresses": addresses }))
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Flag check failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Flag check backend returned {}",
                response.status()
            )));
        }

        // The backend has been seen returning error objects with a 200;
        // anything but an array is a recoverable bad payload.
        let payload: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::BadUpstream(format!("Unparseable flag check payload: {}", e)))?;
        if !payload.is_array() {
            return Err(ServiceError::BadUpstream(
                "Flag check payload is not an array".to_string(),
            ));
        }

        serde_json::from_value(payload)
            .map_err(|e| ServiceError::BadUpstream(format!("Malformed flag check record: {}", e)))
    }
}

#[async_trait]
impl FlagCheckClient for HttpFlagCheckClient {
    async fn check(&self, addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError> {
        // The check is an idempotent read; retry once on transport failure
        match self.check_once(addresses).await {
            Err(ServiceError::Upstream(first)) => {
                tracing::debug!(error = %first, "retrying flag check");
                self.check_once(addresses).await
            }
            other => other,
        }
    }
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryFlagCheckClient {
    verdicts: RwLock<HashMap<String, AddressCheckRecord>>,
}

impl InMemoryFlagCheckClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an address as flagged
    pub fn flag(&self, address: &str) {
        self.set_verdict(AddressCheckRecord {
            address: address.to_string(),
            status: CheckStatus::Fail,
            description: Some("Associated with malicious activity".to_string()),
            risk_level: Some(RiskLevel::High),
        });
    }

    /// Record an explicit verdict for an address
    pub fn set_verdict(&self, record: AddressCheckRecord) {
        let mut verdicts = self.verdicts.write().unwrap();
        verdicts.insert(record.address.to_ascii_lowercase(), record);
    }
}

#[async_trait]
impl FlagCheckClient for InMemoryFlagCheckClient {
    async fn check(&self, addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError> {
        let verdicts = self.verdicts.read().unwrap();
        Ok(addresses
            .iter()
            .map(|address| {
                verdicts
                    .get(&address.to_ascii_lowercase())
                    .cloned()
                    .unwrap_or_else(|| AddressCheckRecord {
                        address: address.clone(),
                        status: CheckStatus::Pass,
                        description: None,
                        risk_level: None,
                    })
            })
            .collect())
    }
}
