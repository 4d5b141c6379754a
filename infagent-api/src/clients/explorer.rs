//! Block-explorer client: transaction history and summaries

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ServiceError;
use crate::models::transactions::TransactionSummary;

/// A transaction row exactly as the explorer returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub hash: String,
    /// Epoch seconds, as a decimal string on the wire
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    pub from: String,
    pub to: String,
    /// Wei-denominated decimal string
    pub value: String,
}

/// Convert a wei-denominated decimal string to the asset quantity
/// (divide by 10^18). Returns `None` for unparseable or out-of-range
/// values.
pub fn wei_to_eth(value: &str) -> Option<Decimal> {
    let wei: i128 = value.parse().ok()?;
    Decimal::try_from_i128_with_scale(wei, 18).ok()
}

/// Transaction history backend
#[async_trait]
pub trait TransactionHistoryClient: Send + Sync {
    /// Ordered transaction history for an address. Pagination happens on
    /// the backend; the client never re-pages.
    async fn history(&self, address: &str) -> Result<Vec<RawTransaction>, ServiceError>;

    /// Aggregate summary for an address
    async fn summary(&self, address: &str) -> Result<TransactionSummary, ServiceError>;
}

/// HTTP implementation against the block-explorer backend
pub struct HttpExplorerClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpExplorerClient {
    pub fn new(base_url: String, timeout: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ServiceError::Storage(format!("Failed to create client: {}", e)))?;
        Ok(Self { base_url, client })
    }

    async fn history_once(&self, address: &str) -> Result<Vec<RawTransaction>, ServiceError> {
        let url = format!("{}/transactions/{}", self.base_url.trim_end_matches('/'), address);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("History fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Explorer backend returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::BadUpstream(format!("Malformed history payload: {}", e)))
    }
}

#[async_trait]
impl TransactionHistoryClient for HttpExplorerClient {
    async fn history(&self, address: &str) -> Result<Vec<RawTransaction>, ServiceError> {
        // Idempotent read; retry once on transport failure
        match self.history_once(address).await {
            Err(ServiceError::Upstream(first)) => {
                tracing::debug!(error = %first, "retrying history fetch");
                self.history_once(address).await
            }
            other => other,
        }
    }

    async fn summary(&self, address: &str) -> Result<TransactionSummary, ServiceError> {
        let url = format!("{}/summary", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&json!({ "address": address }))
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Summary fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Explorer backend returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::BadUpstream(format!("Malformed summary payload: {}", e)))
    }
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryExplorerClient {
    histories: RwLock<HashMap<String, Vec<RawTransaction>>>,
    summaries: RwLock<HashMap<String, TransactionSummary>>,
}

impl InMemoryExplorerClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_history(&self, address: &str, history: Vec<RawTransaction>) {
        let mut histories = self.histories.write().unwrap();
        histories.insert(address.to_ascii_lowercase(), history);
    }

    pub fn set_summary(&self, address: &str, summary: TransactionSummary) {
        let mut summaries = self.summaries.write().unwrap();
        summaries.insert(address.to_ascii_lowercase(), summary);
    }
}

#[async_trait]
impl TransactionHistoryClient for InMemoryExplorerClient {
    async fn history(&self, address: &str) -> Result<Vec<RawTransaction>, ServiceError> {
        let histories = self.histories.read().unwrap();
        Ok(histories
            .get(&address.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn summary(&self, address: &str) -> Result<TransactionSummary, ServiceError> {
        let summaries = self.summaries.read().unwrap();
        summaries
            .get(&address.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("No summary for {}", address)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wei_to_eth() {
        // 1 ETH
        assert_eq!(wei_to_eth("1000000000000000000").unwrap(), Decimal::new(1, 0));
        // 0.5 ETH
        assert_eq!(wei_to_eth("500000000000000000").unwrap(), Decimal::new(5, 1));
        // No float drift on small quantities
        assert_eq!(wei_to_eth("1").unwrap().to_string(), "0.000000000000000001");
        assert_eq!(wei_to_eth("0").unwrap(), Decimal::ZERO);

        assert!(wei_to_eth("not-a-number").is_none());
        assert!(wei_to_eth("").is_none());
    }

    #[test]
    fn test_raw_transaction_wire_names() {
        let row: RawTransaction = serde_json::from_value(serde_json::json!({
            "hash": "0xabc",
            "timeStamp": "1700000000",
            "from": "0x742d35cc6634c0532925a3b844bc454e4438f44e",
            "to": "0x53d284357ec70ce289d6d64134dfac8e511c8a3d",
            "value": "1000000000000000000",
        }))
        .unwrap();

        assert_eq!(row.time_stamp, "1700000000");
    }
}
