//! Stored insight models and repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::transactions::CheckStatus;

/// A generated insight, keyed by address and generation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInsight {
    pub id: Uuid,
    pub address: String,
    pub status: Option<CheckStatus>,
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl WalletInsight {
    pub fn new(address: String, status: Option<CheckStatus>, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            status,
            text,
            generated_at: Utc::now(),
        }
    }
}

/// Insight repository trait
#[async_trait]
pub trait InsightRepository: Send + Sync {
    async fn store(&self, insight: &WalletInsight) -> Result<(), ServiceError>;

    /// Stored insights for an address, newest first
    async fn list_for_address(&self, address: &str) -> Result<Vec<WalletInsight>, ServiceError>;
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryInsightRepository {
    insights: RwLock<HashMap<String, Vec<WalletInsight>>>,
}

impl InMemoryInsightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InsightRepository for InMemoryInsightRepository {
    async fn store(&self, insight: &WalletInsight) -> Result<(), ServiceError> {
        let mut insights = self.insights.write().unwrap();
        insights
            .entry(insight.address.clone())
            .or_default()
            .push(insight.clone());
        Ok(())
    }

    async fn list_for_address(&self, address: &str) -> Result<Vec<WalletInsight>, ServiceError> {
        let insights = self.insights.read().unwrap();
        let mut found = insights.get(address).cloned().unwrap_or_default();
        found.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(found)
    }
}

/// Implementation backed by the remote document store
pub struct HttpInsightRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpInsightRepository {
    pub fn new(base_url: String, timeout: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .map_err(|e| ServiceError::Storage(format!("Failed to create client: {}", e)))?;
        Ok(Self { base_url, client })
    }

    fn collection_url(&self, address: &str) -> String {
        format!("{}/insights/{}", self.base_url.trim_end_matches('/'), address)
    }
}

#[async_trait]
impl InsightRepository for HttpInsightRepository {
    async fn store(&self, insight: &WalletInsight) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.collection_url(&insight.address))
            .json(insight)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Insight store failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Insight store returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn list_for_address(&self, address: &str) -> Result<Vec<WalletInsight>, ServiceError> {
        let response = self
            .client
            .get(self.collection_url(address))
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Insight list failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Insight store returned {}",
                response.status()
            )));
        }

        let mut insights: Vec<WalletInsight> = response
            .json()
            .await
            .map_err(|e| ServiceError::BadUpstream(format!("Malformed insight payload: {}", e)))?;
        insights.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(insights)
    }
}
