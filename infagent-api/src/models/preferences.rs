//! Notification preference models and repository

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Per-address monitoring toggles. The default has every toggle off,
/// which is what a first-time user gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub general_updates: bool,
    pub security_alerts: bool,
    pub wallet_sync: bool,
}

/// The per-user document held in the remote preference store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredWallet {
    pub preferences: NotificationPreferences,
    #[serde(default)]
    pub wallet_address: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for MonitoredWallet {
    fn default() -> Self {
        Self {
            preferences: NotificationPreferences::default(),
            wallet_address: None,
            updated_at: Utc::now(),
        }
    }
}

/// Preference repository trait.
///
/// Writes are full-overwrite: last writer wins, no merge and no
/// concurrency control.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Load the user's document; `None` for a first-time user
    async fn load(&self, user_id: &str) -> Result<Option<MonitoredWallet>, ServiceError>;

    /// Overwrite the user's document
    async fn save(&self, user_id: &str, document: &MonitoredWallet) -> Result<(), ServiceError>;
}

/// In-memory implementation for development and testing
#[derive(Debug, Default)]
pub struct InMemoryPreferenceRepository {
    documents: RwLock<HashMap<String, MonitoredWallet>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryPreferenceRepository {
    async fn load(&self, user_id: &str) -> Result<Option<MonitoredWallet>, ServiceError> {
        let documents = self.documents.read().unwrap();
        Ok(documents.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, document: &MonitoredWallet) -> Result<(), ServiceError> {
        let mut documents = self.documents.write().unwrap();
        documents.insert(user_id.to_string(), document.clone());
        Ok(())
    }
}

/// Implementation backed by the remote per-user document store
pub struct HttpPreferenceRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPreferenceRepository {
    pub fn new(base_url: String, timeout: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ServiceError::Storage(format!("Failed to create client: {}", e)))?;
        Ok(Self { base_url, client })
    }

    fn document_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/preferences", self.base_url.trim_end_matches('/'), user_id)
    }
}

#[async_trait]
impl PreferenceRepository for HttpPreferenceRepository {
    async fn load(&self, user_id: &str) -> Result<Option<MonitoredWallet>, ServiceError> {
        let response = self
            .client
            .get(self.document_url(user_id))
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Preference load failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Preference store returned {}",
                response.status()
            )));
        }

        let document = response
            .json()
            .await
            .map_err(|e| ServiceError::BadUpstream(format!("Malformed preference document: {}", e)))?;
        Ok(Some(document))
    }

    async fn save(&self, user_id: &str, document: &MonitoredWallet) -> Result<(), ServiceError> {
        let response = self
            .client
            .put(self.document_url(user_id))
            .json(document)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Preference save failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Preference store returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
