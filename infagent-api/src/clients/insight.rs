//! Insight-generation client
//!
//! The contract is a prompt in and free text out; there is no schema
//! beyond the string.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;

/// Insight-generation backend
#[async_trait]
pub trait InsightClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: String,
}

/// HTTP implementation against the completion backend
pub struct HttpInsightClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpInsightClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ServiceError::Storage(format!("Failed to create client: {}", e)))?;
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl InsightClient for HttpInsightClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/completions", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(url).json(&json!({ "prompt": prompt }));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Insight generation failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Insight backend returned {}",
                response.status()
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::BadUpstream(format!("Malformed completion payload: {}", e)))?;
        Ok(completion.text)
    }
}

/// In-memory implementation for development and testing; records every
/// prompt it is asked to complete
#[derive(Debug, Default)]
pub struct InMemoryInsightClient {
    response: RwLock<Option<String>>,
    prompts: RwLock<Vec<String>>,
}

impl InMemoryInsightClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(text: &str) -> Self {
        Self {
            response: RwLock::new(Some(text.to_string())),
            prompts: RwLock::new(Vec::new()),
        }
    }

    /// Prompts seen so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl InsightClient for InMemoryInsightClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.write().unwrap().push(prompt.to_string());
        match self.response.read().unwrap().clone() {
            Some(text) => Ok(text),
            None => Err(ServiceError::Upstream("No insight available".to_string())),
        }
    }
}
