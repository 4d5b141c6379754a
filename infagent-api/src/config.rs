//! Backend configuration
//!
//! Collaborator endpoints and server settings, read from the environment
//! with workable defaults.

/// Configuration for the API server and its external collaborators
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Flagged-address check backend
    pub flag_check_url: String,
    /// Block-explorer backend (transaction history and summaries)
    pub explorer_url: String,
    /// Insight-generation backend
    pub insight_url: String,
    /// API key for the insight backend, if required
    pub insight_api_key: Option<String>,
    /// Remote document store holding per-user preferences and stored
    /// insights
    pub document_store_url: String,
    /// Wallet provider bridge endpoints; a provider without an endpoint
    /// is simply not available in this deployment
    pub metamask_bridge_url: Option<String>,
    pub coinbase_bridge_url: Option<String>,
    /// Timeout applied to every outbound request, in seconds
    pub request_timeout: u64,
}

impl BackendConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("INFAGENT_BIND_ADDRESS")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            flag_check_url: std::env::var("FLAG_CHECK_URL")
                .unwrap_or_else(|_| "http://localhost:9101".to_string()),
            explorer_url: std::env::var("EXPLORER_URL")
                .unwrap_or_else(|_| "http://localhost:9102".to_string()),
            insight_url: std::env::var("INSIGHT_URL")
                .unwrap_or_else(|_| "http://localhost:9103".to_string()),
            insight_api_key: std::env::var("INSIGHT_API_KEY").ok(),
            document_store_url: std::env::var("DOCUMENT_STORE_URL")
                .unwrap_or_else(|_| "http://localhost:9104".to_string()),
            metamask_bridge_url: std::env::var("METAMASK_BRIDGE_URL").ok(),
            coinbase_bridge_url: std::env::var("COINBASE_BRIDGE_URL").ok(),
            request_timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
