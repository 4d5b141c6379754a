//! Application state management

use std::sync::Arc;

use infagent_wallet::account::ProviderKind;
use infagent_wallet::provider::{ProviderDirectory, TransportConfig};

use crate::clients::explorer::{HttpExplorerClient, TransactionHistoryClient};
use crate::clients::flagged::{FlagCheckClient, HttpFlagCheckClient};
use crate::clients::insight::{HttpInsightClient, InsightClient};
use crate::config::BackendConfig;
use crate::error::ServiceError;
use crate::models::insights::{HttpInsightRepository, InsightRepository};
use crate::models::preferences::{HttpPreferenceRepository, PreferenceRepository};
use crate::services::insights::InsightService;
use crate::services::preferences::PreferenceService;
use crate::services::risk::RiskAggregator;
use crate::services::wallet::WalletService;

/// Application state shared across HTTP handlers
pub struct AppState {
    pub wallet: WalletService,
    pub risk: RiskAggregator,
    pub preferences: PreferenceService,
    pub insights: Arc<InsightService>,
}

impl AppState {
    /// Build the production state: HTTP clients against the configured
    /// collaborators, and the provider directory populated once from the
    /// configured bridge endpoints
    pub fn from_config(config: &BackendConfig) -> Result<Self, ServiceError> {
        let flag_client: Arc<dyn FlagCheckClient> = Arc::new(HttpFlagCheckClient::new(
            config.flag_check_url.clone(),
            config.request_timeout,
        )?);
        let explorer_client: Arc<dyn TransactionHistoryClient> = Arc::new(HttpExplorerClient::new(
            config.explorer_url.clone(),
            config.request_timeout,
        )?);
        let insight_client: Arc<dyn InsightClient> = Arc::new(HttpInsightClient::new(
            config.insight_url.clone(),
            config.insight_api_key.clone(),
            config.request_timeout,
        )?);
        let preference_repository: Arc<dyn PreferenceRepository> =
            Arc::new(HttpPreferenceRepository::new(
                config.document_store_url.clone(),
                config.request_timeout,
            )?);
        let insight_repository: Arc<dyn InsightRepository> = Arc::new(HttpInsightRepository::new(
            config.document_store_url.clone(),
            config.request_timeout,
        )?);

        let mut provider_configs = Vec::new();
        if let Some(url) = &config.metamask_bridge_url {
            provider_configs.push((
                ProviderKind::MetaMask,
                TransportConfig {
                    url: url.clone(),
                    api_key: None,
                    timeout: Some(config.request_timeout),
                },
            ));
        }
        if let Some(url) = &config.coinbase_bridge_url {
            provider_configs.push((
                ProviderKind::CoinbaseWallet,
                TransportConfig {
                    url: url.clone(),
                    api_key: None,
                    timeout: Some(config.request_timeout),
                },
            ));
        }
        let directory = Arc::new(ProviderDirectory::from_configs(provider_configs)?);

        Ok(Self::with_parts(
            directory,
            flag_client,
            explorer_client,
            insight_client,
            preference_repository,
            insight_repository,
        ))
    }

    /// Assemble state from explicit parts; tests use this with the
    /// in-memory implementations
    pub fn with_parts(
        directory: Arc<ProviderDirectory>,
        flag_client: Arc<dyn FlagCheckClient>,
        explorer_client: Arc<dyn TransactionHistoryClient>,
        insight_client: Arc<dyn InsightClient>,
        preference_repository: Arc<dyn PreferenceRepository>,
        insight_repository: Arc<dyn InsightRepository>,
    ) -> Self {
        Self {
            wallet: WalletService::new(directory),
            risk: RiskAggregator::new(explorer_client, flag_client),
            preferences: PreferenceService::new(preference_repository),
            insights: Arc::new(InsightService::new(insight_client, insight_repository)),
        }
    }
}
