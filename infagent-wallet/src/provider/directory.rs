//! Provider directory

use std::collections::HashMap;
use std::sync::Arc;

use crate::account::ProviderKind;
use crate::error::{Error, Result};
use crate::provider::transport::{ProviderTransport, RpcTransport, TransportConfig};

/// Registry of the wallet providers available to a session, populated
/// once at startup
#[derive(Default)]
pub struct ProviderDirectory {
    providers: HashMap<ProviderKind, Arc<dyn ProviderTransport>>,
}

impl ProviderDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from per-provider transport configurations,
    /// creating one transport per configured provider
    pub fn from_configs(configs: Vec<(ProviderKind, TransportConfig)>) -> Result<Self> {
        let mut directory = Self::new();
        for (kind, config) in configs {
            if kind == ProviderKind::Manual {
                return Err(Error::InvalidInput(
                    "Manual accounts have no provider transport".to_string(),
                ));
            }
            let transport = RpcTransport::new(config)?;
            directory.register(kind, Arc::new(transport));
        }
        Ok(directory)
    }

    /// Register a transport for a provider
    pub fn register(&mut self, kind: ProviderKind, transport: Arc<dyn ProviderTransport>) {
        self.providers.insert(kind, transport);
    }

    /// Look up the transport for a provider, if one is available
    pub fn lookup(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderTransport>> {
        self.providers.get(&kind).cloned()
    }

    /// The providers currently available
    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
