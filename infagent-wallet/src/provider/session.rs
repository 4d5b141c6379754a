//! Wallet session
//!
//! [`WalletSession`] owns the live provider handle for one user session,
//! replacing any process-wide singleton. Every provider operation catches
//! transport failures and converts them to a logged `None` outcome or a
//! typed error; nothing here may panic into UI code.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::account::{AccountSet, ProviderKind, WalletAccount};
use crate::error::{Error, Result};
use crate::provider::directory::ProviderDirectory;
use crate::provider::transport::ProviderTransport;

/// Extension hook invoked after account changes, e.g. to pull balances
/// or history for the connected accounts
#[async_trait]
pub trait AccountSync: Send + Sync {
    async fn sync(&self, accounts: &[WalletAccount]) -> Result<()>;
}

/// Default sync hook: walks the accounts and does nothing else
pub struct NoopSync;

#[async_trait]
impl AccountSync for NoopSync {
    async fn sync(&self, accounts: &[WalletAccount]) -> Result<()> {
        for account in accounts {
            tracing::debug!(address = %account.address, provider = %account.provider, "account sync");
        }
        Ok(())
    }
}

struct ProviderHandle {
    kind: ProviderKind,
    transport: Arc<dyn ProviderTransport>,
}

/// A user session holding the connected accounts and the live provider
/// handle used for signing
pub struct WalletSession {
    directory: Arc<ProviderDirectory>,
    handle: Option<ProviderHandle>,
    accounts: AccountSet,
    sync_hook: Arc<dyn AccountSync>,
}

impl WalletSession {
    /// Create a session over the available providers with the default
    /// sync hook
    pub fn new(directory: Arc<ProviderDirectory>) -> Self {
        Self::with_sync(directory, Arc::new(NoopSync))
    }

    /// Create a session with a custom sync hook
    pub fn with_sync(directory: Arc<ProviderDirectory>, sync_hook: Arc<dyn AccountSync>) -> Self {
        Self {
            directory,
            handle: None,
            accounts: AccountSet::new(),
            sync_hook,
        }
    }

    /// Connect through a provider: locate its transport, request account
    /// access, and store the live handle for later signing calls.
    ///
    /// Returns `None` when no matching provider is available or the user
    /// rejects the request; the failure is logged, never raised.
    pub async fn connect(&mut self, kind: ProviderKind) -> Option<Vec<WalletAccount>> {
        let transport = match self.directory.lookup(kind) {
            Some(transport) => transport,
            None => {
                tracing::warn!(provider = %kind, "wallet provider not available");
                return None;
            }
        };

        let raw = match transport.request("eth_requestAccounts", json!([])).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(provider = %kind, error = %e, "account request failed");
                return None;
            }
        };

        let addresses: Vec<String> = match serde_json::from_value(raw) {
            Ok(addresses) => addresses,
            Err(e) => {
                tracing::warn!(provider = %kind, error = %e, "unexpected account list payload");
                return None;
            }
        };

        let mut connected = Vec::new();
        for address in addresses {
            match WalletAccount::new(&address, kind) {
                Ok(account) => connected.push(account),
                Err(e) => {
                    tracing::warn!(provider = %kind, error = %e, "provider returned malformed address");
                }
            }
        }
        if connected.is_empty() {
            tracing::warn!(provider = %kind, "provider returned no usable accounts");
            return None;
        }

        self.accounts.connect(connected.clone());
        self.handle = Some(ProviderHandle { kind, transport });
        Some(connected)
    }

    /// Add a manually entered account; no live handle is involved
    pub fn add_manual(&mut self, address: &str) -> Result<WalletAccount> {
        let account = WalletAccount::new(address, ProviderKind::Manual)?;
        self.accounts.connect(vec![account.clone()]);
        Ok(account)
    }

    /// Best-effort disconnect. Wallet providers do not support true
    /// revocation, so this attempts a permissions re-request and always
    /// clears the local handle. Never fails.
    pub async fn disconnect(&mut self) {
        if let Some(handle) = self.handle.take() {
            let params = json!([{ "eth_accounts": {} }]);
            if let Err(e) = handle.transport.request("wallet_requestPermissions", params).await {
                tracing::debug!(provider = %handle.kind, error = %e, "permission re-request declined");
            }
        }
    }

    /// Remove one connected account, reassigning the main account when
    /// needed
    pub fn disconnect_account(&mut self, address: &str) -> Result<WalletAccount> {
        self.accounts.disconnect(address)
    }

    /// Sign a message with the first connected account. Requires a prior
    /// successful [`connect`](Self::connect).
    pub async fn sign(&self, message: &str) -> Result<String> {
        let handle = self.handle.as_ref().ok_or(Error::NotInitialized)?;
        let account = self.accounts.accounts().first().ok_or(Error::NoAccounts)?;

        let params = json!([message, account.address]);
        let result = handle.transport.request("personal_sign", params).await?;

        serde_json::from_value(result)
            .map_err(|e| Error::Signing(format!("Unexpected signature payload: {}", e)))
    }

    /// Run the account sync hook over the connected accounts
    pub async fn sync_data(&self) -> Result<()> {
        self.sync_hook.sync(self.accounts.accounts()).await
    }

    /// The session's connected accounts
    pub fn accounts(&self) -> &AccountSet {
        &self.accounts
    }

    /// Mutable access to the connected accounts
    pub fn accounts_mut(&mut self) -> &mut AccountSet {
        &mut self.accounts
    }

    /// Whether a live provider handle exists
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// The provider behind the live handle, if any
    pub fn provider(&self) -> Option<ProviderKind> {
        self.handle.as_ref().map(|h| h.kind)
    }
}
