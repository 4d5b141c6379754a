//! Wallet session service
//!
//! Holds one [`WalletSession`] per dashboard session (one browser tab)
//! and exposes the connect/disconnect/sign/sync operations over it.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use infagent_wallet::account::{ProviderKind, WalletAccount};
use infagent_wallet::provider::{ProviderDirectory, WalletSession};

use crate::error::ServiceError;

/// Snapshot of a session's accounts for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub accounts: Vec<WalletAccount>,
    pub main: Option<String>,
    pub provider: Option<ProviderKind>,
    pub connected: bool,
}

pub struct WalletService {
    directory: Arc<ProviderDirectory>,
    sessions: RwLock<HashMap<Uuid, WalletSession>>,
}

impl WalletService {
    pub fn new(directory: Arc<ProviderDirectory>) -> Self {
        Self {
            directory,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn view(session_id: Uuid, session: &WalletSession) -> SessionView {
        SessionView {
            session_id,
            accounts: session.accounts().accounts().to_vec(),
            main: session.accounts().main().map(|a| a.address.clone()),
            provider: session.provider(),
            connected: session.is_connected(),
        }
    }

    /// Connect through a provider, creating the session when needed
    pub async fn connect(
        &self,
        session_id: Option<Uuid>,
        kind: ProviderKind,
    ) -> Result<SessionView, ServiceError> {
        let mut sessions = self.sessions.write().await;
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        let session = sessions
            .entry(session_id)
            .or_insert_with(|| WalletSession::new(self.directory.clone()));

        match session.connect(kind).await {
            Some(_) => Ok(Self::view(session_id, session)),
            None => Err(ServiceError::ProviderUnavailable(format!(
                "{} is not available or the request was rejected",
                kind
            ))),
        }
    }

    /// Add a manually entered account, creating the session when needed
    pub async fn add_manual(
        &self,
        session_id: Option<Uuid>,
        address: &str,
    ) -> Result<SessionView, ServiceError> {
        let mut sessions = self.sessions.write().await;
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        let session = sessions
            .entry(session_id)
            .or_insert_with(|| WalletSession::new(self.directory.clone()));

        session.add_manual(address)?;
        Ok(Self::view(session_id, session))
    }

    /// Best-effort provider disconnect; connected accounts remain listed
    pub async fn disconnect(&self, session_id: Uuid) -> Result<SessionView, ServiceError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown session {}", session_id)))?;

        session.disconnect().await;
        Ok(Self::view(session_id, session))
    }

    /// Remove one account; main reassigns when needed
    pub async fn remove_account(
        &self,
        session_id: Uuid,
        address: &str,
    ) -> Result<SessionView, ServiceError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown session {}", session_id)))?;

        session.disconnect_account(address)?;
        Ok(Self::view(session_id, session))
    }

    /// Designate the main account
    pub async fn set_main(&self, session_id: Uuid, address: &str) -> Result<SessionView, ServiceError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown session {}", session_id)))?;

        session.accounts_mut().set_main(address)?;
        Ok(Self::view(session_id, session))
    }

    /// The session's accounts
    pub async fn accounts(&self, session_id: Uuid) -> Result<SessionView, ServiceError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown session {}", session_id)))?;

        Ok(Self::view(session_id, session))
    }

    /// Sign a message with the session's provider
    pub async fn sign(&self, session_id: Uuid, message: &str) -> Result<String, ServiceError> {
        if message.is_empty() {
            return Err(ServiceError::InvalidInput("A message is required".to_string()));
        }

        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown session {}", session_id)))?;

        Ok(session.sign(message).await?)
    }

    /// Run the account sync hook for the session
    pub async fn sync(&self, session_id: Uuid) -> Result<(), ServiceError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Unknown session {}", session_id)))?;

        Ok(session.sync_data().await?)
    }
}
