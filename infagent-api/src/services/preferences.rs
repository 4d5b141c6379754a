//! Notification preference service
//!
//! Round-trips the per-user preference document. Saves are full-overwrite
//! and happen on every toggle flip; callers without an authenticated user
//! id get a silent no-op instead of a remote write.

use std::sync::Arc;

use chrono::Utc;

use infagent_wallet::account::normalize_address;

use crate::error::ServiceError;
use crate::models::preferences::{MonitoredWallet, NotificationPreferences, PreferenceRepository};

pub struct PreferenceService {
    repository: Arc<dyn PreferenceRepository>,
}

impl PreferenceService {
    pub fn new(repository: Arc<dyn PreferenceRepository>) -> Self {
        Self { repository }
    }

    /// Load a user's document. A first-time user gets the defaults:
    /// every toggle off and no monitored address.
    pub async fn load(&self, user_id: &str) -> Result<MonitoredWallet, ServiceError> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("A user id is required".to_string()));
        }
        Ok(self.repository.load(user_id).await?.unwrap_or_default())
    }

    /// Persist the preferences and monitored address for a user.
    ///
    /// Without a user id this is a no-op: no remote write is attempted
    /// and `false` is returned.
    pub async fn save(
        &self,
        user_id: Option<&str>,
        preferences: NotificationPreferences,
        wallet_address: Option<String>,
    ) -> Result<bool, ServiceError> {
        let user_id = match user_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                tracing::debug!("skipping preference save without an authenticated user");
                return Ok(false);
            }
        };

        let wallet_address = match wallet_address {
            Some(address) => Some(normalize_address(&address)?),
            None => None,
        };

        let document = MonitoredWallet {
            preferences,
            wallet_address,
            updated_at: Utc::now(),
        };
        self.repository.save(user_id, &document).await?;
        Ok(true)
    }
}
