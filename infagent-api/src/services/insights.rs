//! Insight generation
//!
//! Builds a prompt from an address report, asks the insight backend for a
//! completion, and stores the text keyed by address and timestamp.
//! Generation is fire-and-forget from the request path: failure degrades
//! to "no insights available" and never blocks the originating request.

use std::sync::Arc;

use infagent_wallet::account::normalize_address;

use crate::clients::insight::InsightClient;
use crate::error::ServiceError;
use crate::models::insights::{InsightRepository, WalletInsight};
use crate::models::transactions::{AddressReport, CheckStatus};

/// At most this many transactions are included in a prompt
const PROMPT_TRANSACTION_LIMIT: usize = 10;

pub struct InsightService {
    client: Arc<dyn InsightClient>,
    repository: Arc<dyn InsightRepository>,
}

impl InsightService {
    pub fn new(client: Arc<dyn InsightClient>, repository: Arc<dyn InsightRepository>) -> Self {
        Self { client, repository }
    }

    /// Build the completion prompt from the address, the first
    /// transactions, and the computed status
    pub fn build_prompt(report: &AddressReport) -> String {
        let mut prompt = format!(
            "You are a crypto wallet analyst. Summarize the risk posture of wallet {}.",
            report.address
        );

        match report.status {
            Some(CheckStatus::Fail) => prompt.push_str(" The address itself is flagged."),
            Some(CheckStatus::Warning) => {
                prompt.push_str(" The address has transacted with flagged counterparties.")
            }
            Some(CheckStatus::Pass) => prompt.push_str(" No flags were found."),
            None => prompt.push_str(" No check has been run yet."),
        }

        if report.transactions.is_empty() {
            prompt.push_str(" There is no transaction history.");
        } else {
            prompt.push_str(" Recent transactions:");
            for txn in report.transactions.iter().take(PROMPT_TRANSACTION_LIMIT) {
                prompt.push_str(&format!(
                    " [{:?} {} ETH {} {}{}]",
                    txn.direction,
                    txn.amount,
                    if txn.flagged { "flagged counterparty" } else { "counterparty" },
                    txn.counterparty_address,
                    if txn.flagged { " (!)" } else { "" },
                ));
            }
        }

        prompt
    }

    /// Generate one insight for a report and store it
    pub async fn generate(&self, report: &AddressReport) -> Result<WalletInsight, ServiceError> {
        let prompt = Self::build_prompt(report);
        let text = self.client.generate(&prompt).await?;
        let insight = WalletInsight::new(report.address.clone(), report.status, text);
        self.repository.store(&insight).await?;
        Ok(insight)
    }

    /// Fire-and-forget generation; a failure is a warn log, nothing more
    pub fn spawn_generate(self: &Arc<Self>, report: AddressReport) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.generate(&report).await {
                tracing::warn!(address = %report.address, error = %e, "insight generation failed");
            }
        });
    }

    /// Stored insights for an address, newest first
    pub async fn list(&self, address: &str) -> Result<Vec<WalletInsight>, ServiceError> {
        let address = normalize_address(address)?;
        self.repository.list_for_address(&address).await
    }
}
