//! Risk/transaction aggregation
//!
//! Given a primary address (and optionally a destination address for the
//! second panel), fetch its transaction history, run one batched
//! flagged-address check over the primary plus every distinct
//! counterparty, and classify the result:
//!
//! - the primary address itself reported `Fail` => overall `Fail`
//! - otherwise any counterparty reported `Fail` => overall `Warning`
//! - otherwise => overall `Pass`
//!
//! Each row's `flagged` boolean is independent of the overall status: it
//! is true iff that row's specific counterparty was reported `Fail`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use infagent_wallet::account::{normalize_address, validate_address};

use crate::clients::explorer::{wei_to_eth, RawTransaction, TransactionHistoryClient};
use crate::clients::flagged::{AddressCheckRecord, FlagCheckClient};
use crate::error::ServiceError;
use crate::models::transactions::{
    AddressReport, CheckStatus, Direction, RiskLevel, Transaction,
};

/// Result of checking a source address and, when requested, a
/// destination address. The two panels are independent flows: a failed
/// destination check degrades to `None` without touching the source
/// result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RiskCheckResult {
    pub source: AddressReport,
    #[serde(default)]
    pub destination: Option<AddressReport>,
}

/// Aggregates the flagged-address and block-explorer backends into
/// per-address reports
pub struct RiskAggregator {
    explorer: Arc<dyn TransactionHistoryClient>,
    flags: Arc<dyn FlagCheckClient>,
}

impl RiskAggregator {
    pub fn new(
        explorer: Arc<dyn TransactionHistoryClient>,
        flags: Arc<dyn FlagCheckClient>,
    ) -> Self {
        Self { explorer, flags }
    }

    /// Run the full aggregation for one address
    pub async fn check_address(&self, address: &str) -> Result<AddressReport, ServiceError> {
        // Invalid addresses never reach a remote call
        let primary = normalize_address(address)?;

        let history = self.explorer.history(&primary).await?;

        // Distinct counterparties in observed order, excluding the
        // primary itself and anything that is not a well-formed address
        let mut counterparties: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for raw in &history {
            if let Some(counterparty) = counterparty_of(raw, &primary) {
                if counterparty != primary && seen.insert(counterparty.clone()) {
                    counterparties.push(counterparty);
                }
            }
        }

        // One batched call covering the counterparty set plus the primary
        let mut batch = counterparties.clone();
        batch.push(primary.clone());
        let records = self.flags.check(&batch).await?;

        let verdicts: HashMap<String, &AddressCheckRecord> = records
            .iter()
            .filter_map(|record| {
                normalize_address(&record.address)
                    .ok()
                    .map(|address| (address, record))
            })
            .collect();

        let primary_record = verdicts.get(&primary);
        let primary_failed =
            matches!(primary_record, Some(record) if record.status == CheckStatus::Fail);
        let any_counterparty_failed = counterparties.iter().any(|counterparty| {
            matches!(verdicts.get(counterparty), Some(record) if record.status == CheckStatus::Fail)
        });

        let status = if primary_failed {
            CheckStatus::Fail
        } else if any_counterparty_failed {
            CheckStatus::Warning
        } else {
            CheckStatus::Pass
        };

        let transactions: Vec<Transaction> = history
            .iter()
            .map(|raw| enrich_transaction(raw, &primary, &verdicts))
            .collect();

        // Summary section is omitted for an empty history
        let summary = if history.is_empty() {
            None
        } else {
            match self.explorer.summary(&primary).await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(address = %primary, error = %e, "summary unavailable");
                    None
                }
            }
        };

        Ok(AddressReport {
            address: primary.clone(),
            status: Some(status),
            description: primary_record.and_then(|record| record.description.clone()),
            transactions,
            summary,
        })
    }

    /// Check a source address and, optionally, a destination address.
    /// Both are validated up front; after that the destination check is
    /// best-effort.
    pub async fn check_pair(
        &self,
        source: &str,
        destination: Option<&str>,
    ) -> Result<RiskCheckResult, ServiceError> {
        if let Some(destination) = destination {
            if !validate_address(destination) {
                return Err(ServiceError::InvalidInput(format!(
                    "Invalid destination address: {}",
                    destination
                )));
            }
        }

        let source_report = self.check_address(source).await?;

        let destination_report = match destination {
            Some(destination) => match self.check_address(destination).await {
                Ok(report) => Some(report),
                Err(e @ (ServiceError::Upstream(_) | ServiceError::BadUpstream(_))) => {
                    tracing::warn!(address = %destination, error = %e, "destination check degraded");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };

        Ok(RiskCheckResult {
            source: source_report,
            destination: destination_report,
        })
    }
}

/// The other-party address of a row, normalized, relative to the
/// inspected address. `None` when it is not a well-formed address (e.g.
/// contract creation rows with an empty `to`).
fn counterparty_of(raw: &RawTransaction, primary: &str) -> Option<String> {
    let from = normalize_address(&raw.from).ok()?;
    let other = if from == primary { &raw.to } else { &raw.from };
    normalize_address(other).ok()
}

fn enrich_transaction(
    raw: &RawTransaction,
    primary: &str,
    verdicts: &HashMap<String, &AddressCheckRecord>,
) -> Transaction {
    let direction = match normalize_address(&raw.from) {
        Ok(from) if from == primary => Direction::Sent,
        _ => Direction::Received,
    };

    let counterparty = counterparty_of(raw, primary);
    let verdict = counterparty
        .as_deref()
        .and_then(|address| verdicts.get(address));
    let flagged = matches!(verdict, Some(record) if record.status == CheckStatus::Fail);
    let risk_level = match verdict {
        Some(record) => record.risk_level.unwrap_or(if flagged {
            RiskLevel::High
        } else {
            RiskLevel::None
        }),
        None => RiskLevel::None,
    };

    let amount = match wei_to_eth(&raw.value) {
        Some(amount) => amount,
        None => {
            tracing::warn!(hash = %raw.hash, value = %raw.value, "unparseable transaction value");
            Decimal::ZERO
        }
    };

    Transaction {
        id: raw.hash.clone(),
        timestamp: parse_timestamp(&raw.time_stamp),
        direction,
        asset: "ETH".to_string(),
        amount,
        counterparty_address: counterparty.unwrap_or_else(|| {
            if direction == Direction::Sent {
                raw.to.clone()
            } else {
                raw.from.clone()
            }
        }),
        flagged,
        risk_level,
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<i64>()
        .ok()
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .unwrap_or_else(|| {
            tracing::debug!(raw, "unparseable transaction timestamp");
            DateTime::<Utc>::UNIX_EPOCH
        })
}
