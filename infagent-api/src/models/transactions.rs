//! Transaction and address-status models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a transaction relative to the inspected address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

/// Risk grade attached to a transaction row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    None,
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::None
    }
}

/// Tri-state verdict for an inspected address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
}

/// Per-address verdict as presented to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressStatus {
    pub address: String,
    pub status: CheckStatus,
    #[serde(default)]
    pub description: Option<String>,
}

/// An enriched transaction row.
///
/// `amount` is the raw asset quantity (the wire value divided by 10^18),
/// not a fiat amount; no FX conversion happens anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub asset: String,
    pub amount: Decimal,
    pub counterparty_address: String,
    pub flagged: bool,
    pub risk_level: RiskLevel,
}

/// Aggregate figures returned by the transaction-summary backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub number_of_interactions_with_flagged_addresses: u64,
    pub number_of_risky_transactions: u64,
    pub total_value: Decimal,
    pub all_dates_involved: Vec<String>,
}

/// Full aggregation result for one inspected address.
///
/// `status` stays `None` until a check has been explicitly run for the
/// address; `summary` is omitted when the transaction history is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressReport {
    pub address: String,
    pub status: Option<CheckStatus>,
    #[serde(default)]
    pub description: Option<String>,
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub summary: Option<TransactionSummary>,
}

impl AddressReport {
    /// The report's verdict as a standalone status record, once a check
    /// has been run
    pub fn address_status(&self) -> Option<AddressStatus> {
        self.status.map(|status| AddressStatus {
            address: self.address.clone(),
            status,
            description: self.description.clone(),
        })
    }
}
