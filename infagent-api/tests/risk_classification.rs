//! Tests for the risk/transaction aggregation flow

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use infagent_api::clients::explorer::{InMemoryExplorerClient, RawTransaction, TransactionHistoryClient};
use infagent_api::clients::flagged::{AddressCheckRecord, FlagCheckClient, InMemoryFlagCheckClient};
use infagent_api::error::ServiceError;
use infagent_api::models::transactions::{CheckStatus, Direction, TransactionSummary};
use infagent_api::services::risk::RiskAggregator;

const PRIMARY: &str = "0xABCDEF0000000000000000000000000000000001";
const CP_FLAGGED: &str = "0x1111111111111111111111111111111111111111";
const CP_CLEAN: &str = "0x2222222222222222222222222222222222222222";

fn row(from: &str, to: &str, value: &str, hash: &str) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        time_stamp: "1700000000".to_string(),
        from: from.to_string(),
        to: to.to_string(),
        value: value.to_string(),
    }
}

fn aggregator_with(
    explorer: Arc<InMemoryExplorerClient>,
    flags: Arc<InMemoryFlagCheckClient>,
) -> RiskAggregator {
    RiskAggregator::new(explorer, flags)
}

fn default_history(explorer: &InMemoryExplorerClient) {
    explorer.set_history(
        PRIMARY,
        vec![
            row(PRIMARY, CP_FLAGGED, "1000000000000000000", "0xaaa"),
            row(CP_CLEAN, PRIMARY, "500000000000000000", "0xbbb"),
        ],
    );
}

#[tokio::test]
async fn test_invalid_address_issues_no_network_call() {
    /// Explorer fake that counts every call
    #[derive(Default)]
    struct CountingExplorer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TransactionHistoryClient for CountingExplorer {
        async fn history(&self, _address: &str) -> Result<Vec<RawTransaction>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn summary(&self, _address: &str) -> Result<TransactionSummary, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::NotFound("no summary".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingFlags {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FlagCheckClient for CountingFlags {
        async fn check(&self, _addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    let explorer = Arc::new(CountingExplorer::default());
    let flags = Arc::new(CountingFlags::default());
    let aggregator = RiskAggregator::new(explorer.clone(), flags.clone());

    for bad in ["", "0x1234", "not-an-address", "0xZZZDEF0000000000000000000000000000000001"] {
        let result = aggregator.check_address(bad).await;
        assert!(
            matches!(
                result,
                Err(ServiceError::Wallet(infagent_wallet::Error::InvalidAddress(_)))
            ),
            "expected invalid-address error for {:?}",
            bad
        );
    }

    assert_eq!(explorer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(flags.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_flagged_primary_is_fail_regardless_of_counterparties() {
    let explorer = Arc::new(InMemoryExplorerClient::new());
    default_history(&explorer);
    let flags = Arc::new(InMemoryFlagCheckClient::new());
    flags.flag(PRIMARY);
    flags.flag(CP_FLAGGED);

    let report = aggregator_with(explorer, flags)
        .check_address(PRIMARY)
        .await
        .unwrap();

    assert_eq!(report.status, Some(CheckStatus::Fail));
}

#[tokio::test]
async fn test_flagged_counterparty_is_warning() {
    let explorer = Arc::new(InMemoryExplorerClient::new());
    default_history(&explorer);
    let flags = Arc::new(InMemoryFlagCheckClient::new());
    flags.flag(CP_FLAGGED);

    let report = aggregator_with(explorer, flags)
        .check_address(PRIMARY)
        .await
        .unwrap();

    assert_eq!(report.status, Some(CheckStatus::Warning));

    // Exactly the row with the flagged counterparty carries the overlay
    let flagged_rows: Vec<_> = report.transactions.iter().filter(|t| t.flagged).collect();
    assert_eq!(flagged_rows.len(), 1);
    assert_eq!(flagged_rows[0].id, "0xaaa");
    assert_eq!(
        flagged_rows[0].counterparty_address,
        CP_FLAGGED.to_ascii_lowercase()
    );
}

#[tokio::test]
async fn test_all_clean_is_pass() {
    let explorer = Arc::new(InMemoryExplorerClient::new());
    default_history(&explorer);
    let flags = Arc::new(InMemoryFlagCheckClient::new());

    let report = aggregator_with(explorer, flags)
        .check_address(PRIMARY)
        .await
        .unwrap();

    assert_eq!(report.status, Some(CheckStatus::Pass));
    assert!(report.transactions.iter().all(|t| !t.flagged));
}

#[tokio::test]
async fn test_rows_are_enriched() {
    let explorer = Arc::new(InMemoryExplorerClient::new());
    default_history(&explorer);
    explorer.set_summary(
        PRIMARY,
        TransactionSummary {
            number_of_interactions_with_flagged_addresses: 1,
            number_of_risky_transactions: 1,
            total_value: Decimal::new(15, 1),
            all_dates_involved: vec!["2023-11-14".to_string()],
        },
    );
    let flags = Arc::new(InMemoryFlagCheckClient::new());

    let report = aggregator_with(explorer, flags)
        .check_address(PRIMARY)
        .await
        .unwrap();

    assert_eq!(report.transactions.len(), 2);

    let sent = &report.transactions[0];
    assert_eq!(sent.direction, Direction::Sent);
    assert_eq!(sent.amount, Decimal::new(1, 0)); // 10^18 wei
    assert_eq!(sent.asset, "ETH");

    let received = &report.transactions[1];
    assert_eq!(received.direction, Direction::Received);
    assert_eq!(received.amount, Decimal::new(5, 1));
    assert_eq!(received.counterparty_address, CP_CLEAN.to_ascii_lowercase());

    let summary = report.summary.unwrap();
    assert_eq!(summary.number_of_interactions_with_flagged_addresses, 1);
}

#[tokio::test]
async fn test_empty_history_has_no_summary() {
    let explorer = Arc::new(InMemoryExplorerClient::new());
    let flags = Arc::new(InMemoryFlagCheckClient::new());

    let report = aggregator_with(explorer, flags)
        .check_address(PRIMARY)
        .await
        .unwrap();

    assert!(report.transactions.is_empty());
    assert!(report.summary.is_none());
    // The explicit check still classifies the address itself
    assert_eq!(report.status, Some(CheckStatus::Pass));
}

#[tokio::test]
async fn test_batch_covers_primary_and_distinct_counterparties() {
    /// Flag client fake that records each batch it receives
    #[derive(Default)]
    struct RecordingFlags {
        batches: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl FlagCheckClient for RecordingFlags {
        async fn check(&self, addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError> {
            self.batches.lock().unwrap().push(addresses.to_vec());
            Ok(addresses
                .iter()
                .map(|address| AddressCheckRecord {
                    address: address.clone(),
                    status: CheckStatus::Pass,
                    description: None,
                    risk_level: None,
                })
                .collect())
        }
    }

    let explorer = Arc::new(InMemoryExplorerClient::new());
    // CP_FLAGGED appears twice and must be batched once
    explorer.set_history(
        PRIMARY,
        vec![
            row(PRIMARY, CP_FLAGGED, "1", "0xaaa"),
            row(CP_FLAGGED, PRIMARY, "2", "0xbbb"),
            row(PRIMARY, CP_CLEAN, "3", "0xccc"),
        ],
    );
    let flags = Arc::new(RecordingFlags::default());

    aggregator_with_dyn(explorer, flags.clone())
        .check_address(PRIMARY)
        .await
        .unwrap();

    let batches = flags.batches.lock().unwrap();
    assert_eq!(batches.len(), 1, "one batched call");
    let batch = &batches[0];
    assert_eq!(batch.len(), 3);
    assert!(batch.contains(&PRIMARY.to_ascii_lowercase()));
    assert!(batch.contains(&CP_FLAGGED.to_ascii_lowercase()));
    assert!(batch.contains(&CP_CLEAN.to_ascii_lowercase()));
}

fn aggregator_with_dyn(
    explorer: Arc<InMemoryExplorerClient>,
    flags: Arc<dyn FlagCheckClient>,
) -> RiskAggregator {
    RiskAggregator::new(explorer, flags)
}

#[tokio::test]
async fn test_malformed_flag_payload_is_recoverable() {
    /// Flag client fake returning a bad payload
    struct BrokenFlags;

    #[async_trait]
    impl FlagCheckClient for BrokenFlags {
        async fn check(&self, _addresses: &[String]) -> Result<Vec<AddressCheckRecord>, ServiceError> {
            Err(ServiceError::BadUpstream(
                "Flag check payload is not an array".to_string(),
            ))
        }
    }

    let explorer = Arc::new(InMemoryExplorerClient::new());
    default_history(&explorer);

    let aggregator = RiskAggregator::new(explorer, Arc::new(BrokenFlags));
    let result = aggregator.check_address(PRIMARY).await;

    // The caller gets a recoverable error and leaves any prior status
    // untouched; nothing panics
    assert!(matches!(result, Err(ServiceError::BadUpstream(_))));
}

#[tokio::test]
async fn test_destination_failure_degrades_without_touching_source() {
    /// Explorer that fails for one specific address
    struct PartialExplorer {
        inner: InMemoryExplorerClient,
        broken: String,
    }

    #[async_trait]
    impl TransactionHistoryClient for PartialExplorer {
        async fn history(&self, address: &str) -> Result<Vec<RawTransaction>, ServiceError> {
            if address.eq_ignore_ascii_case(&self.broken) {
                return Err(ServiceError::Upstream("explorer down".to_string()));
            }
            self.inner.history(address).await
        }

        async fn summary(&self, address: &str) -> Result<TransactionSummary, ServiceError> {
            self.inner.summary(address).await
        }
    }

    let inner = InMemoryExplorerClient::new();
    default_history(&inner);
    let explorer = Arc::new(PartialExplorer {
        inner,
        broken: CP_CLEAN.to_string(),
    });
    let flags = Arc::new(InMemoryFlagCheckClient::new());

    let result = RiskAggregator::new(explorer, flags)
        .check_pair(PRIMARY, Some(CP_CLEAN))
        .await
        .unwrap();

    assert_eq!(result.source.status, Some(CheckStatus::Pass));
    assert!(result.destination.is_none());
}

#[tokio::test]
async fn test_end_to_end_warning_scenario() {
    // The dashboard scenario: one flagged counterparty in the history of
    // 0xABCDEF...0001 produces an overall Warning with exactly one
    // flagged row
    let explorer = Arc::new(InMemoryExplorerClient::new());
    default_history(&explorer);
    let flags = Arc::new(InMemoryFlagCheckClient::new());
    flags.flag(CP_FLAGGED);

    let result = aggregator_with(explorer, flags)
        .check_pair(PRIMARY, None)
        .await
        .unwrap();

    assert_eq!(result.source.status, Some(CheckStatus::Warning));
    assert_eq!(
        result.source.transactions.iter().filter(|t| t.flagged).count(),
        1
    );
    assert!(result.destination.is_none());
}
