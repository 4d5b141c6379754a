//! Error types for the wallet core library

use thiserror::Error;

/// Custom error type for wallet core operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not initialized")]
    NotInitialized,

    #[error("No accounts available")]
    NoAccounts,

    #[error("Account not connected: {0}")]
    NotConnected(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for wallet core operations
pub type Result<T> = std::result::Result<T, Error>;
