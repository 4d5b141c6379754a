//! Account management
//!
//! Connected wallet accounts are held in an [`AccountSet`]: an ordered set
//! unique by address, with one account designated as the session's main
//! account.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The wallet provider an account was connected through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    MetaMask,
    CoinbaseWallet,
    /// Address entered by hand, without a live provider behind it
    Manual,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::MetaMask => write!(f, "MetaMask"),
            ProviderKind::CoinbaseWallet => write!(f, "Coinbase Wallet"),
            ProviderKind::Manual => write!(f, "Manual"),
        }
    }
}

/// A connected wallet account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    /// The account address, 0x-prefixed lowercase hex
    pub address: String,
    /// The provider this account was connected through
    pub provider: ProviderKind,
}

impl WalletAccount {
    /// Create a new account; the address is validated and normalized
    pub fn new(address: &str, provider: ProviderKind) -> Result<Self> {
        let address = normalize_address(address)?;
        Ok(Self { address, provider })
    }
}

/// Check whether a string is a well-formed account address: 40 hex
/// characters with an optional 0x prefix. Addresses that fail this check
/// must never reach a remote call.
pub fn validate_address(address: &str) -> bool {
    let hex_part = address.strip_prefix("0x").unwrap_or(address);
    if hex_part.len() != 40 {
        return false;
    }
    matches!(hex::decode(hex_part), Ok(bytes) if bytes.len() == 20)
}

/// Normalize an address to its 0x-prefixed lowercase form, the key used
/// everywhere addresses are compared or looked up
pub fn normalize_address(address: &str) -> Result<String> {
    if !validate_address(address) {
        return Err(Error::InvalidAddress(address.to_string()));
    }
    let hex_part = address.strip_prefix("0x").unwrap_or(address);
    Ok(format!("0x{}", hex_part.to_ascii_lowercase()))
}

/// The ordered set of accounts connected in one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSet {
    accounts: Vec<WalletAccount>,
    main: Option<String>,
}

impl AccountSet {
    /// Create an empty account set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add accounts in order, skipping addresses already connected.
    /// The first account ever added becomes the main account.
    /// Returns the number of accounts actually added.
    pub fn connect(&mut self, accounts: Vec<WalletAccount>) -> usize {
        let mut added = 0;
        for account in accounts {
            if self.contains(&account.address) {
                continue;
            }
            self.accounts.push(account);
            added += 1;
        }
        if self.main.is_none() {
            self.main = self.accounts.first().map(|a| a.address.clone());
        }
        added
    }

    /// Remove an account. When the removed account was the main account,
    /// main reassigns to the next remaining connected account, or to
    /// `None` when none remain.
    pub fn disconnect(&mut self, address: &str) -> Result<WalletAccount> {
        let address = normalize_address(address)?;
        let position = self
            .accounts
            .iter()
            .position(|a| a.address == address)
            .ok_or_else(|| Error::NotConnected(address.clone()))?;
        let removed = self.accounts.remove(position);
        if self.main.as_deref() == Some(address.as_str()) {
            self.main = self.accounts.first().map(|a| a.address.clone());
        }
        Ok(removed)
    }

    /// Designate a connected account as the main account
    pub fn set_main(&mut self, address: &str) -> Result<()> {
        let address = normalize_address(address)?;
        if !self.contains(&address) {
            return Err(Error::NotConnected(address));
        }
        self.main = Some(address);
        Ok(())
    }

    /// The currently designated main account, if any
    pub fn main(&self) -> Option<&WalletAccount> {
        self.main
            .as_deref()
            .and_then(|address| self.accounts.iter().find(|a| a.address == address))
    }

    /// All connected accounts in connection order
    pub fn accounts(&self) -> &[WalletAccount] {
        &self.accounts
    }

    /// Whether an address is currently connected
    pub fn contains(&self, address: &str) -> bool {
        self.accounts.iter().any(|a| a.address == address)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }
}
