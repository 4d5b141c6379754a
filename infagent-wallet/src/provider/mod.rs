//! Wallet provider adapter
//!
//! Abstracts over the wallet providers a user may have available. Each
//! provider is reached through a [`ProviderTransport`] speaking the
//! standard Ethereum provider convention (`request({method, params})`);
//! the [`ProviderDirectory`] is populated once at startup by probing the
//! configured transports, and downstream code switches on an explicit
//! [`ProviderKind`](crate::account::ProviderKind) tag instead of
//! re-probing capability flags.

pub mod directory;
pub mod session;
pub mod transport;

pub use directory::ProviderDirectory;
pub use session::{AccountSync, NoopSync, WalletSession};
pub use transport::{ProviderTransport, RpcTransport, TransportConfig};
