//! iNFAgent analytics API
//!
//! Service layer behind the iNFAgent dashboard: wallet session management,
//! address-risk aggregation over the external flagged-address and
//! block-explorer backends, notification preference storage, and
//! fire-and-forget insight generation.

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
