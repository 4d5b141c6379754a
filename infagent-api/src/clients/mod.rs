//! Clients for the external collaborators
//!
//! Risk scoring, transaction history and insight generation are external
//! black boxes; only their request/response contracts live here. Each
//! client is a trait with an HTTP implementation and an in-memory fake.

pub mod explorer;
pub mod flagged;
pub mod insight;
