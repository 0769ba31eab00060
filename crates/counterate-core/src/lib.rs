//! Service plumbing shared by Counterate binaries.
//!
//! Config loading, tracing setup, request ids, health probes and the
//! timestamp serializer used in JSON responses.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
