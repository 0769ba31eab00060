//! Test utilities for Counterate services.
//!
//! Dev-dependency only: import from `#[cfg(test)]` blocks and integration
//! tests.

pub mod auth;
