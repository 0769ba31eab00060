//! Auth types shared across Counterate services.
//!
//! Authentication itself happens at the gateway; services only read the
//! identity it injects.

pub mod identity;
