//! Domain types shared across Counterate services and the terminal agent.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers and in wire DTOs.

pub mod change;
pub mod command;
pub mod currency;
pub mod identity;
pub mod snapshot;
pub mod video;
