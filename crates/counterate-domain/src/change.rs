//! "Something changed" signal fanned out to connected terminals.

use serde::{Deserialize, Serialize};

/// Name of the server-sent event carrying a [`ChangeSignal`].
pub const DATA_UPDATE_EVENT: &str = "data-update";

/// Advisory tag describing which area changed.
///
/// Consumers must not rely on its granularity: every receiver re-pulls the
/// whole snapshot regardless of the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    All,
    Rates,
    Deposits,
    Video,
    Branding,
}

/// Payload of a change broadcast: `{ "type": "..." }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSignal {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
}

impl ChangeSignal {
    pub fn new(kind: ChangeKind) -> Self {
        Self { kind }
    }
}
