//! Snapshot of everything a terminal renders for its unit.
//!
//! Shared by the service (producer) and the terminal agent (consumer).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One active exchange-rate row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub id: Uuid,
    pub currency: String,
    pub currency_name: String,
    pub tt_buy: f64,
    pub tt_sell: f64,
    pub bank_buy: f64,
    pub bank_sell: f64,
    pub order: i32,
}

/// One active deposit tier. `tenor` is in months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositEntry {
    pub id: Uuid,
    pub tenor: i32,
    pub rate: f64,
    pub order: i32,
}

/// Ordered video sources for the unit's player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPlaylist {
    pub active: bool,
    pub sources: Vec<String>,
}

/// Branding and layout settings. The command mailbox is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub refresh_interval: i32,
    pub marquee_text: String,
    pub theme: String,
    pub left_logo_url: Option<String>,
    pub right_logo_url: Option<String>,
    pub left_title: Option<String>,
    pub right_title: Option<String>,
    pub show_clock: bool,
}

/// Read-only aggregate for one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub unit_admin_id: Uuid,
    pub rates: Vec<RateEntry>,
    pub deposits: Vec<DepositEntry>,
    pub video: Option<VideoPlaylist>,
    pub config: DisplayConfig,
}

/// What a terminal should show. `Unconfigured` is an explicit state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DisplayState {
    Ready(Snapshot),
    Unconfigured,
}

impl From<Option<Snapshot>> for DisplayState {
    fn from(snapshot: Option<Snapshot>) -> Self {
        match snapshot {
            Some(s) => Self::Ready(s),
            None => Self::Unconfigured,
        }
    }
}
