use serde::Deserialize;

use counterate_core::config::Config;

use crate::domain::types::{LOCKED_CREDENTIAL, RepairPolicy, UnitDefaults};

/// Signage service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct SignageConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3000). Env var: `SIGNAGE_PORT`.
    #[serde(default = "default_port")]
    pub signage_port: u16,
    /// Buffered change signals per subscriber before it lags (default 64).
    #[serde(default = "default_notifier_capacity")]
    pub notifier_capacity: usize,
    /// Orphan repair policy: `off`, `adopt` or `adopt-or-create`. Env var: `PAIRING_REPAIR`.
    #[serde(default)]
    pub pairing_repair: RepairPolicy,
    /// Pre-hashed credential given to admins created by repair or reset.
    #[serde(default = "locked_credential")]
    pub default_admin_credential_hash: String,
    /// Pre-hashed credential given to displays created by repair or reset.
    #[serde(default = "locked_credential")]
    pub default_display_credential_hash: String,
    /// Marquee text for newly created unit configs.
    #[serde(default = "default_marquee_text")]
    pub default_marquee_text: String,
}

impl Config for SignageConfig {}

impl SignageConfig {
    pub fn unit_defaults(&self) -> UnitDefaults {
        UnitDefaults {
            admin_credential_hash: self.default_admin_credential_hash.clone(),
            display_credential_hash: self.default_display_credential_hash.clone(),
            marquee_text: self.default_marquee_text.clone(),
        }
    }
}

/// Terminal agent configuration. Env vars are prefixed with `TERMINAL_`.
#[derive(Debug, Deserialize)]
pub struct TerminalConfig {
    /// Base URL of the signage service, e.g. `http://signage:3000`.
    pub base_url: String,
    /// Bearer token presented to the gateway in front of the service.
    pub access_token: String,
    /// Snapshot re-pull interval in seconds (default 15).
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    /// Command mailbox poll interval in seconds (default 5).
    #[serde(default = "default_command_poll_secs")]
    pub command_poll_secs: u64,
}

impl Config for TerminalConfig {}

impl TerminalConfig {
    pub const ENV_PREFIX: &'static str = "TERMINAL_";
}

fn default_port() -> u16 {
    3000
}

fn default_notifier_capacity() -> usize {
    64
}

fn locked_credential() -> String {
    LOCKED_CREDENTIAL.to_owned()
}

fn default_marquee_text() -> String {
    "Welcome to Our Branch".to_owned()
}

fn default_poll_secs() -> u64 {
    15
}

fn default_command_poll_secs() -> u64 {
    5
}
