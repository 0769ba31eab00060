//! Terminal agent: renders one unit's snapshot and follows its changes.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use counterate_core::config::Config;
use counterate_core::tracing::init_tracing;
use counterate_domain::snapshot::DisplayState;

use counterate_signage::config::TerminalConfig;
use counterate_signage::infra::http_terminal::{HttpTerminal, ReconnectConfig, follow_changes};
use counterate_signage::terminal::{self, Intervals, Screen};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Headless screen: reports what would be on the panel.
struct LogScreen;

impl Screen for LogScreen {
    fn render(&mut self, state: &DisplayState) {
        match state {
            DisplayState::Ready(snapshot) => info!(
                unit_admin_id = %snapshot.unit_admin_id,
                rates = snapshot.rates.len(),
                deposits = snapshot.deposits.len(),
                videos = snapshot.video.as_ref().map_or(0, |v| v.sources.len()),
                marquee = %snapshot.config.marquee_text,
                "rendered snapshot"
            ),
            DisplayState::Unconfigured => warn!("unit not configured"),
        }
    }

    fn unavailable(&mut self) {
        warn!("data unavailable");
    }
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = TerminalConfig::from_env_prefixed(TerminalConfig::ENV_PREFIX);
    let port = HttpTerminal::new(&config.base_url, &config.access_token);
    let cancel = CancellationToken::new();

    let (tx, rx) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
    tokio::spawn(follow_changes(
        port.clone(),
        tx,
        ReconnectConfig::default(),
        cancel.clone(),
    ));

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    let intervals = Intervals::from_secs(config.poll_secs, config.command_poll_secs);
    let reason = terminal::run(&port, &mut LogScreen, rx, intervals, cancel.clone()).await;
    cancel.cancel();
    info!(?reason, "terminal session ended");
}
