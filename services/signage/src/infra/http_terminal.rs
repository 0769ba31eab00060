//! HTTP client side of a terminal: snapshot pulls, mailbox drains and the
//! change stream, with exponential-backoff reconnects for the latter.

use std::time::Duration;

use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use counterate_domain::change::{ChangeKind, ChangeSignal, DATA_UPDATE_EVENT};
use counterate_domain::command::{Command, DrainedCommand};
use counterate_domain::snapshot::DisplayState;

use crate::terminal::{TerminalError, TerminalPort};

// ── HttpTerminal ─────────────────────────────────────────────────────────────

/// Talks to the signage service with the terminal's bearer token.
#[derive(Clone)]
pub struct HttpTerminal {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpTerminal {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token: access_token.to_owned(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
    }
}

fn checked(response: Response) -> Result<Response, TerminalError> {
    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TerminalError::SessionRejected),
        status if status.is_success() => Ok(response),
        status => Err(TerminalError::Status(status.as_u16())),
    }
}

impl TerminalPort for HttpTerminal {
    async fn fetch_state(&self) -> Result<DisplayState, TerminalError> {
        let response = checked(self.get("/display/snapshot").send().await?)?;
        Ok(response.json().await?)
    }

    async fn drain_command(&self) -> Result<Option<Command>, TerminalError> {
        let response = checked(self.post("/display/commands/drain").send().await?)?;
        let drained: DrainedCommand = response.json().await?;
        Ok(drained.command)
    }
}

// ── ReconnectConfig ──────────────────────────────────────────────────────────

/// Exponential backoff for the change stream.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,
    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,
    /// `None` retries forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

/// `min(initial * 2^attempt, max)` scaled by a deterministic +-25% jitter.
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(attempt.min(31) as i32);
    let capped = base.min(config.max_delay.as_secs_f64());
    let jitter_factor = 1.0 + 0.25 * (attempt as f64 * 7.3).sin();
    Duration::from_secs_f64((capped * jitter_factor).max(0.0))
}

// ── Change stream ────────────────────────────────────────────────────────────

/// Follow `GET /display/events` until cancelled or the session is rejected,
/// forwarding each change signal to `tx`. Every reconnect after the first also
/// forwards an `ALL`, since signals sent while disconnected are gone.
pub async fn follow_changes(
    terminal: HttpTerminal,
    tx: broadcast::Sender<ChangeSignal>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;
    let mut connected_before = false;

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = stream_once(&terminal, &tx, &cancel, &mut connected_before) => result,
        };

        match result {
            Ok(()) => {
                if cancel.is_cancelled() {
                    break;
                }
                info!("change stream ended, reconnecting");
                attempt = 0;
            }
            Err(TerminalError::SessionRejected) => {
                warn!("change stream rejected the session, not reconnecting");
                break;
            }
            Err(e) => {
                warn!(error = %e, attempt, "change stream error");
                if let Some(max) = reconnect.max_retries {
                    if attempt >= max {
                        error!(max_retries = max, "change stream retry limit reached");
                        break;
                    }
                }
                let delay = calculate_backoff(attempt, &reconnect);
                debug!(delay_ms = delay.as_millis() as u64, attempt, "waiting before reconnect");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt = attempt.saturating_add(1);
            }
        }
    }
    debug!("change stream follower exiting");
}

async fn stream_once(
    terminal: &HttpTerminal,
    tx: &broadcast::Sender<ChangeSignal>,
    cancel: &CancellationToken,
    connected_before: &mut bool,
) -> Result<(), TerminalError> {
    let response = terminal
        .get("/display/events")
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;
    let mut body = std::pin::pin!(checked(response)?.bytes_stream());
    info!("change stream connected");

    if *connected_before {
        let _ = tx.send(ChangeSignal::new(ChangeKind::All));
    }
    *connected_before = true;

    let mut buffer: Vec<u8> = Vec::new();
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            chunk = body.next() => match chunk {
                Some(Ok(bytes)) => {
                    buffer.extend(bytes.iter().filter(|b| **b != b'\r'));
                    while let Some(frame) = take_frame(&mut buffer) {
                        if let Some(signal) = parse_frame(&frame) {
                            // No receivers just means the runtime has exited.
                            let _ = tx.send(signal);
                        }
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

/// Split the next blank-line terminated event off the front of `buffer`.
fn take_frame(buffer: &mut Vec<u8>) -> Option<String> {
    let end = buffer.windows(2).position(|w| w == b"\n\n")?;
    let frame: Vec<u8> = buffer.drain(..end + 2).collect();
    Some(String::from_utf8_lossy(&frame[..end]).into_owned())
}

/// A `data-update` event becomes a signal. Comments (keep-alives) and other
/// events are skipped. An unreadable payload still means "something changed".
fn parse_frame(frame: &str) -> Option<ChangeSignal> {
    let mut event = None;
    let mut data = String::new();
    for line in frame.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = Some(value),
            "data" => {
                if !data.is_empty() {
                    data.push('\n');
                }
                data.push_str(value);
            }
            _ => {}
        }
    }

    if event != Some(DATA_UPDATE_EVENT) {
        return None;
    }
    Some(
        serde_json::from_str(&data).unwrap_or_else(|e| {
            debug!(error = %e, "unreadable change payload");
            ChangeSignal::new(ChangeKind::All)
        }),
    )
}
