//! Terminal agent runtime.
//!
//! Bootstraps a unit's snapshot, then keeps it fresh from three sources: change
//! signals (latency), a fixed poll (liveness) and the command mailbox. Change
//! signals never carry data; every refresh re-pulls the whole snapshot.
#![allow(async_fn_in_trait)]

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use counterate_domain::change::ChangeSignal;
use counterate_domain::command::Command;
use counterate_domain::snapshot::DisplayState;

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("session rejected by the service")]
    SessionRejected,
    #[error("unexpected response status {0}")]
    Status(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// The service as seen from a terminal.
pub trait TerminalPort: Send + Sync {
    async fn fetch_state(&self) -> Result<DisplayState, TerminalError>;
    async fn drain_command(&self) -> Result<Option<Command>, TerminalError>;
}

/// Where a terminal puts what it fetched.
pub trait Screen: Send {
    fn render(&mut self, state: &DisplayState);
    /// Nothing could be fetched yet; show the "data unavailable" screen.
    fn unavailable(&mut self);
}

#[derive(Debug, Clone, Copy)]
pub struct Intervals {
    pub poll: Duration,
    pub command: Duration,
}

impl Intervals {
    pub fn from_secs(poll: u64, command: u64) -> Self {
        Self {
            poll: Duration::from_secs(poll.max(1)),
            command: Duration::from_secs(command.max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Cancelled,
    Logout,
    SessionRejected,
}

struct Session<'a, P, S> {
    port: &'a P,
    screen: &'a mut S,
    rendered: bool,
}

impl<P: TerminalPort, S: Screen> Session<'_, P, S> {
    /// Re-pull and render. A transient failure keeps the last good render.
    async fn refresh(&mut self) -> Option<ExitReason> {
        match self.port.fetch_state().await {
            Ok(state) => {
                self.screen.render(&state);
                self.rendered = true;
                None
            }
            Err(TerminalError::SessionRejected) => Some(ExitReason::SessionRejected),
            Err(e) => {
                warn!(error = %e, "snapshot fetch failed");
                if !self.rendered {
                    self.screen.unavailable();
                }
                None
            }
        }
    }

    /// Fresh render from scratch, as on first load.
    async fn bootstrap(&mut self) -> Option<ExitReason> {
        self.rendered = false;
        self.refresh().await
    }
}

fn interval(period: Duration) -> time::Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Drive one terminal session until it is cancelled, logged out or rejected.
pub async fn run<P: TerminalPort, S: Screen>(
    port: &P,
    screen: &mut S,
    mut changes: broadcast::Receiver<ChangeSignal>,
    intervals: Intervals,
    cancel: CancellationToken,
) -> ExitReason {
    let mut session = Session {
        port,
        screen,
        rendered: false,
    };
    if let Some(reason) = session.bootstrap().await {
        return reason;
    }

    let mut poll = interval(intervals.poll);
    let mut mailbox = interval(intervals.command);
    let mut push_open = true;

    loop {
        let exit = tokio::select! {
            biased;
            _ = cancel.cancelled() => Some(ExitReason::Cancelled),
            _ = mailbox.tick() => match port.drain_command().await {
                Ok(Some(Command::Logout)) => {
                    info!("logout requested");
                    Some(ExitReason::Logout)
                }
                Ok(Some(Command::Reload)) => {
                    info!("reload requested");
                    poll.reset();
                    session.bootstrap().await
                }
                Ok(None) => None,
                Err(TerminalError::SessionRejected) => Some(ExitReason::SessionRejected),
                Err(e) => {
                    warn!(error = %e, "command poll failed");
                    None
                }
            },
            signal = changes.recv(), if push_open => match signal {
                Ok(signal) => {
                    debug!(kind = ?signal.kind, "change signal");
                    session.refresh().await
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "change signals lagged");
                    session.refresh().await
                }
                Err(RecvError::Closed) => {
                    warn!("change channel closed, polling only");
                    push_open = false;
                    None
                }
            },
            _ = poll.tick() => session.refresh().await,
        };
        if let Some(reason) = exit {
            return reason;
        }
    }
}
