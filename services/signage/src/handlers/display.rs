use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use counterate_domain::change::{ChangeKind, ChangeSignal, DATA_UPDATE_EVENT};
use counterate_domain::command::DrainedCommand;
use counterate_domain::identity::Role;
use counterate_domain::snapshot::DisplayState;

use crate::error::SignageServiceError;
use crate::handlers::{AuthedIdentity, require_role};
use crate::state::AppState;
use crate::usecase::command::DrainCommandUseCase;

// ── GET /display/snapshot ────────────────────────────────────────────────────

pub async fn get_snapshot(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Json<DisplayState> {
    let snapshot = state.snapshot_uc().execute(identity.id).await;
    Json(DisplayState::from(snapshot))
}

// ── POST /display/commands/drain ─────────────────────────────────────────────

pub async fn drain_command(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Result<Json<DrainedCommand>, SignageServiceError> {
    require_role(&identity, Role::Display)?;
    let uc = DrainCommandUseCase {
        resolver: state.resolver(),
        configs: state.config_repo(),
    };
    let command = uc.execute(identity.id).await?;
    Ok(Json(DrainedCommand { command }))
}

// ── GET /display/events ──────────────────────────────────────────────────────

/// Server-sent `data-update` events. A lagging subscriber gets one `ALL`
/// in place of the signals it missed.
pub async fn change_events(
    AuthedIdentity(identity): AuthedIdentity,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(identity_id = %identity.id, "terminal subscribed to change events");
    let stream = BroadcastStream::new(state.notifier.subscribe()).map(|item| {
        let signal = match item {
            Ok(signal) => signal,
            Err(_) => ChangeSignal::new(ChangeKind::All),
        };
        Ok(change_event(signal))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn change_event(signal: ChangeSignal) -> Event {
    Event::default()
        .event(DATA_UPDATE_EVENT)
        .json_data(signal)
        .unwrap_or_else(|_| Event::default().event(DATA_UPDATE_EVENT).data(r#"{"type":"ALL"}"#))
}
