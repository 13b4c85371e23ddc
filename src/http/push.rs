//! Event Producer Boundary
//!
//! Internal endpoint through which the marketplace backend hands the
//! gateway an event for a user, after completing its own durable write
//! (chat-send handler, notification lifecycle code, booking-expiry
//! sweep). Delivery is advisory: the producer always gets `202` and
//! never observes the fan-out outcome.
//!
//! This route carries no credential of its own and must only be exposed
//! on an internal interface.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::gateway::events::PushEvent;
use crate::startup::AppState;

/// Producer request: target user plus the event to fan out.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub user_id: i64,
    pub event: PushEvent,
}

/// `POST /internal/push`
pub async fn push_to_user(
    State(state): State<AppState>,
    Json(request): Json<PushRequest>,
) -> StatusCode {
    tracing::debug!(
        user_id = request.user_id,
        kind = request.event.kind(),
        "push requested"
    );
    state.dispatcher.send_to_user(request.user_id, &request.event);
    StatusCode::ACCEPTED
}
