//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};

use super::responses::{
    AddTimeRequest, ApiError, ApiResponse, ChainQuery, ChainedPreset, DurationRequest,
    HealthResponse, PresetsResponse, StatusResponse,
};
use crate::{engine::Action, state::AppState};

type ActionResult = Result<Json<ApiResponse>, ApiError>;

/// Dispatch `action` and wrap the outcome for the client
async fn run_action(state: &AppState, action: Action, message: String) -> ActionResult {
    match state.dispatch(action).await {
        Ok(timer) => {
            info!("{} endpoint called - {}", action.name(), message);
            Ok(Json(ApiResponse::ok(message, timer)))
        }
        Err(e) => {
            warn!("{} endpoint rejected: {}", action.name(), e);
            Err(ApiError::from_dispatch(&e, state.snapshot()))
        }
    }
}

/// Turn an extractor failure into the same error body the engine produces
fn reject_input(state: &AppState, endpoint: &str, message: String) -> ApiError {
    warn!("{} endpoint rejected input: {}", endpoint, message);
    ApiError::invalid_input(message, state.snapshot())
}

/// Handle PUT /duration - Set the duration of the next run
pub async fn configure_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DurationRequest>, JsonRejection>,
) -> ActionResult {
    let Json(req) = payload.map_err(|e| reject_input(&state, "configure", e.body_text()))?;
    let action = Action::Configure {
        minutes: req.minutes,
        seconds: req.seconds,
    };
    run_action(&state, action, format!("Duration set to {}m {}s", req.minutes, req.seconds)).await
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    run_action(&state, Action::Start, "Timer started".to_string()).await
}

/// Handle POST /pause - Pause the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    run_action(&state, Action::Pause, "Timer paused".to_string()).await
}

/// Handle POST /resume - Resume a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    run_action(&state, Action::Resume, "Timer resumed".to_string()).await
}

/// Handle POST /reset - Stop and return to the configured duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    run_action(&state, Action::Reset, "Timer reset".to_string()).await
}

/// Handle POST /add-time - Extend the running countdown
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddTimeRequest>, JsonRejection>,
) -> ActionResult {
    let Json(req) = payload.map_err(|e| reject_input(&state, "add-time", e.body_text()))?;
    let seconds = req.total_seconds();
    run_action(&state, Action::AddTime { seconds }, format!("Added {}s", seconds)).await
}

/// Handle POST /preset/:minutes - Select a single preset
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    minutes: Result<Path<u32>, PathRejection>,
) -> ActionResult {
    let Path(minutes) = minutes.map_err(|e| reject_input(&state, "preset", e.body_text()))?;
    let message = format!("Preset set to {} minutes", minutes);
    run_action(&state, Action::SelectPreset { minutes }, message).await
}

/// Handle POST /chain - Select a chained preset, defaulting to the configured one
pub async fn chain_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> ActionResult {
    let Query(query) = query.map_err(|e| reject_input(&state, "chained-preset", e.body_text()))?;
    let first_minutes = query.first.unwrap_or(state.chain_first);
    let second_minutes = query.second.unwrap_or(state.chain_second);
    let action = Action::SelectChainedPreset {
        first_minutes,
        second_minutes,
    };
    let message = format!(
        "Chained preset set: {} minutes then {} minutes",
        first_minutes, second_minutes
    );
    run_action(&state, action, message).await
}

/// Handle GET /presets - List the presets clients can offer
pub async fn presets_handler(State(state): State<Arc<AppState>>) -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: state.presets.clone(),
        chained: ChainedPreset {
            first_minutes: state.chain_first,
            second_minutes: state.chain_second,
        },
    })
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.snapshot(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream every published snapshot as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        // The current value goes out immediately, later ones on change
        if !first {
            rx.changed().await.ok()?;
        }
        let snapshot = rx.borrow_and_update().clone();
        let event = Event::default()
            .event("timer")
            .json_data(&snapshot)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
        Some((Ok::<_, Infallible>(event), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
