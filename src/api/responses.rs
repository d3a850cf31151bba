//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{TimerError, TimerSnapshot},
    state::DispatchError,
};

/// API response structure for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a success response
    pub fn ok(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerSnapshot) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Rejected action, rendered as an error [`ApiResponse`]
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiResponse,
}

impl ApiError {
    pub fn from_dispatch(error: &DispatchError, timer: TimerSnapshot) -> Self {
        Self {
            status: status_for(error),
            body: ApiResponse::error(error.to_string(), timer),
        }
    }
}

impl ApiError {
    /// Request that never reached the engine because it could not be parsed
    pub fn invalid_input(message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ApiResponse::error(message, timer),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Map a dispatch failure onto an HTTP status code
pub fn status_for(error: &DispatchError) -> StatusCode {
    match error {
        DispatchError::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        DispatchError::Rejected(e) => match e {
            TimerError::InvalidTransition { .. }
            | TimerError::Busy
            | TimerError::ChainPending
            | TimerError::NotRunning => StatusCode::CONFLICT,
            TimerError::NoDuration | TimerError::InvalidAmount { .. } | TimerError::InvalidPreset => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        },
    }
}

/// Body of `PUT /duration`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

/// Body of `POST /add-time`; both parts are summed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AddTimeRequest {
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub seconds: i64,
}

impl AddTimeRequest {
    pub fn total_seconds(&self) -> i64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }
}

/// Query of `POST /chain`; missing values fall back to the configured chain
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChainQuery {
    pub first: Option<u32>,
    pub second: Option<u32>,
}

/// Enhanced status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainedPreset {
    pub first_minutes: u32,
    pub second_minutes: u32,
}

/// Presets offered to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsResponse {
    pub presets: Vec<u32>,
    pub chained: ChainedPreset,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Status;

    #[test]
    fn conflicts_and_invalid_input_map_differently() {
        let busy = DispatchError::Rejected(TimerError::Busy);
        assert_eq!(status_for(&busy), StatusCode::CONFLICT);

        let transition = DispatchError::Rejected(TimerError::InvalidTransition {
            action: "pause",
            status: Status::Idle,
        });
        assert_eq!(status_for(&transition), StatusCode::CONFLICT);

        let amount = DispatchError::Rejected(TimerError::InvalidAmount { seconds: -1 });
        assert_eq!(status_for(&amount), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(
            status_for(&DispatchError::EngineUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn add_time_sums_minutes_and_seconds() {
        let req = AddTimeRequest { minutes: 1, seconds: 30 };
        assert_eq!(req.total_seconds(), 90);
        let req = AddTimeRequest { minutes: 0, seconds: -10 };
        assert_eq!(req.total_seconds(), -10);
    }

    #[test]
    fn unparseable_input_is_unprocessable() {
        let api = ApiError::invalid_input("bad body".to_string(), TimerSnapshot::default());
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.body.status, "error");
        assert_eq!(api.body.message, "bad body");
    }

    #[test]
    fn error_message_is_caller_visible() {
        let err = DispatchError::Rejected(TimerError::NoDuration);
        let api = ApiError::from_dispatch(&err, TimerSnapshot::default());
        assert_eq!(api.body.status, "error");
        assert_eq!(api.body.message, "set a duration first");
    }
}
