//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::TimerError, state::TimerState};

/// Body of a field edit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

/// What the screen shows for a timer state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub running: bool,
    pub display: String,
    /// Total time rendered as HH:MM:SS, carrying minutes/seconds above 59
    pub canonical: String,
    pub message: Option<String>,
    pub remaining_seconds: Option<u64>,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            hour: state.hour.clone(),
            minute: state.minute.clone(),
            second: state.second.clone(),
            running: state.running,
            display: state.display(),
            canonical: state.canonical_display(),
            message: state.message().map(str::to_string),
            remaining_seconds: state.remaining_seconds(),
        }
    }
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: &TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer: TimerView::from(state),
        }
    }

    /// Response for a state in which the countdown runs
    pub fn running(message: String, state: &TimerState) -> Self {
        Self::new("running".to_string(), message, state)
    }

    /// Response for an idle state
    pub fn idle(message: String, state: &TimerState) -> Self {
        Self::new("idle".to_string(), message, state)
    }

    /// Pick running/idle from the state itself
    pub fn from_state(message: String, state: &TimerState) -> Self {
        if state.running {
            Self::running(message, state)
        } else {
            Self::idle(message, state)
        }
    }
}

/// Body returned when an operation is rejected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = if self.is_conflict() {
            StatusCode::CONFLICT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub started_at: Option<DateTime<Utc>>,
    pub tick_interval_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
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
