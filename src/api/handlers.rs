//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, Field, TimerEvent},
};
use super::responses::{ApiResponse, FieldUpdate, HealthResponse, StatusResponse, TimerView};

/// Handle PUT /timer/:field - Replace one countdown field
pub async fn set_field_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<Field>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<ApiResponse>, TimerError> {
    let timer_state = state.set_field(field, &update.value).map_err(|e| {
        warn!("Failed to set {}: {}", field.as_str(), e);
        e
    })?;

    Ok(Json(ApiResponse::idle(
        format!("{} set to {}", field.as_str(), update.value),
        &timer_state,
    )))
}

/// Handle POST /timer/toggle - Start when idle, stop when running
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, TimerError> {
    match state.toggle_running() {
        Ok(timer_state) => {
            info!("Toggle endpoint called - running={}", timer_state.running);
            let message = if timer_state.running {
                "Countdown started"
            } else {
                "Countdown stopped"
            };
            Ok(Json(ApiResponse::from_state(message.to_string(), &timer_state)))
        }
        Err(e) => {
            error!("Failed to toggle countdown: {}", e);
            Err(e)
        }
    }
}

/// Handle POST /timer/start - Begin a countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, TimerError> {
    match state.start() {
        Ok(timer_state) => {
            info!("Start endpoint called - countdown from {}", timer_state.display());
            Ok(Json(ApiResponse::from_state(
                "Countdown started".to_string(),
                &timer_state,
            )))
        }
        Err(e) => {
            warn!("Failed to start countdown: {}", e);
            Err(e)
        }
    }
}

/// Handle POST /timer/stop - Abort the running countdown
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, TimerError> {
    match state.stop() {
        Ok(timer_state) => {
            info!("Stop endpoint called - countdown held at {}", timer_state.display());
            Ok(Json(ApiResponse::idle(
                "Countdown stopped".to_string(),
                &timer_state,
            )))
        }
        Err(e) => {
            warn!("Failed to stop countdown: {}", e);
            Err(e)
        }
    }
}

/// Handle GET /timer - Return current timer status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, TimerError> {
    let timer_state = state.snapshot().map_err(|e| {
        error!("Failed to get timer state: {}", e);
        e
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: TimerView::from(&timer_state),
        started_at: state.get_started_at(),
        tick_interval_ms: state.tick_interval.as_millis() as u64,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream timer events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_events();

    let events = stream::unfold(rx, |mut rx| async move {
        let event = next_event(&mut rx).await?;
        let sse = Event::default()
            .event(event.kind())
            .json_data(&event)
            .unwrap_or_else(|e| {
                warn!("Failed to encode {} event: {}", event.kind(), e);
                Event::default().comment("encoding error")
            });
        Some((Ok::<_, Infallible>(sse), rx))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Next event for a subscriber, skipping over anything it lagged behind on
async fn next_event(rx: &mut broadcast::Receiver<TimerEvent>) -> Option<TimerEvent> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event stream lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_changed(value: &str) -> TimerEvent {
        TimerEvent::FieldChanged {
            field: Field::Second,
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn lagging_subscriber_resumes_at_oldest_retained_event() {
        let (tx, mut rx) = broadcast::channel(2);
        for value in ["1", "2", "3", "4"] {
            tx.send(field_changed(value)).unwrap();
        }

        assert_eq!(next_event(&mut rx).await, Some(field_changed("3")));
        assert_eq!(next_event(&mut rx).await, Some(field_changed("4")));

        drop(tx);
        assert_eq!(next_event(&mut rx).await, None);
    }
}
