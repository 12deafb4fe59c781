//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{Field, TimerEvent, TimerState};
use crate::{
    config::Config,
    error::TimerError,
    tasks::{TickScheduler, TickerHandle},
    utils::format_hms,
};

/// Timer fields plus the id of the countdown run they belong to
#[derive(Debug, Default)]
struct Slot {
    state: TimerState,
    run: u64,
}

/// State shared between the holder and the ticker callbacks
#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    /// Latest timer state for watchers
    timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerState>,
    /// Lifecycle events for subscribers
    state_change_tx: broadcast::Sender<TimerEvent>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, Slot>, TimerError> {
        self.slot
            .lock()
            .map_err(|e| TimerError::poisoned("timer state", e))
    }

    fn publish(&self, snapshot: TimerState, event: TimerEvent) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
        // No subscribers is the common case
        if self.state_change_tx.send(event).is_err() {
            debug!("No event subscribers");
        }
    }

    fn on_tick(&self, run: u64, tick: u64) {
        let mut slot = match self.lock() {
            Ok(slot) => slot,
            Err(e) => {
                warn!("Dropping tick {}: {}", tick, e);
                return;
            }
        };

        if slot.run != run || !slot.state.running {
            debug!("Ignoring tick {} from stale run {}", tick, run);
            return;
        }

        let outcome = slot.state.tick();
        let snapshot = slot.state.clone();
        drop(slot);

        debug!("Tick {} ({:?}): {}", tick, outcome, snapshot.display());
        let event = TimerEvent::Ticked {
            display: snapshot.display(),
            remaining_seconds: snapshot.total_seconds(),
        };
        self.publish(snapshot, event);
    }

    fn on_complete(&self, run: u64) {
        let mut slot = match self.lock() {
            Ok(slot) => slot,
            Err(e) => {
                warn!("Dropping completion: {}", e);
                return;
            }
        };

        if slot.run != run {
            debug!("Ignoring completion from stale run {}", run);
            return;
        }

        slot.state.running = false;
        slot.state.finished = true;
        let snapshot = slot.state.clone();
        drop(slot);

        info!("Countdown finished at {}", snapshot.display());
        self.publish(snapshot, TimerEvent::Finished);
    }
}

/// Owns the countdown fields, the running flag and the active ticker
#[derive(Debug)]
pub struct AppState {
    shared: Arc<Shared>,
    scheduler: Arc<dyn TickScheduler>,
    ticker: Mutex<Option<TickerHandle>>,
    /// Time between two ticks
    pub tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// When the current or last countdown was started
    pub started_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the state holder from configuration
    pub fn new(config: &Config, scheduler: Arc<dyn TickScheduler>) -> Self {
        let initial = config.initial_state();
        let (timer_update_tx, timer_update_rx) = watch::channel(initial.clone());
        let (state_change_tx, _) = broadcast::channel(100);

        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot { state: initial, run: 0 }),
                timer_update_tx,
                _timer_update_rx: timer_update_rx,
                state_change_tx,
            }),
            scheduler,
            ticker: Mutex::new(None),
            tick_interval: config.tick_interval(),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            started_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace one field verbatim; rejected while the countdown runs
    pub fn set_field(&self, field: Field, value: &str) -> Result<TimerState, TimerError> {
        let mut slot = self.shared.lock()?;
        if slot.state.running {
            warn!("Rejected {} edit while running", field.as_str());
            return Err(TimerError::Busy(field.as_str()));
        }

        let target = match field {
            Field::Hour => &mut slot.state.hour,
            Field::Minute => &mut slot.state.minute,
            Field::Second => &mut slot.state.second,
        };
        *target = value.to_string();
        slot.state.finished = false;
        let snapshot = slot.state.clone();
        drop(slot); // Release the lock early

        debug!("Set {} to {:?}", field.as_str(), value);
        self.record_action(field.as_str());
        self.shared.publish(
            snapshot.clone(),
            TimerEvent::FieldChanged {
                field,
                value: value.to_string(),
            },
        );

        Ok(snapshot)
    }

    pub fn set_hour(&self, value: &str) -> Result<TimerState, TimerError> {
        self.set_field(Field::Hour, value)
    }

    pub fn set_minute(&self, value: &str) -> Result<TimerState, TimerError> {
        self.set_field(Field::Minute, value)
    }

    pub fn set_second(&self, value: &str) -> Result<TimerState, TimerError> {
        self.set_field(Field::Second, value)
    }

    /// Start when idle, stop when running
    ///
    /// Stopping on the second toggle goes beyond a plain flag flip: the ticker
    /// is cancelled as well, see `stop`.
    pub fn toggle_running(&self) -> Result<TimerState, TimerError> {
        if self.snapshot()?.running {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Begin a countdown from the current field values
    pub fn start(&self) -> Result<TimerState, TimerError> {
        let mut slot = self.shared.lock()?;
        if slot.state.running {
            warn!("Start requested while a countdown is running");
            return Err(TimerError::AlreadyRunning);
        }

        slot.state.normalize();
        let total_seconds = slot.state.total_seconds();
        slot.state.running = true;
        slot.state.finished = false;
        slot.run += 1;
        let run = slot.run;
        let snapshot = slot.state.clone();
        drop(slot);

        info!(
            "Starting countdown from {} ({} seconds, {})",
            snapshot.display(),
            total_seconds,
            format_hms(total_seconds)
        );
        self.record_action("start");
        if let Ok(mut started_at) = self.started_at.lock() {
            *started_at = Some(Utc::now());
        }
        self.shared
            .publish(snapshot.clone(), TimerEvent::Started { total_seconds });

        let tick_shared = Arc::clone(&self.shared);
        let complete_shared = Arc::clone(&self.shared);
        let handle = self.scheduler.schedule(
            self.tick_interval,
            total_seconds,
            Box::new(move |tick| tick_shared.on_tick(run, tick)),
            Box::new(move || complete_shared.on_complete(run)),
        );

        // Lock order is ticker then slot; stop and the callbacks never nest them
        let mut ticker = match self.ticker.lock() {
            Ok(ticker) => ticker,
            Err(e) => {
                handle.cancel();
                return Err(TimerError::poisoned("ticker", e));
            }
        };
        let current = match self.shared.lock() {
            Ok(slot) => slot.run,
            Err(e) => {
                handle.cancel();
                return Err(e);
            }
        };
        if current != run {
            // Stopped or restarted while scheduling; the newer run owns the ticker
            debug!("Run {} superseded by run {}, cancelling its ticker", run, current);
            handle.cancel();
        } else if let Some(previous) = ticker.replace(handle) {
            previous.cancel();
        }

        Ok(snapshot)
    }

    /// Abort the running countdown, keeping the fields where they are
    ///
    /// This is an extension: a countdown normally only ends through its
    /// completion callback. Stopping cancels the ticker so no stale tick can
    /// touch fields the user is editing again.
    pub fn stop(&self) -> Result<TimerState, TimerError> {
        let mut slot = self.shared.lock()?;
        if !slot.state.running {
            return Err(TimerError::NotRunning);
        }

        slot.state.running = false;
        slot.run += 1;
        let snapshot = slot.state.clone();
        drop(slot);

        self.cancel_ticker();
        info!("Countdown stopped at {}", snapshot.display());
        self.record_action("stop");
        self.shared.publish(
            snapshot.clone(),
            TimerEvent::Stopped {
                display: snapshot.display(),
            },
        );

        Ok(snapshot)
    }

    /// Stop the ticker for good; called when the owner is torn down
    pub fn shutdown(&self) {
        if let Ok(mut slot) = self.shared.lock() {
            slot.run += 1;
            slot.state.running = false;
        }
        self.cancel_ticker();
        info!("Timer state holder shut down");
    }

    fn cancel_ticker(&self) {
        match self.ticker.lock() {
            Ok(mut ticker) => {
                if let Some(handle) = ticker.take() {
                    handle.cancel();
                }
            }
            Err(e) => warn!("Failed to lock ticker: {}", e),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get current timer state
    pub fn snapshot(&self) -> Result<TimerState, TimerError> {
        self.shared.lock().map(|slot| slot.state.clone())
    }

    /// Watch the latest timer state
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.timer_update_tx.subscribe()
    }

    /// Receive every lifecycle event from now on
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.shared.state_change_tx.subscribe()
    }

    /// Whether a ticker task is still alive
    pub fn ticker_active(&self) -> bool {
        self.ticker
            .lock()
            .map(|ticker| ticker.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    pub fn get_started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at.lock().ok().and_then(|t| *t)
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
