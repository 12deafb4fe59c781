//! Countdown Timer - A state-managed HTTP countdown timer
//!
//! This library provides a countdown state holder whose hour/minute/second
//! fields are decremented once per tick with borrow arithmetic, a pluggable
//! periodic scheduler that drives the ticks, and an HTTP surface that renders
//! the state and forwards user edits.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, TimerEvent, TimerState};
pub use api::create_router;
pub use tasks::{TickScheduler, TokioScheduler};
pub use utils::signals::shutdown_signal;
