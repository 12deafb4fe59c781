//! State management module
//!
//! This module contains the countdown data model, its change events and the
//! state holder that drives them.

pub mod app_state;
pub mod events;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use events::{Field, TimerEvent};
pub use timer_state::{TickOutcome, TimerState, TIME_UP_MESSAGE};
