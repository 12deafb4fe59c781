//! Background tasks module
//!
//! This module contains the periodic ticker that drives the countdown.

pub mod ticker;

// Re-export main types
pub use ticker::{CompleteCallback, TickCallback, TickScheduler, TickerHandle, TokioScheduler};
