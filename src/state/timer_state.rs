//! Timer state structure and the per-tick countdown arithmetic

use serde::{Deserialize, Serialize};

use crate::utils::{format_field, format_hms, parse_field, total_seconds};

/// Message shown once the countdown has drained to zero
pub const TIME_UP_MESSAGE: &str = "Time up!!";

/// Which borrow tier a tick went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds were decremented
    Second,
    /// A minute was borrowed into 59 seconds
    Minute,
    /// An hour was borrowed into 59:59
    Hour,
    /// Everything was already zero, nothing changed
    Idle,
}

/// Countdown fields as the user sees them
///
/// While idle the fields hold whatever the user typed. While running they
/// are always two-digit renderings of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub running: bool,
    /// Set when a countdown ran to completion, cleared by the next edit or start
    pub finished: bool,
}

impl TimerState {
    /// Create the initial state: "00:00:05", idle
    pub fn new() -> Self {
        Self::with_fields("00", "00", "05")
    }

    /// Create an idle state with the given raw field values
    pub fn with_fields(hour: &str, minute: &str, second: &str) -> Self {
        Self {
            hour: hour.to_string(),
            minute: minute.to_string(),
            second: second.to_string(),
            running: false,
            finished: false,
        }
    }

    /// Apply one second of countdown using the borrow chain
    pub fn tick(&mut self) -> TickOutcome {
        let second = parse_field(&self.second);
        let minute = parse_field(&self.minute);
        let hour = parse_field(&self.hour);

        if second > 0 {
            self.second = format_field(second - 1);
            TickOutcome::Second
        } else if minute > 0 {
            self.minute = format_field(minute - 1);
            self.second = "59".to_string();
            TickOutcome::Minute
        } else if hour > 0 {
            self.hour = format_field(hour - 1);
            self.minute = "59".to_string();
            self.second = "59".to_string();
            TickOutcome::Hour
        } else {
            TickOutcome::Idle
        }
    }

    /// Re-render every field through parse/format so each one is numeric
    pub fn normalize(&mut self) {
        self.hour = format_field(parse_field(&self.hour));
        self.minute = format_field(parse_field(&self.minute));
        self.second = format_field(parse_field(&self.second));
    }

    /// Total seconds represented by the current fields
    pub fn total_seconds(&self) -> u64 {
        total_seconds(
            parse_field(&self.hour),
            parse_field(&self.minute),
            parse_field(&self.second),
        )
    }

    /// Remaining seconds of an active countdown
    pub fn remaining_seconds(&self) -> Option<u64> {
        if self.running {
            Some(self.total_seconds())
        } else {
            None
        }
    }

    /// "HH:MM:SS" built from the raw fields
    pub fn display(&self) -> String {
        format!("{}:{}:{}", self.hour, self.minute, self.second)
    }

    /// Canonical "HH:MM:SS" of the total, even for out-of-range minutes
    pub fn canonical_display(&self) -> String {
        format_hms(self.total_seconds())
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    /// All fields are zero on a countdown that is running or just finished
    pub fn time_up(&self) -> bool {
        (self.running || self.finished) && self.is_zero()
    }

    pub fn message(&self) -> Option<&'static str> {
        if self.time_up() {
            Some(TIME_UP_MESSAGE)
        } else {
            None
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(h: &str, m: &str, s: &str) -> TimerState {
        TimerState::with_fields(h, m, s)
    }

    fn fields(state: &TimerState) -> (&str, &str, &str) {
        (&state.hour, &state.minute, &state.second)
    }

    #[test]
    fn defaults() {
        let state = TimerState::default();
        assert_eq!(fields(&state), ("00", "00", "05"));
        assert!(!state.running);
        assert_eq!(state.message(), None);
    }

    #[test]
    fn second_tier() {
        let mut s = state("00", "00", "05");
        assert_eq!(s.tick(), TickOutcome::Second);
        assert_eq!(fields(&s), ("00", "00", "04"));
        for _ in 0..4 {
            s.tick();
        }
        assert_eq!(fields(&s), ("00", "00", "00"));
    }

    #[test]
    fn minute_borrow() {
        let mut s = state("00", "01", "00");
        assert_eq!(s.tick(), TickOutcome::Minute);
        assert_eq!(fields(&s), ("00", "00", "59"));
    }

    #[test]
    fn hour_borrow() {
        let mut s = state("01", "00", "00");
        assert_eq!(s.tick(), TickOutcome::Hour);
        assert_eq!(fields(&s), ("00", "59", "59"));
    }

    #[test]
    fn zero_is_a_fixed_point() {
        let mut s = state("00", "00", "00");
        assert_eq!(s.tick(), TickOutcome::Idle);
        assert_eq!(fields(&s), ("00", "00", "00"));
    }

    #[test]
    fn ticks_match_total_seconds() {
        for (h, m, sec) in [(0u64, 0u64, 0u64), (0, 0, 7), (0, 2, 3), (1, 0, 1), (2, 59, 59)] {
            let mut s = state(&format_field(h), &format_field(m), &format_field(sec));
            let total = s.total_seconds();
            assert_eq!(total, h * 3600 + m * 60 + sec);
            for remaining in (0..total).rev() {
                assert_ne!(s.tick(), TickOutcome::Idle);
                assert_eq!(s.total_seconds(), remaining);
            }
            assert!(s.is_zero());
            assert_eq!(fields(&s), ("00", "00", "00"));
        }
    }

    #[test]
    fn out_of_range_minutes_count_literally() {
        let mut s = state("00", "99", "00");
        assert_eq!(s.total_seconds(), 99 * 60);
        s.tick();
        assert_eq!(fields(&s), ("00", "98", "59"));
    }

    #[test]
    fn normalize_coerces_garbage() {
        let mut s = state("abc", "7", "");
        s.normalize();
        assert_eq!(fields(&s), ("00", "07", "00"));
    }

    #[test]
    fn time_up_needs_an_active_or_finished_run() {
        let mut s = state("00", "00", "00");
        assert!(!s.time_up());
        s.running = true;
        assert_eq!(s.message(), Some(TIME_UP_MESSAGE));
        s.running = false;
        s.finished = true;
        assert!(s.time_up());
    }

    #[test]
    fn displays() {
        let mut s = state("1", "99", "00");
        assert_eq!(s.display(), "1:99:00");
        assert_eq!(s.canonical_display(), "02:39:00");
        assert_eq!(s.remaining_seconds(), None);
        s.running = true;
        assert_eq!(s.remaining_seconds(), Some(3600 + 99 * 60));
    }
}
