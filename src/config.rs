//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::TimerState;

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A state-managed HTTP countdown timer")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial hour field
    #[arg(long, default_value = "00")]
    pub hour: String,

    /// Initial minute field
    #[arg(long, default_value = "00")]
    pub minute: String,

    /// Initial second field
    #[arg(long, default_value = "05")]
    pub second: String,

    /// Milliseconds between two countdown ticks
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Idle timer state holding the configured field values
    pub fn initial_state(&self) -> TimerState {
        TimerState::with_fields(&self.hour, &self.minute, &self.second)
    }
}

impl Default for Config {
    fn default() -> Self {
        Parser::parse_from(["countdown-timer"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_timer() {
        let config = Config::default();
        assert_eq!(config.port, 20554);
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.initial_state(), TimerState::new());
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "countdown-timer", "--minute", "01", "--second", "00", "--tick-ms", "10", "-v",
        ])
        .unwrap();
        assert_eq!(config.initial_state().display(), "00:01:00");
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Config::try_parse_from(["countdown-timer", "--tick-ms", "0"]).is_err());
    }
}
