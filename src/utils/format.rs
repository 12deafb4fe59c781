//! Field parsing and formatting helpers

/// Parse a raw field string into a number of units.
///
/// Anything that is not a plain base-10 unsigned integer (empty input,
/// letters, a minus sign, overflow) counts as zero.
pub fn parse_field(raw: &str) -> u64 {
    raw.parse::<u64>().unwrap_or(0)
}

/// Render a field value as a two-digit zero-padded string
pub fn format_field(value: u64) -> String {
    if value < 10 {
        format!("0{}", value)
    } else {
        value.to_string()
    }
}

/// Total number of seconds represented by an hour/minute/second triple
pub fn total_seconds(hour: u64, minute: u64, second: u64) -> u64 {
    hour.saturating_mul(3600)
        .saturating_add(minute.saturating_mul(60))
        .saturating_add(second)
}

/// Format a second count as "HH:MM:SS"
pub fn format_hms(total: u64) -> String {
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{}:{}:{}", format_field(h), format_field(m), format_field(s))
}
