//! Change notifications published by the timer state holder

use serde::{Deserialize, Serialize};

/// One of the three editable countdown fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Hour,
    Minute,
    Second,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        }
    }
}

/// Timer lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    FieldChanged { field: Field, value: String },
    Started { total_seconds: u64 },
    Ticked { display: String, remaining_seconds: u64 },
    Finished,
    Stopped { display: String },
}

impl TimerEvent {
    /// Short event name, used as the SSE event type
    pub fn kind(&self) -> &'static str {
        match self {
            TimerEvent::FieldChanged { .. } => "field_changed",
            TimerEvent::Started { .. } => "started",
            TimerEvent::Ticked { .. } => "ticked",
            TimerEvent::Finished => "finished",
            TimerEvent::Stopped { .. } => "stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = TimerEvent::FieldChanged {
            field: Field::Minute,
            value: "07".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "field_changed");
        assert_eq!(json["field"], "minute");
        assert_eq!(json["value"], "07");
        assert_eq!(event.kind(), "field_changed");

        let json = serde_json::to_value(TimerEvent::Finished).unwrap();
        assert_eq!(json["type"], TimerEvent::Finished.kind());
    }
}
