//! The canonical schedule event type.
//!
//! Every supported wire format is mapped into [`ScheduleEvent`], a flat,
//! format-independent value object. Records are constructed once by an
//! extraction routine and never mutated afterwards; they carry no references
//! to each other.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single schedule entry, normalized from one of the supported formats.
///
/// Field semantics:
/// - `start` is the event start normalized to UTC.
/// - `start_str`/`end_str` are the source-local wall-clock times ("HH:MM"),
///   derived before any UTC conversion, for display.
/// - `start_unix`/`end_unix` are epoch seconds. How they are derived differs
///   by source format; see the extraction routines.
/// - `is_from_cfp` exists only for sources that carry it. When `None` the
///   field is omitted from serialized output entirely, so callers must not
///   assume its presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Event start, normalized to UTC.
    pub start: DateTime<Utc>,
    /// Source-local wall-clock start time, "HH:MM".
    pub start_str: String,
    /// Source-local wall-clock end time, "HH:MM".
    pub end_str: String,
    /// Start as epoch seconds.
    pub start_unix: i64,
    /// End as epoch seconds.
    pub end_unix: i64,
    /// Event length in whole minutes.
    pub duration: i64,
    /// Event title.
    pub title: String,
    /// Track name, empty when the source has none.
    pub track: String,
    /// Room or venue, empty when the source has none.
    pub place: String,
    /// Abstract or description, empty when the source has none.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Speaker names in source order.
    pub speakers: Vec<String>,
    /// Language tag, empty when the source format has no language field.
    pub lang: String,
    /// Stable identifier from the source, coerced to a string.
    pub id: String,
    /// Whether the event came in through a call for participation.
    /// Only present for sources that carry the flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_from_cfp: Option<bool>,
    /// Caller-supplied label stamped on every record of one fetch.
    pub group: String,
}

impl ScheduleEvent {
    /// Returns the event end as a UTC instant (`start + duration`).
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration)
    }

    /// Returns true if any speaker is attached to this event.
    pub fn has_speakers(&self) -> bool {
        !self.speakers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> ScheduleEvent {
        ScheduleEvent {
            start: Utc.with_ymd_and_hms(2024, 5, 31, 9, 0, 0).unwrap(),
            start_str: "10:00".to_string(),
            end_str: "11:00".to_string(),
            start_unix: 1_717_146_000,
            end_unix: 1_717_149_600,
            duration: 60,
            title: "Opening".to_string(),
            track: "Main".to_string(),
            place: "Stage A".to_string(),
            abstract_text: "Welcome talk".to_string(),
            speakers: vec!["Jane Doe".to_string()],
            lang: "en".to_string(),
            id: "42".to_string(),
            is_from_cfp: None,
            group: "emf2024".to_string(),
        }
    }

    #[test]
    fn end_follows_from_start_and_duration() {
        let event = sample_event();
        assert_eq!(
            event.end(),
            Utc.with_ymd_and_hms(2024, 5, 31, 10, 0, 0).unwrap()
        );
        assert_eq!(event.end().timestamp(), event.start.timestamp() + 3600);
    }

    #[test]
    fn has_speakers() {
        let mut event = sample_event();
        assert!(event.has_speakers());
        event.speakers.clear();
        assert!(!event.has_speakers());
    }

    #[test]
    fn serde_roundtrip() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ScheduleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn abstract_serializes_under_wire_name() {
        let event = sample_event();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["abstract"], "Welcome talk");
        assert!(value.get("abstract_text").is_none());
    }

    #[test]
    fn absent_cfp_flag_is_omitted() {
        let event = sample_event();
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("is_from_cfp").is_none());

        let mut flagged = sample_event();
        flagged.is_from_cfp = Some(true);
        let value = serde_json::to_value(&flagged).unwrap();
        assert_eq!(value["is_from_cfp"], true);
    }
}
