//! Extraction routine for flat JSON event lists (EMF-style).
//!
//! The input is a top-level array of event objects. Parsing happens in two
//! stages so the error taxonomy stays honest: bytes that are not valid JSON
//! abort with a `Format` error, an element that does not match the expected
//! event shape aborts with a `Field` error.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use schedfeed_core::{ParsedStamp, ScheduleEvent, whole_minutes};

use crate::error::{ImportError, ImportResult};

/// One event object as published in the feed.
#[derive(Debug, Deserialize)]
struct RawEmfEvent {
    start_date: String,
    end_date: String,
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    pronouns: Option<String>,
    title: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    venue: String,
    #[serde(default)]
    description: String,
    id: Value,
    is_from_cfp: bool,
}

/// Extracts all events from raw JSON bytes.
pub fn extract(raw: &[u8], group: &str) -> ImportResult<Vec<ScheduleEvent>> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| ImportError::format("invalid JSON").with_source(e))?;

    let Value::Array(items) = value else {
        return Err(ImportError::format("expected a top-level array of events"));
    };

    let mut events = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let raw_event: RawEmfEvent = serde_json::from_value(item)
            .map_err(|e| ImportError::field(format!("event #{}: {}", index, e)))?;
        events.push(map_event(raw_event, group)?);
    }

    debug!(count = events.len(), group = %group, "extracted JSON schedule");
    Ok(events)
}

/// Maps one feed object to the canonical record.
///
/// Unlike the frab path, the epoch fields here are derived from the
/// wall clock exactly as published, with no UTC conversion first.
/// Unifying the two paths would change output for non-UTC sources, so the
/// difference is kept.
fn map_event(raw: RawEmfEvent, group: &str) -> ImportResult<ScheduleEvent> {
    let id = match raw.id {
        Value::String(s) => s,
        other => other.to_string(),
    };

    let start = ParsedStamp::parse(&raw.start_date)
        .map_err(|e| ImportError::field(format!("event {}: start_date: {}", id, e)))?;
    let end = ParsedStamp::parse(&raw.end_date)
        .map_err(|e| ImportError::field(format!("event {}: end_date: {}", id, e)))?;
    let duration = start.until(&end);

    Ok(ScheduleEvent {
        start: start.utc(),
        start_str: start.wall_clock_str(),
        end_str: end.wall_clock_str(),
        start_unix: start.unix_from_wall_clock(),
        end_unix: end.unix_from_wall_clock(),
        duration: whole_minutes(duration),
        title: raw.title,
        track: raw.kind,
        place: raw.venue,
        abstract_text: raw.description,
        speakers: speaker_entries(raw.speaker.as_deref(), raw.pronouns.as_deref()),
        lang: String::new(), // this feed carries no language field
        id,
        is_from_cfp: Some(raw.is_from_cfp),
        group: group.to_string(),
    })
}

/// Builds the speaker list: this format carries at most one speaker, with
/// pronouns folded into the name when both are present.
fn speaker_entries(speaker: Option<&str>, pronouns: Option<&str>) -> Vec<String> {
    let Some(name) = speaker.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match pronouns.filter(|p| !p.is_empty()) {
        Some(pronouns) => vec![format!("{} - {}", name, pronouns)],
        None => vec![name.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportErrorKind;

    const SAMPLE: &str = r#"[
      {
        "id": 338,
        "title": "Opening Ceremony",
        "type": "Talk",
        "venue": "Stage A",
        "description": "Welcome to the camp.",
        "speaker": "Jane Doe",
        "pronouns": "she/her",
        "start_date": "2024-05-31 10:00:00",
        "end_date": "2024-05-31 11:00:00",
        "is_from_cfp": false
      },
      {
        "id": "workshop-9",
        "title": "Soldering for Beginners",
        "type": "Workshop",
        "venue": "Workshop Tent",
        "description": "",
        "speaker": null,
        "pronouns": null,
        "start_date": "2024-05-31 11:30:00",
        "end_date": "2024-05-31 12:15:00",
        "is_from_cfp": true
      }
    ]"#;

    fn extract_sample() -> Vec<ScheduleEvent> {
        extract(SAMPLE.as_bytes(), "emf2024").unwrap()
    }

    mod fields {
        use super::*;

        #[test]
        fn wire_names_map_to_canonical_names() {
            let events = extract_sample();
            let opening = &events[0];

            assert_eq!(opening.title, "Opening Ceremony");
            assert_eq!(opening.track, "Talk");
            assert_eq!(opening.place, "Stage A");
            assert_eq!(opening.abstract_text, "Welcome to the camp.");
            assert_eq!(opening.group, "emf2024");
        }

        #[test]
        fn lang_is_always_empty() {
            for event in extract_sample() {
                assert_eq!(event.lang, "");
            }
        }

        #[test]
        fn id_is_coerced_to_string() {
            let events = extract_sample();
            assert_eq!(events[0].id, "338");
            assert_eq!(events[1].id, "workshop-9");
        }

        #[test]
        fn cfp_flag_is_passed_through() {
            let events = extract_sample();
            assert_eq!(events[0].is_from_cfp, Some(false));
            assert_eq!(events[1].is_from_cfp, Some(true));
        }
    }

    mod speakers {
        use super::*;

        #[test]
        fn pronouns_fold_into_the_name() {
            let events = extract_sample();
            assert_eq!(events[0].speakers, ["Jane Doe - she/her"]);
        }

        #[test]
        fn null_speaker_means_no_speakers() {
            let events = extract_sample();
            assert!(events[1].speakers.is_empty());
        }

        #[test]
        fn speaker_without_pronouns_stands_alone() {
            assert_eq!(speaker_entries(Some("Sam Smith"), None), ["Sam Smith"]);
            assert_eq!(speaker_entries(Some(" Sam Smith "), Some("")), ["Sam Smith"]);
        }

        #[test]
        fn blank_speaker_means_no_speakers() {
            assert!(speaker_entries(Some("   "), Some("they/them")).is_empty());
            assert!(speaker_entries(None, Some("they/them")).is_empty());
        }
    }

    mod timestamps {
        use super::*;

        #[test]
        fn naive_wall_clock_drives_everything() {
            let events = extract_sample();
            let opening = &events[0];

            assert_eq!(opening.start_str, "10:00");
            assert_eq!(opening.end_str, "11:00");
            assert_eq!(opening.duration, 60);
            assert_eq!(opening.end_unix - opening.start_unix, 3600);
        }

        #[test]
        fn offset_sources_keep_wall_clock_epochs() {
            let json = r#"[{
              "id": 1, "title": "t", "type": "", "venue": "", "description": "",
              "speaker": null, "pronouns": null,
              "start_date": "2024-05-31T10:00:00+01:00",
              "end_date": "2024-05-31T11:00:00+01:00",
              "is_from_cfp": false
            }]"#;
            let events = extract(json.as_bytes(), "g").unwrap();
            let event = &events[0];

            // Wall-clock fields re-encoded as UTC: one hour ahead of the
            // instant-based value the frab path would produce.
            assert_eq!(event.start_unix, 1_717_149_600);
            assert_ne!(event.start_unix, event.start.timestamp());
            assert_eq!(event.start.timestamp(), 1_717_146_000);
            assert_eq!(event.end_unix - event.start_unix, event.duration * 60);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn invalid_json_is_a_format_error() {
            let err = extract(b"[{\"id\": 1,", "g").unwrap_err();
            assert_eq!(err.kind(), ImportErrorKind::Format);
        }

        #[test]
        fn non_array_document_is_a_format_error() {
            let err = extract(b"{\"events\": []}", "g").unwrap_err();
            assert_eq!(err.kind(), ImportErrorKind::Format);
        }

        #[test]
        fn missing_required_field_is_a_field_error() {
            let json = r#"[{"id": 1, "title": "t", "is_from_cfp": false,
                "end_date": "2024-05-31 11:00:00"}]"#;
            let err = extract(json.as_bytes(), "g").unwrap_err();
            assert_eq!(err.kind(), ImportErrorKind::Field);
        }

        #[test]
        fn unparseable_timestamp_is_a_field_error() {
            let json = r#"[{"id": 1, "title": "t", "is_from_cfp": false,
                "start_date": "whenever", "end_date": "2024-05-31 11:00:00"}]"#;
            let err = extract(json.as_bytes(), "g").unwrap_err();
            assert_eq!(err.kind(), ImportErrorKind::Field);
        }

        #[test]
        fn empty_array_yields_no_events() {
            assert!(extract(b"[]", "g").unwrap().is_empty());
        }
    }
}
