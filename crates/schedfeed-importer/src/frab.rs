//! Extraction routine for frab XML schedules.
//!
//! A frab schedule is a `day > room > event` hierarchy; each event carries an
//! `id` attribute and child text nodes (`date`, `duration`, `title`, `track`,
//! `room`, `abstract`, `language`) plus a `persons` container of `person`
//! names. The walk below streams over that tree, collects the direct-child
//! text of each event, and maps every event to a [`ScheduleEvent`].
//!
//! Strictness follows the import contract: a reader error or structural
//! garbage aborts with a `Format` error, a missing/unparseable `id`, `date`
//! or `duration` aborts with a `Field` error, and every other child is
//! optional and defaults to the empty string.

use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use tracing::debug;

use schedfeed_core::{ParsedStamp, ScheduleEvent, parse_duration_hm, whole_minutes};

use crate::error::{ImportError, ImportResult};

/// Direct event children captured as text.
const CHILD_FIELDS: &[&str] = &[
    "date",
    "duration",
    "title",
    "track",
    "room",
    "abstract",
    "language",
];

/// Extracts all events from raw frab XML bytes.
pub fn extract(raw: &[u8], group: &str) -> ImportResult<Vec<ScheduleEvent>> {
    let raw_events = collect_events(raw)?;
    let mut events = Vec::with_capacity(raw_events.len());
    for raw_event in raw_events {
        events.push(map_event(raw_event, group)?);
    }
    debug!(count = events.len(), group = %group, "extracted frab schedule");
    Ok(events)
}

/// One event's raw fields as found in the document.
#[derive(Debug, Default)]
struct RawFrabEvent {
    id: Option<String>,
    date: Option<String>,
    duration: Option<String>,
    title: Option<String>,
    track: Option<String>,
    room: Option<String>,
    abstract_text: Option<String>,
    language: Option<String>,
    speakers: Vec<String>,
    persons_seen: bool,
}

impl RawFrabEvent {
    /// Records a child's text. The first occurrence of a child wins.
    fn set_child(&mut self, name: &str, text: String) {
        let slot = match name {
            "date" => &mut self.date,
            "duration" => &mut self.duration,
            "title" => &mut self.title,
            "track" => &mut self.track,
            "room" => &mut self.room,
            "abstract" => &mut self.abstract_text,
            "language" => &mut self.language,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }
}

/// Text accumulation for one open element.
///
/// `open` mirrors the leading-text semantics of a DOM node's text: only
/// character data before the first nested element counts.
struct Capture {
    name: String,
    depth: usize,
    text: String,
    open: bool,
}

/// Streaming walk state over the day/room/event hierarchy.
#[derive(Default)]
struct FrabWalker {
    path: Vec<String>,
    saw_root: bool,
    current: Option<RawFrabEvent>,
    event_depth: usize,
    persons_depth: Option<usize>,
    capture: Option<Capture>,
    events: Vec<RawFrabEvent>,
}

fn collect_events(raw: &[u8]) -> ImportResult<Vec<RawFrabEvent>> {
    let mut reader = Reader::from_reader(raw);
    let mut walker = FrabWalker::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => return Err(ImportError::format("malformed XML").with_source(e)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => walker.start(&e)?,
            Ok(Event::Empty(e)) => {
                walker.start(&e)?;
                let name = element_name(e.name().as_ref());
                walker.end(&name)?;
            }
            Ok(Event::End(e)) => {
                let name = element_name(e.name().as_ref());
                walker.end(&name)?;
            }
            Ok(Event::Text(e)) => walker.text(&e)?,
            Ok(Event::CData(e)) => walker.cdata(&e),
            Ok(_) => {} // declaration, comments, processing instructions
        }
        buf.clear();
    }

    if !walker.saw_root {
        return Err(ImportError::format("no document element found"));
    }
    if !walker.path.is_empty() {
        return Err(ImportError::format("unexpected end of document"));
    }

    Ok(walker.events)
}

impl FrabWalker {
    fn start(&mut self, e: &BytesStart) -> ImportResult<()> {
        let name = element_name(e.name().as_ref());

        if self.path.is_empty() {
            if self.saw_root {
                return Err(ImportError::format("junk after document element"));
            }
            self.saw_root = true;
        }

        // Only character data before the first nested element belongs to a
        // captured child, matching DOM leading-text semantics.
        if let Some(capture) = self.capture.as_mut() {
            capture.open = false;
        }

        self.path.push(name.clone());
        let depth = self.path.len();

        let Some(current) = self.current.as_mut() else {
            // Events live at exactly root > day > room > event; anything
            // else at this depth is unrelated markup and is skipped.
            if depth == 4 && self.path[1] == "day" && self.path[2] == "room" && name == "event" {
                self.current = Some(RawFrabEvent {
                    id: attribute_value(e, "id")?,
                    ..RawFrabEvent::default()
                });
                self.event_depth = depth;
            }
            return Ok(());
        };

        if depth == self.event_depth + 1 {
            if CHILD_FIELDS.contains(&name.as_str()) {
                self.capture = Some(Capture {
                    name,
                    depth,
                    text: String::new(),
                    open: true,
                });
            } else if name == "persons" && !current.persons_seen {
                self.persons_depth = Some(depth);
            }
        } else if let Some(persons_depth) = self.persons_depth {
            if depth == persons_depth + 1 && name == "person" {
                self.capture = Some(Capture {
                    name,
                    depth,
                    text: String::new(),
                    open: true,
                });
            }
        }

        Ok(())
    }

    fn end(&mut self, name: &str) -> ImportResult<()> {
        let depth = self.path.len();
        if depth == 0 || self.path[depth - 1] != name {
            // The reader validates tag nesting before we get here.
            return Err(ImportError::format(format!(
                "mismatched closing tag </{}>",
                name
            )));
        }

        if let Some(capture) = self.capture.take_if(|c| c.depth == depth && c.name == name) {
            let current = self
                .current
                .as_mut()
                .expect("captures only exist inside an event");
            if capture.name == "person" {
                current.speakers.push(capture.text.trim().to_string());
            } else {
                current.set_child(&capture.name, capture.text);
            }
        }

        if self.persons_depth == Some(depth) && name == "persons" {
            self.persons_depth = None;
            if let Some(current) = self.current.as_mut() {
                current.persons_seen = true;
            }
        }

        if self.current.is_some() && depth == self.event_depth && name == "event" {
            self.events.push(self.current.take().expect("checked above"));
        }

        self.path.pop();
        Ok(())
    }

    fn text(&mut self, e: &BytesText) -> ImportResult<()> {
        let text = e
            .unescape()
            .map_err(|err| ImportError::format("malformed XML").with_source(err))?;

        if let Some(capture) = self.capture.as_mut() {
            if capture.open {
                capture.text.push_str(&text);
            }
        } else if self.path.is_empty() && !text.trim_start_matches('\u{feff}').trim().is_empty() {
            return Err(ImportError::format("text outside the document element"));
        }

        Ok(())
    }

    fn cdata(&mut self, e: &BytesCData) {
        if let Some(capture) = self.capture.as_mut() {
            if capture.open {
                capture.text.push_str(&String::from_utf8_lossy(e));
            }
        }
    }
}

fn element_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn attribute_value(e: &BytesStart, key: &str) -> ImportResult<Option<String>> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|err| ImportError::format("malformed attribute").with_source(err))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| ImportError::format("malformed attribute").with_source(err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Maps one collected event to the canonical record.
///
/// The stored `start` and both epoch fields are derived from the
/// UTC-converted instant; the display strings keep the source-local wall
/// clock. A `date` without zone information is taken as UTC.
fn map_event(raw: RawFrabEvent, group: &str) -> ImportResult<ScheduleEvent> {
    let id = raw
        .id
        .ok_or_else(|| ImportError::field("event is missing its id attribute"))?;

    let date = raw
        .date
        .ok_or_else(|| ImportError::field(format!("event {}: missing date", id)))?;
    let start = ParsedStamp::parse(&date)
        .map_err(|e| ImportError::field(format!("event {}: {}", id, e)))?;

    let duration_text = raw
        .duration
        .ok_or_else(|| ImportError::field(format!("event {}: missing duration", id)))?;
    let duration = parse_duration_hm(&duration_text)
        .map_err(|e| ImportError::field(format!("event {}: {}", id, e)))?;

    let end = start.advanced_by(duration);

    Ok(ScheduleEvent {
        start: start.utc(),
        start_str: start.wall_clock_str(),
        end_str: end.wall_clock_str(),
        start_unix: start.unix_from_instant(),
        end_unix: end.unix_from_instant(),
        duration: whole_minutes(duration),
        title: raw.title.unwrap_or_default(),
        track: raw.track.unwrap_or_default(),
        place: raw.room.unwrap_or_default(),
        abstract_text: raw.abstract_text.unwrap_or_default(),
        speakers: raw.speakers,
        lang: raw.language.unwrap_or_default(),
        id,
        is_from_cfp: None,
        group: group.to_string(),
    })
}
