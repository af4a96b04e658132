//! Timestamp parsing and epoch derivation for schedule sources.
//!
//! Schedule feeds publish timestamps in slightly different shapes: RFC 3339
//! with an explicit offset, space-separated datetimes with an offset, or
//! naive local datetimes with no zone at all. [`ParsedStamp`] keeps both the
//! resolved UTC instant and the source-local wall clock of one parsed
//! timestamp, because downstream fields need both: display strings come from
//! the wall clock, epoch seconds come from one of two distinct rules.
//!
//! The two epoch rules are deliberately separate functions:
//! - [`ParsedStamp::unix_from_instant`] - the epoch of the actual instant
//!   (wall clock converted to UTC first).
//! - [`ParsedStamp::unix_from_wall_clock`] - the wall-clock calendar fields
//!   re-encoded as if they were UTC, with no conversion.
//!
//! Which rule applies is a per-format contract of the extraction routines;
//! picking the wrong one silently shifts every non-UTC event by its offset.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use thiserror::Error;

/// Errors from parsing timestamps or durations out of schedule sources.
#[derive(Debug, Error)]
pub enum TimeParseError {
    /// The timestamp string matched none of the accepted shapes.
    #[error("unrecognized timestamp {0:?}")]
    Timestamp(String),
    /// The duration string was not "H:MM" / "HH:MM".
    #[error("unrecognized duration {0:?} (expected H:MM)")]
    Duration(String),
}

/// Timestamp shapes with an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Timestamp shapes without zone information.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed source timestamp: the UTC instant plus the source-local wall
/// clock it was written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedStamp {
    utc: DateTime<Utc>,
    wall: NaiveDateTime,
}

impl ParsedStamp {
    /// Parses a timestamp string from a schedule source.
    ///
    /// Accepts RFC 3339, space-separated datetimes with an offset, and naive
    /// datetimes. A naive wall clock is taken as UTC; sources are expected to
    /// carry an offset, but real feeds do not always comply.
    pub fn parse(value: &str) -> Result<Self, TimeParseError> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::from_offset(dt));
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(value, format) {
                return Ok(Self::from_offset(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Self::from_naive_utc(naive));
            }
        }

        Err(TimeParseError::Timestamp(value.to_string()))
    }

    /// Builds a stamp from a datetime with an explicit offset.
    pub fn from_offset(dt: DateTime<FixedOffset>) -> Self {
        Self {
            utc: dt.with_timezone(&Utc),
            wall: dt.naive_local(),
        }
    }

    /// Builds a stamp from a naive wall clock taken as UTC.
    pub fn from_naive_utc(wall: NaiveDateTime) -> Self {
        Self {
            utc: wall.and_utc(),
            wall,
        }
    }

    /// The instant this stamp refers to, in UTC.
    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    /// The wall clock as written in the source, offset not applied.
    pub fn wall(&self) -> NaiveDateTime {
        self.wall
    }

    /// The source-local display time, "HH:MM".
    pub fn wall_clock_str(&self) -> String {
        self.wall.format("%H:%M").to_string()
    }

    /// Epoch seconds of the actual instant (UTC conversion applied first).
    pub fn unix_from_instant(&self) -> i64 {
        self.utc.timestamp()
    }

    /// Epoch seconds of the wall-clock calendar fields re-encoded as UTC,
    /// with no offset conversion. For a source in a non-UTC zone this is a
    /// different number than [`unix_from_instant`](Self::unix_from_instant).
    pub fn unix_from_wall_clock(&self) -> i64 {
        self.wall.and_utc().timestamp()
    }

    /// Returns this stamp shifted forward, both instant and wall clock.
    pub fn advanced_by(&self, duration: Duration) -> Self {
        Self {
            utc: self.utc + duration,
            wall: self.wall + duration,
        }
    }

    /// The signed distance to another stamp, measured between instants.
    pub fn until(&self, other: &ParsedStamp) -> Duration {
        other.utc - self.utc
    }
}

/// Parses a wall-clock duration of the form "H:MM" or "HH:MM".
pub fn parse_duration_hm(value: &str) -> Result<Duration, TimeParseError> {
    let value = value.trim();
    let invalid = || TimeParseError::Duration(value.to_string());

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if minutes.contains(':') {
        return Err(invalid());
    }
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;

    Ok(Duration::hours(hours) + Duration::minutes(minutes))
}

/// Whole minutes in a duration, floor-divided.
pub fn whole_minutes(duration: Duration) -> i64 {
    duration.num_seconds().div_euclid(60)
}
