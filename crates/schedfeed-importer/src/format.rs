//! Schedule format selection.
//!
//! The wire format is a closed two-way choice decided by the source URL's
//! trailing suffix, never by sniffing content: a `.json` path selects the
//! flat JSON event list, anything else the frab XML hierarchy.

use std::fmt;

use url::Url;

/// The wire format of a schedule source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFormat {
    /// The frab day/room/event XML hierarchy.
    Frab,
    /// A flat JSON array of event objects (EMF-style).
    EmfJson,
}

impl ScheduleFormat {
    /// Selects the format for a source URL by its trailing suffix.
    ///
    /// Looks at the path of a parseable absolute URL so that query strings
    /// and fragments do not confuse the check; anything that does not parse
    /// (a relative path, a bare filename) falls back to a raw suffix check.
    pub fn from_url(url: &str) -> Self {
        let path_ends_with_json = match Url::parse(url) {
            Ok(parsed) => parsed.path().ends_with(".json"),
            Err(_) => url.ends_with(".json"),
        };

        if path_ends_with_json {
            Self::EmfJson
        } else {
            Self::Frab
        }
    }

    /// Returns a stable name for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frab => "frab",
            Self::EmfJson => "emf-json",
        }
    }
}

impl fmt::Display for ScheduleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
