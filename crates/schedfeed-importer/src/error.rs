//! Error types for schedule import operations.
//!
//! Normalization is all-or-nothing per call: any error aborts the whole
//! import, partial results are never returned, and nothing is retried.

use std::fmt;
use thiserror::Error;

/// The category of an import error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportErrorKind {
    /// The retrieval step failed: network failure or a non-success
    /// HTTP status. Surfaced unmodified, not retried.
    Transport,
    /// The raw bytes could not be parsed as well-formed XML or valid JSON
    /// for the selected routine.
    Format,
    /// A field the selected format requires is missing or unparseable
    /// (event id, start/end timestamps, duration).
    Field,
}

impl ImportErrorKind {
    /// Returns a stable machine-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport_error",
            Self::Format => "format_error",
            Self::Field => "field_error",
        }
    }
}

impl fmt::Display for ImportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while fetching or normalizing a schedule.
#[derive(Debug, Error)]
pub struct ImportError {
    /// The category of this error.
    kind: ImportErrorKind,
    /// A human-readable message describing the error.
    message: String,
    /// The schedule URL involved, when known.
    url: Option<String>,
    /// The underlying cause, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ImportError {
    /// Creates a new import error with the given kind and message.
    pub fn new(kind: ImportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            url: None,
            source: None,
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ImportErrorKind::Transport, message)
    }

    /// Creates a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ImportErrorKind::Format, message)
    }

    /// Creates a field error.
    pub fn field(message: impl Into<String>) -> Self {
        Self::new(ImportErrorKind::Field, message)
    }

    /// Attaches the schedule URL this error relates to.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ImportErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schedule URL, if set.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref url) = self.url {
            write!(f, "[{}] ", url)?;
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A specialized Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
