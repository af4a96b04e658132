//! Core types: canonical schedule events, timestamp handling, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::ScheduleEvent;
pub use time::{ParsedStamp, TimeParseError, parse_duration_hm, whole_minutes};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
