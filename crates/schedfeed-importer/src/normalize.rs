//! Normalization entry points.
//!
//! [`normalize`] turns raw schedule bytes into canonical events for one of
//! the two supported formats. [`import_schedule`] is the one-call flow:
//! fetch the URL, pick the routine by its suffix, normalize. Each call is
//! independent and reentrant; records from one call all carry the same
//! caller-supplied group label.

use tracing::debug;

use schedfeed_core::ScheduleEvent;

use crate::emf;
use crate::error::ImportResult;
use crate::fetch::ScheduleClient;
use crate::format::ScheduleFormat;
use crate::frab;

/// Normalizes raw schedule bytes into canonical events.
///
/// # Errors
///
/// Returns a `Format` error when the bytes are not well-formed for the
/// selected routine and a `Field` error when a required field is missing or
/// unparseable. Normalization is all-or-nothing: no partial results.
pub fn normalize(
    raw: &[u8],
    format: ScheduleFormat,
    group: &str,
) -> ImportResult<Vec<ScheduleEvent>> {
    match format {
        ScheduleFormat::Frab => frab::extract(raw, group),
        ScheduleFormat::EmfJson => emf::extract(raw, group),
    }
}

/// Fetches and normalizes the schedule behind `url`, stamping every record
/// with `group`.
pub async fn import_schedule(
    client: &ScheduleClient,
    url: &str,
    group: &str,
) -> ImportResult<Vec<ScheduleEvent>> {
    let format = ScheduleFormat::from_url(url);
    debug!(url = %url, format = %format, group = %group, "importing schedule");

    let raw = client.fetch(url).await?;
    normalize(&raw, format, group).map_err(|e| e.with_url(url))
}
