//! Newest-first ordering of log records.

use crate::record::LogRecord;

/// Sorts records by timestamp, newest first.
///
/// The sort is stable: records with equal timestamps keep their input order.
pub fn sort_newest_first(records: &mut [LogRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Returns the most recent record, or `None` for an empty slice.
///
/// Ties resolve to the earliest record in the slice, matching
/// [`sort_newest_first`].
#[must_use]
pub fn newest(records: &[LogRecord]) -> Option<&LogRecord> {
    records
        .iter()
        .reduce(|best, r| if r.timestamp > best.timestamp { r } else { best })
}
