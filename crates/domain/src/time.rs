//! Time helpers.

use chrono::{Local, NaiveDateTime};

/// Local wall-clock time as seen by the host. Triggers reason about the
/// user's day (weekdays, times of day), so no timezone is attached.
pub type LocalTimestamp = NaiveDateTime;

/// Return the current local wall-clock time.
#[must_use]
pub fn now() -> LocalTimestamp {
    Local::now().naive_local()
}
