//! Human-relative age labels for link history rows.

#[cfg(test)]
#[path = "age_test.rs"]
mod age_test;

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub const JUST_NOW: &str = "Just now";

const ABSOLUTE_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// Label `created` relative to `now`: under a minute is "Just now", then
/// minutes, hours and days; a week or older falls back to `M/D/YYYY`.
/// Timestamps in the future (clock skew) read as "Just now".
#[must_use]
pub fn age_label(created: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - created;
    let minutes = elapsed.whole_minutes();
    if minutes < 1 {
        return JUST_NOW.to_owned();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.whole_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = elapsed.whole_days();
    if days < 7 {
        return format!("{days}d ago");
    }
    created
        .format(ABSOLUTE_DATE)
        .unwrap_or_else(|_| created.date().to_string())
}
