//! Display formatting for user table cells.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::OffsetDateTime;
use time::macros::format_description;

/// Render a timestamp in its own offset as `dd/mm/yyyy, HH:MM` (24-hour clock).
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[day]/[month]/[year], [hour]:[minute]");
    at.format(format).unwrap_or_else(|_| at.to_string())
}
