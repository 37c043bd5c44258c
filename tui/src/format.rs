//! Display formatting for timer badges.

use std::time::Duration;

use lector_engine::BADGE_GUTTER_COLS;

/// Elapsed time as seconds with one decimal place, e.g. "3.4s".
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_millis() as f64 / 1000.0)
}

/// Right-aligned badge filling the gutter column.
pub(crate) fn badge(elapsed: Duration) -> String {
    let cols = usize::from(BADGE_GUTTER_COLS);
    format!("{:>width$} ", format_elapsed(elapsed), width = cols - 1)
}

/// Empty gutter for continuation lines.
pub(crate) fn gutter() -> String {
    " ".repeat(usize::from(BADGE_GUTTER_COLS))
}
