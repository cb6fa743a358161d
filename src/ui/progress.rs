//! Progress formatting helpers for status displays.

use chrono::{DateTime, Utc};

/// Format a timestamp relative to now ("5 minutes ago", "yesterday").
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(timestamp).num_seconds();

    // Clock skew can put timestamps slightly in the future.
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let (value, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days == 1 {
        return "yesterday".to_string();
    } else if days < 30 {
        (days, "day")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

/// Render a fixed-width completion bar such as `[████░░░░] 2/4`.
pub fn completion_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total > 0 {
        (done.min(total) * width) / total
    } else {
        0
    };
    format!(
        "[{}{}] {}/{}",
        "█".repeat(filled),
        "░".repeat(width - filled),
        done.min(total),
        total
    )
}
