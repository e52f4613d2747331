use chrono::NaiveDate;
use std::time::Duration;

// Export music utilities
pub mod channel_notifier;
pub mod embedded_messages;
pub mod event_handlers;
pub mod songbird_session;
pub mod voice_manager;

/// Format a duration into a human-readable string (e.g., "3:45" or "1:23:45")
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Spell a duration out in words, e.g. "3 minutes, 20 seconds".
pub fn describe_duration(duration: Duration) -> String {
    let mut remaining = duration.as_secs();
    let mut parts = Vec::new();

    for (unit, size) in [("hour", 3600), ("minute", 60), ("second", 1)] {
        let value = remaining / size;
        remaining %= size;
        // Once a larger unit was printed, keep every smaller one too.
        if value > 0 || !parts.is_empty() {
            let label = if value == 1 {
                unit.to_string()
            } else {
                format!("{}s", unit)
            };
            parts.push(format!("{} {}", value, label));
        }
    }

    if parts.is_empty() {
        "0 seconds".to_string()
    } else {
        parts.join(", ")
    }
}

/// Shorten a view count, e.g. 2300 -> "2.3k views".
pub fn readable_view_count(view_count: u64) -> String {
    let noun = if view_count == 1 { "view" } else { "views" };

    for (size, suffix) in [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "k")] {
        if view_count >= size {
            let value = format!("{:.1}", view_count as f64 / size as f64);
            let value = value.trim_end_matches('0').trim_end_matches('.');
            return format!("{}{} {}", value, suffix, noun);
        }
    }

    format!("{} {}", view_count, noun)
}

/// Turn a `YYYYMMDD` upload date into "January 01, 2021".
pub fn format_upload_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|date| date.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| "Unknown".to_string())
}
