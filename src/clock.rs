// Device clock arithmetic and time display helpers.
//
// The gateway reports `millis()` samples as u32, which wrap roughly every 49.7 days.

use chrono::DateTime;

/// `last_update` value the device reports for a counter that was never read.
pub const NEVER: u32 = 0;

/// Milliseconds elapsed between two device-clock samples.
///
/// Returns `None` for the [`NEVER`] sentinel. At most one wrap of the counter is
/// assumed between the two samples.
pub fn elapsed_since(last_update: u32, current: u32) -> Option<u32> {
    if last_update == NEVER {
        return None;
    }
    if current >= last_update {
        Some(current - last_update)
    } else {
        Some((u32::MAX - last_update) + current)
    }
}

/// Renders an elapsed duration using its coarsest non-zero unit, e.g. `"1m 30s ago"`.
pub fn format_elapsed(elapsed_ms: u32) -> String {
    let seconds = elapsed_ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h ago", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m ago", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s ago", minutes, seconds % 60)
    } else {
        format!("{}s ago", seconds)
    }
}

/// "Last read" text for a flow counter: `"Never"` or a [`format_elapsed`] string.
pub fn format_time_since(last_update: u32, current: u32) -> String {
    match elapsed_since(last_update, current) {
        Some(ms) => format_elapsed(ms),
        None => "Never".to_string(),
    }
}

/// Formats a flow-counter trigger timestamp as `DD/MM/YYYY, HH:MM:SS`.
///
/// The counters stamp events in their own local time, so the value is rendered
/// as-is with no timezone conversion. Zero means no trigger was recorded.
pub fn format_device_timestamp(unix_seconds: u32) -> String {
    if unix_seconds == 0 {
        return "N/A".to_string();
    }
    match DateTime::from_timestamp(i64::from(unix_seconds), 0) {
        Some(t) => t.format("%d/%m/%Y, %H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}

pub fn format_uptime(uptime_seconds: u32) -> String {
    let hours = uptime_seconds / 3600;
    let minutes = (uptime_seconds % 3600) / 60;
    format!("Uptime: {}h {}m", hours, minutes)
}
