//! Canned notification payloads and instants.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

/// Instant reported by clocks in trigger tests.
#[must_use]
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Body of a connectivity test notification.
#[must_use]
pub fn test_event_body() -> Vec<u8> {
    json!({ "eventType": "Test" }).to_string().into_bytes()
}

/// Body of a transcode-completion notification.
#[must_use]
pub fn transcoded_body(directory: &str, file: &str, analyze: bool) -> Vec<u8> {
    json!({
        "eventType": "Transcoded",
        "file": file,
        "analyze": analyze,
        "meta": { "Directory": directory },
    })
    .to_string()
    .into_bytes()
}
