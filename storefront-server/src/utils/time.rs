//! Time helpers
//!
//! Timestamps are stored as RFC 3339 strings with millisecond precision,
//! matching what the storefront pages render directly.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 string
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current Unix time in milliseconds (order ids are derived from this)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
