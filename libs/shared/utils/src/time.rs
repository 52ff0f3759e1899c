use chrono::{DateTime, Utc};

/// Render a timestamp the way appointment list projections expose it:
/// minute precision with a space separator (`YYYY-MM-DD HH:MM`), or an
/// empty string when the value is unset.
pub fn to_minute_string(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
