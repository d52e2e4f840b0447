//! Timestamp utilities

use chrono::{DateTime, Duration, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Start of a trailing window ending at `now`
pub fn window_start(now: DateTime<Utc>, window_hours: u64) -> DateTime<Utc> {
    i64::try_from(window_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Age of `then` relative to `now` in fractional hours (never negative)
pub fn age_hours(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    let millis = (now - then).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_window_start_is_before_now() {
        let t = now();
        let start = window_start(t, 24);
        assert_eq!((t - start).num_hours(), 24);
        assert_eq!(window_start(t, u64::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_age_hours_clamps_future_to_zero() {
        let t = now();
        let future = t + Duration::hours(2);
        assert_eq!(age_hours(t, future), 0.0);
        assert!((age_hours(t, t - Duration::minutes(90)) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_millis_to_duration() {
        assert_eq!(millis_to_duration(1500).as_millis(), 1500);
    }
}
