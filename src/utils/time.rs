//! Time helpers
//!
//! All timestamps in the system are Unix millis (`i64`); handlers and the
//! storage layer never deal in timezone-aware values.

/// Current Unix timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_millis_is_monotonic_enough() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
        // Sanity: after 2020-01-01
        assert!(a > 1_577_836_800_000);
    }
}
