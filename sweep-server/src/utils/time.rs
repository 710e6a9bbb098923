//! Time helpers
//!
//! Repositories and models carry timestamps as `i64` Unix millis; all clock
//! access goes through here.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
