//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SurrealDB TEXT fields have no built-in length enforcement, so every
//! handler validates request bodies before touching the store.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Ticket descriptions, intersection names
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image references
pub const MAX_URL_LEN: usize = 2048;

/// Raw image payload cap (base64-decoded or multipart)
pub const MAX_UPLOAD_BYTES: usize = 10_000_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate a WGS84 coordinate pair.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::validation(format!("latitude {lat} out of range")));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::validation(format!("longitude {lon} out of range")));
    }
    Ok(())
}
