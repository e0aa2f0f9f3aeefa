//! Feedback validation

use crate::error::BookingError;

/// Rating bounds, inclusive
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Validate a feedback submission before touching storage
///
/// Text and rating are required together: a booking may not end up with a
/// rating but no text, or the reverse.
pub fn validate_feedback(text: &str, rating: i32) -> Result<(), BookingError> {
    if text.trim().is_empty() {
        return Err(BookingError::Validation(
            "feedback text must not be empty".to_string(),
        ));
    }

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(BookingError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    Ok(())
}
