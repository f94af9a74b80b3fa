//! Error taxonomy for the review engine core.
//!
//! Construction-time failures (bad segment offsets, unknown enum strings)
//! surface as [`CoreError`]. Reviewer-facing validation problems are
//! collected as [`FieldError`]s so that every problem in a record surfaces
//! in one pass instead of failing fast.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// What went wrong with a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field was empty or missing.
    RequiredEmpty,
    /// The value does not match the expected textual pattern.
    BadFormat,
    /// The value matches the pattern but is not a legal calendar date
    /// (Feb 30, Feb 29 on a non-leap year, year out of range).
    IllegalCalendarDate,
    /// A cross-field constraint does not hold.
    ConstraintViolated,
}

/// A single field-level validation failure.
///
/// `message` is the reviewer-facing text shown inline next to the field
/// and repeated in the aggregate summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a required-field-empty error with the standard message.
    pub fn required(field: &str) -> Self {
        Self::new(
            field,
            FieldErrorKind::RequiredEmpty,
            format!("{field}: required field is empty"),
        )
    }
}
