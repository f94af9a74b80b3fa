//! Dual-convention calendar dates: parsing, legality, comparison.
//!
//! Reviewers read and type dates in the display form `DD.MM.YYYY`; all
//! internal arithmetic and comparison uses the canonical calendar form
//! `YYYY-MM-DD`. Both conventions are strict: zero-padded, exact
//! separators, and true calendar legality (Feb 30 and Feb 29 on a
//! non-leap year are rejected, never silently normalized). A trailing
//! time-of-day component is stripped before parsing.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldErrorKind};

/// Earliest year accepted as a legal date.
pub const MIN_YEAR: i32 = 1900;

/// Latest year accepted as a legal date.
pub const MAX_YEAR: i32 = 2100;

/// Compiled pattern for the canonical form. Compiled once, reused forever.
static CALENDAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

/// Compiled pattern for the display form.
static DISPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$").expect("valid regex"));

/// The two textual date conventions the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateConvention {
    /// Canonical calendar form, `YYYY-MM-DD`.
    Calendar,
    /// Reviewer-facing display form, `DD.MM.YYYY`.
    Display,
}

impl DateConvention {
    /// The pattern named in format error messages.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Calendar => "YYYY-MM-DD",
            Self::Display => "DD.MM.YYYY",
        }
    }
}

/// Strip a trailing time-of-day component (`2025-01-02 13:00` or
/// `2025-01-02T13:00`) and surrounding whitespace.
fn date_part(input: &str) -> &str {
    input.trim().split([' ', 'T']).next().unwrap_or_default()
}

/// Parse `input` against one convention, without the legality check.
fn parse_triple(input: &str, convention: DateConvention) -> Option<(i32, u32, u32)> {
    let (re, year_idx, month_idx, day_idx) = match convention {
        DateConvention::Calendar => (&*CALENDAR_RE, 1, 2, 3),
        DateConvention::Display => (&*DISPLAY_RE, 3, 2, 1),
    };
    let caps = re.captures(date_part(input))?;
    let year = caps[year_idx].parse().ok()?;
    let month = caps[month_idx].parse().ok()?;
    let day = caps[day_idx].parse().ok()?;
    Some((year, month, day))
}

/// Build a `NaiveDate` only if the triple is a legal calendar date within
/// the accepted year range. `from_ymd_opt` is the legality rule: a triple
/// that cannot be reconstructed as the same year/month/day does not yield
/// a date.
fn legal_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse `input` in whichever convention matches, validating legality.
fn parse_any(input: &str) -> Option<NaiveDate> {
    for convention in [DateConvention::Calendar, DateConvention::Display] {
        if let Some((y, m, d)) = parse_triple(input, convention) {
            return legal_date(y, m, d);
        }
    }
    None
}

/// Convert a date in either convention to canonical calendar text.
///
/// Returns `None` for anything that is not a legal calendar date.
///
/// # Examples
///
/// ```
/// use medanon_core::dates::to_calendar;
///
/// assert_eq!(to_calendar("21.03.1994"), Some("1994-03-21".to_string()));
/// assert_eq!(to_calendar("1994-03-21"), Some("1994-03-21".to_string()));
/// assert_eq!(to_calendar("1994-03-21 08:30"), Some("1994-03-21".to_string()));
/// assert_eq!(to_calendar("29.02.2025"), None);
/// ```
pub fn to_calendar(input: &str) -> Option<String> {
    parse_any(input).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Convert canonical calendar text to the display form.
///
/// Returns an empty string on invalid input.
pub fn to_display(calendar: &str) -> String {
    match parse_triple(calendar, DateConvention::Calendar).and_then(|(y, m, d)| legal_date(y, m, d))
    {
        Some(date) => date.format("%d.%m.%Y").to_string(),
        None => String::new(),
    }
}

/// Boolean form of the legality rule, against one specific convention.
pub fn validate(input: &str, convention: DateConvention) -> bool {
    parse_triple(input, convention)
        .and_then(|(y, m, d)| legal_date(y, m, d))
        .is_some()
}

/// Compare two canonical calendar dates.
///
/// Returns `None` if either side fails validation.
pub fn compare(a: &str, b: &str) -> Option<Ordering> {
    let a = parse_triple(a, DateConvention::Calendar).and_then(|(y, m, d)| legal_date(y, m, d))?;
    let b = parse_triple(b, DateConvention::Calendar).and_then(|(y, m, d)| legal_date(y, m, d))?;
    Some(a.cmp(&b))
}

/// `a < b`, strict. False when either side is invalid.
pub fn is_before(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

/// `a > b`, strict. False when either side is invalid.
pub fn is_after(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

/// `a <= b`. False when either side is invalid.
pub fn is_before_or_equal(a: &str, b: &str) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

/// `a >= b`. False when either side is invalid.
pub fn is_after_or_equal(a: &str, b: &str) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

/// Today's wall-clock date in canonical form.
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Today's wall-clock date in display form.
pub fn today_display() -> String {
    Local::now().date_naive().format("%d.%m.%Y").to_string()
}

// ---------------------------------------------------------------------------
// DateValidator
// ---------------------------------------------------------------------------

/// Stateful aggregator for date-field validation errors.
///
/// Errors accumulate across calls until [`clear`](DateValidator::clear),
/// so every problem surfaces in one pass instead of failing fast. Adding
/// a second error under the same name replaces the first.
#[derive(Debug, Default)]
pub struct DateValidator {
    errors: Vec<FieldError>,
}

impl DateValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate one field: empty means "required field empty", non-empty
    /// but invalid means a format error naming the expected pattern.
    pub fn add_field(&mut self, name: &str, value: Option<&str>, convention: DateConvention) {
        let value = value.unwrap_or_default().trim();
        if value.is_empty() {
            self.upsert(FieldError::required(name));
            return;
        }
        if !validate(value, convention) {
            // Matching the pattern but failing legality is the calendar
            // subtype; anything else is a plain format error.
            let kind = if parse_triple(value, convention).is_some() {
                FieldErrorKind::IllegalCalendarDate
            } else {
                FieldErrorKind::BadFormat
            };
            self.upsert(FieldError::new(
                name,
                kind,
                format!("{name}: invalid date (expected {})", convention.pattern()),
            ));
        }
    }

    /// Record `message` under `name` when `condition` is false.
    pub fn add_constraint(&mut self, name: &str, condition: bool, message: &str) {
        if !condition {
            self.upsert(FieldError::new(
                name,
                FieldErrorKind::ConstraintViolated,
                message,
            ));
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All accumulated error messages, in insertion order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// One-line summary of the aggregate state.
    pub fn summary(&self) -> String {
        match self.errors.len() {
            0 => "all date fields valid".to_string(),
            1 => "1 date error found".to_string(),
            n => format!("{n} date errors found"),
        }
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Consume the validator, yielding the typed error list.
    pub fn into_error_list(self) -> Vec<FieldError> {
        self.errors
    }

    fn upsert(&mut self, error: FieldError) {
        match self.errors.iter_mut().find(|e| e.field == error.field) {
            Some(existing) => *existing = error,
            None => self.errors.push(error),
        }
    }
}
