//! Patient metadata fields and their central validation.
//!
//! All optional-presence rules live here, flowing through [`DateValidator`]
//! and the [`FieldError`] taxonomy, so callers never re-implement per-field
//! checks.

use serde::{Deserialize, Serialize};

use crate::dates::{self, DateConvention, DateValidator};
use crate::error::FieldError;
use crate::types::DbId;

/// The patient metadata attached to a review record.
///
/// Dates are canonical calendar text (`YYYY-MM-DD`); conversion from the
/// display convention happens at the edit boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientFields {
    pub first_name: String,
    pub last_name: String,
    pub gender_code: String,
    pub date_of_birth: Option<String>,
    pub case_number: String,
    pub examination_date: Option<String>,
    pub center_id: Option<DbId>,
    pub external_id: Option<String>,
    pub external_id_origin: Option<String>,
}

/// Validate the reviewer-editable patient fields, collecting every problem.
///
/// Rules:
/// - first and last name must be non-empty;
/// - each date, when present, must be a legal canonical calendar date;
/// - date of birth must not be after the examination date when both are
///   present and legal.
pub fn validate_patient_fields(fields: &PatientFields) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if fields.first_name.trim().is_empty() {
        errors.push(FieldError::required("first_name"));
    }
    if fields.last_name.trim().is_empty() {
        errors.push(FieldError::required("last_name"));
    }

    let mut validator = DateValidator::new();
    if let Some(dob) = non_empty(&fields.date_of_birth) {
        validator.add_field("date_of_birth", Some(dob), DateConvention::Calendar);
    }
    if let Some(exam) = non_empty(&fields.examination_date) {
        validator.add_field("examination_date", Some(exam), DateConvention::Calendar);
    }
    if let (Some(dob), Some(exam)) = (
        non_empty(&fields.date_of_birth),
        non_empty(&fields.examination_date),
    ) {
        if dates::validate(dob, DateConvention::Calendar)
            && dates::validate(exam, DateConvention::Calendar)
        {
            validator.add_constraint(
                "date_of_birth_before_examination",
                dates::is_before_or_equal(dob, exam),
                "date of birth must not be after the examination date",
            );
        }
    }
    errors.extend(validator.into_error_list());
    errors
}

/// Render collected field errors as the single aggregate message shown in
/// the approval block reason.
pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
