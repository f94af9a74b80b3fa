//! The approval gate.
//!
//! A pure decision over the current record: may it transition to
//! "approved", and if not, which condition blocks it. Recomputed on every
//! relevant field or segment change; nothing here is cached.

use crate::media::MediaKind;
use crate::patient::{join_field_errors, validate_patient_fields};
use crate::progress::ValidationProgress;
use crate::record::ReviewRecord;

/// Block message for records whose media kind could not be classified.
pub const BLOCK_UNKNOWN_MEDIA_KIND: &str =
    "media kind is unknown; select video or document before approving";

/// The first unmet approval condition, in priority order:
/// unknown media kind, then patient-field errors (joined), then
/// incomplete segment validation. `None` means the record may be approved.
pub fn approval_block_reason(record: &ReviewRecord, out_of_scope_label: &str) -> Option<String> {
    if record.media_kind == MediaKind::Unknown {
        return Some(BLOCK_UNKNOWN_MEDIA_KIND.to_string());
    }

    let field_errors = validate_patient_fields(&record.patient);
    if !field_errors.is_empty() {
        return Some(join_field_errors(&field_errors));
    }

    if record.media_kind == MediaKind::Video {
        let progress = ValidationProgress::for_segments(
            &record.segments,
            record.media_kind,
            out_of_scope_label,
        );
        if !progress.is_complete() {
            return Some(format!(
                "segment validation incomplete: {} of {} required segments validated",
                progress.validated, progress.required
            ));
        }
    }

    None
}

/// Whether the record may transition to "approved".
pub fn can_approve(record: &ReviewRecord, out_of_scope_label: &str) -> bool {
    approval_block_reason(record, out_of_scope_label).is_none()
}
