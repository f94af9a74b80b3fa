//! Reviewer-visible state of the record currently under review.
//!
//! Edits arrive as explicit [`EditEvent`]s and apply in arrival order;
//! each application yields a fresh `(dirty, can_approve)` derivation, so
//! the gate is always consistent with the latest applied edit. The
//! baseline snapshot behind the dirty flag is captured at load and
//! re-captured only on explicit save, never implicitly.

use serde::{Deserialize, Serialize};

use medanon_core::approval;
use medanon_core::dates;
use medanon_core::record::EditSnapshot;
use medanon_core::{DbId, MediaKind, ReviewRecord, ValidationProgress};

/// One reviewer edit, applied to the current record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditEvent {
    SetFirstName(String),
    SetLastName(String),
    SetGenderCode(String),
    SetCaseNumber(String),
    SetFreeText(String),
    SetDateOfBirth(Option<String>),
    SetExaminationDate(Option<String>),
    /// Manual media-kind disambiguation for records detected as unknown.
    SetMediaKind(MediaKind),
    /// A segment sign-off arriving from the validation event stream.
    SegmentValidated { segment_id: DbId, validated: bool },
}

/// What every applied edit derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    pub dirty: bool,
    pub can_approve: bool,
}

/// Aggregates one record's fields, text, segments, and dirty flag.
#[derive(Debug)]
pub struct ReviewRecordState {
    record: ReviewRecord,
    baseline: EditSnapshot,
    log: Vec<EditEvent>,
    out_of_scope_label: String,
}

impl ReviewRecordState {
    /// Take ownership of a freshly fetched record, capturing the dirty
    /// baseline.
    pub fn load(record: ReviewRecord, out_of_scope_label: &str) -> Self {
        let baseline = record.edit_snapshot();
        Self {
            record,
            baseline,
            log: Vec::new(),
            out_of_scope_label: out_of_scope_label.to_string(),
        }
    }

    /// Apply one edit and derive the resulting `(dirty, can_approve)`.
    pub fn apply(&mut self, event: EditEvent) -> Derived {
        match &event {
            EditEvent::SetFirstName(v) => self.record.patient.first_name = v.clone(),
            EditEvent::SetLastName(v) => self.record.patient.last_name = v.clone(),
            EditEvent::SetGenderCode(v) => self.record.patient.gender_code = v.clone(),
            EditEvent::SetCaseNumber(v) => self.record.patient.case_number = v.clone(),
            EditEvent::SetFreeText(v) => self.record.free_text = v.clone(),
            EditEvent::SetDateOfBirth(v) => {
                self.record.patient.date_of_birth = normalize_date_edit(v)
            }
            EditEvent::SetExaminationDate(v) => {
                self.record.patient.examination_date = normalize_date_edit(v)
            }
            EditEvent::SetMediaKind(kind) => self.record.media_kind = *kind,
            EditEvent::SegmentValidated {
                segment_id,
                validated,
            } => {
                match self
                    .record
                    .segments
                    .iter_mut()
                    .find(|s| s.id == *segment_id)
                {
                    Some(segment) => segment.validated = *validated,
                    None => tracing::debug!(
                        segment_id,
                        record_id = self.record.id,
                        "ignoring validation event for unknown segment"
                    ),
                }
            }
        }
        self.log.push(event);
        self.derived()
    }

    /// Structural comparison against the baseline snapshot.
    pub fn dirty(&self) -> bool {
        self.record.edit_snapshot() != self.baseline
    }

    /// Re-capture the baseline after an explicit, successful save.
    pub fn mark_saved(&mut self) {
        self.baseline = self.record.edit_snapshot();
    }

    pub fn derived(&self) -> Derived {
        Derived {
            dirty: self.dirty(),
            can_approve: self.can_approve(),
        }
    }

    pub fn can_approve(&self) -> bool {
        approval::can_approve(&self.record, &self.out_of_scope_label)
    }

    pub fn approval_block_reason(&self) -> Option<String> {
        approval::approval_block_reason(&self.record, &self.out_of_scope_label)
    }

    pub fn progress(&self) -> ValidationProgress {
        ValidationProgress::for_segments(
            &self.record.segments,
            self.record.media_kind,
            &self.out_of_scope_label,
        )
    }

    pub fn record(&self) -> &ReviewRecord {
        &self.record
    }

    /// The in-memory log of applied edits, in arrival order.
    pub fn events(&self) -> &[EditEvent] {
        &self.log
    }
}

/// Date edits may arrive in either convention; store canonical text when
/// the value is legal, and the raw text otherwise so validation can name
/// the problem instead of it silently disappearing.
fn normalize_date_edit(value: &Option<String>) -> Option<String> {
    let raw = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
    Some(dates::to_calendar(raw).unwrap_or_else(|| raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medanon_core::segment::{Segment, LABEL_OUT_OF_SCOPE};

    fn document_record() -> ReviewRecord {
        let mut record = ReviewRecord::new(1, MediaKind::Document);
        record.patient.first_name = "John".into();
        record.patient.last_name = "Doe".into();
        record
    }

    #[test]
    fn loading_is_clean() {
        let state = ReviewRecordState::load(document_record(), LABEL_OUT_OF_SCOPE);
        assert!(!state.dirty());
        assert!(state.events().is_empty());
    }

    #[test]
    fn edit_save_round_trip() {
        let mut state = ReviewRecordState::load(document_record(), LABEL_OUT_OF_SCOPE);

        let derived = state.apply(EditEvent::SetFirstName("Jane".into()));
        assert!(derived.dirty);

        // Reverting the edit makes the state structurally clean again.
        let derived = state.apply(EditEvent::SetFirstName("John".into()));
        assert!(!derived.dirty);

        state.apply(EditEvent::SetFreeText("findings redacted".into()));
        assert!(state.dirty());
        state.mark_saved();
        assert!(!state.dirty());
        assert_eq!(state.events().len(), 3);
    }

    #[test]
    fn display_convention_date_edit_is_canonicalized() {
        let mut state = ReviewRecordState::load(document_record(), LABEL_OUT_OF_SCOPE);
        state.apply(EditEvent::SetDateOfBirth(Some("21.03.1994".into())));
        assert_eq!(
            state.record().patient.date_of_birth.as_deref(),
            Some("1994-03-21")
        );
    }

    #[test]
    fn illegal_date_edit_is_kept_raw_for_validation() {
        let mut state = ReviewRecordState::load(document_record(), LABEL_OUT_OF_SCOPE);
        let derived = state.apply(EditEvent::SetDateOfBirth(Some("31.04.2025".into())));
        assert_eq!(
            state.record().patient.date_of_birth.as_deref(),
            Some("31.04.2025")
        );
        assert!(!derived.can_approve);
    }

    #[test]
    fn blank_date_edit_clears_the_field() {
        let mut state = ReviewRecordState::load(document_record(), LABEL_OUT_OF_SCOPE);
        state.apply(EditEvent::SetDateOfBirth(Some("1994-03-21".into())));
        state.apply(EditEvent::SetDateOfBirth(Some("  ".into())));
        assert_eq!(state.record().patient.date_of_birth, None);
    }

    #[test]
    fn segment_validation_moves_the_gate_but_not_dirty() {
        let mut record = ReviewRecord::new(2, MediaKind::Video);
        record.patient.first_name = "John".into();
        record.patient.last_name = "Doe".into();
        record.segments = vec![
            Segment::new(10, "outside", 0.0, 1.0).unwrap(),
            Segment::new(11, "outside", 2.0, 3.0).unwrap(),
        ];
        let mut state = ReviewRecordState::load(record, LABEL_OUT_OF_SCOPE);
        assert!(!state.can_approve());

        let derived = state.apply(EditEvent::SegmentValidated {
            segment_id: 10,
            validated: true,
        });
        assert!(!derived.dirty);
        assert!(!derived.can_approve);
        assert_eq!(state.progress().percentage, 50);

        let derived = state.apply(EditEvent::SegmentValidated {
            segment_id: 11,
            validated: true,
        });
        assert!(derived.can_approve);
        assert_eq!(state.progress().percentage, 100);
    }

    #[test]
    fn unknown_segment_event_is_ignored() {
        let mut state = ReviewRecordState::load(document_record(), LABEL_OUT_OF_SCOPE);
        let before = state.record().clone();
        state.apply(EditEvent::SegmentValidated {
            segment_id: 999,
            validated: true,
        });
        assert_eq!(state.record(), &before);
    }

    #[test]
    fn media_kind_disambiguation_unblocks_without_dirtying() {
        let mut record = document_record();
        record.media_kind = MediaKind::Unknown;
        let mut state = ReviewRecordState::load(record, LABEL_OUT_OF_SCOPE);
        assert!(!state.can_approve());

        let derived = state.apply(EditEvent::SetMediaKind(MediaKind::Document));
        assert!(derived.can_approve);
        assert!(!derived.dirty);
    }
}
