//! The review record aggregate.

use serde::{Deserialize, Serialize};

use crate::media::MediaKind;
use crate::patient::PatientFields;
use crate::segment::Segment;
use crate::types::DbId;

/// One sensitive media record awaiting review.
///
/// Created when the workflow fetches the next pending item, mutated by
/// reviewer edits and segment-validation events, and replaced on skip,
/// reject, or approve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: DbId,
    pub media_kind: MediaKind,
    /// Reference to the unredacted source (stream URL, path, or handle).
    pub original_source_ref: Option<String>,
    /// Reference to the anonymized source.
    pub processed_source_ref: Option<String>,
    pub patient: PatientFields,
    pub free_text: String,
    pub segments: Vec<Segment>,
}

impl ReviewRecord {
    pub fn new(id: DbId, media_kind: MediaKind) -> Self {
        Self {
            id,
            media_kind,
            original_source_ref: None,
            processed_source_ref: None,
            patient: PatientFields::default(),
            free_text: String::new(),
            segments: Vec::new(),
        }
    }

    /// The reviewer-editable surface compared against the baseline for
    /// dirty tracking. Segment state is deliberately excluded: validating
    /// a segment is sign-off, not an edit at risk of being lost.
    pub fn edit_snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            patient: self.patient.clone(),
            free_text: self.free_text.clone(),
        }
    }
}

/// Structural snapshot of the editable fields, captured at load and on
/// explicit save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSnapshot {
    pub patient: PatientFields,
    pub free_text: String,
}
