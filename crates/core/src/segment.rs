//! Time-ranged labeled segments and their validation classification.
//!
//! Offsets are either frame indices or seconds, consistently within one
//! record; the unit is fixed by the producing collaborator and never mixed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::media::MediaKind;
use crate::types::DbId;

/// Default label marking footage recorded outside the patient,
/// requiring explicit reviewer sign-off before approval.
pub const LABEL_OUT_OF_SCOPE: &str = "outside";

/// A labeled time range within a record's media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: DbId,
    pub label_code: String,
    pub start_offset: f64,
    pub end_offset: f64,
    pub validated: bool,
}

impl Segment {
    /// Construct a segment, enforcing the offset invariants:
    /// offsets are non-negative and start strictly precedes end.
    pub fn new(
        id: DbId,
        label_code: impl Into<String>,
        start_offset: f64,
        end_offset: f64,
    ) -> Result<Self, CoreError> {
        if start_offset < 0.0 || end_offset < 0.0 {
            return Err(CoreError::Validation(format!(
                "Segment {id}: offsets must be non-negative (got {start_offset}..{end_offset})"
            )));
        }
        if start_offset >= end_offset {
            return Err(CoreError::Validation(format!(
                "Segment {id}: start_offset ({start_offset}) must be before end_offset ({end_offset})"
            )));
        }
        Ok(Self {
            id,
            label_code: label_code.into(),
            start_offset,
            end_offset,
            validated: false,
        })
    }

    /// Whether this segment needs explicit reviewer sign-off before its
    /// record may be approved. Only video records carry reviewable
    /// footage; the label match is case-insensitive.
    pub fn requires_validation(&self, media_kind: MediaKind, out_of_scope_label: &str) -> bool {
        media_kind == MediaKind::Video && self.label_code.eq_ignore_ascii_case(out_of_scope_label)
    }
}

/// Result of partitioning a record's segments in one pass.
#[derive(Debug, Default)]
pub struct SegmentPartition<'a> {
    pub requires_validation: Vec<&'a Segment>,
    pub exempt: Vec<&'a Segment>,
}

/// Partition `segments` into requires-validation / exempt.
pub fn classify_segments<'a>(
    segments: &'a [Segment],
    media_kind: MediaKind,
    out_of_scope_label: &str,
) -> SegmentPartition<'a> {
    let mut partition = SegmentPartition::default();
    for segment in segments {
        if segment.requires_validation(media_kind, out_of_scope_label) {
            partition.requires_validation.push(segment);
        } else {
            partition.exempt.push(segment);
        }
    }
    partition
}
