//! Segment validation progress aggregation.

use serde::{Deserialize, Serialize};

use crate::media::MediaKind;
use crate::segment::Segment;

/// Aggregated validation progress across a record's segments.
///
/// Recomputed on record load and on every segment-validated event; the
/// percentage is defined as 100 when nothing requires validation, so an
/// empty requirement set reads as trivially complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProgress {
    pub required: usize,
    pub validated: usize,
    pub percentage: u8,
}

impl Default for ValidationProgress {
    fn default() -> Self {
        Self::compute(0, 0)
    }
}

impl ValidationProgress {
    /// Build from raw counts. `validated` is clamped to `required`.
    pub fn compute(required: usize, validated: usize) -> Self {
        let validated = validated.min(required);
        let percentage = if required == 0 {
            100
        } else {
            ((validated as f64 / required as f64) * 100.0).round() as u8
        };
        Self {
            required,
            validated,
            percentage,
        }
    }

    /// Recompute from a record's segment list.
    pub fn for_segments(
        segments: &[Segment],
        media_kind: MediaKind,
        out_of_scope_label: &str,
    ) -> Self {
        let mut required = 0;
        let mut validated = 0;
        for segment in segments {
            if segment.requires_validation(media_kind, out_of_scope_label) {
                required += 1;
                if segment.validated {
                    validated += 1;
                }
            }
        }
        Self::compute(required, validated)
    }

    /// True when every required segment has been signed off.
    pub fn is_complete(&self) -> bool {
        self.validated >= self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::LABEL_OUT_OF_SCOPE;

    fn segment(id: i64, label: &str, validated: bool) -> Segment {
        let mut s = Segment::new(id, label, 0.0, 1.0).unwrap();
        s.validated = validated;
        s
    }

    #[test]
    fn nothing_required_is_complete() {
        let p = ValidationProgress::compute(0, 0);
        assert_eq!(p.percentage, 100);
        assert!(p.is_complete());
    }

    #[test]
    fn partial_progress_rounds() {
        let p = ValidationProgress::compute(4, 3);
        assert_eq!(p.percentage, 75);
        assert!(!p.is_complete());

        let p = ValidationProgress::compute(3, 1);
        assert_eq!(p.percentage, 33);

        let p = ValidationProgress::compute(3, 2);
        assert_eq!(p.percentage, 67);
    }

    #[test]
    fn validated_clamped_to_required() {
        let p = ValidationProgress::compute(2, 5);
        assert_eq!(p.validated, 2);
        assert_eq!(p.percentage, 100);
    }

    #[test]
    fn for_segments_counts_only_required_ones() {
        let segments = vec![
            segment(1, "outside", true),
            segment(2, "outside", false),
            segment(3, "polyp", false),
        ];
        let p = ValidationProgress::for_segments(&segments, MediaKind::Video, LABEL_OUT_OF_SCOPE);
        assert_eq!(p.required, 2);
        assert_eq!(p.validated, 1);
        assert_eq!(p.percentage, 50);
    }

    #[test]
    fn document_record_has_nothing_to_validate() {
        let segments = vec![segment(1, "outside", false)];
        let p =
            ValidationProgress::for_segments(&segments, MediaKind::Document, LABEL_OUT_OF_SCOPE);
        assert_eq!(p.required, 0);
        assert_eq!(p.percentage, 100);
        assert!(p.is_complete());
    }
}
