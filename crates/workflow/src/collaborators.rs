//! Async seams to the engine's external collaborators.
//!
//! Transport, persistence, and the anonymization algorithm itself live
//! behind these traits; the engine only sees their success/failure
//! results. Segment validation sign-offs arrive as a plain event stream
//! over an mpsc channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use medanon_core::{DbId, MediaKind, PatientFields, ReviewRecord};

use crate::error::RemoteFailure;

/// Which queue of pending records the reviewer is working through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewScope {
    #[default]
    All,
    Video,
    Document,
}

/// Supplies pending review records, one at a time.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the next pending record in `scope`, or `None` when the
    /// queue is exhausted.
    async fn fetch_next(&self, scope: ReviewScope) -> Result<Option<ReviewRecord>, RemoteFailure>;
}

/// Persists the reviewer's annotation of one record.
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    async fn persist(
        &self,
        record_id: DbId,
        patient: &PatientFields,
        free_text: &str,
        media_kind: MediaKind,
    ) -> Result<(), RemoteFailure>;
}

/// Best-effort remote audit of the anonymization result.
///
/// A failure here is surfaced as a warning; it never gates local queue
/// progress.
#[async_trait]
pub trait AnonymizationAuditor: Send + Sync {
    async fn validate(&self, record_id: DbId, patient: &PatientFields)
        -> Result<(), RemoteFailure>;
}

/// One event from the segment validation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SegmentValidationEvent {
    /// A reviewer signed a segment off (or withdrew the sign-off).
    Validated { segment_id: DbId, validated: bool },
    /// The source has no further events for this record.
    Completed,
}
