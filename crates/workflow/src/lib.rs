//! Orchestration for the anonymization review & approval workflow.
//!
//! Builds on `medanon-core`'s pure decision logic:
//!
//! - [`collaborators`] — async seams to the record source, annotation
//!   sink, remote anonymization auditor, and segment validation stream.
//! - [`state`] — the current record's edit-event state and dirty tracking.
//! - [`sync`] — dual-source playback cursor coordination.
//! - [`cache`] — the controller-owned TTL record cache.
//! - [`controller`] — the fetch/skip/reject/save/approve state machine.
//!
//! Everything here is single-orchestrator: one controller instance per
//! reviewer session, shared by reference, with an in-flight guard making
//! duplicate submissions silent no-ops.

pub mod cache;
pub mod collaborators;
pub mod controller;
pub mod error;
pub mod state;
pub mod sync;

pub use cache::RecordCache;
pub use collaborators::{
    AnnotationSink, AnonymizationAuditor, RecordSource, ReviewScope, SegmentValidationEvent,
};
pub use controller::{
    ApproveOutcome, ReviewWorkflowController, SaveOutcome, WorkflowConfig, WorkflowPhase,
    WorkflowProjection,
};
pub use error::{RemoteFailure, WorkflowError};
pub use state::{Derived, EditEvent, ReviewRecordState};
pub use sync::{DualSourceSynchronizer, ProgressNotice, SourceCursor, SourceSide};
