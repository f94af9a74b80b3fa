//! Pure decision logic for the anonymization review & approval workflow.
//!
//! This crate holds everything that can be computed without I/O:
//!
//! - [`naming`] — snake_case ↔ camelCase key translation over nested trees.
//! - [`dates`] — dual-convention calendar dates, legality, comparison, and
//!   the [`dates::DateValidator`] error aggregator.
//! - [`segment`] — time-ranged labeled segments and their
//!   requires-validation classification.
//! - [`progress`] — validation progress aggregation.
//! - [`media`] — media kind detection (video / document / unknown).
//! - [`patient`] — patient metadata fields and central validation.
//! - [`record`] — the review record aggregate and its edit snapshot.
//! - [`approval`] — the pure approve/block gate.
//!
//! Orchestration (fetching, saving, approving, playback coordination)
//! lives in the `medanon-workflow` crate.

pub mod approval;
pub mod dates;
pub mod error;
pub mod media;
pub mod naming;
pub mod patient;
pub mod progress;
pub mod record;
pub mod segment;
pub mod types;

pub use approval::{approval_block_reason, can_approve};
pub use error::{CoreError, FieldError, FieldErrorKind};
pub use media::{detect_media_kind, MediaKind};
pub use patient::PatientFields;
pub use progress::ValidationProgress;
pub use record::{EditSnapshot, ReviewRecord};
pub use segment::{classify_segments, Segment, LABEL_OUT_OF_SCOPE};
pub use types::DbId;
